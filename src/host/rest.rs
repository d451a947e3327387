use anyhow::{Context, Result};
use tracing::debug;

use super::HassClient;
use super::types::ApiStatus;
use crate::model::{EntityState, StateSnapshot};

impl HassClient {
    async fn ensure_ok(&self, resp: reqwest::Response, label: &str) -> Result<reqwest::Response> {
        if resp.status() == reqwest::StatusCode::UNAUTHORIZED {
            anyhow::bail!("unauthorized (token invalid/expired; check HASS_TOKEN or config.json)");
        }
        if resp.status() == reqwest::StatusCode::FORBIDDEN {
            anyhow::bail!("forbidden (the token's user cannot call {})", label);
        }
        resp.error_for_status()
            .with_context(|| format!("{} status", label))
    }

    pub(super) async fn api_status(&self) -> Result<bool> {
        let resp = match self
            .http
            .get(self.url("/api/"))
            .header(reqwest::header::AUTHORIZATION, self.auth())
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(err) => {
                debug!("api not reachable yet: {}", err);
                return Ok(false);
            }
        };
        if !resp.status().is_success() {
            debug!("api answered {}", resp.status());
            return Ok(false);
        }
        let status: ApiStatus = resp.json().await.context("parse api status")?;
        debug!("api status: {}", status.message);
        Ok(true)
    }

    pub(super) async fn fetch_states(&self) -> Result<StateSnapshot> {
        let resp = self
            .http
            .get(self.url("/api/states"))
            .header(reqwest::header::AUTHORIZATION, self.auth())
            .send()
            .await
            .context("get states")?;
        let rows: Vec<EntityState> = self
            .ensure_ok(resp, "get states")
            .await?
            .json()
            .await
            .context("parse states")?;
        Ok(StateSnapshot::from_entities(rows))
    }

    pub(super) async fn post_service(
        &self,
        domain: &str,
        service: &str,
        data: serde_json::Value,
        entity_id: &str,
    ) -> Result<()> {
        let mut body = match data {
            serde_json::Value::Object(map) => map,
            serde_json::Value::Null => serde_json::Map::new(),
            other => anyhow::bail!("service data must be an object, got {}", other),
        };
        body.insert(
            "entity_id".to_string(),
            serde_json::Value::String(entity_id.to_string()),
        );

        let label = format!("{}.{}", domain, service);
        let resp = self
            .http
            .post(self.url(&format!("/api/services/{}/{}", domain, service)))
            .header(reqwest::header::AUTHORIZATION, self.auth())
            .json(&body)
            .send()
            .await
            .with_context(|| format!("call {}", label))?;
        self.ensure_ok(resp, &label).await?;
        Ok(())
    }

    pub(super) async fn fire_event(&self, event: &str, data: serde_json::Value) -> Result<()> {
        let resp = self
            .http
            .post(self.url(&format!("/api/events/{}", event)))
            .header(reqwest::header::AUTHORIZATION, self.auth())
            .json(&data)
            .send()
            .await
            .with_context(|| format!("fire {}", event))?;
        self.ensure_ok(resp, event).await?;
        Ok(())
    }
}
