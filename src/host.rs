//! Host collaborator: everything the engine needs from Home Assistant.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use crate::model::{Dashboard, StateSnapshot, User};

mod rest;
mod types;
mod ws;

pub use self::types::HelperKind;

/// Operations consumed from the host. Implemented by [`HassClient`] and by
/// in-memory fakes in tests.
#[allow(async_fn_in_trait)]
pub trait Host {
    /// True once the host answers API requests.
    async fn ping(&self) -> Result<bool>;

    async fn states(&self) -> Result<StateSnapshot>;

    async fn current_user(&self) -> Result<User>;

    async fn list_dashboards(&self) -> Result<Vec<Dashboard>>;

    async fn call_service(
        &self,
        domain: &str,
        service: &str,
        data: serde_json::Value,
        entity_id: &str,
    ) -> Result<()>;

    async fn create_helper(&self, kind: HelperKind, name: &str, options: &[String]) -> Result<()>;

    /// Asks open frontends to reload so the new default panel is picked up.
    async fn reload_frontend(&self, panel: &str) -> Result<()>;
}

impl<T: Host + ?Sized> Host for &T {
    async fn ping(&self) -> Result<bool> {
        (**self).ping().await
    }

    async fn states(&self) -> Result<StateSnapshot> {
        (**self).states().await
    }

    async fn current_user(&self) -> Result<User> {
        (**self).current_user().await
    }

    async fn list_dashboards(&self) -> Result<Vec<Dashboard>> {
        (**self).list_dashboards().await
    }

    async fn call_service(
        &self,
        domain: &str,
        service: &str,
        data: serde_json::Value,
        entity_id: &str,
    ) -> Result<()> {
        (**self).call_service(domain, service, data, entity_id).await
    }

    async fn create_helper(&self, kind: HelperKind, name: &str, options: &[String]) -> Result<()> {
        (**self).create_helper(kind, name, options).await
    }

    async fn reload_frontend(&self, panel: &str) -> Result<()> {
        (**self).reload_frontend(panel).await
    }
}

/// `input_select.set_options` for one selector helper.
pub async fn set_selector_options<H: Host>(
    host: &H,
    entity_id: &str,
    options: &[String],
) -> Result<()> {
    info!("Setting options for {}: [{}]", entity_id, options.join(", "));
    host.call_service(
        "input_select",
        "set_options",
        serde_json::json!({ "options": options }),
        entity_id,
    )
    .await
    .with_context(|| format!("set options for {}", entity_id))
}

/// `input_select.select_option` for one selector helper.
pub async fn select_selector_option<H: Host>(
    host: &H,
    entity_id: &str,
    option: &str,
) -> Result<()> {
    info!("Selecting option for {}: {}", entity_id, option);
    host.call_service(
        "input_select",
        "select_option",
        serde_json::json!({ "option": option }),
        entity_id,
    )
    .await
    .with_context(|| format!("select option for {}", entity_id))
}

pub struct HassClient {
    base_url: String,
    token: String,
    timeout: Duration,
    http: reqwest::Client,
}

impl HassClient {
    pub fn new(base_url: &str, token: String, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("default-dashboard")
            .timeout(timeout)
            .build()
            .context("build reqwest client")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn websocket_url(&self) -> String {
        let base = if let Some(rest) = self.base_url.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = self.base_url.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            self.base_url.clone()
        };
        format!("{}/api/websocket", base)
    }

    fn auth(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl Host for HassClient {
    async fn ping(&self) -> Result<bool> {
        self.api_status().await
    }

    async fn states(&self) -> Result<StateSnapshot> {
        self.fetch_states().await
    }

    async fn current_user(&self) -> Result<User> {
        let v = self
            .ws_command(serde_json::json!({ "type": "auth/current_user" }))
            .await
            .context("auth/current_user")?;
        serde_json::from_value(v).context("parse current user")
    }

    async fn list_dashboards(&self) -> Result<Vec<Dashboard>> {
        let v = self
            .ws_command(serde_json::json!({ "type": "lovelace/dashboards/list" }))
            .await
            .context("lovelace/dashboards/list")?;
        serde_json::from_value(v).context("parse dashboards")
    }

    async fn call_service(
        &self,
        domain: &str,
        service: &str,
        data: serde_json::Value,
        entity_id: &str,
    ) -> Result<()> {
        self.post_service(domain, service, data, entity_id).await
    }

    async fn create_helper(&self, kind: HelperKind, name: &str, options: &[String]) -> Result<()> {
        let mut cmd = serde_json::json!({
            "type": format!("{}/create", kind.domain()),
            "name": name,
        });
        if kind == HelperKind::Selector {
            cmd["options"] = serde_json::json!(options);
        }
        self.ws_command(cmd)
            .await
            .with_context(|| format!("{}/create", kind.domain()))?;
        Ok(())
    }

    async fn reload_frontend(&self, panel: &str) -> Result<()> {
        self.fire_event(
            types::RELOAD_EVENT,
            serde_json::json!({ "default_panel": panel }),
        )
        .await
    }
}

#[cfg(test)]
#[path = "tests/host_tests.rs"]
mod tests;
