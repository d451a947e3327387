use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use tracing::debug;

use crate::host::Host;
use crate::model::ReadinessConfig;

/// Fixed-interval polling; `max_attempts: None` waits until cancelled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub interval: Duration,
    pub max_attempts: Option<u32>,
}

impl From<&ReadinessConfig> for RetryPolicy {
    fn from(cfg: &ReadinessConfig) -> Self {
        Self {
            interval: Duration::from_millis(cfg.interval_ms),
            max_attempts: cfg.max_attempts,
        }
    }
}

/// Polls `host.ping()` until it reports ready. Ends with an error when the
/// attempt budget runs out or `cancel` resolves first. Returns the number of
/// probes used.
pub async fn wait_until_ready<H: Host, F: Future>(
    host: &H,
    policy: &RetryPolicy,
    cancel: F,
) -> Result<u32> {
    let poll = async {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match host.ping().await {
                Ok(true) => return Ok(attempt),
                Ok(false) => debug!("host not ready (attempt {})", attempt),
                Err(err) => debug!("readiness probe failed (attempt {}): {:#}", attempt, err),
            }
            if let Some(max) = policy.max_attempts
                && attempt >= max
            {
                anyhow::bail!("host not ready after {} attempts", attempt);
            }
            tokio::time::sleep(policy.interval).await;
        }
    };

    tokio::select! {
        res = poll => res,
        _ = cancel => anyhow::bail!("cancelled while waiting for host readiness"),
    }
}
