use serde::{Deserialize, Serialize};

use super::helpers::DEFAULT_HELPER_NAME;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentConfig {
    pub version: u32,

    /// Home Assistant base url, e.g. `http://homeassistant.local:8123`.
    pub base_url: String,

    // Usually supplied through HASS_TOKEN instead of being written to disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Object id shared by the selector and toggle helpers.
    #[serde(default = "default_helper_name")]
    pub helper_name: String,

    #[serde(default)]
    pub readiness: ReadinessConfig,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Try to create the user's helpers when none resolve.
    #[serde(default)]
    pub create_missing_helpers: bool,
}

impl AgentConfig {
    pub fn new(base_url: String, token: Option<String>) -> Self {
        Self {
            version: 1,
            base_url,
            token,
            helper_name: default_helper_name(),
            readiness: ReadinessConfig::default(),
            request_timeout_secs: default_request_timeout_secs(),
            create_missing_helpers: false,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReadinessConfig {
    /// Fixed delay between readiness probes.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Give up after this many probes; wait forever when unset.
    #[serde(default)]
    pub max_attempts: Option<u32>,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            max_attempts: None,
        }
    }
}

pub fn default_helper_name() -> String {
    DEFAULT_HELPER_NAME.to_string()
}

fn default_interval_ms() -> u64 {
    100
}

fn default_request_timeout_secs() -> u64 {
    10
}
