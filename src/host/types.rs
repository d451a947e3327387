//! Wire payloads for the Home Assistant REST and WebSocket APIs.

use serde::Deserialize;

/// Event fired after the managed panel changes.
pub(super) const RELOAD_EVENT: &str = "default_dashboard_reload";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HelperKind {
    Toggle,
    Selector,
}

impl HelperKind {
    pub fn domain(self) -> &'static str {
        match self {
            HelperKind::Toggle => "input_boolean",
            HelperKind::Selector => "input_select",
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiStatus {
    #[serde(default)]
    pub(super) message: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct WsMessage {
    #[serde(default)]
    pub(super) id: Option<u64>,

    #[serde(rename = "type")]
    pub(super) kind: String,

    #[serde(default)]
    pub(super) success: Option<bool>,

    #[serde(default)]
    pub(super) result: Option<serde_json::Value>,

    #[serde(default)]
    pub(super) error: Option<WsError>,

    #[serde(default)]
    pub(super) message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WsError {
    #[serde(default)]
    pub(super) code: String,
    #[serde(default)]
    pub(super) message: String,
}
