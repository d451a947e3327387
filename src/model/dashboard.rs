use serde::{Deserialize, Serialize};

/// One entry of `lovelace/dashboards/list`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    pub url_path: String,

    #[serde(default)]
    pub require_admin: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Dashboard {
    pub fn new(url_path: &str) -> Self {
        Self {
            url_path: url_path.to_string(),
            require_admin: false,
            title: None,
        }
    }
}

/// Durable panel settings as read back from the profile store.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedPanel {
    pub default_panel: Option<String>,
    pub is_default_panel_managed: Option<String>,
}

/// The frontend reads `defaultPanel` as a JSON string literal.
pub fn quote_panel(url: &str) -> String {
    format!("\"{}\"", url)
}
