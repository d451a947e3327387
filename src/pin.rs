//! Static alternative to helper-driven resolution: a document or a flag
//! names the dashboard and the usual commit path applies it.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::host::Host;
use crate::orchestrator::{PanelCommit, apply_enabled, set_default_dashboard};
use crate::session::Session;
use crate::store::KeyValueStore;

/// `{ "default": "<url>", "users": { "<user slug>": "<url>" } }`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinFile {
    #[serde(default)]
    pub default: Option<String>,

    #[serde(default)]
    pub users: BTreeMap<String, String>,
}

impl PinFile {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
        serde_json::from_slice(&bytes).with_context(|| format!("parse {}", path.display()))
    }

    /// The user's own entry, else the shared default.
    pub fn pick(&self, user_suffix: &str) -> Option<&str> {
        self.users
            .get(user_suffix)
            .or(self.default.as_ref())
            .map(String::as_str)
    }
}

pub async fn pin_dashboard<H: Host, S: KeyValueStore>(
    session: &Session<H, S>,
    url: &str,
) -> PanelCommit {
    apply_enabled(&session.settings, true);
    set_default_dashboard(session, url).await
}

#[cfg(test)]
#[path = "tests/pin_tests.rs"]
mod tests;
