//! Panel settings and last-selection records on top of a [`KeyValueStore`].
//!
//! The profile store is treated as best-effort: read failures look like
//! missing keys and write failures are logged and dropped.

use std::borrow::Borrow;
use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::{KeyValueStore, ProfileStore};
use crate::model::{ManagedPanel, REFRESH_OPTION, quote_panel};

pub const DEFAULT_PANEL_KEY: &str = "defaultPanel";
pub const MANAGED_KEY: &str = "isDefaultPanelManaged";
pub const LAST_OPTION_PREFIX: &str = "defaultDashboard:lastOption:";

pub fn last_option_key(helper_id: &str) -> String {
    format!("{}{}", LAST_OPTION_PREFIX, helper_id)
}

pub struct PanelSettings<S> {
    store: S,
}

impl<S: KeyValueStore> PanelSettings<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(v) => v,
            Err(err) => {
                warn!("profile store read failed for {}: {:#}", key, err);
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(err) = self.store.set(key, value) {
            warn!("profile store write failed for {}: {:#}", key, err);
        }
    }

    pub fn managed_panel(&self) -> ManagedPanel {
        ManagedPanel {
            default_panel: self.read(DEFAULT_PANEL_KEY),
            is_default_panel_managed: self.read(MANAGED_KEY),
        }
    }

    /// Commits `url` as the default panel. The managed flag is left alone.
    pub fn set_default_panel(&self, url: &str) {
        self.write(DEFAULT_PANEL_KEY, &quote_panel(url));
    }

    pub fn enable(&self) {
        self.write(MANAGED_KEY, "true");
    }

    pub fn disable(&self) {
        self.write(MANAGED_KEY, "false");
    }

    pub fn last_selection(&self, helper_id: &str) -> Option<String> {
        self.read(&last_option_key(helper_id))
    }

    /// Records `option` unless it is empty or the refresh sentinel.
    pub fn remember_selection(&self, helper_id: &str, option: &str) {
        if option.is_empty() || option == REFRESH_OPTION {
            return;
        }
        debug!("remember {} -> {}", helper_id, option);
        self.write(&last_option_key(helper_id), option);
    }
}

impl<S: Borrow<ProfileStore>> PanelSettings<S> {
    /// Saved last selections keyed by helper id; empty when the profile
    /// cannot be read.
    pub fn last_selections(&self) -> BTreeMap<String, String> {
        let entries = match self.store.borrow().entries() {
            Ok(entries) => entries,
            Err(err) => {
                warn!("profile store read failed: {:#}", err);
                return BTreeMap::new();
            }
        };
        entries
            .into_iter()
            .filter_map(|(k, v)| {
                k.strip_prefix(LAST_OPTION_PREFIX)
                    .map(|id| (id.to_string(), v))
            })
            .collect()
    }
}
