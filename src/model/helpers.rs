use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

pub(crate) const DEFAULT_HELPER_NAME: &str = "default_dashboard";

/// Selector value meaning "rebuild my option list".
pub const REFRESH_OPTION: &str = "refresh";

/// Built-in dashboard that is always a valid target.
pub const OVERVIEW_OPTION: &str = "lovelace";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// Row of `/api/states`; attributes are not needed here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityState {
    pub entity_id: String,
    pub state: String,
}

/// Point-in-time view of host entity states.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StateSnapshot {
    states: HashMap<String, String>,
}

impl StateSnapshot {
    pub fn from_entities(entities: impl IntoIterator<Item = EntityState>) -> Self {
        Self {
            states: entities
                .into_iter()
                .map(|e| (e.entity_id, e.state))
                .collect(),
        }
    }

    pub fn state(&self, entity_id: &str) -> Option<&str> {
        self.states.get(entity_id).map(String::as_str)
    }

    pub fn contains(&self, entity_id: &str) -> bool {
        self.states.contains_key(entity_id)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn entity_ids(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(String::as_str)
    }
}

impl FromIterator<(String, String)> for StateSnapshot {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            states: iter.into_iter().collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HelperIds {
    pub suffix: String,
    pub user_selector: String,
    pub user_toggle: String,
    pub global_selector: String,
    pub global_toggle: String,
}

impl HelperIds {
    /// Current values of the four helpers, keyed by id, for display.
    pub fn observed(&self, snapshot: &StateSnapshot) -> BTreeMap<String, Option<String>> {
        [
            &self.user_selector,
            &self.user_toggle,
            &self.global_selector,
            &self.global_toggle,
        ]
        .into_iter()
        .map(|id| (id.clone(), snapshot.state(id).map(str::to_string)))
        .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolutionResult {
    pub target: Option<String>,
    pub enabled: bool,
    /// Selector the target came from; the user selector when nothing resolved.
    pub source_helper: String,
}
