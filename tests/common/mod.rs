#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use anyhow::Result;

use default_dashboard::host::{HelperKind, Host};
use default_dashboard::model::{Dashboard, StateSnapshot, User};
use default_dashboard::session::Session;
use default_dashboard::store::{KeyValueStore, ProfileStore};

pub const GLOBAL_SELECTOR: &str = "input_select.default_dashboard";
pub const GLOBAL_TOGGLE: &str = "input_boolean.default_dashboard";
pub const JANE_SELECTOR: &str = "input_select.default_dashboard_jane";
pub const JANE_TOGGLE: &str = "input_boolean.default_dashboard_jane";
pub const BOB_SELECTOR: &str = "input_select.default_dashboard_bob";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    ListDashboards,
    SetOptions { entity_id: String, options: Vec<String> },
    SelectOption { entity_id: String, option: String },
    CreateHelper { domain: String, name: String, options: Vec<String> },
    Reload { panel: String },
}

#[derive(Default)]
struct Inner {
    states: BTreeMap<String, String>,
    options: BTreeMap<String, Vec<String>>,
    dashboards: Option<Vec<Dashboard>>,
    calls: Vec<Call>,
    failing: HashSet<String>,
    creation_supported: bool,
    ready_after: u32,
    pings: u32,
    user: User,
}

/// In-memory host that records every call and applies selector services
/// the way Home Assistant does.
pub struct FakeHost {
    inner: Mutex<Inner>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                dashboards: Some(Vec::new()),
                user: jane(),
                ..Inner::default()
            }),
        }
    }

    pub fn with_state(self, entity_id: &str, state: &str) -> Self {
        self.inner
            .lock()
            .unwrap()
            .states
            .insert(entity_id.to_string(), state.to_string());
        self
    }

    pub fn with_selector(self, entity_id: &str, state: &str, options: &[&str]) -> Self {
        self.inner.lock().unwrap().options.insert(
            entity_id.to_string(),
            options.iter().map(|s| s.to_string()).collect(),
        );
        self.with_state(entity_id, state)
    }

    pub fn with_dashboards(self, urls: &[&str]) -> Self {
        self.inner.lock().unwrap().dashboards =
            Some(urls.iter().map(|u| Dashboard::new(u)).collect());
        self
    }

    pub fn with_admin_dashboard(self, url: &str) -> Self {
        let mut d = Dashboard::new(url);
        d.require_admin = true;
        self.inner
            .lock()
            .unwrap()
            .dashboards
            .get_or_insert_with(Vec::new)
            .push(d);
        self
    }

    pub fn with_failing_catalog(self) -> Self {
        self.inner.lock().unwrap().dashboards = None;
        self
    }

    pub fn with_failing_entity(self, entity_id: &str) -> Self {
        self.inner
            .lock()
            .unwrap()
            .failing
            .insert(entity_id.to_string());
        self
    }

    pub fn with_helper_creation(self) -> Self {
        self.inner.lock().unwrap().creation_supported = true;
        self
    }

    pub fn ready_after(self, pings: u32) -> Self {
        self.inner.lock().unwrap().ready_after = pings;
        self
    }

    pub fn set_catalog(&self, urls: &[&str]) {
        self.inner.lock().unwrap().dashboards =
            Some(urls.iter().map(|u| Dashboard::new(u)).collect());
    }

    pub fn set_state(&self, entity_id: &str, state: &str) {
        self.inner
            .lock()
            .unwrap()
            .states
            .insert(entity_id.to_string(), state.to_string());
    }

    pub fn state(&self, entity_id: &str) -> Option<String> {
        self.inner.lock().unwrap().states.get(entity_id).cloned()
    }

    pub fn options(&self, entity_id: &str) -> Option<Vec<String>> {
        self.inner.lock().unwrap().options.get(entity_id).cloned()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn service_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::SetOptions { .. } | Call::SelectOption { .. }))
            .collect()
    }

    pub fn reloads(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Reload { panel } => Some(panel),
                _ => None,
            })
            .collect()
    }

    pub fn pings(&self) -> u32 {
        self.inner.lock().unwrap().pings
    }

    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().calls.clear();
    }
}

impl Host for FakeHost {
    async fn ping(&self) -> Result<bool> {
        let mut inner = self.inner.lock().unwrap();
        inner.pings += 1;
        Ok(inner.pings > inner.ready_after)
    }

    async fn states(&self) -> Result<StateSnapshot> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .states
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    async fn current_user(&self) -> Result<User> {
        Ok(self.inner.lock().unwrap().user.clone())
    }

    async fn list_dashboards(&self) -> Result<Vec<Dashboard>> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::ListDashboards);
        inner
            .dashboards
            .clone()
            .ok_or_else(|| anyhow::anyhow!("lovelace/dashboards/list failed"))
    }

    async fn call_service(
        &self,
        domain: &str,
        service: &str,
        data: serde_json::Value,
        entity_id: &str,
    ) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        anyhow::ensure!(domain == "input_select", "unexpected domain {}", domain);
        match service {
            "set_options" => {
                let options: Vec<String> = serde_json::from_value(data["options"].clone())?;
                inner.calls.push(Call::SetOptions {
                    entity_id: entity_id.to_string(),
                    options: options.clone(),
                });
                if inner.failing.contains(entity_id) {
                    anyhow::bail!("service call failed for {}", entity_id);
                }
                let current = inner.states.get(entity_id).cloned();
                if current.is_none_or(|c| !options.contains(&c))
                    && let Some(first) = options.first()
                {
                    inner.states.insert(entity_id.to_string(), first.clone());
                }
                inner.options.insert(entity_id.to_string(), options);
            }
            "select_option" => {
                let option: String = serde_json::from_value(data["option"].clone())?;
                inner.calls.push(Call::SelectOption {
                    entity_id: entity_id.to_string(),
                    option: option.clone(),
                });
                if inner.failing.contains(entity_id) {
                    anyhow::bail!("service call failed for {}", entity_id);
                }
                if let Some(options) = inner.options.get(entity_id) {
                    anyhow::ensure!(options.contains(&option), "invalid option {}", option);
                }
                inner.states.insert(entity_id.to_string(), option);
            }
            other => anyhow::bail!("unexpected service {}", other),
        }
        Ok(())
    }

    async fn create_helper(&self, kind: HelperKind, name: &str, options: &[String]) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::CreateHelper {
            domain: kind.domain().to_string(),
            name: name.to_string(),
            options: options.to_vec(),
        });
        anyhow::ensure!(inner.creation_supported, "unknown command");
        Ok(())
    }

    async fn reload_frontend(&self, panel: &str) -> Result<()> {
        self.inner.lock().unwrap().calls.push(Call::Reload {
            panel: panel.to_string(),
        });
        Ok(())
    }
}

/// Store whose every access fails.
pub struct UnavailableStore;

impl KeyValueStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        anyhow::bail!("storage unavailable")
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        anyhow::bail!("storage unavailable")
    }
}

pub fn jane() -> User {
    User {
        id: "u-1".to_string(),
        name: "Jane".to_string(),
        is_admin: false,
    }
}

pub fn profile() -> Result<(tempfile::TempDir, ProfileStore)> {
    let dir = tempfile::tempdir()?;
    let store = ProfileStore::at(dir.path());
    Ok((dir, store))
}

pub fn session<'a>(
    host: &'a FakeHost,
    store: &'a ProfileStore,
) -> Session<&'a FakeHost, &'a ProfileStore> {
    Session::new(host, store, "default_dashboard", jane())
}

pub fn snapshot(pairs: &[(&str, &str)]) -> StateSnapshot {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
