use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::model::AgentConfig;

mod settings;
pub use self::settings::{
    DEFAULT_PANEL_KEY, LAST_OPTION_PREFIX, MANAGED_KEY, PanelSettings, last_option_key,
};

pub const STORE_DIR: &str = ".default-dashboard";

/// Synchronous string key-value store scoped to one browser profile.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct ProfileState {
    version: u32,

    #[serde(default)]
    updated_at: Option<String>,

    #[serde(default)]
    entries: BTreeMap<String, String>,
}

impl ProfileState {
    fn empty() -> Self {
        Self {
            version: 1,
            updated_at: None,
            entries: BTreeMap::new(),
        }
    }
}

/// Profile directory holding `config.json` and the key-value `state.json`.
#[derive(Clone, Debug)]
pub struct ProfileStore {
    root: PathBuf,
}

impl ProfileStore {
    pub fn at(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn init(root: &Path, cfg: &AgentConfig, force: bool) -> Result<Self> {
        let store = Self::at(root);
        if store.config_path().exists() && !force {
            return Err(anyhow!(
                "{} already exists (use --force to re-init)",
                store.config_path().display()
            ));
        }
        fs::create_dir_all(root).with_context(|| format!("create {}", root.display()))?;
        store.write_config(cfg)?;
        Ok(store)
    }

    fn config_path(&self) -> PathBuf {
        self.root.join("config.json")
    }

    fn state_path(&self) -> PathBuf {
        self.root.join("state.json")
    }

    pub fn read_config(&self) -> Result<Option<AgentConfig>> {
        let path = self.config_path();
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path).context("read config.json")?;
        let cfg: AgentConfig = serde_json::from_slice(&bytes).context("parse config.json")?;
        if cfg.version != 1 {
            anyhow::bail!("unsupported config version {}", cfg.version);
        }
        Ok(Some(cfg))
    }

    pub fn write_config(&self, cfg: &AgentConfig) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(cfg).context("serialize config")?;
        write_atomic(&self.config_path(), &bytes).context("write config.json")?;
        Ok(())
    }

    fn read_state(&self) -> Result<ProfileState> {
        let path = self.state_path();
        if !path.exists() {
            return Ok(ProfileState::empty());
        }
        let bytes = fs::read(&path).context("read state.json")?;
        let st: ProfileState = serde_json::from_slice(&bytes).context("parse state.json")?;
        if st.version != 1 {
            anyhow::bail!("unsupported profile state version {}", st.version);
        }
        Ok(st)
    }

    fn write_state(&self, st: &ProfileState) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(st).context("serialize state")?;
        write_atomic(&self.state_path(), &bytes).context("write state.json")?;
        Ok(())
    }

    /// All stored entries, for inspection.
    pub fn entries(&self) -> Result<BTreeMap<String, String>> {
        Ok(self.read_state()?.entries)
    }
}

impl KeyValueStore for ProfileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_state()?.entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut st = self.read_state()?;
        if st.entries.get(key).map(String::as_str) == Some(value) {
            return Ok(());
        }
        st.entries.insert(key.to_string(), value.to_string());
        st.updated_at = Some(
            time::OffsetDateTime::now_utc()
                .format(&time::format_description::well_known::Rfc3339)
                .context("format timestamp")?,
        );
        self.write_state(&st)
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("create parent directories")?;
    }
    let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
    fs::write(&tmp, bytes).with_context(|| format!("write temp file {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}
