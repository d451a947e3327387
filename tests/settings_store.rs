mod common;

use anyhow::Result;

use common::{JANE_SELECTOR, profile};
use default_dashboard::model::AgentConfig;
use default_dashboard::store::{
    DEFAULT_PANEL_KEY, KeyValueStore, MANAGED_KEY, PanelSettings, ProfileStore, last_option_key,
};

#[test]
fn last_selection_round_trips() -> Result<()> {
    let (_dir, store) = profile()?;
    let settings = PanelSettings::new(&store);

    assert_eq!(settings.last_selection(JANE_SELECTOR), None);
    settings.remember_selection(JANE_SELECTOR, "energy");
    assert_eq!(settings.last_selection(JANE_SELECTOR).as_deref(), Some("energy"));
    assert_eq!(
        store.get("defaultDashboard:lastOption:input_select.default_dashboard_jane")?.as_deref(),
        Some("energy")
    );
    Ok(())
}

#[test]
fn sentinel_and_empty_values_are_never_recorded() -> Result<()> {
    let (_dir, store) = profile()?;
    let settings = PanelSettings::new(&store);

    settings.remember_selection(JANE_SELECTOR, "map");
    settings.remember_selection(JANE_SELECTOR, "refresh");
    settings.remember_selection(JANE_SELECTOR, "");
    assert_eq!(settings.last_selection(JANE_SELECTOR).as_deref(), Some("map"));
    Ok(())
}

#[test]
fn panel_is_stored_quoted_and_flag_toggles_independently() -> Result<()> {
    let (_dir, store) = profile()?;
    let settings = PanelSettings::new(&store);

    settings.disable();
    settings.set_default_panel("map");
    let managed = settings.managed_panel();
    assert_eq!(managed.default_panel.as_deref(), Some("\"map\""));
    assert_eq!(managed.is_default_panel_managed.as_deref(), Some("false"));

    settings.enable();
    assert_eq!(store.get(MANAGED_KEY)?.as_deref(), Some("true"));
    assert_eq!(store.get(DEFAULT_PANEL_KEY)?.as_deref(), Some("\"map\""));
    Ok(())
}

#[test]
fn state_survives_reopening_the_profile() -> Result<()> {
    let (dir, store) = profile()?;
    store.set(&last_option_key(JANE_SELECTOR), "energy")?;

    let reopened = ProfileStore::at(dir.path());
    assert_eq!(
        reopened.get(&last_option_key(JANE_SELECTOR))?.as_deref(),
        Some("energy")
    );
    Ok(())
}

#[test]
fn unsupported_state_version_is_an_error() -> Result<()> {
    let (dir, store) = profile()?;
    std::fs::write(
        dir.path().join("state.json"),
        r#"{ "version": 9, "entries": {} }"#,
    )?;
    let err = store.get(DEFAULT_PANEL_KEY).unwrap_err();
    assert!(err.to_string().contains("unsupported profile state version 9"), "{}", err);

    // The adapter reads through the failure as "absent".
    let settings = PanelSettings::new(&store);
    assert_eq!(settings.managed_panel().default_panel, None);
    assert!(settings.last_selections().is_empty());
    Ok(())
}

#[test]
fn last_selections_lists_only_selection_records() -> Result<()> {
    let (_dir, store) = profile()?;
    let settings = PanelSettings::new(&store);
    settings.remember_selection(JANE_SELECTOR, "energy");
    settings.set_default_panel("map");

    let selections = settings.last_selections();
    assert_eq!(selections.len(), 1);
    assert_eq!(selections.get(JANE_SELECTOR).map(String::as_str), Some("energy"));
    Ok(())
}

#[test]
fn init_writes_config_and_refuses_to_overwrite() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let cfg = AgentConfig::new("http://ha.local:8123".to_string(), None);
    let store = ProfileStore::init(dir.path(), &cfg, false)?;

    let read = store.read_config()?.expect("config written");
    assert_eq!(read.base_url, "http://ha.local:8123");
    assert_eq!(read.helper_name, "default_dashboard");
    assert_eq!(read.readiness.interval_ms, 100);
    assert!(read.token.is_none());

    let err = ProfileStore::init(dir.path(), &cfg, false).unwrap_err();
    assert!(err.to_string().contains("already exists"), "{}", err);
    ProfileStore::init(dir.path(), &cfg, true)?;
    Ok(())
}

#[test]
fn config_defaults_fill_missing_fields() -> Result<()> {
    let cfg: AgentConfig =
        serde_json::from_str(r#"{ "version": 1, "base_url": "http://ha:8123" }"#)?;
    assert_eq!(cfg.helper_name, "default_dashboard");
    assert_eq!(cfg.request_timeout_secs, 10);
    assert_eq!(cfg.readiness.max_attempts, None);
    assert!(!cfg.create_missing_helpers);
    Ok(())
}
