//! One agent run: resolve the default dashboard for the session's user, or
//! run the refresh protocol when any selector asks for it.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::fetch_valid_targets;
use crate::host::Host;
use crate::model::{REFRESH_OPTION, quote_panel};
use crate::provision::ensure_user_helpers;
use crate::resolve::{missing_helper_guidance, resolve};
use crate::session::Session;
use crate::store::{KeyValueStore, PanelSettings};
use crate::sync::{SyncReport, refresh_pending, synchronize};

mod readiness;
pub use self::readiness::{RetryPolicy, wait_until_ready};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelCommit {
    /// Stored panel already matched; nothing written, no reload.
    Unchanged,
    /// New panel written and a reload requested.
    Changed,
    /// Target is not a known dashboard.
    Rejected,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    Refreshed(SyncReport),
    NoTarget {
        source_helper: String,
        guidance: Vec<String>,
    },
    Applied {
        target: String,
        enabled: bool,
        source_helper: String,
        panel: PanelCommit,
    },
}

pub async fn run_once<H: Host, S: KeyValueStore>(session: &Session<H, S>) -> Result<RunOutcome> {
    let snapshot = session
        .host
        .states()
        .await
        .context("fetch helper states")?;
    debug!(
        "Helper check: states={}, {:?}",
        snapshot.len(),
        session.ids.observed(&snapshot)
    );

    // Other users' selectors are only recorded by a refresh cycle.
    let mut own_selectors = vec![session.ids.user_selector.as_str()];
    if session.ids.global_selector != session.ids.user_selector {
        own_selectors.push(session.ids.global_selector.as_str());
    }
    for id in own_selectors {
        if let Some(current) = snapshot.state(id) {
            session.settings.remember_selection(id, current);
        }
    }

    let pending = refresh_pending(&session.helper_name, &snapshot);
    if !pending.is_empty() {
        info!("Refresh requested by [{}]", pending.join(", "));
        let report = synchronize(session, &snapshot, None).await;
        return Ok(RunOutcome::Refreshed(report));
    }

    let resolution = resolve(&session.ids, &snapshot);
    info!(
        "Startup state: dropdown={}, url={:?}, enabled={}",
        resolution.source_helper, resolution.target, resolution.enabled
    );

    // An empty selector value counts as nothing resolved.
    let Some(target) = resolution.target.filter(|t| !t.is_empty()) else {
        let guidance = missing_helper_guidance(&session.ids, &snapshot);
        for line in &guidance {
            warn!("{}", line);
        }
        if session.create_missing_helpers {
            ensure_user_helpers(session, &snapshot).await;
        }
        return Ok(RunOutcome::NoTarget {
            source_helper: resolution.source_helper,
            guidance,
        });
    };

    if target == REFRESH_OPTION {
        let report = synchronize(session, &snapshot, Some(&resolution.source_helper)).await;
        return Ok(RunOutcome::Refreshed(report));
    }

    session
        .settings
        .remember_selection(&resolution.source_helper, &target);
    apply_enabled(&session.settings, resolution.enabled);
    let panel = set_default_dashboard(session, &target).await;

    Ok(RunOutcome::Applied {
        target,
        enabled: resolution.enabled,
        source_helper: resolution.source_helper,
        panel,
    })
}

pub fn apply_enabled<S: KeyValueStore>(settings: &PanelSettings<S>, enabled: bool) {
    if enabled {
        settings.enable();
        info!("Default Dashboard Enabled");
    } else {
        settings.disable();
        info!("Default Dashboard Disabled");
    }
}

/// Commits `url` as the managed panel when it is a known dashboard and
/// differs from the stored one, then asks the frontend to reload.
pub async fn set_default_dashboard<H: Host, S: KeyValueStore>(
    session: &Session<H, S>,
    url: &str,
) -> PanelCommit {
    let managed = quote_panel(url);
    let stored = session.settings.managed_panel();
    let targets = fetch_valid_targets(&session.host).await;
    let valid = targets.contains(url);
    info!("Set default attempt: url={}, validUrl={}", url, valid);
    if !valid {
        warn!("{} is not a known dashboard; default panel left unchanged", url);
        return PanelCommit::Rejected;
    }
    if stored.default_panel.as_deref() == Some(managed.as_str()) {
        return PanelCommit::Unchanged;
    }

    info!("Setting default panel to {}", managed);
    session.settings.set_default_panel(url);
    if let Err(err) = session.host.reload_frontend(url).await {
        warn!("reload request failed: {:#}", err);
    }
    PanelCommit::Changed
}
