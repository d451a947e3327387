//! Refresh protocol: rebuild every selector helper's option list from the
//! dashboard catalog and put each helper back on a sensible selection.
//!
//! Options are computed once, applied to every helper, then selections are
//! restored for every helper. Calls are sequential and a failed call only
//! affects its own helper.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::fetch_valid_targets;
use crate::helpers::discover_selectors;
use crate::host::{Host, select_selector_option, set_selector_options};
use crate::model::{REFRESH_OPTION, StateSnapshot};
use crate::session::Session;
use crate::store::KeyValueStore;

mod options;
mod restore;

pub use self::options::build_options;
pub use self::restore::choose_restore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    RefreshDetected,
    OptionsRecomputed,
    OptionsApplied,
    SelectionsRestored,
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SyncPhase::Idle => "idle",
            SyncPhase::RefreshDetected => "refresh-detected",
            SyncPhase::OptionsRecomputed => "options-recomputed",
            SyncPhase::OptionsApplied => "options-applied",
            SyncPhase::SelectionsRestored => "selections-restored",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HelperSync {
    pub entity_id: String,
    pub previous: Option<String>,
    pub selected: String,
    pub options_applied: bool,
    pub selection_applied: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub options: Vec<String>,
    pub helpers: Vec<HelperSync>,
}

impl SyncReport {
    /// Per-helper calls that failed and will heal on the next refresh.
    pub fn failures(&self) -> usize {
        self.helpers
            .iter()
            .map(|h| usize::from(!h.options_applied) + usize::from(!h.selection_applied))
            .sum()
    }
}

/// Selector helpers currently holding the refresh sentinel.
pub fn refresh_pending(helper_name: &str, snapshot: &StateSnapshot) -> Vec<String> {
    discover_selectors(helper_name, snapshot)
        .into_iter()
        .filter(|id| snapshot.state(id) == Some(REFRESH_OPTION))
        .collect()
}

fn advance(phase: &mut SyncPhase, next: SyncPhase) {
    debug!("refresh: {} -> {}", phase, next);
    *phase = next;
}

/// Runs one refresh cycle over every discovered selector helper.
///
/// `anchor` is the helper that triggered the cycle through resolution; it is
/// handled first and included even if discovery would miss it, as long as the
/// host reported it.
pub async fn synchronize<H: Host, S: KeyValueStore>(
    session: &Session<H, S>,
    snapshot: &StateSnapshot,
    anchor: Option<&str>,
) -> SyncReport {
    let mut phase = SyncPhase::Idle;

    let mut helper_ids = Vec::new();
    if let Some(anchor) = anchor.filter(|id| snapshot.contains(id)) {
        helper_ids.push(anchor.to_string());
    }
    for id in discover_selectors(&session.helper_name, snapshot) {
        if !helper_ids.contains(&id) {
            helper_ids.push(id);
        }
    }
    advance(&mut phase, SyncPhase::RefreshDetected);
    info!(
        "Refreshing dropdown options for all helpers: [{}]",
        helper_ids.join(", ")
    );

    let targets = fetch_valid_targets(&session.host).await;
    let options = build_options(&targets);
    advance(&mut phase, SyncPhase::OptionsRecomputed);

    for id in &helper_ids {
        if let Some(current) = snapshot.state(id) {
            session.settings.remember_selection(id, current);
        }
    }

    let mut helpers: Vec<HelperSync> = Vec::with_capacity(helper_ids.len());
    for id in &helper_ids {
        let options_applied = match set_selector_options(&session.host, id, &options).await {
            Ok(()) => true,
            Err(err) => {
                warn!("{:#}", err);
                false
            }
        };
        helpers.push(HelperSync {
            entity_id: id.clone(),
            previous: snapshot.state(id).map(str::to_string),
            selected: String::new(),
            options_applied,
            selection_applied: false,
        });
    }
    advance(&mut phase, SyncPhase::OptionsApplied);

    for helper in helpers.iter_mut() {
        let last = session.settings.last_selection(&helper.entity_id);
        helper.selected = choose_restore(helper.previous.as_deref(), last.as_deref(), &options);
        helper.selection_applied =
            match select_selector_option(&session.host, &helper.entity_id, &helper.selected).await
            {
                Ok(()) => true,
                Err(err) => {
                    warn!("{:#}", err);
                    false
                }
            };
    }
    advance(&mut phase, SyncPhase::SelectionsRestored);

    let report = SyncReport { options, helpers };
    info!(
        "Refresh complete: helpers={}, failures={}",
        report.helpers.len(),
        report.failures()
    );
    advance(&mut phase, SyncPhase::Idle);
    report
}
