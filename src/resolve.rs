use crate::model::{HelperIds, ResolutionResult, StateSnapshot};

/// Picks the active target from the helper states.
///
/// A user selector with its toggle `on` wins outright. Otherwise a global
/// pair that exists decides, with `enabled` following the global toggle.
/// When neither applies nothing resolves and the user selector is reported
/// as the source so callers can point at the helper to create.
pub fn resolve(ids: &HelperIds, snapshot: &StateSnapshot) -> ResolutionResult {
    let user_url = snapshot.state(&ids.user_selector);
    let user_enabled = snapshot.state(&ids.user_toggle);
    let global_url = snapshot.state(&ids.global_selector);
    let global_enabled = snapshot.state(&ids.global_toggle);

    if let (Some(url), Some("on")) = (user_url, user_enabled) {
        return ResolutionResult {
            target: Some(url.to_string()),
            enabled: true,
            source_helper: ids.user_selector.clone(),
        };
    }

    if let (Some(url), Some(toggle)) = (global_url, global_enabled) {
        return ResolutionResult {
            target: Some(url.to_string()),
            enabled: toggle == "on",
            source_helper: ids.global_selector.clone(),
        };
    }

    ResolutionResult {
        target: None,
        enabled: false,
        source_helper: ids.user_selector.clone(),
    }
}

/// Hints naming the helpers to create when a pair is incomplete.
pub fn missing_helper_guidance(ids: &HelperIds, snapshot: &StateSnapshot) -> Vec<String> {
    let mut out = Vec::new();
    if !snapshot.contains(&ids.user_selector) || !snapshot.contains(&ids.user_toggle) {
        out.push(format!(
            "User helpers missing. Please create {} (include option \"refresh\") and {}.",
            ids.user_selector, ids.user_toggle
        ));
    }
    if !snapshot.contains(&ids.global_selector) || !snapshot.contains(&ids.global_toggle) {
        out.push(format!(
            "Global helpers missing. Please create {} (include option \"refresh\") and {}.",
            ids.global_selector, ids.global_toggle
        ));
    }
    out
}
