use crate::model::{HelperIds, StateSnapshot, User};

const SELECTOR_DOMAIN: &str = "input_select";
const TOGGLE_DOMAIN: &str = "input_boolean";

/// Lowercases `s` and collapses every run of characters outside
/// `[a-z0-9_]` into a single `_`.
pub fn slugify(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_run = false;
    for c in s.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }
    out
}

/// Display-name slug, falling back to the user id.
pub fn user_suffix(user: &User) -> String {
    let by_name = slugify(&user.name);
    if by_name.is_empty() {
        slugify(&user.id)
    } else {
        by_name
    }
}

pub fn object_id(helper_name: &str, suffix: &str) -> String {
    if suffix.is_empty() {
        helper_name.to_string()
    } else {
        format!("{}_{}", helper_name, suffix)
    }
}

/// Entity ids of the user-scoped and global helper pairs.
///
/// A user whose name and id both slugify to nothing gets the global ids.
pub fn derive_ids(helper_name: &str, user: &User) -> HelperIds {
    let suffix = user_suffix(user);
    let user_object = object_id(helper_name, &suffix);
    HelperIds {
        user_selector: format!("{}.{}", SELECTOR_DOMAIN, user_object),
        user_toggle: format!("{}.{}", TOGGLE_DOMAIN, user_object),
        global_selector: format!("{}.{}", SELECTOR_DOMAIN, helper_name),
        global_toggle: format!("{}.{}", TOGGLE_DOMAIN, helper_name),
        suffix,
    }
}

/// Every selector helper in `snapshot` sharing the helper name, global or
/// any user suffix, sorted by id.
pub fn discover_selectors(helper_name: &str, snapshot: &StateSnapshot) -> Vec<String> {
    let global = format!("{}.{}", SELECTOR_DOMAIN, helper_name);
    let user_prefix = format!("{}_", global);
    let mut ids: Vec<String> = snapshot
        .entity_ids()
        .filter(|id| *id == global || id.starts_with(&user_prefix))
        .map(str::to_string)
        .collect();
    ids.sort();
    ids
}

#[cfg(test)]
#[path = "tests/helpers_tests.rs"]
mod tests;
