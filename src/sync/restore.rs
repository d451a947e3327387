use crate::model::{OVERVIEW_OPTION, REFRESH_OPTION};

/// Post-refresh selection for one helper.
///
/// A helper on the sentinel goes back to its last saved selection. Any other
/// helper keeps its value while the new options still offer it, then tries
/// the saved selection. Everything else lands on the overview.
pub fn choose_restore(previous: Option<&str>, last: Option<&str>, options: &[String]) -> String {
    let offered = |v: &str| v != REFRESH_OPTION && options.iter().any(|o| o == v);

    if previous != Some(REFRESH_OPTION)
        && let Some(prev) = previous.filter(|p| offered(p))
    {
        return prev.to_string();
    }
    match last.filter(|l| offered(l)) {
        Some(last) => last.to_string(),
        None => OVERVIEW_OPTION.to_string(),
    }
}

#[cfg(test)]
#[path = "../tests/sync/restore_tests.rs"]
mod tests;
