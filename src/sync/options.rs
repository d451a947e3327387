use crate::catalog::ValidTargets;
use crate::model::{OVERVIEW_OPTION, REFRESH_OPTION};

/// `[overview] ++ catalog urls ++ [refresh]`, catalog order kept, no repeats.
pub fn build_options(targets: &ValidTargets) -> Vec<String> {
    let mut options = vec![OVERVIEW_OPTION.to_string()];
    for url in targets.dashboard_urls() {
        if url == REFRESH_OPTION || options.iter().any(|o| o == url) {
            continue;
        }
        options.push(url.to_string());
    }
    options.push(REFRESH_OPTION.to_string());
    options
}

#[cfg(test)]
#[path = "../tests/sync/options_tests.rs"]
mod tests;
