use tracing::{info, warn};

use crate::host::Host;
use crate::model::{Dashboard, OVERVIEW_OPTION};

/// Dashboards that may be chosen as a default panel, in catalog order.
/// The overview is always valid even when the catalog is empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidTargets {
    urls: Vec<String>,
}

impl ValidTargets {
    pub fn from_dashboards(dashboards: &[Dashboard]) -> Self {
        let mut urls: Vec<String> = Vec::with_capacity(dashboards.len());
        for d in dashboards {
            if d.url_path.is_empty() || urls.contains(&d.url_path) {
                continue;
            }
            urls.push(d.url_path.clone());
        }
        Self { urls }
    }

    pub fn contains(&self, url: &str) -> bool {
        url == OVERVIEW_OPTION || self.urls.iter().any(|u| u == url)
    }

    /// Catalog urls without the overview, in catalog order.
    pub fn dashboard_urls(&self) -> impl Iterator<Item = &str> {
        self.urls
            .iter()
            .map(String::as_str)
            .filter(|u| *u != OVERVIEW_OPTION)
    }
}

/// Fetches the catalog; a failed fetch degrades to the overview only.
pub async fn fetch_valid_targets<H: Host>(host: &H) -> ValidTargets {
    match host.list_dashboards().await {
        Ok(dashboards) => {
            let targets = ValidTargets::from_dashboards(&dashboards);
            info!(
                "Fetched dashboards: count={}, urls=[{}]",
                dashboards.len(),
                targets.dashboard_urls().collect::<Vec<_>>().join(", ")
            );
            targets
        }
        Err(err) => {
            warn!("Error fetching dashboards: {:#}", err);
            ValidTargets::default()
        }
    }
}

/// Non-admin dashboard urls, used when creating selector helpers.
pub async fn selectable_dashboards<H: Host>(host: &H) -> Vec<String> {
    match host.list_dashboards().await {
        Ok(dashboards) => dashboards
            .into_iter()
            .filter(|d| !d.require_admin && d.url_path != OVERVIEW_OPTION)
            .map(|d| d.url_path)
            .collect(),
        Err(err) => {
            warn!("Error fetching dashboards: {:#}", err);
            Vec::new()
        }
    }
}
