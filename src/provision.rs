//! Best-effort creation of the user's helper pair. Failures are expected on
//! hosts without helper-creation support and never propagate.

use serde::Serialize;
use tracing::{info, warn};

use crate::catalog::selectable_dashboards;
use crate::helpers::object_id;
use crate::host::{HelperKind, Host};
use crate::model::{OVERVIEW_OPTION, REFRESH_OPTION, StateSnapshot};
use crate::session::Session;
use crate::store::KeyValueStore;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProvisionReport {
    pub selector_created: bool,
    pub toggle_created: bool,
}

pub async fn ensure_user_helpers<H: Host, S: KeyValueStore>(
    session: &Session<H, S>,
    snapshot: &StateSnapshot,
) -> ProvisionReport {
    let name = object_id(&session.helper_name, &session.ids.suffix);
    let mut report = ProvisionReport::default();

    if !snapshot.contains(&session.ids.user_selector) {
        let mut options = vec![OVERVIEW_OPTION.to_string()];
        options.extend(selectable_dashboards(&session.host).await);
        options.push(REFRESH_OPTION.to_string());
        report.selector_created =
            create(&session.host, HelperKind::Selector, &name, &options).await;
    }
    if !snapshot.contains(&session.ids.user_toggle) {
        report.toggle_created = create(&session.host, HelperKind::Toggle, &name, &[]).await;
    }
    report
}

async fn create<H: Host>(host: &H, kind: HelperKind, name: &str, options: &[String]) -> bool {
    match host.create_helper(kind, name, options).await {
        Ok(()) => {
            info!(
                "Created {} helper: name={:?}, optionsCount={}",
                kind.domain(),
                name,
                options.len()
            );
            true
        }
        Err(err) => {
            warn!(
                "Failed to create {} helper {:?} ({:#}). Please create it manually \
                 in Settings -> Devices & Services -> Helpers.",
                kind.domain(),
                name,
                err
            );
            false
        }
    }
}
