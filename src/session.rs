use crate::helpers::derive_ids;
use crate::host::Host;
use crate::model::{HelperIds, User};
use crate::store::{KeyValueStore, PanelSettings};

/// The one access point to host and profile storage for a run, built once
/// and passed to every component.
pub struct Session<H, S> {
    pub host: H,
    pub settings: PanelSettings<S>,
    pub helper_name: String,
    pub user: User,
    pub ids: HelperIds,
    /// Create the user's helpers when nothing resolves.
    pub create_missing_helpers: bool,
}

impl<H: Host, S: KeyValueStore> Session<H, S> {
    pub fn new(host: H, store: S, helper_name: &str, user: User) -> Self {
        let ids = derive_ids(helper_name, &user);
        Self {
            host,
            settings: PanelSettings::new(store),
            helper_name: helper_name.to_string(),
            user,
            ids,
            create_missing_helpers: false,
        }
    }

    pub fn with_helper_creation(mut self, enabled: bool) -> Self {
        self.create_missing_helpers = enabled;
        self
    }
}
