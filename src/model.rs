mod config;
mod dashboard;
mod helpers;

pub use self::config::{AgentConfig, ReadinessConfig, default_helper_name};
pub use self::dashboard::{Dashboard, ManagedPanel, quote_panel};
pub use self::helpers::{
    EntityState, HelperIds, OVERVIEW_OPTION, REFRESH_OPTION, ResolutionResult, StateSnapshot, User,
};
