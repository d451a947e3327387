pub mod catalog;
pub mod helpers;
pub mod host;
pub mod model;
pub mod orchestrator;
pub mod pin;
pub mod provision;
pub mod resolve;
pub mod session;
pub mod store;
pub mod sync;
