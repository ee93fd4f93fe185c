//! Medal dashboard application layer: configuration and the coordinator
//! that links the record store, the selection engine and the views.

pub mod config;
pub mod coordinator;

pub use config::{ConfigError, DashboardConfig, CONFIG_ENV_VAR};
pub use coordinator::Dashboard;
