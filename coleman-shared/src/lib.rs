//! Shared components for the Coleman host application and its plugins.
//!
//! # Modules
//!
//! - [`host`] — The host contract ([`ColemanHost`]), the settings registry, the
//!   type-erased [`RequestHandler`] and the axum-backed reference host [`ColemanApp`]
//! - [`plugin`] — The four-stage plugin lifecycle trait ([`ColemanPlugin`])
//! - [`errors`] — Host and plugin error types
//! - [`logging`] — Tracing subscriber initialisation

pub mod errors;
pub mod host;
pub mod logging;
pub mod plugin;

pub use errors::{HostError, HostResult, PluginError, PluginResult};
pub use host::{
    ColemanApp, ColemanHost, RequestHandler, SettingKey, SettingValue, SettingsRegistry,
};
pub use plugin::{ColemanPlugin, PluginStage};
