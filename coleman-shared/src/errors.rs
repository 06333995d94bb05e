//! # Host and Plugin Error Types
//!
//! [`HostError`] is raised by a host when a registration is rejected.
//! [`PluginError`] is raised by a plugin lifecycle stage, either because the
//! host it was bound to is missing or because the host rejected the stage.

use std::path::PathBuf;

use thiserror::Error;

use crate::plugin::PluginStage;

/// Host operation result type
pub type HostResult<T> = Result<T, HostError>;

/// Plugin lifecycle result type
pub type PluginResult<T> = Result<T, PluginError>;

/// Registrations a host refuses to accept
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Plugin already registered: {id}")]
    DuplicatePlugin { id: String },

    #[error("Static path already mounted: {}", path.display())]
    DuplicateStaticPath { path: PathBuf },

    #[error("Static path must be absolute: {}", path.display())]
    RelativeStaticPath { path: PathBuf },

    #[error("GET route already mounted: {route}")]
    DuplicateRoute { route: String },

    #[error("Invalid route path '{route}': {reason}")]
    InvalidRoute { route: String, reason: String },
}

impl HostError {
    /// Create an invalid route error
    pub fn invalid_route(route: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRoute {
            route: route.into(),
            reason: reason.into(),
        }
    }
}

/// Failures raised from a plugin lifecycle stage
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("Plugin '{plugin}' has no host bound, cannot run stage '{stage}'")]
    HostUnavailable { plugin: String, stage: PluginStage },

    #[error("Host rejected plugin stage: {0}")]
    Host(#[from] HostError),
}

impl PluginError {
    /// Create a missing host error for the given stage
    pub fn host_unavailable(plugin: impl Into<String>, stage: PluginStage) -> Self {
        Self::HostUnavailable {
            plugin: plugin.into(),
            stage,
        }
    }
}
