//! # Host Contract
//!
//! The capabilities a Coleman host offers to its plugins. A plugin only ever
//! holds an `Arc<dyn ColemanHost>` and calls methods on it; the host owns its
//! registry, its static mounts and its routes.

mod app;
mod handler;
mod settings;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

pub use app::ColemanApp;
pub use handler::{HandlerFuture, RequestHandler};
pub use settings::{SettingKey, SettingValue, SettingsRegistry};

use crate::errors::HostResult;
use crate::plugin::ColemanPlugin;

/// Capabilities a host application exposes to plugins.
///
/// Hosts are responsible for detecting collisions (duplicate plugin ids, static
/// paths or routes). Plugins never deduplicate their own registrations.
pub trait ColemanHost: Send + Sync + fmt::Debug {
    /// Store a value in the host's settings registry, replacing any previous value.
    fn set_setting(&self, key: &str, value: SettingValue);

    /// Read a value from the host's settings registry.
    fn setting(&self, key: &str) -> Option<SettingValue>;

    /// Register a plugin with the host.
    fn register(&self, plugin: Arc<dyn ColemanPlugin>) -> HostResult<()>;

    /// Serve the files of an absolute directory as static assets.
    fn add_static_path(&self, path: &Path) -> HostResult<()>;

    /// Mount a handler for GET requests on `route`.
    fn get(&self, route: &str, handler: RequestHandler) -> HostResult<()>;
}
