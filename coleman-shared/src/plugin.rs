//! # Plugin Lifecycle
//!
//! A plugin integrates with its host through four capabilities that the host
//! invokes during its own startup sequence:
//!
//! 1. [`ColemanPlugin::init`] — the plugin registers itself with the host
//! 2. [`ColemanPlugin::mount_static`] — the plugin hands the host a static asset directory
//! 3. [`ColemanPlugin::router`] — the plugin mounts its HTTP routes
//! 4. [`ColemanPlugin::id`] — callable at any time, used for deduplication
//!
//! The host decides the call order. Plugins do not enforce it and do not
//! deduplicate their own registrations; calling a stage twice repeats its effect
//! and it is up to the host to reject the duplicate.

use std::fmt;
use std::sync::Arc;

use derive_more::Display;

use crate::errors::PluginResult;

/// Lifecycle stages, in the order a host is expected to drive them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum PluginStage {
    #[display("init")]
    Init,
    #[display("static")]
    Static,
    #[display("router")]
    Router,
}

impl PluginStage {
    /// All stages in host order.
    pub const ORDER: [PluginStage; 3] = [Self::Init, Self::Static, Self::Router];
}

/// Typed lifecycle contract between a plugin and its host.
pub trait ColemanPlugin: Send + Sync + fmt::Debug {
    /// Register this plugin with the host.
    ///
    /// Takes the plugin by `Arc` so the host receives the plugin itself, not a copy.
    fn init(self: Arc<Self>) -> PluginResult<()>;

    /// Hand the plugin's static asset directory to the host.
    fn mount_static(&self) -> PluginResult<()>;

    /// Mount the plugin's HTTP routes on the host.
    fn router(&self) -> PluginResult<()>;

    /// Stable identifier, unique among the plugins of one host. Pure.
    fn id(&self) -> &str;
}
