//! Server configuration for `coleman-server`.
//!
//! Read from `coleman.toml`; every key is optional.
//!
//! ```toml
//! bind-address = "0.0.0.0:8080"
//! log-filter = "coleman_face=debug,info"
//!
//! [face]
//! asset-root = "~/coleman-face"
//! ```

pub(crate) mod loader;

pub use loader::{expand_path, load_server_config, load_server_config_from, ConfigError};

use serde::Deserialize;

use crate::face::FaceAssets;

fn default_bind_address() -> String {
    "127.0.0.1:3000".to_string()
}

/// Top-level server configuration.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct ServerConfig {
    /// Socket address the HTTP server binds to. Default: `127.0.0.1:3000`.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Tracing filter used when `RUST_LOG` is not set.
    pub log_filter: Option<String>,

    /// Face plugin settings.
    #[serde(default)]
    pub face: FaceConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            log_filter: None,
            face: FaceConfig::default(),
        }
    }
}

/// Settings for the face plugin.
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct FaceConfig {
    /// Directory holding `views/` and `public/`. Default: the bundled assets.
    pub asset_root: Option<String>,
}

impl FaceConfig {
    pub fn assets(&self) -> FaceAssets {
        match &self.asset_root {
            Some(root) => FaceAssets::at(expand_path(root)),
            None => FaceAssets::bundled(),
        }
    }
}
