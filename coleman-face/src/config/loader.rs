//! Config file discovery and loading for `coleman.toml`.
//!
//! Checks two locations in precedence order:
//! 1. `./coleman.toml` (project-local)
//! 2. `~/.config/coleman.toml` (user-global)
//!
//! `COLEMAN_BIND_ADDRESS` overrides the bind address from either file.

use std::path::{Path, PathBuf};

use super::ServerConfig;

const CONFIG_FILENAME: &str = "coleman.toml";
const GLOBAL_CONFIG_DIR: &str = ".config";
const BIND_ADDRESS_ENV: &str = "COLEMAN_BIND_ADDRESS";

/// Load server config from the first discovered location, or return defaults.
///
/// A config file that exists but cannot be read or parsed is returned alongside
/// the defaults, so the caller can report it once logging is up.
pub fn load_server_config() -> (ServerConfig, Option<ConfigError>) {
    load_discovered(find_config_file())
}

fn load_discovered(path: Option<PathBuf>) -> (ServerConfig, Option<ConfigError>) {
    let (mut config, error) = match path {
        Some(path) => match load_server_config_from(&path) {
            Ok(config) => {
                tracing::debug!(?path, "Loaded server config");
                (config, None)
            }
            Err(e) => (ServerConfig::default(), Some(e)),
        },
        None => (ServerConfig::default(), None),
    };
    apply_env_overrides(&mut config);
    (config, error)
}

/// Parse the config file at `path`.
pub fn load_server_config_from(path: &Path) -> Result<ServerConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

fn apply_env_overrides(config: &mut ServerConfig) {
    if let Ok(address) = std::env::var(BIND_ADDRESS_ENV) {
        if !address.trim().is_empty() {
            config.bind_address = address.trim().to_string();
        }
    }
}

/// Search for config file in precedence order.
fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILENAME);
    if local.is_file() {
        return Some(local);
    }

    let global = home_dir()?.join(GLOBAL_CONFIG_DIR).join(CONFIG_FILENAME);
    global.is_file().then_some(global)
}

/// Expand a configured path, resolving `~` to the home directory.
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}

/// Errors that can occur while loading `coleman.toml`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
