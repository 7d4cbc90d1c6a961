//! Socket discovery and client configuration.
//!
//! The daemon listens on `/tmp/bobko.aerospace-$USER.sock` unless
//! `$AEROSPACESOCK` points elsewhere.
//!
//! A [`ClientConfig`] can also be loaded from a JSON file.  Every field is
//! optional:
//!
//! ```json
//! {
//!   "socket_path": "/tmp/bobko.aerospace-me.sock",
//!   "validate_version": true,
//!   "min_version": { "major": 0, "minor": 20 }
//! }
//! ```

use crate::error::{Error, Result};
use crate::ipc::connector::{CustomConnector, DefaultConnector};
use crate::ipc::version::VersionRequirement;
use crate::traits::Connector;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable overriding the socket path.
pub const ENV_AEROSPACE_SOCK: &str = "AEROSPACESOCK";

/// Resolve the daemon's socket path and check that it exists.
pub fn socket_path() -> Result<PathBuf> {
    let path = resolve_socket_path(
        std::env::var_os(ENV_AEROSPACE_SOCK),
        std::env::var("USER").ok(),
    );
    ensure_exists(&path)?;
    Ok(path)
}

/// The socket path for an optional override and user name, without
/// touching the filesystem.
pub fn resolve_socket_path(env_override: Option<OsString>, user: Option<String>) -> PathBuf {
    match env_override {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => PathBuf::from(format!(
            "/tmp/bobko.aerospace-{}.sock",
            user.unwrap_or_default()
        )),
    }
}

/// Where the binary looks for its [`ClientConfig`]:
/// `$XDG_CONFIG_HOME/aerospace-ipc/config.json`, else
/// `$HOME/.config/aerospace-ipc/config.json`.
pub fn config_file_path() -> Option<PathBuf> {
    resolve_config_file(
        std::env::var_os("XDG_CONFIG_HOME"),
        std::env::var_os("HOME"),
    )
}

/// [`config_file_path`] for explicit variables.  `None` when neither is
/// set to something non-empty.
pub fn resolve_config_file(xdg_config_home: Option<OsString>, home: Option<OsString>) -> Option<PathBuf> {
    let base = match (xdg_config_home, home) {
        (Some(xdg), _) if !xdg.is_empty() => PathBuf::from(xdg),
        (_, Some(home)) if !home.is_empty() => PathBuf::from(home).join(".config"),
        _ => return None,
    };
    Some(base.join("aerospace-ipc").join("config.json"))
}

fn ensure_exists(path: &Path) -> Result<()> {
    std::fs::metadata(path)
        .map(|_| ())
        .map_err(|source| Error::SocketPathNotFound {
            path: path.to_path_buf(),
            source,
        })
}

/// How a [`Client`](crate::Client) should connect.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Explicit socket path.  `None` uses [`socket_path`].
    pub socket_path: Option<PathBuf>,
    /// Check the daemon's version right after connecting.
    pub validate_version: bool,
    /// Oldest daemon version accepted.
    pub min_version: VersionRequirement,
}

impl ClientConfig {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// The connector this configuration describes.
    ///
    /// An explicit path gives a [`CustomConnector`]; otherwise the
    /// environment decides through [`DefaultConnector`].  Both honour
    /// `validate_version` and `min_version`.
    pub fn connector(&self) -> Box<dyn Connector> {
        match &self.socket_path {
            Some(path) => Box::new(
                CustomConnector::new(path)
                    .validate_version(self.validate_version)
                    .min_version(self.min_version),
            ),
            None => Box::new(DefaultConnector {
                validate_version: self.validate_version,
                requirement: self.min_version,
            }),
        }
    }
}
