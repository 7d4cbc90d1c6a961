//! Server version parsing and compatibility checks.
//!
//! The daemon reports its version as `"<major>.<minor>.<patch>-<tag> <hash>"`
//! on every response.  Only the numeric part before the first `-` matters.
//!
//! A server is compatible when its major version equals the required major
//! and its minor version is at least the required minor.  A newer major is
//! treated as incompatible: the JSON protocol is not promised to survive a
//! major bump.

use crate::error::{Error, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Oldest daemon major version speaking this protocol.
pub const MIN_MAJOR_VERSION: u32 = 0;

/// Oldest daemon minor version speaking this protocol.
///
/// AeroSpace 0.15 through 0.19 used an older socket format.
pub const MIN_MINOR_VERSION: u32 = 20;

/// The minimum `(major, minor)` a connection accepts.
///
/// Set once when the connection is built and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRequirement {
    pub major: u32,
    pub minor: u32,
}

impl Default for VersionRequirement {
    fn default() -> Self {
        Self {
            major: MIN_MAJOR_VERSION,
            minor: MIN_MINOR_VERSION,
        }
    }
}

impl fmt::Display for VersionRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.x", self.major, self.minor)
    }
}

impl VersionRequirement {
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Whether `version` satisfies this requirement.
    pub fn accepts(&self, version: &ServerVersion) -> bool {
        version.major == self.major && version.minor >= self.minor
    }

    /// Parse `raw` and compare it against this requirement.
    pub fn check(&self, raw: &str) -> Result<()> {
        let version: ServerVersion = raw.parse()?;
        if self.accepts(&version) {
            Ok(())
        } else {
            Err(VersionMismatch::new(self.major, self.minor, version.to_string()).into())
        }
    }
}

/// The numeric part of a `serverVersionAndHash` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerVersion {
    pub major: u32,
    pub minor: u32,
    /// Informational only; absent when the daemon omits it.
    pub patch: Option<u32>,
}

impl fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.patch {
            Some(patch) => write!(f, "{}.{}.{}", self.major, self.minor, patch),
            None => write!(f, "{}.{}", self.major, self.minor),
        }
    }
}

impl FromStr for ServerVersion {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Err(Error::EmptyVersion);
        }
        let numeric = raw.split_once('-').map_or(raw, |(left, _)| left);
        // "0.20.0 abc123" without a tag still carries a hash.
        let numeric = numeric.split_whitespace().next().unwrap_or_default();

        let parts: Vec<&str> = numeric.split('.').collect();
        if parts.len() < 3 {
            warn!("unexpected server version format: {}", raw);
        }

        let format_error = |reason: &str| Error::VersionFormat {
            version: raw.to_string(),
            reason: reason.to_string(),
        };

        let major = parts[0]
            .parse()
            .map_err(|_| format_error("failed to parse major version"))?;
        let minor = parts
            .get(1)
            .ok_or_else(|| format_error("missing minor version"))?
            .parse()
            .map_err(|_| format_error("failed to parse minor version"))?;
        let patch = parts.get(2).and_then(|p| p.parse().ok());

        Ok(Self {
            major,
            minor,
            patch,
        })
    }
}

/// The daemon's version is outside what this client supports.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "server version {current} does not match the minimum required version {required_major}.{required_minor}.x"
)]
pub struct VersionMismatch {
    pub required_major: u32,
    pub required_minor: u32,
    /// The numeric version the daemon reported.
    pub current: String,
}

impl VersionMismatch {
    pub fn new(required_major: u32, required_minor: u32, current: impl Into<String>) -> Self {
        Self {
            required_major,
            required_minor,
            current: current.into(),
        }
    }
}
