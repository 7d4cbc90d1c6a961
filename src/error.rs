//! The error type shared by every part of the crate.
//!
//! Variants are grouped by where they originate: connecting, moving bytes
//! over the socket, the daemon rejecting a command, version negotiation,
//! argument validation (raised before any I/O) and empty query results.

use crate::ipc::version::VersionMismatch;
use std::path::PathBuf;

/// Convenience alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong while talking to AeroSpace.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    //  Connection

    #[error("socket path cannot be empty")]
    EmptySocketPath,

    #[error("failed to access socket path {path}: {source}")]
    SocketPathNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to connect to socket {path}: {source}")]
    Connect {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The connection was never opened or has already been closed.
    #[error("connection is not established")]
    NotEstablished,

    #[error("failed to close connection: {0}")]
    Close(#[source] std::io::Error),

    //  Transport I/O

    #[error("failed to marshal command: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to send command: {0}")]
    Write(#[source] std::io::Error),

    /// A read failed part-way; `data` holds what arrived before the failure.
    #[error("failed to read response: {source}\ndata\n{data}")]
    Read {
        #[source]
        source: std::io::Error,
        data: String,
    },

    /// The daemon's reply was not a valid response envelope.
    #[error("failed to unmarshal socket response: {source}\ndata\n{data}")]
    Decode {
        #[source]
        source: serde_json::Error,
        data: String,
    },

    //  Protocol failures

    #[error("command failed with exit code {code}\n{stderr}")]
    ExitCode { code: i32, stderr: String },

    #[error("command error\n{0}")]
    Stderr(String),

    //  Version negotiation

    #[error("server version is empty")]
    EmptyVersion,

    #[error("invalid server version {version:?}: {reason}")]
    VersionFormat { version: String, reason: String },

    #[error(transparent)]
    VersionMismatch(#[from] VersionMismatch),

    //  Argument validation

    /// None of the mutually exclusive modes was chosen.
    #[error("{0}")]
    NoMode(&'static str),

    /// More than one of the mutually exclusive modes was chosen.
    #[error("{0}")]
    MultipleModes(&'static str),

    #[error("invalid {kind} {value:?}, must be one of: {allowed}")]
    InvalidValue {
        kind: &'static str,
        value: String,
        allowed: &'static str,
    },

    #[error("cannot specify both {0} and {1} options")]
    ConflictingOptions(&'static str, &'static str),

    #[error("at least one layout must be provided")]
    EmptyLayouts,

    //  Domain results

    /// The daemon ran the command but reported a failure.
    #[error("failed to {operation}\n{stderr}")]
    CommandFailed { operation: String, stderr: String },

    #[error("failed to unmarshal {what}: {source}\nOut:{stdout}")]
    Payload {
        what: &'static str,
        #[source]
        source: serde_json::Error,
        stdout: String,
    },

    #[error("no window focused")]
    NoWindowFocused,

    #[error("no workspace focused")]
    NoWorkspaceFocused,

    //  Configuration

    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    /// `true` when the daemon's version is incompatible with this client.
    ///
    /// Callers commonly treat this case as a warning rather than a fatal
    /// error, so it gets its own predicate instead of string matching.
    pub fn is_version_mismatch(&self) -> bool {
        matches!(self, Error::VersionMismatch(_))
    }

    /// `true` when the daemon understood the command but failed it.
    pub fn is_command_failure(&self) -> bool {
        matches!(
            self,
            Error::ExitCode { .. } | Error::Stderr(_) | Error::CommandFailed { .. }
        )
    }

    /// `true` for errors raised by argument validation, before any I/O.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::NoMode(_)
                | Error::MultipleModes(_)
                | Error::InvalidValue { .. }
                | Error::ConflictingOptions(..)
                | Error::EmptyLayouts
        )
    }
}
