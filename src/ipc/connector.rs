//! Strategies for producing a ready [`Connection`].
//!
//! * [`DefaultConnector`] resolves the socket path from the environment
//!   (see [`config::socket_path`](crate::config::socket_path)).
//! * [`CustomConnector`] uses an explicit path and can validate the
//!   daemon's version right after connecting.
//!
//! A process-wide default connector can be installed with
//! [`set_default_connector`], e.g. to point every
//! [`Client::from_default_connector`](crate::Client::from_default_connector)
//! call at a test daemon.  Reading it before anything was installed panics.

use crate::config;
use crate::error::Error;
use crate::ipc::socket::SocketConnection;
use crate::ipc::version::VersionRequirement;
use crate::traits::{Connection, Connector};
use log::warn;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

/// A failed connect.
///
/// When the socket opened but a later step failed (the version check),
/// the live connection is handed back so the caller can decide to carry on
/// with an incompatible daemon.
#[derive(thiserror::Error)]
#[error("{error}")]
pub struct ConnectError {
    #[source]
    error: Error,
    connection: Option<Box<dyn Connection>>,
}

impl ConnectError {
    /// An error that still carries its open connection.
    pub fn with_connection(error: Error, connection: Box<dyn Connection>) -> Self {
        Self {
            error,
            connection: Some(connection),
        }
    }

    pub fn error(&self) -> &Error {
        &self.error
    }

    pub fn is_version_mismatch(&self) -> bool {
        self.error.is_version_mismatch()
    }

    /// Drop any connection and keep the error.
    pub fn into_error(self) -> Error {
        self.error
    }

    /// Take the live connection, if there is one.
    pub fn into_connection(self) -> Option<Box<dyn Connection>> {
        self.connection
    }
}

impl fmt::Debug for ConnectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectError")
            .field("error", &self.error)
            .field("has_connection", &self.connection.is_some())
            .finish()
    }
}

impl From<Error> for ConnectError {
    fn from(error: Error) -> Self {
        Self {
            error,
            connection: None,
        }
    }
}

impl From<ConnectError> for Error {
    fn from(err: ConnectError) -> Self {
        err.error
    }
}

//  Connectors

/// Connects to the socket named by `$AEROSPACESOCK`, falling back to
/// `/tmp/bobko.aerospace-$USER.sock`.
///
/// Once the path is resolved it behaves exactly like a [`CustomConnector`]
/// for that path.
#[derive(Debug, Clone, Default)]
pub struct DefaultConnector {
    /// Run the version check right after connecting.
    pub validate_version: bool,
    pub requirement: VersionRequirement,
}

impl Connector for DefaultConnector {
    fn connect(&self) -> Result<Box<dyn Connection>, ConnectError> {
        let path = config::socket_path()?;
        CustomConnector::new(path)
            .validate_version(self.validate_version)
            .min_version(self.requirement)
            .connect()
    }
}

/// Connects to an explicit socket path.
#[derive(Debug, Clone)]
pub struct CustomConnector {
    pub socket_path: PathBuf,
    /// Run the version check right after connecting.
    pub validate_version: bool,
    pub requirement: VersionRequirement,
}

impl CustomConnector {
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
            validate_version: false,
            requirement: VersionRequirement::default(),
        }
    }

    pub fn validate_version(mut self, validate: bool) -> Self {
        self.validate_version = validate;
        self
    }

    pub fn min_version(mut self, requirement: VersionRequirement) -> Self {
        self.requirement = requirement;
        self
    }
}

impl Connector for CustomConnector {
    fn connect(&self) -> Result<Box<dyn Connection>, ConnectError> {
        if self.socket_path.as_os_str().is_empty() {
            return Err(Error::EmptySocketPath.into());
        }
        let conn = SocketConnection::connect(&self.socket_path, self.requirement)?;

        if self.validate_version {
            if let Err(e) = conn.check_server_version() {
                warn!("version check failed for {}: {}", self.socket_path.display(), e);
                return Err(ConnectError::with_connection(e, Box::new(conn)));
            }
        }
        Ok(Box::new(conn))
    }
}

//  Process-wide default

static DEFAULT_CONNECTOR: RwLock<Option<Arc<dyn Connector>>> = RwLock::new(None);

/// Install the process-wide default connector, replacing any previous one.
pub fn set_default_connector(connector: Arc<dyn Connector>) {
    *DEFAULT_CONNECTOR
        .write()
        .unwrap_or_else(PoisonError::into_inner) = Some(connector);
}

/// The process-wide default connector.
///
/// # Panics
///
/// If [`set_default_connector`] was never called.  Nothing is constructed
/// implicitly, so a missing setup call surfaces immediately.
pub fn default_connector() -> Arc<dyn Connector> {
    DEFAULT_CONNECTOR
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
        .expect("default connector is not initialized; call set_default_connector first")
}
