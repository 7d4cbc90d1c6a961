//! Core traits that decouple the command layer from the socket.
//!
//! Three seams, leaf-first:
//!
//! * [`Stream`]: the raw byte pipe.  A Unix socket in production, a
//!   scripted in-memory double in tests.
//! * [`Connection`]: one round-trip primitive (send a command, get a
//!   validated response) plus version negotiation.  The services in
//!   [`windows`](crate::windows), [`workspaces`](crate::workspaces),
//!   [`focus`](crate::focus) and [`layout`](crate::layout) only depend on
//!   this trait.
//! * [`Connector`]: a strategy that produces a ready [`Connection`].

use crate::error::Result;
use crate::ipc::connector::ConnectError;
use crate::ipc::protocol::Response;
use std::io::{Read, Write};
use std::net::Shutdown;
use std::os::unix::net::UnixStream;
use std::path::Path;

/// A bidirectional byte stream the transport can own.
///
/// Reads and writes come from [`Read`] / [`Write`]; `shutdown` tears the
/// stream down when the connection is closed.
pub trait Stream: Read + Write + Send {
    /// Shut down both halves of the stream.
    fn shutdown(&mut self) -> std::io::Result<()>;
}

impl Stream for UnixStream {
    fn shutdown(&mut self) -> std::io::Result<()> {
        match UnixStream::shutdown(self, Shutdown::Both) {
            // The daemon may already have hung up.
            Err(e) if e.kind() == std::io::ErrorKind::NotConnected => Ok(()),
            other => other,
        }
    }
}

/// A live connection to the AeroSpace daemon.
///
/// Implementations must serialize concurrent callers: at most one command
/// is in flight at a time, so one caller's response bytes are never
/// interleaved with another caller's request.
pub trait Connection: Send + Sync {
    /// Send `command` with `args` and return the daemon's response.
    ///
    /// Equivalent to running `aerospace <command> <args...>`.  A response
    /// with a non-zero exit code or non-empty stderr is returned as an
    /// error, so an `Ok` response always describes a successful command.
    fn send_command(&self, command: &str, args: &[String]) -> Result<Response>;

    /// Close the connection.  Closing twice is a no-op.
    fn close(&self) -> Result<()>;

    /// Path of the socket this connection was opened on.
    fn socket_path(&self) -> &Path;

    /// Ask the daemon for its `serverVersionAndHash` string.
    fn server_version(&self) -> Result<String>;

    /// Compare the daemon's version against the connection's minimum
    /// requirement, returning [`Error::VersionMismatch`](crate::Error::VersionMismatch)
    /// when incompatible.
    fn check_server_version(&self) -> Result<()>;
}

/// Produces a ready [`Connection`].
///
/// The [`DefaultConnector`](crate::ipc::connector::DefaultConnector)
/// resolves the socket from the environment;
/// [`CustomConnector`](crate::ipc::connector::CustomConnector) takes an
/// explicit path.  Tests install their own implementation through
/// [`set_default_connector`](crate::ipc::connector::set_default_connector).
pub trait Connector: Send + Sync {
    /// Open a connection.
    ///
    /// A [`ConnectError`] may still carry the live connection, e.g. when
    /// the socket opened fine but the version check failed.
    fn connect(&self) -> std::result::Result<Box<dyn Connection>, ConnectError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::tests::RecorderConn;
    use crate::error::Error;

    #[test]
    fn connection_is_object_safe_and_records() {
        let conn: Box<dyn Connection> = Box::new(RecorderConn::default());
        conn.send_command("config", &["--config-path".to_string()])
            .unwrap();
        conn.close().unwrap();
    }

    struct FailingConnector;

    impl Connector for FailingConnector {
        fn connect(&self) -> std::result::Result<Box<dyn Connection>, ConnectError> {
            Err(Error::EmptySocketPath.into())
        }
    }

    #[test]
    fn connector_errors_convert_from_crate_errors() {
        let err = FailingConnector.connect().err().unwrap();
        assert!(matches!(err.error(), Error::EmptySocketPath));
        assert!(err.into_connection().is_none());
    }

    #[test]
    fn unix_stream_shutdown_tolerates_closed_peer() {
        let (mut a, b) = UnixStream::pair().unwrap();
        drop(b);
        Stream::shutdown(&mut a).unwrap();
    }
}
