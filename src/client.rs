//! The [`Client`] facade.

use crate::config::ClientConfig;
use crate::error::Result;
use crate::focus::FocusService;
use crate::ipc::connector::{default_connector, ConnectError, DefaultConnector};
use crate::layout::LayoutService;
use crate::traits::{Connection, Connector};
use crate::windows::WindowService;
use crate::workspaces::WorkspaceService;
use log::debug;

/// A client owning exactly one connection to the daemon.
///
/// The services borrow the connection, so they are cheap to create on
/// every call:
///
/// ```no_run
/// use aerospace_ipc::Client;
///
/// let client = Client::new().map_err(aerospace_ipc::Error::from)?;
/// for window in client.windows().get_all_windows()? {
///     println!("{}", window);
/// }
/// client.close()?;
/// # Ok::<(), aerospace_ipc::Error>(())
/// ```
pub struct Client {
    conn: Box<dyn Connection>,
}

impl Client {
    /// Connect to the socket resolved from the environment.
    pub fn new() -> std::result::Result<Self, ConnectError> {
        Self::with_connector(&DefaultConnector::default())
    }

    /// Connect through the process-wide default connector.
    ///
    /// # Panics
    ///
    /// If no default connector was installed with
    /// [`set_default_connector`](crate::ipc::connector::set_default_connector).
    pub fn from_default_connector() -> std::result::Result<Self, ConnectError> {
        Self::with_connector(default_connector().as_ref())
    }

    /// Connect the way `config` describes.
    pub fn from_config(config: &ClientConfig) -> std::result::Result<Self, ConnectError> {
        Self::with_connector(config.connector().as_ref())
    }

    pub fn with_connector(connector: &dyn Connector) -> std::result::Result<Self, ConnectError> {
        let conn = connector.connect()?;
        debug!("client connected to {}", conn.socket_path().display());
        Ok(Self::from_connection(conn))
    }

    /// Wrap an already open connection.
    pub fn from_connection(conn: Box<dyn Connection>) -> Self {
        Self { conn }
    }

    pub fn windows(&self) -> WindowService<'_> {
        WindowService::new(self.conn.as_ref())
    }

    pub fn workspaces(&self) -> WorkspaceService<'_> {
        WorkspaceService::new(self.conn.as_ref())
    }

    pub fn focus(&self) -> FocusService<'_> {
        FocusService::new(self.conn.as_ref())
    }

    pub fn layout(&self) -> LayoutService<'_> {
        LayoutService::new(self.conn.as_ref())
    }

    /// The underlying connection, for raw `send_command` calls.
    pub fn connection(&self) -> &dyn Connection {
        self.conn.as_ref()
    }

    /// Close the connection.  Calling it again is a no-op.
    pub fn close(&self) -> Result<()> {
        self.conn.close()
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("socket_path", &self.conn.socket_path())
            .finish()
    }
}
