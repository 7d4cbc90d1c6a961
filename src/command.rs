//! Vocabulary shared by the command builders.
//!
//! Every token the daemon accepts as a mode or option value has an enum
//! here.  `Display` renders the exact token the daemon expects; `FromStr`
//! parses it back and rejects anything else with an error naming the
//! offending value, so user-supplied strings (config files, key-binding
//! scripts, …) are validated before any command is built.
//!
//! [`CommandArgs`] accumulates the flat argument vector, and [`run`] sends
//! it and applies the shared failure policy.

use crate::error::{Error, Result};
use crate::ipc::protocol::Response;
use crate::traits::Connection;
use std::fmt;
use std::str::FromStr;

/// Generates `Display`, `FromStr` and `ALL` for an enum of daemon tokens.
macro_rules! tokens {
    ($ty:ident, $kind:literal, { $($variant:ident => $token:literal),+ $(,)? }) => {
        impl $ty {
            /// Every accepted value, in the order the daemon documents them.
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            /// The token sent to the daemon.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $token),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($token => Ok($ty::$variant),)+
                    _ => Err(Error::InvalidValue {
                        kind: $kind,
                        value: s.to_string(),
                        allowed: concat!($($token, ", "),+).trim_end_matches(", "),
                    }),
                }
            }
        }
    };
}

/// Cardinal direction used by focus and monitor moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Down,
    Up,
    Right,
}

tokens!(Direction, "direction", {
    Left => "left",
    Down => "down",
    Up => "up",
    Right => "right",
});

/// Step through monitors (or workspaces) in the daemon's order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Order {
    Next,
    Prev,
}

tokens!(Order, "order", {
    Next => "next",
    Prev => "prev",
});

/// Step through windows in depth-first order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DfsDirection {
    Next,
    Prev,
}

tokens!(DfsDirection, "DFS direction", {
    Next => "dfs-next",
    Prev => "dfs-prev",
});

/// How far a directional focus change may travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Boundaries {
    /// The daemon's default.
    Workspace,
    AllMonitorsOuterFrame,
}

tokens!(Boundaries, "boundaries", {
    Workspace => "workspace",
    AllMonitorsOuterFrame => "all-monitors-outer-frame",
});

/// What happens when a focus change would cross its boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundariesAction {
    /// The daemon's default.
    Stop,
    Fail,
    WrapAroundTheWorkspace,
    WrapAroundAllMonitors,
}

tokens!(BoundariesAction, "boundaries action", {
    Stop => "stop",
    Fail => "fail",
    WrapAroundTheWorkspace => "wrap-around-the-workspace",
    WrapAroundAllMonitors => "wrap-around-all-monitors",
});

/// A tiling mode accepted by the `layout` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutKind {
    Accordion,
    Tiles,
    Horizontal,
    Vertical,
    HAccordion,
    VAccordion,
    HTiles,
    VTiles,
    Tiling,
    Floating,
}

tokens!(LayoutKind, "layout", {
    Accordion => "accordion",
    Tiles => "tiles",
    Horizontal => "horizontal",
    Vertical => "vertical",
    HAccordion => "h_accordion",
    VAccordion => "v_accordion",
    HTiles => "h_tiles",
    VTiles => "v_tiles",
    Tiling => "tiling",
    Floating => "floating",
});

//  Argument vector

/// The flat token list sent after the operation name.
///
/// Flags and their values are consecutive tokens, e.g.
/// `["--window-id", "123"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandArgs(Vec<String>);

impl CommandArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional token.
    pub fn arg(&mut self, token: impl ToString) -> &mut Self {
        self.0.push(token.to_string());
        self
    }

    /// Append `--name` when `on` is set.
    pub fn flag(&mut self, name: &str, on: bool) -> &mut Self {
        if on {
            self.0.push(name.to_string());
        }
        self
    }

    /// Append `--name <value>` when `value` is present.
    pub fn option<T: ToString>(&mut self, name: &str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.0.push(name.to_string());
            self.0.push(value.to_string());
        }
        self
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

/// Send `command` and turn daemon-side failures into
/// [`Error::CommandFailed`] naming `operation`.
///
/// Transport and connection errors pass through unchanged.  `operation` is
/// only evaluated on failure.
pub(crate) fn run(
    conn: &dyn Connection,
    command: &str,
    args: &[String],
    operation: impl FnOnce() -> String,
) -> Result<Response> {
    match conn.send_command(command, args) {
        Ok(response) if response.exit_code != 0 => Err(Error::CommandFailed {
            operation: operation(),
            stderr: response.stderr,
        }),
        Ok(response) => Ok(response),
        Err(Error::ExitCode { stderr, .. }) | Err(Error::Stderr(stderr)) => {
            Err(Error::CommandFailed {
                operation: operation(),
                stderr,
            })
        }
        Err(e) => Err(e),
    }
}

/// Render a list of tokens as `[a, b]` for error messages.
pub(crate) fn list<T: fmt::Display>(items: &[T]) -> String {
    let inner: Vec<String> = items.iter().map(ToString::to_string).collect();
    format!("[{}]", inner.join(", "))
}
