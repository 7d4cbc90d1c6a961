//! Workspace queries and moves.
//!
//! Workspaces are not a managed list.  The daemon creates and destroys
//! them on the fly and the client only ever refers to them by name.

use crate::command::{run, CommandArgs, Direction, Order};
use crate::error::{Error, Result};
use crate::traits::Connection;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A workspace as reported by `list-workspaces --json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Workspace {
    /// Numeric-as-string (`"42"`) or symbolic (`"terminal"`).
    pub workspace: String,
}

impl fmt::Display for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.workspace)
    }
}

/// Target of [`WorkspaceService::move_window_to_workspace`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveWindowToWorkspaceArgs {
    /// A workspace name, or `next` / `prev`.
    pub workspace_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveWindowToWorkspaceOpts {
    /// Move this window instead of the focused one.
    pub window_id: Option<u32>,
    pub focus_follows_window: bool,
    /// Fail if the window already is on the target workspace.
    pub fail_if_noop: bool,
    /// Jump between the first and last workspace for `next` / `prev`.
    pub wrap_around: bool,
    /// Read the workspace list from stdin.  Conflicts with `no_stdin`.
    pub stdin: bool,
    pub no_stdin: bool,
}

/// Target monitor for [`WorkspaceService::move_workspace_to_monitor`].
///
/// Exactly one of the three modes must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveWorkspaceToMonitorArgs {
    pub direction: Option<Direction>,
    pub order: Option<Order>,
    /// Monitor name patterns, sent in the given order.
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveWorkspaceToMonitorOpts {
    /// Move this workspace instead of the focused one.
    pub workspace: Option<String>,
    pub wrap_around: bool,
}

enum MonitorTarget<'a> {
    Direction(Direction),
    Order(Order),
    Patterns(&'a [String]),
}

impl MoveWorkspaceToMonitorArgs {
    fn target(&self) -> Result<MonitorTarget<'_>> {
        let mut targets = Vec::with_capacity(1);
        if let Some(d) = self.direction {
            targets.push(MonitorTarget::Direction(d));
        }
        if let Some(o) = self.order {
            targets.push(MonitorTarget::Order(o));
        }
        if !self.patterns.is_empty() {
            targets.push(MonitorTarget::Patterns(&self.patterns));
        }

        if targets.len() > 1 {
            return Err(Error::MultipleModes(
                "cannot specify multiple modes; must specify exactly one of: direction, order, or patterns",
            ));
        }
        targets.pop().ok_or(Error::NoMode(
            "must specify exactly one of: direction, order, or patterns",
        ))
    }
}

/// Workspace commands over a borrowed [`Connection`].
pub struct WorkspaceService<'a> {
    conn: &'a dyn Connection,
}

impl<'a> WorkspaceService<'a> {
    pub fn new(conn: &'a dyn Connection) -> Self {
        Self { conn }
    }

    /// `aerospace list-workspaces --focused --json`
    pub fn get_focused_workspace(&self) -> Result<Workspace> {
        let args = ["--focused".to_string(), "--json".to_string()];
        let response = run(self.conn, "list-workspaces", &args, || {
            "list workspaces".to_string()
        })?;
        response
            .decode_list::<Workspace>("workspaces")?
            .into_iter()
            .next()
            .ok_or(Error::NoWorkspaceFocused)
    }

    /// Move a window to another workspace.
    ///
    /// ```text
    /// aerospace move-node-to-workspace <name> [--window-id <id>] [--focus-follows-window]
    ///     [--fail-if-noop] [--wrap-around] [--stdin|--no-stdin]
    /// ```
    pub fn move_window_to_workspace(
        &self,
        args: MoveWindowToWorkspaceArgs,
        opts: MoveWindowToWorkspaceOpts,
    ) -> Result<()> {
        if opts.stdin && opts.no_stdin {
            return Err(Error::ConflictingOptions("--stdin", "--no-stdin"));
        }

        let mut cmd_args = CommandArgs::new();
        cmd_args
            .arg(&args.workspace_name)
            .option("--window-id", opts.window_id)
            .flag("--focus-follows-window", opts.focus_follows_window)
            .flag("--fail-if-noop", opts.fail_if_noop)
            .flag("--wrap-around", opts.wrap_around)
            .flag("--stdin", opts.stdin)
            .flag("--no-stdin", opts.no_stdin);

        run(self.conn, "move-node-to-workspace", cmd_args.as_slice(), || {
            "move window to workspace".to_string()
        })?;
        Ok(())
    }

    /// Switch between the focused and the previously focused workspace.
    ///
    /// Workspaces cannot be closed, so unlike
    /// [`FocusService::focus_back_and_forth`](crate::focus::FocusService::focus_back_and_forth)
    /// this normally succeeds.
    pub fn move_back_and_forth(&self) -> Result<()> {
        run(self.conn, "workspace-back-and-forth", &[], || {
            "switch workspace back and forth".to_string()
        })?;
        Ok(())
    }

    /// Move a workspace to another monitor.
    ///
    /// ```text
    /// aerospace move-workspace-to-monitor [--workspace <ws>] [--wrap-around] (left|down|up|right)
    /// aerospace move-workspace-to-monitor [--workspace <ws>] [--wrap-around] (next|prev)
    /// aerospace move-workspace-to-monitor [--workspace <ws>] <monitor-pattern>...
    /// ```
    ///
    /// Fails for workspaces that have a monitor force assignment.
    pub fn move_workspace_to_monitor(
        &self,
        args: MoveWorkspaceToMonitorArgs,
        opts: MoveWorkspaceToMonitorOpts,
    ) -> Result<()> {
        let target = args.target()?;

        let mut cmd_args = CommandArgs::new();
        cmd_args
            .option("--workspace", opts.workspace.as_deref())
            .flag("--wrap-around", opts.wrap_around);
        match target {
            MonitorTarget::Direction(d) => {
                cmd_args.arg(d);
            }
            MonitorTarget::Order(o) => {
                cmd_args.arg(o);
            }
            MonitorTarget::Patterns(patterns) => {
                for p in patterns {
                    cmd_args.arg(p);
                }
            }
        }

        run(self.conn, "move-workspace-to-monitor", cmd_args.as_slice(), || {
            "move workspace to monitor".to_string()
        })?;
        Ok(())
    }
}
