//! Window queries.
//!
//! [`WindowService`] lists windows and looks up the focused one.  The
//! focus setters it used to own now live in [`FocusService`]; the old
//! entry points remain as deprecated forwarding shims.

use crate::command::{run, CommandArgs, DfsDirection, Direction};
use crate::error::{Error, Result};
use crate::focus::{FocusService, SetFocusOpts};
use crate::traits::Connection;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fields requested from `list-windows`.
pub const FORMAT_ARGUMENTS: &str = "%{window-id} %{window-title} %{app-name} %{app-bundle-id} %{workspace} %{window-layout} %{window-parent-container-layout}";

/// A window as reported by `list-windows --json`.
///
/// A snapshot, not a live handle: the window may have moved or closed by
/// the time it is acted upon.  `window_id` is unique at a point in time but
/// not stable across daemon restarts.
///
/// ```json
/// {
///   "window-id": 6231,
///   "workspace": "8",
///   "window-layout": "floating",
///   "window-parent-container-layout": "floating",
///   "app-bundle-id": "com.brave.Browser",
///   "app-name": "Brave Browser"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Window {
    pub window_id: u32,
    pub window_title: String,
    pub window_layout: String,
    pub window_parent_container_layout: String,
    pub app_name: String,
    pub app_bundle_id: String,
    pub workspace: String,
}

/// `id | app | title | layout | parent layout | workspace | bundle id`,
/// skipping empty optional fields.
impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {} ", self.window_id, self.app_name)?;
        if !self.window_title.is_empty() {
            write!(f, "| {}", self.window_title)?;
        }
        for field in [
            &self.window_layout,
            &self.window_parent_container_layout,
            &self.workspace,
            &self.app_bundle_id,
        ] {
            if !field.is_empty() {
                write!(f, " | {}", field)?;
            }
        }
        Ok(())
    }
}

/// Window queries over a borrowed [`Connection`].
pub struct WindowService<'a> {
    conn: &'a dyn Connection,
}

impl<'a> WindowService<'a> {
    pub fn new(conn: &'a dyn Connection) -> Self {
        Self { conn }
    }

    /// All windows on all workspaces.
    ///
    /// `aerospace list-windows --all --json --format <fields>`
    pub fn get_all_windows(&self) -> Result<Vec<Window>> {
        let mut args = CommandArgs::new();
        args.arg("--all");
        self.list(args)
    }

    /// Windows on the workspace named `workspace`.
    ///
    /// `aerospace list-windows --workspace <name> --json --format <fields>`
    pub fn get_all_windows_by_workspace(&self, workspace: &str) -> Result<Vec<Window>> {
        let mut args = CommandArgs::new();
        args.option("--workspace", Some(workspace));
        self.list(args)
    }

    /// The focused window.
    ///
    /// Fails with [`Error::NoWindowFocused`] when nothing has focus, e.g.
    /// when an empty workspace is focused.
    pub fn get_focused_window(&self) -> Result<Window> {
        let mut args = CommandArgs::new();
        args.arg("--focused");
        self.list(args)?
            .into_iter()
            .next()
            .ok_or(Error::NoWindowFocused)
    }

    fn list(&self, mut args: CommandArgs) -> Result<Vec<Window>> {
        args.arg("--json").option("--format", Some(FORMAT_ARGUMENTS));
        let response = run(self.conn, "list-windows", args.as_slice(), || {
            "list windows".to_string()
        })?;
        response.decode_list("windows")
    }

    //  Deprecated focus shims

    #[deprecated(note = "use `FocusService::set_focus_by_window_id`")]
    pub fn set_focus_by_window_id(&self, window_id: u32) -> Result<()> {
        FocusService::new(self.conn).set_focus_by_window_id(window_id)
    }

    #[deprecated(note = "use `FocusService::set_focus_by_direction`")]
    pub fn set_focus_by_direction(&self, direction: Direction, opts: SetFocusOpts) -> Result<()> {
        FocusService::new(self.conn).set_focus_by_direction(direction, opts)
    }

    #[deprecated(note = "use `FocusService::set_focus_by_dfs`")]
    pub fn set_focus_by_dfs(&self, direction: DfsDirection, opts: SetFocusOpts) -> Result<()> {
        FocusService::new(self.conn).set_focus_by_dfs(direction, opts)
    }

    #[deprecated(note = "use `FocusService::set_focus_by_dfs_index`")]
    pub fn set_focus_by_dfs_index(&self, dfs_index: u32) -> Result<()> {
        FocusService::new(self.conn).set_focus_by_dfs_index(dfs_index)
    }
}
