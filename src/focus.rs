//! Focus changes.
//!
//! The `focus` command picks its target in exactly one of four ways: an
//! explicit window id, a cardinal direction, a depth-first step, or a
//! depth-first index.  [`SetFocusArgs`] carries all four as options and
//! [`FocusService::set_focus`] rejects anything but exactly one.
//!
//! The modifiers in [`SetFocusOpts`] only mean something to the daemon for
//! directional and depth-first steps.  In window-id and DFS-index mode
//! they are dropped without being sent.

use crate::command::{run, Boundaries, BoundariesAction, CommandArgs, DfsDirection, Direction};
use crate::error::{Error, Result};
use crate::traits::Connection;

/// The focus target.  Exactly one field must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetFocusArgs {
    pub window_id: Option<u32>,
    pub direction: Option<Direction>,
    pub dfs_direction: Option<DfsDirection>,
    /// 0-based position in depth-first order.
    pub dfs_index: Option<u32>,
}

impl SetFocusArgs {
    pub fn window_id(window_id: u32) -> Self {
        Self {
            window_id: Some(window_id),
            ..Default::default()
        }
    }

    pub fn direction(direction: Direction) -> Self {
        Self {
            direction: Some(direction),
            ..Default::default()
        }
    }

    pub fn dfs_direction(direction: DfsDirection) -> Self {
        Self {
            dfs_direction: Some(direction),
            ..Default::default()
        }
    }

    pub fn dfs_index(index: u32) -> Self {
        Self {
            dfs_index: Some(index),
            ..Default::default()
        }
    }

    /// Check that exactly one mode is set and resolve it.
    fn mode(&self) -> Result<FocusMode> {
        let modes: Vec<FocusMode> = [
            self.window_id.map(FocusMode::WindowId),
            self.direction.map(FocusMode::Direction),
            self.dfs_direction.map(FocusMode::Dfs),
            self.dfs_index.map(FocusMode::DfsIndex),
        ]
        .into_iter()
        .flatten()
        .collect();

        match modes.as_slice() {
            [] => Err(Error::NoMode(
                "exactly one of window_id, direction, dfs_direction or dfs_index must be set",
            )),
            [mode] => Ok(*mode),
            _ => Err(Error::MultipleModes(
                "only one of window_id, direction, dfs_direction or dfs_index can be set",
            )),
        }
    }
}

/// Optional modifiers for directional and depth-first focus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetFocusOpts {
    /// Don't perceive floating windows as part of the tree.
    pub ignore_floating: bool,
    pub boundaries: Option<Boundaries>,
    pub boundaries_action: Option<BoundariesAction>,
}

#[derive(Debug, Clone, Copy)]
enum FocusMode {
    WindowId(u32),
    Direction(Direction),
    Dfs(DfsDirection),
    DfsIndex(u32),
}

impl FocusMode {
    fn operation(&self) -> String {
        match self {
            FocusMode::WindowId(id) => format!("focus window with ID {}", id),
            FocusMode::Direction(d) => format!("focus window in direction {}", d),
            FocusMode::Dfs(d) => format!("focus window using DFS direction {}", d),
            FocusMode::DfsIndex(i) => format!("focus window with DFS index {}", i),
        }
    }
}

/// Focus commands over a borrowed [`Connection`].
pub struct FocusService<'a> {
    conn: &'a dyn Connection,
}

impl<'a> FocusService<'a> {
    pub fn new(conn: &'a dyn Connection) -> Self {
        Self { conn }
    }

    /// Move focus to the target described by `args`.
    ///
    /// ```text
    /// aerospace focus --window-id <id>
    /// aerospace focus (left|down|up|right) [--ignore-floating] [--boundaries <b>] [--boundaries-action <a>]
    /// aerospace focus (dfs-next|dfs-prev) [--ignore-floating] [--boundaries <b>] [--boundaries-action <a>]
    /// aerospace focus --dfs-index <n>
    /// ```
    pub fn set_focus(&self, args: SetFocusArgs, opts: SetFocusOpts) -> Result<()> {
        let mode = args.mode()?;
        let cmd_args = build_focus_args(mode, &opts);
        run(self.conn, "focus", cmd_args.as_slice(), || mode.operation())?;
        Ok(())
    }

    pub fn set_focus_by_window_id(&self, window_id: u32) -> Result<()> {
        self.set_focus(SetFocusArgs::window_id(window_id), SetFocusOpts::default())
    }

    pub fn set_focus_by_direction(&self, direction: Direction, opts: SetFocusOpts) -> Result<()> {
        self.set_focus(SetFocusArgs::direction(direction), opts)
    }

    pub fn set_focus_by_dfs(&self, direction: DfsDirection, opts: SetFocusOpts) -> Result<()> {
        self.set_focus(SetFocusArgs::dfs_direction(direction), opts)
    }

    pub fn set_focus_by_dfs_index(&self, dfs_index: u32) -> Result<()> {
        self.set_focus(SetFocusArgs::dfs_index(dfs_index), SetFocusOpts::default())
    }

    /// Switch between the current and the previously focused window.
    ///
    /// The daemon remembers a single previous window; if it was closed the
    /// command fails, and callers usually fall back to
    /// [`WorkspaceService::move_back_and_forth`](crate::workspaces::WorkspaceService::move_back_and_forth).
    pub fn focus_back_and_forth(&self) -> Result<()> {
        run(self.conn, "focus-back-and-forth", &[], || {
            "switch focus back and forth".to_string()
        })?;
        Ok(())
    }
}

fn build_focus_args(mode: FocusMode, opts: &SetFocusOpts) -> CommandArgs {
    let mut args = CommandArgs::new();
    match mode {
        FocusMode::WindowId(id) => {
            args.option("--window-id", Some(id));
        }
        FocusMode::DfsIndex(index) => {
            args.option("--dfs-index", Some(index));
        }
        FocusMode::Direction(d) => {
            args.arg(d);
            push_modifiers(&mut args, opts);
        }
        FocusMode::Dfs(d) => {
            args.arg(d);
            push_modifiers(&mut args, opts);
        }
    }
    args
}

fn push_modifiers(args: &mut CommandArgs, opts: &SetFocusOpts) {
    args.flag("--ignore-floating", opts.ignore_floating)
        .option("--boundaries", opts.boundaries)
        .option("--boundaries-action", opts.boundaries_action);
}
