//! Layout changes.

use crate::command::{list, run, CommandArgs, LayoutKind};
use crate::error::{Error, Result};
use crate::traits::Connection;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetLayoutOpts {
    /// Change this window instead of the focused one.
    pub window_id: Option<u32>,
}

/// Layout commands over a borrowed [`Connection`].
pub struct LayoutService<'a> {
    conn: &'a dyn Connection,
}

impl<'a> LayoutService<'a> {
    pub fn new(conn: &'a dyn Connection) -> Self {
        Self { conn }
    }

    /// Apply a layout to a window.
    ///
    /// With more than one layout the daemon applies the first one that
    /// does not describe the window's current layout, which makes
    /// `[Floating, Tiling]` a toggle.
    ///
    /// `aerospace layout <layout>... [--window-id <id>]`
    pub fn set_layout(&self, layouts: &[LayoutKind], opts: SetLayoutOpts) -> Result<()> {
        if layouts.is_empty() {
            return Err(Error::EmptyLayouts);
        }

        let mut args = CommandArgs::new();
        for layout in layouts {
            args.arg(layout);
        }
        args.option("--window-id", opts.window_id);

        run(self.conn, "layout", args.as_slice(), || {
            format!("set layout(s) {}", list(layouts))
        })?;
        Ok(())
    }
}
