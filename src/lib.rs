//! **aerospace-ipc**: a client for the AeroSpace window manager's socket.
//!
//! The daemon answers one JSON request with one JSON response over a local
//! Unix socket.  This crate opens the socket, moves the envelopes, checks
//! the daemon's version, and maps the generic response into typed records
//! ([`windows::Window`], [`workspaces::Workspace`]) or errors.
//!
//! # Architecture
//!
//! * [`traits::Connection`] is the single round-trip primitive.
//!   [`ipc::socket::SocketConnection`] is the real one; tests substitute
//!   recording doubles.
//! * [`traits::Connector`] decides where to connect.  See
//!   [`ipc::connector`] for the environment-based default, an explicit-path
//!   variant, and a process-wide override slot.
//! * The services in [`windows`], [`workspaces`], [`focus`] and [`layout`]
//!   turn typed arguments into the daemon's flat argument vectors.  All
//!   argument validation happens there, before anything is sent.
//! * [`Client`] owns one connection and hands out the services.
//!
//! ```no_run
//! use aerospace_ipc::command::LayoutKind;
//! use aerospace_ipc::layout::SetLayoutOpts;
//! use aerospace_ipc::Client;
//!
//! let client = Client::new()?;
//! client
//!     .layout()
//!     .set_layout(&[LayoutKind::Floating, LayoutKind::Tiling], SetLayoutOpts::default())?;
//! client.close()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod client;
pub mod command;
pub mod config;
pub mod error;
pub mod focus;
pub mod ipc;
pub mod layout;
pub mod traits;
pub mod windows;
pub mod workspaces;

pub use client::Client;
pub use error::{Error, Result};
