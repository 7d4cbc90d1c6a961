//! Socket plumbing for the AeroSpace daemon.
//!
//! [`protocol`] defines the JSON envelopes, [`socket`] moves them over a
//! Unix socket, [`version`] negotiates compatibility and [`connector`]
//! decides where to connect.

pub mod connector;
pub mod protocol;
pub mod socket;
pub mod version;
