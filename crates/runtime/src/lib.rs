//! Automation-driver runtime: HTTP connection and session lifecycle.
//!
//! This crate owns the transport to the on-device automation server. It
//! exposes [`DriverSession`], a thin typed wrapper over the server's HTTP
//! endpoints: one session per device, created with a capability payload and
//! destroyed on [`DriverSession::quit`]. All element lookups here are
//! single-shot; bounded polling lives in the layer above.

mod connection;
mod error;
mod session;

pub use connection::Connection;
pub use error::{Error, Result};
pub use session::DriverSession;
