//! Wire types for the Android automation-driver protocol.
//!
//! This crate contains the serde-serializable types used for communication
//! with the on-device automation server over its W3C WebDriver-flavored
//! HTTP endpoints. These types represent the "protocol layer" - the shapes
//! of data as they appear on the wire.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! - **Pure data**: No behavior beyond serialization/deserialization
//! - **1:1 with the wire**: Match the automation server's endpoint schemas
//! - **Stable**: Changes only when the wire protocol changes
//!
//! Higher-level ergonomic APIs are built on top of these types in
//! `swipr-runtime` and `swipr-core`.

pub mod actions;
pub mod capabilities;
pub mod locator;
pub mod types;

pub use actions::*;
pub use capabilities::*;
pub use locator::*;
pub use types::*;
