//! Shared types, adapter traits, and core utilities for the Daybook server.
//!
//! This crate contains the foundational types that are shared between the
//! core crate, the server crate and all adapter implementations. Keeping them
//! here lets adapter crates compile without pulling in the HTTP layer.

pub mod error;
pub mod meta_adapter;
pub mod prelude;
pub mod types;

// vim: ts=4
