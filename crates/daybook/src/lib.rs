//! Daybook is a self-hosted personal productivity server.
//!
//! # Features
//!
//! - Owned resources (tasks, events, contacts, shopping lists, categories)
//!     - per-role quota, enforced atomically on every creation
//!     - usage report and administrative reset
//! - Community events
//!     - RSVP with `going`, `maybe` and `not-going`
//!     - attendee capacity that holds under concurrent joins

// Re-export shared types and the adapter trait from daybook-types
pub use daybook_types::error;
pub use daybook_types::meta_adapter;
pub use daybook_types::types;

pub use daybook_core::capacity;
pub use daybook_core::memory_adapter;
pub use daybook_core::policy;
pub use daybook_core::quota;

// Local modules
pub mod admin;
pub mod app;
pub mod event;
pub mod prelude;
pub mod routes;
pub mod rsvp;
pub mod usage;

pub use crate::app::{App, AppBuilder};

// vim: ts=4
