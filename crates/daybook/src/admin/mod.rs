//! Admin API handlers for user provisioning, usage resets and event state

pub mod event;
pub mod perm;
pub mod usage;
pub mod user;

// vim: ts=4
