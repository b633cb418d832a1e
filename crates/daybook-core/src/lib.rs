//! Core of the Daybook server.
//!
//! Quota accounting for owned resources and capacity-constrained RSVPs for
//! community events. Every state change is delegated to the metadata adapter
//! as a single conditional write, so the invariants hold across concurrent
//! request handlers that share nothing but the store.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod app;
pub mod attendance;
pub mod capacity;
pub mod extract;
pub mod memory_adapter;
pub mod middleware;
pub mod policy;
pub mod prelude;
pub mod quota;

// Re-export commonly used types
pub use app::{App, AppBuilderOpts, AppState};
pub use capacity::CapacityGuard;
pub use extract::Auth;
pub use policy::RoleFeaturePolicy;
pub use quota::QuotaLedger;

// vim: ts=4
