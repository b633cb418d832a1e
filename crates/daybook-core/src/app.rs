//! App state type

use std::sync::Arc;

use crate::capacity::CapacityGuard;
use crate::policy::RoleFeaturePolicy;
use crate::quota::QuotaLedger;

use daybook_types::meta_adapter::MetaAdapter;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug)]
pub struct AppState {
	pub opts: AppBuilderOpts,
	pub meta_adapter: Arc<dyn MetaAdapter>,
	pub quota: QuotaLedger,
	pub capacity: CapacityGuard,
}

impl AppState {
	/// Wires the quota ledger and the capacity guard to a shared metadata adapter
	pub fn new(opts: AppBuilderOpts, meta_adapter: Arc<dyn MetaAdapter>) -> Self {
		let policy = RoleFeaturePolicy::new(opts.user_resource_limit);
		let quota = QuotaLedger::new(meta_adapter.clone(), policy);
		let capacity =
			CapacityGuard::new(meta_adapter.clone()).with_max_attempts(opts.max_rsvp_attempts);
		AppState { opts, meta_adapter, quota, capacity }
	}
}

pub type App = Arc<AppState>;

#[derive(Debug, Clone)]
pub struct AppBuilderOpts {
	pub listen: Box<str>,
	/// Owned items per resource type for the `user` role
	pub user_resource_limit: u32,
	/// Total attempts of an RSVP whose write keeps losing races, before `Conflict`
	pub max_rsvp_attempts: u32,
}

impl Default for AppBuilderOpts {
	fn default() -> Self {
		AppBuilderOpts {
			listen: "127.0.0.1:8080".into(),
			user_resource_limit: crate::policy::DEFAULT_USER_LIMIT,
			max_rsvp_attempts: crate::capacity::DEFAULT_MAX_ATTEMPTS,
		}
	}
}

// vim: ts=4
