//! Per-user resource quota ledger
//!
//! Counters live in the metadata store. `reserve` is a single conditional
//! increment ("only if below the limit"), so two concurrent creates can never
//! both pass a limit that has room for one. Privileged roles are unlimited and
//! their counters are left untouched.

use serde::Serialize;
use std::sync::Arc;

use crate::policy::RoleFeaturePolicy;
use crate::prelude::*;
use daybook_types::meta_adapter::MetaAdapter;

/// Usage of one resource type, as reported to the owner
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageEntry {
	pub resource: ResourceType,
	pub used: u32,
	/// `None` when unlimited
	pub limit: Option<u32>,
	/// `None` when unlimited
	pub remaining: Option<u32>,
}

#[derive(Debug)]
pub struct QuotaLedger {
	meta_adapter: Arc<dyn MetaAdapter>,
	policy: RoleFeaturePolicy,
}

impl QuotaLedger {
	pub fn new(meta_adapter: Arc<dyn MetaAdapter>, policy: RoleFeaturePolicy) -> Self {
		Self { meta_adapter, policy }
	}

	pub fn policy(&self) -> &RoleFeaturePolicy {
		&self.policy
	}

	/// Advisory check. A later `reserve` can still fail if another request
	/// takes the last unit in between.
	pub async fn can_reserve(&self, user_id: &str, resource: ResourceType) -> ClResult<bool> {
		let user = self.meta_adapter.read_user(user_id).await?;
		Ok(match self.policy.limit_for(user.role, resource) {
			Limit::Unlimited => true,
			Limit::Limited(limit) => user.usage.get(resource) < limit,
		})
	}

	/// Takes one unit of `resource` quota for the user.
	pub async fn reserve(&self, user_id: &str, resource: ResourceType) -> ClResult<()> {
		let user = self.meta_adapter.read_user(user_id).await?;
		let Limit::Limited(limit) = self.policy.limit_for(user.role, resource) else {
			debug!(user_id = %user_id, resource = %resource, role = %user.role, "unlimited role, usage not tracked");
			return Ok(());
		};

		if self.meta_adapter.increment_usage(user_id, resource, limit).await? {
			debug!(user_id = %user_id, resource = %resource, "quota reserved");
			Ok(())
		} else {
			info!(user_id = %user_id, resource = %resource, limit = limit, "quota exceeded");
			Err(Error::QuotaExceeded { resource, limit })
		}
	}

	/// Gives one unit of `resource` quota back. Never drops below zero.
	pub async fn release(&self, user_id: &str, resource: ResourceType) -> ClResult<()> {
		let user = self.meta_adapter.read_user(user_id).await?;
		if self.policy.limit_for(user.role, resource).is_unlimited() {
			return Ok(());
		}
		let used = self.meta_adapter.decrement_usage(user_id, resource).await?;
		debug!(user_id = %user_id, resource = %resource, used = used, "quota released");
		Ok(())
	}

	/// Administrative reset of one counter, or of all counters when `resource` is `None`
	pub async fn reset_usage(&self, user_id: &str, resource: Option<ResourceType>) -> ClResult<()> {
		self.meta_adapter.reset_usage(user_id, resource).await?;
		info!(
			user_id = %user_id,
			resource = resource.map_or("all", |r| r.as_str()),
			"usage reset"
		);
		Ok(())
	}

	/// Usage and limits of every resource type for the user
	pub async fn usage_report(&self, user_id: &str) -> ClResult<Vec<UsageEntry>> {
		let user = self.meta_adapter.read_user(user_id).await?;
		Ok(ResourceType::ALL
			.iter()
			.map(|&resource| {
				let used = user.usage.get(resource);
				let limit = self.policy.limit_for(user.role, resource).as_option();
				UsageEntry {
					resource,
					used,
					limit,
					remaining: limit.map(|limit| limit.saturating_sub(used)),
				}
			})
			.collect())
	}

	/// Reserves quota, then runs `persist`. Releases the reservation if
	/// `persist` fails so the counter keeps matching the stored resources.
	pub async fn create_owned<T, F, Fut>(
		&self,
		user_id: &str,
		resource: ResourceType,
		persist: F,
	) -> ClResult<T>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = ClResult<T>>,
	{
		self.reserve(user_id, resource).await?;
		match persist().await {
			Ok(res) => Ok(res),
			Err(err) => {
				warn!(user_id = %user_id, resource = %resource, error = %err, "persist failed, releasing quota");
				if let Err(release_err) = self.release(user_id, resource).await {
					error!(user_id = %user_id, resource = %resource, error = %release_err, "compensating release failed");
				}
				Err(err)
			}
		}
	}

	/// Runs `remove`, then gives the owner's unit back. Nothing is released
	/// when `remove` fails, so a resource that was never deleted (or was
	/// already deleted by a concurrent request) keeps its unit.
	pub async fn delete_owned<T, F, Fut>(
		&self,
		owner_id: &str,
		resource: ResourceType,
		remove: F,
	) -> ClResult<T>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = ClResult<T>>,
	{
		let res = remove().await?;
		self.release(owner_id, resource).await?;
		info!(user_id = %owner_id, resource = %resource, "owned resource deleted");
		Ok(res)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::memory_adapter::MetaAdapterMemory;

	async fn ledger_with(users: &[(&str, Role)]) -> (QuotaLedger, Arc<MetaAdapterMemory>) {
		let adapter = Arc::new(MetaAdapterMemory::new());
		for (user_id, role) in users {
			assert!(adapter.create_user(user_id, *role).await.is_ok());
		}
		(QuotaLedger::new(adapter.clone(), RoleFeaturePolicy::default()), adapter)
	}

	async fn used(adapter: &MetaAdapterMemory, user_id: &str, resource: ResourceType) -> u32 {
		adapter.read_user(user_id).await.map(|u| u.usage.get(resource)).unwrap_or(u32::MAX)
	}

	#[tokio::test]
	async fn test_reserve_up_to_limit() {
		let (ledger, adapter) = ledger_with(&[("alice", Role::User)]).await;

		for _ in 0..5 {
			assert!(ledger.reserve("alice", ResourceType::Task).await.is_ok());
		}
		let res = ledger.reserve("alice", ResourceType::Task).await;
		assert!(matches!(res, Err(Error::QuotaExceeded { resource: ResourceType::Task, limit: 5 })));
		assert_eq!(used(&adapter, "alice", ResourceType::Task).await, 5);
		// Other resource types have their own counters
		assert!(ledger.reserve("alice", ResourceType::Contact).await.is_ok());
	}

	#[tokio::test]
	async fn test_usage_is_reserves_minus_releases() {
		let (ledger, adapter) = ledger_with(&[("alice", Role::User)]).await;

		for _ in 0..4 {
			assert!(ledger.reserve("alice", ResourceType::Category).await.is_ok());
		}
		for _ in 0..3 {
			assert!(ledger.release("alice", ResourceType::Category).await.is_ok());
		}
		assert_eq!(used(&adapter, "alice", ResourceType::Category).await, 1);
	}

	#[tokio::test]
	async fn test_release_never_goes_negative() {
		let (ledger, adapter) = ledger_with(&[("alice", Role::User)]).await;
		assert!(ledger.release("alice", ResourceType::Event).await.is_ok());
		assert!(ledger.release("alice", ResourceType::Event).await.is_ok());
		assert_eq!(used(&adapter, "alice", ResourceType::Event).await, 0);
	}

	#[tokio::test]
	async fn test_privileged_roles_are_not_tracked() {
		let (ledger, adapter) = ledger_with(&[("pat", Role::Premium), ("root", Role::Admin)]).await;

		for user_id in ["pat", "root"] {
			for _ in 0..20 {
				assert!(ledger.reserve(user_id, ResourceType::ShoppingList).await.is_ok());
			}
			assert!(ledger.release(user_id, ResourceType::ShoppingList).await.is_ok());
			assert_eq!(used(&adapter, user_id, ResourceType::ShoppingList).await, 0);
			assert_eq!(ledger.can_reserve(user_id, ResourceType::ShoppingList).await.ok(), Some(true));
		}
	}

	#[tokio::test]
	async fn test_can_reserve_reflects_counter() {
		let (ledger, _adapter) = ledger_with(&[("alice", Role::User)]).await;
		for _ in 0..5 {
			assert_eq!(ledger.can_reserve("alice", ResourceType::Task).await.ok(), Some(true));
			assert!(ledger.reserve("alice", ResourceType::Task).await.is_ok());
		}
		assert_eq!(ledger.can_reserve("alice", ResourceType::Task).await.ok(), Some(false));
	}

	#[tokio::test]
	async fn test_reset_after_limit_reached() {
		let (ledger, adapter) = ledger_with(&[("alice", Role::User)]).await;
		for _ in 0..5 {
			assert!(ledger.reserve("alice", ResourceType::Task).await.is_ok());
		}
		assert!(matches!(
			ledger.reserve("alice", ResourceType::Task).await,
			Err(Error::QuotaExceeded { .. })
		));

		let resource = "tasks".parse().ok();
		assert!(ledger.reset_usage("alice", resource).await.is_ok());
		assert_eq!(used(&adapter, "alice", ResourceType::Task).await, 0);

		assert!(ledger.reserve("alice", ResourceType::Task).await.is_ok());
		assert_eq!(used(&adapter, "alice", ResourceType::Task).await, 1);
	}

	#[tokio::test]
	async fn test_reset_all_counters() {
		let (ledger, adapter) = ledger_with(&[("alice", Role::User)]).await;
		for resource in ResourceType::ALL {
			assert!(ledger.reserve("alice", resource).await.is_ok());
		}
		assert!(ledger.reset_usage("alice", None).await.is_ok());
		for resource in ResourceType::ALL {
			assert_eq!(used(&adapter, "alice", resource).await, 0);
		}
	}

	#[tokio::test]
	async fn test_usage_report() {
		let (ledger, _adapter) = ledger_with(&[("alice", Role::User), ("pat", Role::Premium)]).await;
		assert!(ledger.reserve("alice", ResourceType::Contact).await.is_ok());

		let report = ledger.usage_report("alice").await.unwrap_or_default();
		let contact = report.iter().find(|e| e.resource == ResourceType::Contact);
		assert_eq!(
			contact,
			Some(&UsageEntry {
				resource: ResourceType::Contact,
				used: 1,
				limit: Some(5),
				remaining: Some(4)
			})
		);

		let report = ledger.usage_report("pat").await.unwrap_or_default();
		assert_eq!(report.len(), ResourceType::ALL.len());
		assert!(report.iter().all(|e| e.limit.is_none() && e.remaining.is_none()));
	}

	#[tokio::test]
	async fn test_create_owned_releases_on_failure() {
		let (ledger, adapter) = ledger_with(&[("alice", Role::User)]).await;

		let res: ClResult<()> = ledger
			.create_owned("alice", ResourceType::Task, || async { Err(Error::DbError) })
			.await;
		assert!(matches!(res, Err(Error::DbError)));
		assert_eq!(used(&adapter, "alice", ResourceType::Task).await, 0);

		let res = ledger.create_owned("alice", ResourceType::Task, || async { Ok("task-1") }).await;
		assert_eq!(res.ok(), Some("task-1"));
		assert_eq!(used(&adapter, "alice", ResourceType::Task).await, 1);
	}

	#[tokio::test]
	async fn test_create_owned_does_not_persist_over_quota() {
		let (ledger, _adapter) = ledger_with(&[("alice", Role::User)]).await;
		for _ in 0..5 {
			assert!(ledger.reserve("alice", ResourceType::Task).await.is_ok());
		}
		let mut persisted = false;
		let res = ledger
			.create_owned("alice", ResourceType::Task, || {
				persisted = true;
				async { Ok(()) }
			})
			.await;
		assert!(matches!(res, Err(Error::QuotaExceeded { .. })));
		assert!(!persisted);
	}

	#[tokio::test]
	async fn test_delete_owned_releases_only_after_removal() {
		let (ledger, adapter) = ledger_with(&[("alice", Role::User)]).await;
		for _ in 0..2 {
			assert!(ledger.reserve("alice", ResourceType::Contact).await.is_ok());
		}

		let res: ClResult<()> = ledger
			.delete_owned("alice", ResourceType::Contact, || async { Err(Error::NotFound) })
			.await;
		assert!(matches!(res, Err(Error::NotFound)));
		assert_eq!(used(&adapter, "alice", ResourceType::Contact).await, 2);

		let res = ledger.delete_owned("alice", ResourceType::Contact, || async { Ok(()) }).await;
		assert!(res.is_ok());
		assert_eq!(used(&adapter, "alice", ResourceType::Contact).await, 1);
	}

	#[tokio::test]
	async fn test_concurrent_reserves_never_exceed_limit() {
		let (ledger, adapter) = ledger_with(&[("alice", Role::User)]).await;
		let ledger = Arc::new(ledger);

		let mut handles = vec![];
		for _ in 0..50 {
			let ledger = Arc::clone(&ledger);
			handles.push(tokio::spawn(async move {
				ledger.reserve("alice", ResourceType::Task).await.is_ok()
			}));
		}

		let mut succeeded = 0;
		for handle in handles {
			if handle.await.unwrap_or(false) {
				succeeded += 1;
			}
		}
		assert_eq!(succeeded, 5);
		assert_eq!(used(&adapter, "alice", ResourceType::Task).await, 5);
	}

	#[tokio::test]
	async fn test_unknown_user() {
		let (ledger, _adapter) = ledger_with(&[]).await;
		assert!(matches!(ledger.reserve("ghost", ResourceType::Task).await, Err(Error::NotFound)));
	}
}

// vim: ts=4
