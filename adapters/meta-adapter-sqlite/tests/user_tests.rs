//! Meta adapter user and usage counter tests

#![allow(clippy::expect_used, clippy::unwrap_used)]

use daybook_meta_adapter_sqlite::MetaAdapterSqlite;
use daybook_types::error::Error;
use daybook_types::meta_adapter::MetaAdapter;
use daybook_types::types::{ResourceType, Role};
use std::sync::Arc;
use tempfile::TempDir;

async fn create_test_adapter() -> (MetaAdapterSqlite, TempDir) {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let adapter = MetaAdapterSqlite::new(temp_dir.path()).await.expect("Failed to create adapter");
	(adapter, temp_dir)
}

#[tokio::test]
async fn test_create_and_read_user() {
	let (adapter, _temp) = create_test_adapter().await;

	adapter.create_user("alice", Role::Premium).await.expect("Should create user");
	let user = adapter.read_user("alice").await.expect("Should read user");

	assert_eq!(user.user_id.as_ref(), "alice");
	assert_eq!(user.role, Role::Premium);
	for resource in ResourceType::ALL {
		assert_eq!(user.usage.get(resource), 0, "{} should start at zero", resource);
	}
}

#[tokio::test]
async fn test_duplicate_user_conflicts() {
	let (adapter, _temp) = create_test_adapter().await;
	adapter.create_user("alice", Role::User).await.expect("Should create user");

	let res = adapter.create_user("alice", Role::Admin).await;
	assert!(matches!(res, Err(Error::Conflict(_))));
	let user = adapter.read_user("alice").await.expect("Should read user");
	assert_eq!(user.role, Role::User);
}

#[tokio::test]
async fn test_unknown_user_is_not_found() {
	let (adapter, _temp) = create_test_adapter().await;
	assert!(matches!(adapter.read_user("ghost").await, Err(Error::NotFound)));
	assert!(matches!(
		adapter.increment_usage("ghost", ResourceType::Task, 5).await,
		Err(Error::NotFound)
	));
	assert!(matches!(
		adapter.decrement_usage("ghost", ResourceType::Task).await,
		Err(Error::NotFound)
	));
	assert!(matches!(adapter.reset_usage("ghost", None).await, Err(Error::NotFound)));
	assert!(matches!(adapter.update_user_role("ghost", Role::Admin).await, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_update_role() {
	let (adapter, _temp) = create_test_adapter().await;
	adapter.create_user("alice", Role::User).await.expect("Should create user");
	adapter.update_user_role("alice", Role::Admin).await.expect("Should update role");
	let user = adapter.read_user("alice").await.expect("Should read user");
	assert_eq!(user.role, Role::Admin);
}

#[tokio::test]
async fn test_increment_stops_at_limit() {
	let (adapter, _temp) = create_test_adapter().await;
	adapter.create_user("alice", Role::User).await.expect("Should create user");

	for _ in 0..3 {
		assert!(adapter.increment_usage("alice", ResourceType::Contact, 3).await.expect("increment"));
	}
	assert!(!adapter.increment_usage("alice", ResourceType::Contact, 3).await.expect("increment"));

	let user = adapter.read_user("alice").await.expect("Should read user");
	assert_eq!(user.usage.contact, 3);
	assert_eq!(user.usage.task, 0);
}

#[tokio::test]
async fn test_decrement_clamps_at_zero() {
	let (adapter, _temp) = create_test_adapter().await;
	adapter.create_user("alice", Role::User).await.expect("Should create user");

	adapter.increment_usage("alice", ResourceType::Category, 5).await.expect("increment");
	assert_eq!(adapter.decrement_usage("alice", ResourceType::Category).await.ok(), Some(0));
	assert_eq!(adapter.decrement_usage("alice", ResourceType::Category).await.ok(), Some(0));
}

#[tokio::test]
async fn test_reset_one_or_all_counters() {
	let (adapter, _temp) = create_test_adapter().await;
	adapter.create_user("alice", Role::User).await.expect("Should create user");
	for resource in ResourceType::ALL {
		adapter.increment_usage("alice", resource, 5).await.expect("increment");
		adapter.increment_usage("alice", resource, 5).await.expect("increment");
	}

	adapter.reset_usage("alice", Some(ResourceType::Task)).await.expect("reset");
	let usage = adapter.read_user("alice").await.expect("Should read user").usage;
	assert_eq!(usage.task, 0);
	assert_eq!(usage.shopping_list, 2);

	adapter.reset_usage("alice", None).await.expect("reset");
	let usage = adapter.read_user("alice").await.expect("Should read user").usage;
	for resource in ResourceType::ALL {
		assert_eq!(usage.get(resource), 0);
	}
}

#[tokio::test]
async fn test_concurrent_increments_never_exceed_limit() {
	let (adapter, _temp) = create_test_adapter().await;
	let adapter = Arc::new(adapter);
	adapter.create_user("alice", Role::User).await.expect("Should create user");

	let mut handles = vec![];
	for _ in 0..30 {
		let adapter_clone = Arc::clone(&adapter);
		handles.push(tokio::spawn(async move {
			adapter_clone.increment_usage("alice", ResourceType::Task, 5).await
		}));
	}

	let mut granted = 0;
	for handle in handles {
		if handle.await.expect("Task panicked").expect("increment") {
			granted += 1;
		}
	}
	assert_eq!(granted, 5);
	let user = adapter.read_user("alice").await.expect("Should read user");
	assert_eq!(user.usage.task, 5);
}

#[tokio::test]
async fn test_data_survives_reopen() {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	{
		let adapter = MetaAdapterSqlite::new(temp_dir.path()).await.expect("open");
		adapter.create_user("alice", Role::User).await.expect("Should create user");
		adapter.increment_usage("alice", ResourceType::Event, 5).await.expect("increment");
	}
	let adapter = MetaAdapterSqlite::new(temp_dir.path()).await.expect("reopen");
	let user = adapter.read_user("alice").await.expect("Should read user");
	assert_eq!(user.usage.event, 1);
}

// vim: ts=4
