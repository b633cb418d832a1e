//! Meta adapter community event and attendee tests

#![allow(clippy::expect_used, clippy::unwrap_used)]

use daybook_meta_adapter_sqlite::MetaAdapterSqlite;
use daybook_types::error::Error;
use daybook_types::meta_adapter::{Attendee, AttendeeWrite, CreateEventData, MetaAdapter};
use daybook_types::types::{RsvpStatus, Timestamp};
use std::sync::Arc;
use tempfile::TempDir;

async fn create_test_adapter(max_attendees: Option<u32>) -> (Arc<MetaAdapterSqlite>, TempDir) {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let adapter = MetaAdapterSqlite::new(temp_dir.path()).await.expect("Failed to create adapter");
	let event = CreateEventData { event_id: "ev1", owner_id: "alice", max_attendees, is_active: true };
	adapter.create_event(&event).await.expect("Should create event");
	(Arc::new(adapter), temp_dir)
}

fn attendee(user_id: &str, status: RsvpStatus) -> Attendee {
	Attendee { user_id: user_id.into(), status, joined_at: Timestamp::now() }
}

#[tokio::test]
async fn test_create_and_read_event() {
	let (adapter, _temp) = create_test_adapter(Some(10)).await;

	let event = adapter.read_event("ev1").await.expect("Should read event");
	assert_eq!(event.event_id.as_ref(), "ev1");
	assert_eq!(event.owner_id.as_ref(), "alice");
	assert_eq!(event.max_attendees, Some(10));
	assert!(event.is_active);
	assert!(event.attendees.is_empty());

	let dup = CreateEventData { event_id: "ev1", owner_id: "bob", max_attendees: None, is_active: true };
	assert!(matches!(adapter.create_event(&dup).await, Err(Error::Conflict(_))));
	assert!(matches!(adapter.read_event("nope").await, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_unlimited_event() {
	let (adapter, _temp) = create_test_adapter(None).await;
	for i in 0..10 {
		let res = adapter.insert_attendee("ev1", &attendee(&format!("u{}", i), RsvpStatus::Going), true).await;
		assert_eq!(res.ok(), Some(AttendeeWrite::Applied));
	}
	let event = adapter.read_event("ev1").await.expect("Should read event");
	assert_eq!(event.max_attendees, None);
	assert_eq!(event.going_count(), 10);
}

#[tokio::test]
async fn test_insert_respects_capacity() {
	let (adapter, _temp) = create_test_adapter(Some(1)).await;

	let res = adapter.insert_attendee("ev1", &attendee("alice", RsvpStatus::Going), true).await;
	assert_eq!(res.ok(), Some(AttendeeWrite::Applied));
	let res = adapter.insert_attendee("ev1", &attendee("bob", RsvpStatus::Going), true).await;
	assert_eq!(res.ok(), Some(AttendeeWrite::Full));
	let res = adapter.insert_attendee("ev1", &attendee("bob", RsvpStatus::Maybe), false).await;
	assert_eq!(res.ok(), Some(AttendeeWrite::Applied));

	let event = adapter.read_event("ev1").await.expect("Should read event");
	let order: Vec<_> = event.attendees.iter().map(|a| a.user_id.as_ref()).collect();
	assert_eq!(order, vec!["alice", "bob"]);
}

#[tokio::test]
async fn test_insert_existing_is_stale() {
	let (adapter, _temp) = create_test_adapter(None).await;
	let res = adapter.insert_attendee("ev1", &attendee("alice", RsvpStatus::Maybe), false).await;
	assert_eq!(res.ok(), Some(AttendeeWrite::Applied));
	let res = adapter.insert_attendee("ev1", &attendee("alice", RsvpStatus::Going), true).await;
	assert_eq!(res.ok(), Some(AttendeeWrite::Stale));
}

#[tokio::test]
async fn test_update_is_compare_and_set() {
	let (adapter, _temp) = create_test_adapter(Some(1)).await;
	adapter.insert_attendee("ev1", &attendee("alice", RsvpStatus::Going), true).await.expect("insert");
	adapter.insert_attendee("ev1", &attendee("bob", RsvpStatus::Maybe), false).await.expect("insert");

	// Wrong expected status
	let res = adapter
		.update_attendee_status("ev1", "bob", RsvpStatus::NotGoing, RsvpStatus::Going, true)
		.await;
	assert_eq!(res.ok(), Some(AttendeeWrite::Stale));

	// No free seat
	let res = adapter
		.update_attendee_status("ev1", "bob", RsvpStatus::Maybe, RsvpStatus::Going, true)
		.await;
	assert_eq!(res.ok(), Some(AttendeeWrite::Full));

	let res = adapter
		.update_attendee_status("ev1", "alice", RsvpStatus::Going, RsvpStatus::NotGoing, false)
		.await;
	assert_eq!(res.ok(), Some(AttendeeWrite::Applied));

	let res = adapter
		.update_attendee_status("ev1", "bob", RsvpStatus::Maybe, RsvpStatus::Going, true)
		.await;
	assert_eq!(res.ok(), Some(AttendeeWrite::Applied));

	let event = adapter.read_event("ev1").await.expect("Should read event");
	assert_eq!(event.attendee("alice").map(|a| a.status), Some(RsvpStatus::NotGoing));
	assert_eq!(event.attendee("bob").map(|a| a.status), Some(RsvpStatus::Going));
}

#[tokio::test]
async fn test_missing_attendee_update_is_stale() {
	let (adapter, _temp) = create_test_adapter(None).await;
	let res = adapter
		.update_attendee_status("ev1", "ghost", RsvpStatus::Maybe, RsvpStatus::Going, true)
		.await;
	assert_eq!(res.ok(), Some(AttendeeWrite::Stale));
}

#[tokio::test]
async fn test_inactive_event_rejects_writes() {
	let (adapter, _temp) = create_test_adapter(None).await;
	adapter.insert_attendee("ev1", &attendee("alice", RsvpStatus::Maybe), false).await.expect("insert");
	adapter.update_event_active("ev1", false).await.expect("Should deactivate");

	let res = adapter.insert_attendee("ev1", &attendee("bob", RsvpStatus::Maybe), false).await;
	assert_eq!(res.ok(), Some(AttendeeWrite::Inactive));
	let res = adapter
		.update_attendee_status("ev1", "alice", RsvpStatus::Maybe, RsvpStatus::Going, true)
		.await;
	assert_eq!(res.ok(), Some(AttendeeWrite::Inactive));

	// Removing a record is still possible
	assert_eq!(adapter.delete_attendee("ev1", "alice").await.ok(), Some(Some(RsvpStatus::Maybe)));
	assert!(matches!(adapter.update_event_active("nope", true).await, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_delete_returns_previous_status() {
	let (adapter, _temp) = create_test_adapter(Some(1)).await;
	adapter.insert_attendee("ev1", &attendee("alice", RsvpStatus::Going), true).await.expect("insert");

	assert_eq!(adapter.delete_attendee("ev1", "alice").await.ok(), Some(Some(RsvpStatus::Going)));
	assert_eq!(adapter.delete_attendee("ev1", "alice").await.ok(), Some(None));
	assert!(matches!(adapter.delete_attendee("nope", "alice").await, Err(Error::NotFound)));

	// The seat is free again
	let res = adapter.insert_attendee("ev1", &attendee("bob", RsvpStatus::Going), true).await;
	assert_eq!(res.ok(), Some(AttendeeWrite::Applied));
}

#[tokio::test]
async fn test_delete_event_removes_attendees() {
	let (adapter, _temp) = create_test_adapter(Some(2)).await;
	adapter.insert_attendee("ev1", &attendee("bob", RsvpStatus::Going), true).await.expect("insert");

	adapter.delete_event("ev1").await.expect("Should delete event");
	assert!(matches!(adapter.read_event("ev1").await, Err(Error::NotFound)));
	assert!(matches!(adapter.delete_event("ev1").await, Err(Error::NotFound)));

	// The id can be reused without inheriting old attendees
	let again = CreateEventData { event_id: "ev1", owner_id: "bob", max_attendees: None, is_active: true };
	adapter.create_event(&again).await.expect("Should recreate event");
	let event = adapter.read_event("ev1").await.expect("Should read event");
	assert_eq!(event.owner_id.as_ref(), "bob");
	assert!(event.attendees.is_empty());
}

#[tokio::test]
async fn test_concurrent_inserts_never_exceed_capacity() {
	let (adapter, _temp) = create_test_adapter(Some(3)).await;

	let mut handles = vec![];
	for i in 0..25 {
		let adapter_clone = Arc::clone(&adapter);
		handles.push(tokio::spawn(async move {
			let attendee = attendee(&format!("user{}", i), RsvpStatus::Going);
			adapter_clone.insert_attendee("ev1", &attendee, true).await
		}));
	}

	let mut applied = 0;
	for handle in handles {
		match handle.await.expect("Task panicked").expect("insert") {
			AttendeeWrite::Applied => applied += 1,
			other => assert_eq!(other, AttendeeWrite::Full),
		}
	}
	assert_eq!(applied, 3);
	let event = adapter.read_event("ev1").await.expect("Should read event");
	assert_eq!(event.going_count(), 3);
	assert_eq!(event.attendees.len(), 3);
}

// vim: ts=4
