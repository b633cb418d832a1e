//! Adapter that stores users, their usage counters and community events.
//!
//! Every mutating method that guards an invariant (usage limits, attendee
//! capacity) is a single conditional write: the adapter must evaluate the
//! condition and apply the change as one atomic unit against its store.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::fmt::Debug;

use crate::prelude::*;

/// Per-resource usage counters of a user
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
	pub task: u32,
	pub event: u32,
	pub contact: u32,
	pub shopping_list: u32,
	pub category: u32,
}

impl Usage {
	pub fn get(&self, resource: ResourceType) -> u32 {
		match resource {
			ResourceType::Task => self.task,
			ResourceType::Event => self.event,
			ResourceType::Contact => self.contact,
			ResourceType::ShoppingList => self.shopping_list,
			ResourceType::Category => self.category,
		}
	}

	pub fn get_mut(&mut self, resource: ResourceType) -> &mut u32 {
		match resource {
			ResourceType::Task => &mut self.task,
			ResourceType::Event => &mut self.event,
			ResourceType::Contact => &mut self.contact,
			ResourceType::ShoppingList => &mut self.shopping_list,
			ResourceType::Category => &mut self.category,
		}
	}
}

/// Quota owner
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
	pub user_id: Box<str>,
	pub role: Role,
	pub usage: Usage,
	pub created_at: Timestamp,
}

/// One RSVP record of a community event
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
	pub user_id: Box<str>,
	pub status: RsvpStatus,
	pub joined_at: Timestamp,
}

/// Community event with its attendee list in join order
#[skip_serializing_none]
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityEvent {
	pub event_id: Box<str>,
	/// User whose `event` quota this event counts against
	pub owner_id: Box<str>,
	pub max_attendees: Option<u32>,
	pub is_active: bool,
	pub attendees: Vec<Attendee>,
}

impl CommunityEvent {
	pub fn going_count(&self) -> u32 {
		let count = self.attendees.iter().filter(|a| a.status.is_going()).count();
		u32::try_from(count).unwrap_or(u32::MAX)
	}

	pub fn attendee(&self, user_id: &str) -> Option<&Attendee> {
		self.attendees.iter().find(|a| a.user_id.as_ref() == user_id)
	}
}

#[derive(Debug)]
pub struct CreateEventData<'a> {
	pub event_id: &'a str,
	pub owner_id: &'a str,
	pub max_attendees: Option<u32>,
	pub is_active: bool,
}

/// Outcome of a conditional attendee write
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttendeeWrite {
	/// Condition held, the change is committed
	Applied,
	/// Rejected: the write needed a free seat and the event is at capacity
	Full,
	/// Rejected: the event is not active
	Inactive,
	/// Rejected: the record is not in the expected state (already inserted,
	/// status changed or removed meanwhile). The caller re-reads and retries.
	Stale,
}

#[async_trait]
pub trait MetaAdapter: Debug + Send + Sync {
	// Users
	//*******
	/// Creates a user with all usage counters at zero
	async fn create_user(&self, user_id: &str, role: Role) -> ClResult<()>;
	async fn read_user(&self, user_id: &str) -> ClResult<User>;
	async fn update_user_role(&self, user_id: &str, role: Role) -> ClResult<()>;

	// Usage counters
	//****************
	/// Increments the counter only if its current value is below `limit`.
	///
	/// Returns `false` (and changes nothing) when the limit is already reached.
	async fn increment_usage(
		&self,
		user_id: &str,
		resource: ResourceType,
		limit: u32,
	) -> ClResult<bool>;

	/// Decrements the counter, never below zero. Returns the new value.
	async fn decrement_usage(&self, user_id: &str, resource: ResourceType) -> ClResult<u32>;

	/// Sets one counter (or all of them when `resource` is `None`) to zero
	async fn reset_usage(&self, user_id: &str, resource: Option<ResourceType>) -> ClResult<()>;

	// Community events
	//******************
	async fn create_event(&self, event: &CreateEventData<'_>) -> ClResult<()>;
	async fn read_event(&self, event_id: &str) -> ClResult<CommunityEvent>;
	async fn update_event_active(&self, event_id: &str, is_active: bool) -> ClResult<()>;
	/// Removes an event together with its attendees. `NotFound` if it does not exist.
	async fn delete_event(&self, event_id: &str) -> ClResult<()>;

	// Attendees
	//***********
	/// Inserts a new attendee record if none exists for this user.
	///
	/// When `check_capacity` is set the insert only happens if the event's
	/// `going` count is below `max_attendees`.
	async fn insert_attendee(
		&self,
		event_id: &str,
		attendee: &Attendee,
		check_capacity: bool,
	) -> ClResult<AttendeeWrite>;

	/// Compare-and-set of an attendee's status from `from` to `to`.
	///
	/// When `check_capacity` is set the update only happens if the event's
	/// `going` count is below `max_attendees`.
	async fn update_attendee_status(
		&self,
		event_id: &str,
		user_id: &str,
		from: RsvpStatus,
		to: RsvpStatus,
		check_capacity: bool,
	) -> ClResult<AttendeeWrite>;

	/// Removes an attendee record, returning the status it had
	async fn delete_attendee(&self, event_id: &str, user_id: &str) -> ClResult<Option<RsvpStatus>>;
}


// vim: ts=4
