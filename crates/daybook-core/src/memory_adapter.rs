//! In-memory metadata adapter
//!
//! Keeps users and events in maps of per-key mutexes. Each conditional write
//! holds the lock of exactly one user or one event for its whole
//! read-modify-write, so operations on the same key are linearizable while
//! different keys never contend beyond the short map lookup.

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::{collections::HashMap, sync::Arc};

use crate::prelude::*;
use daybook_types::meta_adapter::{
	Attendee, AttendeeWrite, CommunityEvent, CreateEventData, MetaAdapter, Usage, User,
};

#[derive(Debug)]
struct EventRecord {
	owner_id: Box<str>,
	max_attendees: Option<u32>,
	is_active: bool,
	attendees: Vec<Attendee>,
}

impl EventRecord {
	fn has_free_seat(&self) -> bool {
		match self.max_attendees {
			None => true,
			Some(max) => {
				let going = self.attendees.iter().filter(|a| a.status.is_going()).count();
				going < max as usize
			}
		}
	}
}

#[derive(Debug, Default)]
pub struct MetaAdapterMemory {
	users: RwLock<HashMap<Box<str>, Arc<Mutex<User>>>>,
	events: RwLock<HashMap<Box<str>, Arc<Mutex<EventRecord>>>>,
}

impl MetaAdapterMemory {
	pub fn new() -> Self {
		Self::default()
	}

	fn user(&self, user_id: &str) -> ClResult<Arc<Mutex<User>>> {
		self.users.read().get(user_id).cloned().ok_or(Error::NotFound)
	}

	fn event(&self, event_id: &str) -> ClResult<Arc<Mutex<EventRecord>>> {
		self.events.read().get(event_id).cloned().ok_or(Error::NotFound)
	}
}

#[async_trait]
impl MetaAdapter for MetaAdapterMemory {
	async fn create_user(&self, user_id: &str, role: Role) -> ClResult<()> {
		let mut users = self.users.write();
		if users.contains_key(user_id) {
			return Err(Error::Conflict(format!("user {} already exists", user_id)));
		}
		let user = User {
			user_id: user_id.into(),
			role,
			usage: Usage::default(),
			created_at: Timestamp::now(),
		};
		users.insert(user_id.into(), Arc::new(Mutex::new(user)));
		Ok(())
	}

	async fn read_user(&self, user_id: &str) -> ClResult<User> {
		Ok(self.user(user_id)?.lock().clone())
	}

	async fn update_user_role(&self, user_id: &str, role: Role) -> ClResult<()> {
		self.user(user_id)?.lock().role = role;
		Ok(())
	}

	async fn increment_usage(
		&self,
		user_id: &str,
		resource: ResourceType,
		limit: u32,
	) -> ClResult<bool> {
		let user = self.user(user_id)?;
		let mut user = user.lock();
		let counter = user.usage.get_mut(resource);
		if *counter >= limit {
			return Ok(false);
		}
		*counter += 1;
		Ok(true)
	}

	async fn decrement_usage(&self, user_id: &str, resource: ResourceType) -> ClResult<u32> {
		let user = self.user(user_id)?;
		let mut user = user.lock();
		let counter = user.usage.get_mut(resource);
		*counter = counter.saturating_sub(1);
		Ok(*counter)
	}

	async fn reset_usage(&self, user_id: &str, resource: Option<ResourceType>) -> ClResult<()> {
		let user = self.user(user_id)?;
		let mut user = user.lock();
		match resource {
			Some(resource) => *user.usage.get_mut(resource) = 0,
			None => user.usage = Usage::default(),
		}
		Ok(())
	}

	async fn create_event(&self, event: &CreateEventData<'_>) -> ClResult<()> {
		let mut events = self.events.write();
		if events.contains_key(event.event_id) {
			return Err(Error::Conflict(format!("event {} already exists", event.event_id)));
		}
		let record = EventRecord {
			owner_id: event.owner_id.into(),
			max_attendees: event.max_attendees,
			is_active: event.is_active,
			attendees: Vec::new(),
		};
		events.insert(event.event_id.into(), Arc::new(Mutex::new(record)));
		Ok(())
	}

	async fn read_event(&self, event_id: &str) -> ClResult<CommunityEvent> {
		let event = self.event(event_id)?;
		let event = event.lock();
		Ok(CommunityEvent {
			event_id: event_id.into(),
			owner_id: event.owner_id.clone(),
			max_attendees: event.max_attendees,
			is_active: event.is_active,
			attendees: event.attendees.clone(),
		})
	}

	async fn update_event_active(&self, event_id: &str, is_active: bool) -> ClResult<()> {
		self.event(event_id)?.lock().is_active = is_active;
		Ok(())
	}

	async fn delete_event(&self, event_id: &str) -> ClResult<()> {
		self.events.write().remove(event_id).map(|_| ()).ok_or(Error::NotFound)
	}

	async fn insert_attendee(
		&self,
		event_id: &str,
		attendee: &Attendee,
		check_capacity: bool,
	) -> ClResult<AttendeeWrite> {
		let event = self.event(event_id)?;
		let mut event = event.lock();
		if !event.is_active {
			return Ok(AttendeeWrite::Inactive);
		}
		if event.attendees.iter().any(|a| a.user_id == attendee.user_id) {
			return Ok(AttendeeWrite::Stale);
		}
		if check_capacity && !event.has_free_seat() {
			return Ok(AttendeeWrite::Full);
		}
		event.attendees.push(attendee.clone());
		Ok(AttendeeWrite::Applied)
	}

	async fn update_attendee_status(
		&self,
		event_id: &str,
		user_id: &str,
		from: RsvpStatus,
		to: RsvpStatus,
		check_capacity: bool,
	) -> ClResult<AttendeeWrite> {
		let event = self.event(event_id)?;
		let mut event = event.lock();
		if !event.is_active {
			return Ok(AttendeeWrite::Inactive);
		}
		let has_free_seat = event.has_free_seat();
		let Some(attendee) = event.attendees.iter_mut().find(|a| a.user_id.as_ref() == user_id)
		else {
			return Ok(AttendeeWrite::Stale);
		};
		if attendee.status != from {
			return Ok(AttendeeWrite::Stale);
		}
		if check_capacity && !has_free_seat {
			return Ok(AttendeeWrite::Full);
		}
		attendee.status = to;
		Ok(AttendeeWrite::Applied)
	}

	async fn delete_attendee(&self, event_id: &str, user_id: &str) -> ClResult<Option<RsvpStatus>> {
		let event = self.event(event_id)?;
		let mut event = event.lock();
		let Some(pos) = event.attendees.iter().position(|a| a.user_id.as_ref() == user_id) else {
			return Ok(None);
		};
		Ok(Some(event.attendees.remove(pos).status))
	}
}


// vim: ts=4
