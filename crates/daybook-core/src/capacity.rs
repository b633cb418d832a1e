//! Attendee capacity of community events
//!
//! The guard plans each RSVP with [`Transition`] and hands it to the metadata
//! adapter as one conditional write. The adapter re-checks the seat count and
//! the attendee's previous status inside that write. A `Stale` answer means
//! another request touched the same record after we read it; the whole
//! operation is then re-planned from a fresh read.

use serde::Serialize;
use std::sync::Arc;

use crate::attendance::Transition;
use crate::prelude::*;
use daybook_types::meta_adapter::{Attendee, AttendeeWrite, CommunityEvent, MetaAdapter};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 8;

/// Seats left on an event. `Unlimited` when the event has no maximum.
pub fn remaining_capacity(event: &CommunityEvent) -> Limit {
	match event.max_attendees {
		None => Limit::Unlimited,
		Some(max) => Limit::Limited(max.saturating_sub(event.going_count())),
	}
}

/// Capacity summary of an event
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityInfo {
	pub max_attendees: Option<u32>,
	pub going: u32,
	pub remaining: Option<u32>,
	pub is_active: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RsvpMode {
	Join,
	Change,
}

#[derive(Debug)]
pub struct CapacityGuard {
	meta_adapter: Arc<dyn MetaAdapter>,
	max_attempts: u32,
}

impl CapacityGuard {
	pub fn new(meta_adapter: Arc<dyn MetaAdapter>) -> Self {
		Self { meta_adapter, max_attempts: DEFAULT_MAX_ATTEMPTS }
	}

	/// Total attempts of an RSVP whose write keeps losing races, before `Conflict`
	pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
		self.max_attempts = max_attempts.max(1);
		self
	}

	pub async fn capacity(&self, event_id: &str) -> ClResult<CapacityInfo> {
		let event = self.meta_adapter.read_event(event_id).await?;
		Ok(CapacityInfo {
			max_attendees: event.max_attendees,
			going: event.going_count(),
			remaining: remaining_capacity(&event).as_option(),
			is_active: event.is_active,
		})
	}

	/// First RSVP of a user. An existing record is treated as a status change.
	pub async fn try_join(
		&self,
		event_id: &str,
		user_id: &str,
		status: RsvpStatus,
	) -> ClResult<Attendee> {
		self.rsvp(event_id, user_id, status, RsvpMode::Join).await
	}

	/// Changes the status of an existing attendee.
	///
	/// Re-affirming `going` always succeeds, even on a full event.
	pub async fn change_status(
		&self,
		event_id: &str,
		user_id: &str,
		status: RsvpStatus,
	) -> ClResult<Attendee> {
		self.rsvp(event_id, user_id, status, RsvpMode::Change).await
	}

	/// Removes the attendee record. A removed `going` frees one seat.
	pub async fn leave(&self, event_id: &str, user_id: &str) -> ClResult<()> {
		match self.meta_adapter.delete_attendee(event_id, user_id).await? {
			Some(status) => {
				info!(event_id = %event_id, user_id = %user_id, status = %status, freed = status.is_going(), "attendee left");
				Ok(())
			}
			None => Err(Error::AttendeeNotFound),
		}
	}

	async fn rsvp(
		&self,
		event_id: &str,
		user_id: &str,
		status: RsvpStatus,
		mode: RsvpMode,
	) -> ClResult<Attendee> {
		for attempt in 1..=self.max_attempts {
			let event = self.meta_adapter.read_event(event_id).await?;
			if !event.is_active {
				return Err(Error::EventInactive);
			}
			let existing = event.attendee(user_id).cloned();
			let current = existing.as_ref().map(|a| a.status);
			let transition = match mode {
				RsvpMode::Join => Transition::plan(current, status),
				RsvpMode::Change => Transition::plan_change(current, status)?,
			};

			let (write, attendee) = match (transition, existing) {
				(Transition::Stay { .. }, Some(attendee)) => {
					debug!(event_id = %event_id, user_id = %user_id, status = %status, "RSVP unchanged");
					return Ok(attendee);
				}
				(Transition::Join { to }, _) => {
					let attendee =
						Attendee { user_id: user_id.into(), status: to, joined_at: Timestamp::now() };
					let write = self
						.meta_adapter
						.insert_attendee(event_id, &attendee, transition.needs_capacity())
						.await?;
					(write, attendee)
				}
				(Transition::Change { from, to }, Some(attendee)) => {
					let write = self
						.meta_adapter
						.update_attendee_status(
							event_id,
							user_id,
							from,
							to,
							transition.needs_capacity(),
						)
						.await?;
					(write, Attendee { status: to, ..attendee })
				}
				(_, None) => return Err(Error::AttendeeNotFound),
			};

			match write {
				AttendeeWrite::Applied => {
					info!(
						event_id = %event_id,
						user_id = %user_id,
						status = %attendee.status,
						freed = transition.frees_capacity(),
						"RSVP applied"
					);
					return Ok(attendee);
				}
				AttendeeWrite::Full => {
					info!(event_id = %event_id, user_id = %user_id, "event full");
					return Err(Error::EventFull);
				}
				AttendeeWrite::Inactive => return Err(Error::EventInactive),
				AttendeeWrite::Stale => {
					debug!(event_id = %event_id, user_id = %user_id, attempt = attempt, "RSVP lost a race, retrying");
				}
			}
		}

		warn!(event_id = %event_id, user_id = %user_id, "RSVP gave up after {} attempts", self.max_attempts);
		Err(Error::Conflict(format!("RSVP to {} kept conflicting", event_id)))
	}
}


// vim: ts=4
