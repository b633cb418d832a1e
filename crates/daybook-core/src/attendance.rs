//! RSVP status transitions for a single (event, user) pair
//!
//! Every state (`going`, `maybe`, `not-going`) is reachable from every other
//! and there is no terminal state. The transition decides whether the event's
//! capacity has to be consulted; only a move into `going` from outside
//! `going` takes a seat.

use crate::prelude::*;

/// Planned change of an attendee record
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
	/// No record yet, a new one is created with status `to`
	Join { to: RsvpStatus },
	/// The requested status equals the current one, nothing to write
	Stay { status: RsvpStatus },
	/// The existing record moves from `from` to `to`
	Change { from: RsvpStatus, to: RsvpStatus },
}

impl Transition {
	/// Plans the transition for a first RSVP or a repeated one.
	pub fn plan(current: Option<RsvpStatus>, requested: RsvpStatus) -> Transition {
		match current {
			None => Transition::Join { to: requested },
			Some(from) if from == requested => Transition::Stay { status: from },
			Some(from) => Transition::Change { from, to: requested },
		}
	}

	/// Plans a status change of an existing record.
	pub fn plan_change(current: Option<RsvpStatus>, requested: RsvpStatus) -> ClResult<Transition> {
		match current {
			None => Err(Error::AttendeeNotFound),
			Some(_) => Ok(Transition::plan(current, requested)),
		}
	}

	/// Status of the record after the transition
	pub fn target(&self) -> RsvpStatus {
		match self {
			Transition::Join { to } | Transition::Change { to, .. } => *to,
			Transition::Stay { status } => *status,
		}
	}

	/// True if the transition takes a seat and must pass the capacity check
	pub fn needs_capacity(&self) -> bool {
		match self {
			Transition::Join { to } => to.is_going(),
			Transition::Change { from, to } => to.is_going() && !from.is_going(),
			Transition::Stay { .. } => false,
		}
	}

	/// True if the transition gives a seat back
	pub fn frees_capacity(&self) -> bool {
		matches!(self, Transition::Change { from: RsvpStatus::Going, to } if !to.is_going())
	}
}


// vim: ts=4
