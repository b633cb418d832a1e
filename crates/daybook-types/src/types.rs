//! Common types used throughout Daybook.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, time::SystemTime};

use crate::error::Error;

// Timestamp //
//***********//
/// Unix timestamp in seconds
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
	pub fn now() -> Timestamp {
		let res = SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).unwrap_or_default();
		#[allow(clippy::cast_possible_wrap)]
		Timestamp(res.as_secs() as i64)
	}
}

impl fmt::Display for Timestamp {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

// Role //
//******//
/// Account role. Decides which resource limits apply to a user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	User,
	Premium,
	Admin,
}

impl Role {
	pub fn as_str(&self) -> &'static str {
		match self {
			Role::User => "user",
			Role::Premium => "premium",
			Role::Admin => "admin",
		}
	}
}

impl FromStr for Role {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"user" => Ok(Role::User),
			"premium" => Ok(Role::Premium),
			"admin" => Ok(Role::Admin),
			_ => Err(Error::ValidationError(format!("unknown role: {}", s))),
		}
	}
}

impl fmt::Display for Role {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

// ResourceType //
//**************//
/// Kinds of owned resources that count against a user's quota
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceType {
	Task,
	Event,
	Contact,
	ShoppingList,
	Category,
}

impl ResourceType {
	pub const ALL: [ResourceType; 5] = [
		ResourceType::Task,
		ResourceType::Event,
		ResourceType::Contact,
		ResourceType::ShoppingList,
		ResourceType::Category,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			ResourceType::Task => "task",
			ResourceType::Event => "event",
			ResourceType::Contact => "contact",
			ResourceType::ShoppingList => "shoppingList",
			ResourceType::Category => "category",
		}
	}
}

/// Accepts both the singular and the plural form (`task` / `tasks`).
impl FromStr for ResourceType {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"task" | "tasks" => Ok(ResourceType::Task),
			"event" | "events" => Ok(ResourceType::Event),
			"contact" | "contacts" => Ok(ResourceType::Contact),
			"shoppingList" | "shoppingLists" => Ok(ResourceType::ShoppingList),
			"category" | "categories" => Ok(ResourceType::Category),
			_ => Err(Error::InvalidResourceType(s.into())),
		}
	}
}

impl fmt::Display for ResourceType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

// Limit //
//*******//
/// Per-resource limit granted by a role
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Limit {
	Limited(u32),
	Unlimited,
}

impl Limit {
	pub fn is_unlimited(&self) -> bool {
		matches!(self, Limit::Unlimited)
	}

	/// `None` means unlimited
	pub fn as_option(&self) -> Option<u32> {
		match self {
			Limit::Limited(n) => Some(*n),
			Limit::Unlimited => None,
		}
	}
}

// RsvpStatus //
//************//
/// Attendance status of a user on a community event
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RsvpStatus {
	#[default]
	Going,
	Maybe,
	NotGoing,
}

impl RsvpStatus {
	pub fn as_str(&self) -> &'static str {
		match self {
			RsvpStatus::Going => "going",
			RsvpStatus::Maybe => "maybe",
			RsvpStatus::NotGoing => "not-going",
		}
	}

	pub fn is_going(&self) -> bool {
		matches!(self, RsvpStatus::Going)
	}
}

impl FromStr for RsvpStatus {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"going" => Ok(RsvpStatus::Going),
			"maybe" => Ok(RsvpStatus::Maybe),
			"not-going" => Ok(RsvpStatus::NotGoing),
			_ => Err(Error::InvalidStatusTransition(format!("unknown RSVP status: {}", s))),
		}
	}
}

impl fmt::Display for RsvpStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

// AuthCtx //
//*********//
/// Context struct for an identified user, attached to requests by middleware
#[derive(Clone, Debug)]
pub struct AuthCtx {
	pub user_id: Box<str>,
	pub role: Role,
}

// ApiResponse //
//*************//
/// Standard response envelope
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
	pub data: T,
	pub time: Timestamp,
}

impl<T> ApiResponse<T> {
	pub fn new(data: T) -> Self {
		Self { data, time: Timestamp::now() }
	}
}


// vim: ts=4
