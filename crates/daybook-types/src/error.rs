//! Error type shared by the core, the adapters and the HTTP layer

use axum::{Json, http::StatusCode, response::IntoResponse};

use crate::types::ResourceType;

pub type ClResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	// Quota and attendance outcomes
	QuotaExceeded { resource: ResourceType, limit: u32 },
	EventFull,
	EventInactive,
	AttendeeNotFound,
	InvalidResourceType(String),
	InvalidStatusTransition(String),

	// Generic
	NotFound,
	PermissionDenied,
	Unauthorized,
	ValidationError(String),
	/// A conditional write lost a race and the whole operation should be re-attempted
	Conflict(String),
	DbError,
	Internal(String),

	// externals
	Io(std::io::Error),
}

impl Error {
	/// Stable machine-readable error code used in API responses
	pub fn code(&self) -> &'static str {
		match self {
			Error::QuotaExceeded { .. } => "E-QUOTA-EXCEEDED",
			Error::EventFull => "E-EVENT-FULL",
			Error::EventInactive => "E-EVENT-INACTIVE",
			Error::AttendeeNotFound => "E-ATTENDEE-NOTFOUND",
			Error::InvalidResourceType(_) => "E-INVALID-RESOURCE",
			Error::InvalidStatusTransition(_) => "E-INVALID-STATUS",
			Error::NotFound => "E-CORE-NOTFOUND",
			Error::PermissionDenied => "E-AUTH-NOPERM",
			Error::Unauthorized => "E-AUTH-UNAUTH",
			Error::ValidationError(_) => "E-VALIDATION",
			Error::Conflict(_) => "E-CORE-CONFLICT",
			Error::DbError => "E-CORE-DBERR",
			Error::Internal(_) | Error::Io(_) => "E-INTERNAL",
		}
	}

	fn status(&self) -> StatusCode {
		match self {
			Error::QuotaExceeded { .. } | Error::PermissionDenied => StatusCode::FORBIDDEN,
			Error::EventFull | Error::Conflict(_) => StatusCode::CONFLICT,
			Error::EventInactive => StatusCode::GONE,
			Error::AttendeeNotFound | Error::NotFound => StatusCode::NOT_FOUND,
			Error::InvalidResourceType(_)
			| Error::InvalidStatusTransition(_)
			| Error::ValidationError(_) => StatusCode::BAD_REQUEST,
			Error::Unauthorized => StatusCode::UNAUTHORIZED,
			Error::DbError | Error::Internal(_) | Error::Io(_) => {
				StatusCode::INTERNAL_SERVER_ERROR
			}
		}
	}

	/// Message safe to show to API clients
	fn public_message(&self) -> String {
		match self {
			Error::QuotaExceeded { resource, limit } => {
				format!("Limit reached: you can own at most {} items of type '{}'", limit, resource)
			}
			Error::EventFull => "This event has reached its maximum number of attendees".into(),
			Error::EventInactive => "This event is no longer accepting RSVPs".into(),
			Error::AttendeeNotFound => "You have not RSVPed to this event".into(),
			Error::InvalidResourceType(name) => format!("Invalid resource type: {}", name),
			Error::InvalidStatusTransition(msg) | Error::ValidationError(msg) => msg.clone(),
			Error::NotFound => "Not found".into(),
			Error::PermissionDenied => "Permission denied".into(),
			Error::Unauthorized => "Unauthorized".into(),
			Error::Conflict(_) => "Concurrent modification, please retry".into(),
			Error::DbError | Error::Internal(_) | Error::Io(_) => "Internal server error".into(),
		}
	}
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Error::QuotaExceeded { resource, limit } => {
				write!(f, "quota exceeded for {} (limit {})", resource, limit)
			}
			Error::InvalidResourceType(name) => write!(f, "invalid resource type: {}", name),
			Error::InvalidStatusTransition(msg) => write!(f, "invalid status transition: {}", msg),
			Error::ValidationError(msg) => write!(f, "validation error: {}", msg),
			Error::Conflict(msg) => write!(f, "conflict: {}", msg),
			Error::Internal(msg) => write!(f, "internal error: {}", msg),
			Error::Io(err) => write!(f, "io error: {}", err),
			_ => write!(f, "{:?}", self),
		}
	}
}

impl std::error::Error for Error {}

impl IntoResponse for Error {
	fn into_response(self) -> axum::response::Response {
		let status = self.status();
		if status.is_server_error() {
			tracing::error!(error = %self, "request failed");
		}
		let mut details = serde_json::Map::new();
		if let Error::QuotaExceeded { resource, limit } = &self {
			details.insert("resource".into(), resource.as_str().into());
			details.insert("limit".into(), (*limit).into());
		}
		let body = serde_json::json!({
			"error": {
				"code": self.code(),
				"message": self.public_message(),
				"details": details,
			}
		});
		(status, Json(body)).into_response()
	}
}


// vim: ts=4
