//! Community event handlers

use axum::{
	Json,
	extract::{Path, State},
	http::StatusCode,
};
use serde::Deserialize;

use crate::capacity::CapacityInfo;
use crate::meta_adapter::{Attendee, CommunityEvent, CreateEventData};
use crate::prelude::*;
use daybook_core::extract::Auth;
use daybook_types::types::ApiResponse;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
	pub event_id: String,
	pub max_attendees: Option<u32>,
	#[serde(default = "default_active")]
	pub is_active: bool,
}

fn default_active() -> bool {
	true
}

/// POST /api/events - Create a community event, counted against the `event` quota
pub async fn post_event(
	State(app): State<App>,
	Auth(auth): Auth,
	Json(req): Json<CreateEventRequest>,
) -> ClResult<(StatusCode, Json<ApiResponse<CommunityEvent>>)> {
	if req.event_id.trim().is_empty() {
		return Err(Error::ValidationError("eventId must not be empty".into()));
	}
	if req.max_attendees == Some(0) {
		return Err(Error::ValidationError("maxAttendees must be positive".into()));
	}

	let data = CreateEventData {
		event_id: &req.event_id,
		owner_id: &auth.user_id,
		max_attendees: req.max_attendees,
		is_active: req.is_active,
	};
	app.quota
		.create_owned(&auth.user_id, ResourceType::Event, || app.meta_adapter.create_event(&data))
		.await?;
	info!(user_id = %auth.user_id, event_id = %req.event_id, max_attendees = ?req.max_attendees, "event created");

	let event = app.meta_adapter.read_event(&req.event_id).await?;
	Ok((StatusCode::CREATED, Json(ApiResponse::new(event))))
}

/// DELETE /api/events/{event_id} - Delete an event and give its unit back to the owner
pub async fn delete_event(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(event_id): Path<String>,
) -> ClResult<StatusCode> {
	let event = app.meta_adapter.read_event(&event_id).await?;
	if event.owner_id != auth.user_id && auth.role != Role::Admin {
		warn!(user_id = %auth.user_id, event_id = %event_id, owner_id = %event.owner_id, "event delete denied");
		return Err(Error::PermissionDenied);
	}

	app.quota
		.delete_owned(&event.owner_id, ResourceType::Event, || app.meta_adapter.delete_event(&event_id))
		.await?;
	info!(user_id = %auth.user_id, event_id = %event_id, owner_id = %event.owner_id, "event deleted");
	Ok(StatusCode::NO_CONTENT)
}

/// GET /api/events/{event_id}
pub async fn get_event(
	State(app): State<App>,
	Path(event_id): Path<String>,
) -> ClResult<Json<ApiResponse<CommunityEvent>>> {
	let event = app.meta_adapter.read_event(&event_id).await?;
	Ok(Json(ApiResponse::new(event)))
}

/// GET /api/events/{event_id}/capacity
pub async fn get_capacity(
	State(app): State<App>,
	Path(event_id): Path<String>,
) -> ClResult<Json<ApiResponse<CapacityInfo>>> {
	let info = app.capacity.capacity(&event_id).await?;
	Ok(Json(ApiResponse::new(info)))
}

/// GET /api/events/{event_id}/attendees - Attendees in join order
pub async fn get_attendees(
	State(app): State<App>,
	Path(event_id): Path<String>,
) -> ClResult<Json<ApiResponse<Vec<Attendee>>>> {
	let event = app.meta_adapter.read_event(&event_id).await?;
	Ok(Json(ApiResponse::new(event.attendees)))
}

// vim: ts=4
