//! RSVP handlers

use axum::{
	Json,
	extract::{Path, State},
	http::StatusCode,
};
use serde::Deserialize;

use crate::meta_adapter::Attendee;
use crate::prelude::*;
use daybook_core::extract::Auth;
use daybook_types::types::ApiResponse;

#[derive(Debug, Default, Deserialize)]
pub struct RsvpRequest {
	/// `going`, `maybe` or `not-going`
	pub status: Option<String>,
}

impl RsvpRequest {
	fn status(&self) -> ClResult<RsvpStatus> {
		match &self.status {
			Some(status) => status.parse(),
			None => Ok(RsvpStatus::default()),
		}
	}
}

/// PUT /api/events/{event_id}/rsvp - RSVP to an event, status defaults to `going`
pub async fn put_rsvp(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(event_id): Path<String>,
	req: Option<Json<RsvpRequest>>,
) -> ClResult<Json<ApiResponse<Attendee>>> {
	let status = req.map(|Json(req)| req).unwrap_or_default().status()?;
	let attendee = app.capacity.try_join(&event_id, &auth.user_id, status).await?;
	Ok(Json(ApiResponse::new(attendee)))
}

/// PATCH /api/events/{event_id}/rsvp - Change the status of an existing RSVP
pub async fn patch_rsvp(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(event_id): Path<String>,
	Json(req): Json<RsvpRequest>,
) -> ClResult<Json<ApiResponse<Attendee>>> {
	let Some(status) = req.status.as_deref() else {
		return Err(Error::ValidationError("status is required".into()));
	};
	let attendee = app.capacity.change_status(&event_id, &auth.user_id, status.parse()?).await?;
	Ok(Json(ApiResponse::new(attendee)))
}

/// DELETE /api/events/{event_id}/rsvp - Withdraw the RSVP
pub async fn delete_rsvp(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(event_id): Path<String>,
) -> ClResult<StatusCode> {
	app.capacity.leave(&event_id, &auth.user_id).await?;
	Ok(StatusCode::NO_CONTENT)
}

// vim: ts=4
