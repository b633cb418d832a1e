//! Admin event state

use axum::{
	Json,
	extract::{Path, State},
};
use serde::Deserialize;

use crate::meta_adapter::CommunityEvent;
use crate::prelude::*;
use daybook_core::extract::Auth;
use daybook_types::types::ApiResponse;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
	pub is_active: bool,
}

/// PATCH /api/admin/events/{event_id} - Open or close an event for RSVPs
pub async fn patch_event(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(event_id): Path<String>,
	Json(req): Json<UpdateEventRequest>,
) -> ClResult<Json<ApiResponse<CommunityEvent>>> {
	app.meta_adapter.update_event_active(&event_id, req.is_active).await?;
	info!(admin = %auth.user_id, event_id = %event_id, is_active = req.is_active, "Event state changed");

	let event = app.meta_adapter.read_event(&event_id).await?;
	Ok(Json(ApiResponse::new(event)))
}

// vim: ts=4
