//! Admin usage endpoints

use axum::{
	Json,
	extract::{Path, State},
};
use serde::Deserialize;

use crate::prelude::*;
use crate::quota::UsageEntry;
use daybook_core::extract::Auth;
use daybook_types::types::ApiResponse;

/// Request body of a usage reset
#[derive(Debug, Deserialize)]
pub struct ResetUsageRequest {
	/// Resource type name (singular or plural) or `all`
	pub resource: String,
}

/// GET /api/admin/users/{user_id}/usage
pub async fn get_user_usage(
	State(app): State<App>,
	Path(user_id): Path<String>,
) -> ClResult<Json<ApiResponse<Vec<UsageEntry>>>> {
	let report = app.quota.usage_report(&user_id).await?;
	Ok(Json(ApiResponse::new(report)))
}

/// POST /api/admin/users/{user_id}/usage/reset - Set usage counters to zero
pub async fn post_reset_usage(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(user_id): Path<String>,
	Json(req): Json<ResetUsageRequest>,
) -> ClResult<Json<ApiResponse<Vec<UsageEntry>>>> {
	let resource = match req.resource.as_str() {
		"all" => None,
		name => Some(name.parse::<ResourceType>()?),
	};

	info!(admin = %auth.user_id, user_id = %user_id, resource = %req.resource, "Resetting usage");
	app.quota.reset_usage(&user_id, resource).await?;

	let report = app.quota.usage_report(&user_id).await?;
	Ok(Json(ApiResponse::new(report)))
}

// vim: ts=4
