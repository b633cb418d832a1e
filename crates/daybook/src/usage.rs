//! Quota report of the calling user

use axum::{Json, extract::State};

use crate::prelude::*;
use crate::quota::UsageEntry;
use daybook_core::extract::Auth;
use daybook_types::types::ApiResponse;

/// GET /api/me/usage - Usage, limit and remaining quota per resource type
pub async fn get_usage(
	State(app): State<App>,
	Auth(auth): Auth,
) -> ClResult<Json<ApiResponse<Vec<UsageEntry>>>> {
	let report = app.quota.usage_report(&auth.user_id).await?;
	Ok(Json(ApiResponse::new(report)))
}

// vim: ts=4
