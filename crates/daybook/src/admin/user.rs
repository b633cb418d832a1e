//! Admin user provisioning

use axum::{
	Json,
	extract::{Path, State},
	http::StatusCode,
};
use serde::Deserialize;

use crate::meta_adapter::User;
use crate::prelude::*;
use daybook_core::extract::Auth;
use daybook_types::types::ApiResponse;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
	pub user_id: String,
	#[serde(default)]
	pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
	pub role: String,
}

/// POST /api/admin/users - Create a user with zeroed usage counters
pub async fn post_user(
	State(app): State<App>,
	Auth(auth): Auth,
	Json(req): Json<CreateUserRequest>,
) -> ClResult<(StatusCode, Json<ApiResponse<User>>)> {
	let user_id = req.user_id.trim();
	if user_id.is_empty() {
		return Err(Error::ValidationError("userId must not be empty".into()));
	}
	let role = match req.role.as_deref() {
		Some(role) => role.parse()?,
		None => Role::User,
	};

	app.meta_adapter.create_user(user_id, role).await?;
	info!(admin = %auth.user_id, user_id = %user_id, role = %role, "User created");

	let user = app.meta_adapter.read_user(user_id).await?;
	Ok((StatusCode::CREATED, Json(ApiResponse::new(user))))
}

/// PATCH /api/admin/users/{user_id} - Change the role of a user
pub async fn patch_user(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(user_id): Path<String>,
	Json(req): Json<UpdateUserRequest>,
) -> ClResult<Json<ApiResponse<User>>> {
	let role: Role = req.role.parse()?;
	app.meta_adapter.update_user_role(&user_id, role).await?;
	info!(admin = %auth.user_id, user_id = %user_id, role = %role, "User role changed");

	let user = app.meta_adapter.read_user(&user_id).await?;
	Ok(Json(ApiResponse::new(user)))
}

// vim: ts=4
