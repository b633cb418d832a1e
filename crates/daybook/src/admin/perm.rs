//! Admin permission middleware

use axum::{
	extract::{Request, State},
	middleware::Next,
	response::Response,
};

use daybook_core::extract::Auth;

use crate::prelude::*;

/// Middleware that checks if the current user has the `admin` role
pub async fn require_admin(
	State(_app): State<App>,
	Auth(auth_ctx): Auth,
	req: Request,
	next: Next,
) -> Result<Response, Error> {
	if auth_ctx.role != Role::Admin {
		warn!(
			subject = %auth_ctx.user_id,
			role = %auth_ctx.role,
			"Admin permission denied - admin role required"
		);
		return Err(Error::PermissionDenied);
	}

	Ok(next.run(req).await)
}

// vim: ts=4
