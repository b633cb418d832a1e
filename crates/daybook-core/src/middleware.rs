//! Request identification middleware

use axum::{
	extract::{Request, State},
	middleware::Next,
	response::Response,
};

use crate::extract::Auth;
use crate::prelude::*;
use daybook_types::types::AuthCtx;

/// Header carrying the caller's user id, set by the fronting identity proxy
pub const USER_ID_HEADER: &str = "x-user-id";

/// Resolves the caller from the `X-User-Id` header and stores an [`Auth`]
/// in the request extensions.
///
/// A missing header or an unknown user is rejected with `Unauthorized`.
pub async fn identify_user(
	State(app): State<App>,
	mut req: Request,
	next: Next,
) -> Result<Response, Error> {
	let user_id = req
		.headers()
		.get(USER_ID_HEADER)
		.and_then(|h| h.to_str().ok())
		.map(str::trim)
		.filter(|id| !id.is_empty())
		.ok_or(Error::Unauthorized)?;

	let user = match app.meta_adapter.read_user(user_id).await {
		Ok(user) => user,
		Err(Error::NotFound) => {
			warn!(subject = %user_id, "Unknown user");
			return Err(Error::Unauthorized);
		}
		Err(err) => return Err(err),
	};

	req.extensions_mut().insert(Auth(AuthCtx { user_id: user.user_id, role: user.role }));
	Ok(next.run(req).await)
}

// vim: ts=4
