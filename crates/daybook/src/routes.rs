//! API routes

use axum::{
	Router, middleware,
	routing::{get, patch, post, put},
};
use tower_http::trace::TraceLayer;

use crate::prelude::*;
use crate::{admin, event, rsvp, usage};
use daybook_core::middleware::identify_user;

fn init_admin(app: App) -> Router<App> {
	Router::new()
		.route("/api/admin/users", post(admin::user::post_user))
		.route("/api/admin/users/{user_id}", patch(admin::user::patch_user))
		.route("/api/admin/users/{user_id}/usage", get(admin::usage::get_user_usage))
		.route("/api/admin/users/{user_id}/usage/reset", post(admin::usage::post_reset_usage))
		.route("/api/admin/events/{event_id}", patch(admin::event::patch_event))
		.route_layer(middleware::from_fn_with_state(app, admin::perm::require_admin))
}

fn init_api() -> Router<App> {
	Router::new()
		.route("/api/me/usage", get(usage::get_usage))
		.route("/api/events", post(event::post_event))
		.route("/api/events/{event_id}", get(event::get_event).delete(event::delete_event))
		.route("/api/events/{event_id}/capacity", get(event::get_capacity))
		.route("/api/events/{event_id}/attendees", get(event::get_attendees))
		.route(
			"/api/events/{event_id}/rsvp",
			put(rsvp::put_rsvp).patch(rsvp::patch_rsvp).delete(rsvp::delete_rsvp),
		)
}

pub fn init(app: App) -> Router {
	Router::new()
		.merge(init_admin(app.clone()))
		.merge(init_api())
		.route_layer(middleware::from_fn_with_state(app.clone(), identify_user))
		.route("/api/health", get(async || "ok\n"))
		.layer(TraceLayer::new_for_http())
		.with_state(app)
}

// vim: ts=4
