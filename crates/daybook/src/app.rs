//! App builder - constructs and runs the Daybook application

use std::sync::Arc;

use crate::meta_adapter::MetaAdapter;
use crate::prelude::*;
use crate::routes;
pub use daybook_core::app::{App, AppBuilderOpts, AppState, VERSION};

pub struct AppBuilder {
	opts: AppBuilderOpts,
	meta_adapter: Option<Arc<dyn MetaAdapter>>,
}

impl AppBuilder {
	pub fn new() -> Self {
		// A subscriber may already be installed by an embedding application
		let _ = tracing_subscriber::fmt()
			.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
			.with_target(false)
			.try_init();
		AppBuilder { opts: AppBuilderOpts::default(), meta_adapter: None }
	}

	// Opts
	pub fn listen(&mut self, listen: impl Into<Box<str>>) -> &mut Self {
		self.opts.listen = listen.into();
		self
	}
	pub fn user_resource_limit(&mut self, limit: u32) -> &mut Self {
		self.opts.user_resource_limit = limit;
		self
	}
	pub fn max_rsvp_attempts(&mut self, attempts: u32) -> &mut Self {
		self.opts.max_rsvp_attempts = attempts;
		self
	}

	// Adapters
	pub fn meta_adapter(&mut self, meta_adapter: Arc<dyn MetaAdapter>) -> &mut Self {
		self.meta_adapter = Some(meta_adapter);
		self
	}

	/// Creates the shared application state without starting the listener
	pub fn build(&self) -> ClResult<App> {
		let Some(meta_adapter) = self.meta_adapter.clone() else {
			error!("FATAL: No meta adapter configured");
			return Err(Error::Internal("No meta adapter configured".to_string()));
		};
		if self.opts.user_resource_limit == 0 {
			warn!("user_resource_limit is 0, users of the `user` role cannot create anything");
		}
		Ok(Arc::new(AppState::new(self.opts.clone(), meta_adapter)))
	}

	pub async fn run(self) -> ClResult<()> {
		info!("Daybook V{}", VERSION);

		let app = self.build()?;
		info!(
			user_resource_limit = app.opts.user_resource_limit,
			max_rsvp_attempts = app.opts.max_rsvp_attempts,
			"Quota and capacity configured"
		);
		let router = routes::init(app.clone());

		let listener = tokio::net::TcpListener::bind(app.opts.listen.as_ref()).await.map_err(|e| {
			error!("FATAL: Cannot listen on {}: {}", app.opts.listen, e);
			Error::Io(e)
		})?;
		info!("Listening on HTTP {}", app.opts.listen);
		axum::serve(listener, router).await?;

		Ok(())
	}
}

impl Default for AppBuilder {
	fn default() -> Self {
		Self::new()
	}
}

// vim: ts=4
