use std::{env, path, sync::Arc};

use daybook::error::{ClResult, Error};
use daybook::meta_adapter::MetaAdapter;
use daybook::types::Role;
use daybook_meta_adapter_sqlite::MetaAdapterSqlite;
use tracing::{error, info};

pub struct Config {
	pub listen: String,
	pub db_dir: path::PathBuf,
	pub user_resource_limit: u32,
	pub admin_user: Option<String>,
}

impl Config {
	fn from_env() -> ClResult<Self> {
		let user_resource_limit = match env::var("USER_RESOURCE_LIMIT") {
			Ok(limit) => limit.parse().map_err(|_| {
				Error::ValidationError(format!("USER_RESOURCE_LIMIT is not a number: {}", limit))
			})?,
			Err(_) => daybook::policy::DEFAULT_USER_LIMIT,
		};
		Ok(Config {
			listen: env::var("LISTEN").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
			db_dir: path::PathBuf::from(env::var("DB_DIR").unwrap_or_else(|_| "./data".to_string())),
			user_resource_limit,
			admin_user: env::var("ADMIN_USER").ok().filter(|u| !u.is_empty()),
		})
	}
}

#[tokio::main]
async fn main() -> ClResult<()> {
	let mut builder = daybook::AppBuilder::new();
	let config = Config::from_env().inspect_err(|e| error!("FATAL: {}", e))?;

	let meta_adapter = Arc::new(MetaAdapterSqlite::new(&config.db_dir).await?);

	// First admin, so that the admin API can provision everyone else
	if let Some(admin_user) = &config.admin_user {
		match meta_adapter.create_user(admin_user, Role::Admin).await {
			Ok(()) => info!(user_id = %admin_user, "Admin user created"),
			Err(Error::Conflict(_)) => {}
			Err(err) => return Err(err),
		}
	}

	builder
		.listen(config.listen)
		.user_resource_limit(config.user_resource_limit)
		.meta_adapter(meta_adapter);
	builder.run().await
}

// vim: ts=4
