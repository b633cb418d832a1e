//! SQLite implementation of the Daybook metadata adapter
//!
//! SQLite serializes writers, so every guarded change is written as one
//! conditional statement and needs no application-level lock.

#![forbid(unsafe_code)]

use async_trait::async_trait;
use sqlx::sqlite::{self, SqlitePool};
use std::path::Path;

use daybook_types::meta_adapter::{
	self, Attendee, AttendeeWrite, CommunityEvent, CreateEventData, User,
};
use daybook_types::prelude::*;

mod event;
mod schema;
mod user;
mod utils;

use crate::schema::init_db;

#[derive(Debug)]
pub struct MetaAdapterSqlite {
	db: SqlitePool,
}

impl MetaAdapterSqlite {
	/// Opens (or creates) `meta.db` inside the directory `path`
	pub async fn new(path: impl AsRef<Path>) -> ClResult<Self> {
		tokio::fs::create_dir_all(path.as_ref()).await?;
		let opts = sqlite::SqliteConnectOptions::new()
			.filename(path.as_ref().join("meta.db"))
			.create_if_missing(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(opts)
			.await
			.inspect_err(|err| error!("DbError: {:#?}", err))
			.or(Err(Error::DbError))?;

		init_db(&db)
			.await
			.inspect_err(|err| error!("DbError: {:#?}", err))
			.or(Err(Error::DbError))?;

		Ok(Self { db })
	}
}

#[async_trait]
impl meta_adapter::MetaAdapter for MetaAdapterSqlite {
	// Users
	//*******
	async fn create_user(&self, user_id: &str, role: Role) -> ClResult<()> {
		user::create(&self.db, user_id, role).await
	}

	async fn read_user(&self, user_id: &str) -> ClResult<User> {
		user::read(&self.db, user_id).await
	}

	async fn update_user_role(&self, user_id: &str, role: Role) -> ClResult<()> {
		user::update_role(&self.db, user_id, role).await
	}

	// Usage counters
	//****************
	async fn increment_usage(
		&self,
		user_id: &str,
		resource: ResourceType,
		limit: u32,
	) -> ClResult<bool> {
		user::increment_usage(&self.db, user_id, resource, limit).await
	}

	async fn decrement_usage(&self, user_id: &str, resource: ResourceType) -> ClResult<u32> {
		user::decrement_usage(&self.db, user_id, resource).await
	}

	async fn reset_usage(&self, user_id: &str, resource: Option<ResourceType>) -> ClResult<()> {
		user::reset_usage(&self.db, user_id, resource).await
	}

	// Community events
	//******************
	async fn create_event(&self, event: &CreateEventData<'_>) -> ClResult<()> {
		event::create(&self.db, event).await
	}

	async fn read_event(&self, event_id: &str) -> ClResult<CommunityEvent> {
		event::read(&self.db, event_id).await
	}

	async fn update_event_active(&self, event_id: &str, is_active: bool) -> ClResult<()> {
		event::update_active(&self.db, event_id, is_active).await
	}

	async fn delete_event(&self, event_id: &str) -> ClResult<()> {
		event::delete(&self.db, event_id).await
	}

	// Attendees
	//***********
	async fn insert_attendee(
		&self,
		event_id: &str,
		attendee: &Attendee,
		check_capacity: bool,
	) -> ClResult<AttendeeWrite> {
		event::insert_attendee(&self.db, event_id, attendee, check_capacity).await
	}

	async fn update_attendee_status(
		&self,
		event_id: &str,
		user_id: &str,
		from: RsvpStatus,
		to: RsvpStatus,
		check_capacity: bool,
	) -> ClResult<AttendeeWrite> {
		event::update_attendee_status(&self.db, event_id, user_id, from, to, check_capacity).await
	}

	async fn delete_attendee(&self, event_id: &str, user_id: &str) -> ClResult<Option<RsvpStatus>> {
		event::delete_attendee(&self.db, event_id, user_id).await
	}
}

// vim: ts=4
