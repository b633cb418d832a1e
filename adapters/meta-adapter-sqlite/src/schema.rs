//! Database schema initialization

use sqlx::SqlitePool;

/// Initialize the database schema with all required tables and indexes
pub(crate) async fn init_db(db: &SqlitePool) -> Result<(), sqlx::Error> {
	let mut tx = db.begin().await?;

	/***********/
	/* Init DB */
	/***********/

	// Users
	//*******
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS users (
		user_id text NOT NULL,
		role text NOT NULL,
		usage_task integer NOT NULL DEFAULT 0,
		usage_event integer NOT NULL DEFAULT 0,
		usage_contact integer NOT NULL DEFAULT 0,
		usage_shopping_list integer NOT NULL DEFAULT 0,
		usage_category integer NOT NULL DEFAULT 0,
		created_at datetime DEFAULT (unixepoch()),
		PRIMARY KEY(user_id)
	)",
	)
	.execute(&mut *tx)
	.await?;

	// Community events
	//******************
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS events (
		event_id text NOT NULL,
		owner_id text NOT NULL,
		max_attendees integer,
		is_active boolean NOT NULL DEFAULT 1,
		created_at datetime DEFAULT (unixepoch()),
		PRIMARY KEY(event_id)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE INDEX IF NOT EXISTS idx_events_owner ON events(owner_id)")
		.execute(&mut *tx)
		.await?;

	sqlx::query(
		"CREATE TABLE IF NOT EXISTS event_attendees (
		event_id text NOT NULL,
		user_id text NOT NULL,
		status text NOT NULL,
		joined_at datetime NOT NULL,
		PRIMARY KEY(event_id, user_id)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query(
		"CREATE INDEX IF NOT EXISTS idx_event_attendees_status ON event_attendees(event_id, status)",
	)
	.execute(&mut *tx)
	.await?;

	tx.commit().await?;

	Ok(())
}

// vim: ts=4
