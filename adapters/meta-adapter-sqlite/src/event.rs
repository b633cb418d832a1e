//! Community events and their attendees
//!
//! Attendee writes are single conditional statements. When a statement
//! changes no row, the current state is read back to tell the caller why.

use sqlx::{Row, SqlitePool};

use daybook_types::meta_adapter::{Attendee, AttendeeWrite, CommunityEvent, CreateEventData};
use daybook_types::prelude::*;

use crate::utils::*;

/// Condition shared by the attendee writes: the event accepts one more
/// `going` attendee, or the write does not need a seat (`?` = 0)
const HAS_SEAT: &str = "(? = 0 OR e.max_attendees IS NULL
	OR (SELECT count(*) FROM event_attendees g
		WHERE g.event_id = e.event_id AND g.status = 'going') < e.max_attendees)";

struct EventRow {
	max_attendees: Option<u32>,
	is_active: bool,
	going: u32,
}

async fn read_event_row(db: &SqlitePool, event_id: &str) -> ClResult<EventRow> {
	let res = sqlx::query(
		"SELECT e.max_attendees, e.is_active,
		(SELECT count(*) FROM event_attendees g WHERE g.event_id = e.event_id AND g.status = 'going') AS going
		FROM events e WHERE e.event_id = ?",
	)
	.bind(event_id)
	.fetch_one(db)
	.await;

	map_res(res, |row| {
		Ok(EventRow {
			max_attendees: row.try_get::<Option<i64>, _>("max_attendees")?.map(to_u32),
			is_active: row.try_get("is_active")?,
			going: to_u32(row.try_get("going")?),
		})
	})
}

async fn read_status(db: &SqlitePool, event_id: &str, user_id: &str) -> ClResult<Option<RsvpStatus>> {
	let res = sqlx::query("SELECT status FROM event_attendees WHERE event_id = ? AND user_id = ?")
		.bind(event_id)
		.bind(user_id)
		.fetch_optional(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	match res {
		Some(row) => {
			let status: String = row.try_get("status").inspect_err(inspect).map_err(|_| Error::DbError)?;
			Ok(Some(status.parse()?))
		}
		None => Ok(None),
	}
}

/// Explains a conditional write that changed nothing
fn rejected(event: &EventRow, check_capacity: bool, record_matches: bool) -> AttendeeWrite {
	if !event.is_active {
		AttendeeWrite::Inactive
	} else if !record_matches {
		AttendeeWrite::Stale
	} else if check_capacity && event.max_attendees.is_some_and(|max| event.going >= max) {
		AttendeeWrite::Full
	} else {
		// The state moved between the write and this read
		AttendeeWrite::Stale
	}
}

pub(crate) async fn create(db: &SqlitePool, event: &CreateEventData<'_>) -> ClResult<()> {
	let res = sqlx::query(
		"INSERT OR IGNORE INTO events (event_id, owner_id, max_attendees, is_active)
		VALUES (?, ?, ?, ?)",
	)
	.bind(event.event_id)
	.bind(event.owner_id)
	.bind(event.max_attendees.map(i64::from))
	.bind(event.is_active)
	.execute(db)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	if res.rows_affected() == 0 {
		return Err(Error::Conflict(format!("event {} already exists", event.event_id)));
	}
	Ok(())
}

pub(crate) async fn read(db: &SqlitePool, event_id: &str) -> ClResult<CommunityEvent> {
	// One read transaction, so the event and its attendees come from the same snapshot
	let mut tx = db.begin().await.inspect_err(inspect).map_err(|_| Error::DbError)?;

	let res =
		sqlx::query("SELECT owner_id, max_attendees, is_active FROM events WHERE event_id = ?")
			.bind(event_id)
			.fetch_one(&mut *tx)
			.await;
	let (owner_id, max_attendees, is_active) = map_res(res, |row| {
		Ok((
			row.try_get::<Box<str>, _>("owner_id")?,
			row.try_get::<Option<i64>, _>("max_attendees")?.map(to_u32),
			row.try_get::<bool, _>("is_active")?,
		))
	})?;

	let res = sqlx::query(
		"SELECT user_id, status, joined_at FROM event_attendees
		WHERE event_id = ? ORDER BY joined_at, rowid",
	)
	.bind(event_id)
	.fetch_all(&mut *tx)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;
	tx.commit().await.inspect_err(inspect).map_err(|_| Error::DbError)?;

	let rows = collect_res(res.iter().map(|row| {
		Ok((
			row.try_get::<Box<str>, _>("user_id")?,
			row.try_get::<String, _>("status")?,
			row.try_get("joined_at").map(Timestamp)?,
		))
	}))?;
	let mut attendees = Vec::with_capacity(rows.len());
	for (user_id, status, joined_at) in rows {
		attendees.push(Attendee { user_id, status: status.parse()?, joined_at });
	}

	Ok(CommunityEvent { event_id: event_id.into(), owner_id, max_attendees, is_active, attendees })
}

pub(crate) async fn update_active(db: &SqlitePool, event_id: &str, is_active: bool) -> ClResult<()> {
	let res = sqlx::query("UPDATE events SET is_active = ? WHERE event_id = ?")
		.bind(is_active)
		.bind(event_id)
		.execute(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	if res.rows_affected() == 0 {
		return Err(Error::NotFound);
	}
	Ok(())
}

pub(crate) async fn delete(db: &SqlitePool, event_id: &str) -> ClResult<()> {
	let mut tx = db.begin().await.inspect_err(inspect).map_err(|_| Error::DbError)?;

	sqlx::query("DELETE FROM event_attendees WHERE event_id = ?")
		.bind(event_id)
		.execute(&mut *tx)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;
	let res = sqlx::query("DELETE FROM events WHERE event_id = ?")
		.bind(event_id)
		.execute(&mut *tx)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	if res.rows_affected() == 0 {
		return Err(Error::NotFound);
	}
	tx.commit().await.inspect_err(inspect).map_err(|_| Error::DbError)?;
	Ok(())
}

pub(crate) async fn insert_attendee(
	db: &SqlitePool,
	event_id: &str,
	attendee: &Attendee,
	check_capacity: bool,
) -> ClResult<AttendeeWrite> {
	let res = sqlx::query(&format!(
		"INSERT INTO event_attendees (event_id, user_id, status, joined_at)
		SELECT e.event_id, ?, ?, ? FROM events e
		WHERE e.event_id = ? AND e.is_active
		AND NOT EXISTS (SELECT 1 FROM event_attendees a WHERE a.event_id = e.event_id AND a.user_id = ?)
		AND {}",
		HAS_SEAT
	))
	.bind(attendee.user_id.as_ref())
	.bind(attendee.status.as_str())
	.bind(attendee.joined_at.0)
	.bind(event_id)
	.bind(attendee.user_id.as_ref())
	.bind(check_capacity)
	.execute(db)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	if res.rows_affected() == 1 {
		return Ok(AttendeeWrite::Applied);
	}

	let event = read_event_row(db, event_id).await?;
	let current = read_status(db, event_id, &attendee.user_id).await?;
	Ok(rejected(&event, check_capacity, current.is_none()))
}

pub(crate) async fn update_attendee_status(
	db: &SqlitePool,
	event_id: &str,
	user_id: &str,
	from: RsvpStatus,
	to: RsvpStatus,
	check_capacity: bool,
) -> ClResult<AttendeeWrite> {
	let res = sqlx::query(&format!(
		"UPDATE event_attendees SET status = ?
		WHERE event_id = ? AND user_id = ? AND status = ?
		AND EXISTS (SELECT 1 FROM events e
			WHERE e.event_id = event_attendees.event_id AND e.is_active AND {})",
		HAS_SEAT
	))
	.bind(to.as_str())
	.bind(event_id)
	.bind(user_id)
	.bind(from.as_str())
	.bind(check_capacity)
	.execute(db)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	if res.rows_affected() == 1 {
		return Ok(AttendeeWrite::Applied);
	}

	let event = read_event_row(db, event_id).await?;
	let current = read_status(db, event_id, user_id).await?;
	Ok(rejected(&event, check_capacity, current == Some(from)))
}

pub(crate) async fn delete_attendee(
	db: &SqlitePool,
	event_id: &str,
	user_id: &str,
) -> ClResult<Option<RsvpStatus>> {
	let res = sqlx::query(
		"DELETE FROM event_attendees WHERE event_id = ? AND user_id = ? RETURNING status",
	)
	.bind(event_id)
	.bind(user_id)
	.fetch_optional(db)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	match res {
		Some(row) => {
			let status: String = row.try_get("status").inspect_err(inspect).map_err(|_| Error::DbError)?;
			Ok(Some(status.parse()?))
		}
		None => {
			// Distinguish an unknown event from a missing attendee
			read_event_row(db, event_id).await?;
			Ok(None)
		}
	}
}

// vim: ts=4
