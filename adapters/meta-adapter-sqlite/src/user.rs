//! Users and their usage counters

use sqlx::{Row, SqlitePool};

use daybook_types::meta_adapter::{Usage, User};
use daybook_types::prelude::*;

use crate::utils::*;

async fn exists(db: &SqlitePool, user_id: &str) -> ClResult<bool> {
	let res = sqlx::query("SELECT 1 FROM users WHERE user_id = ?")
		.bind(user_id)
		.fetch_optional(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;
	Ok(res.is_some())
}

pub(crate) async fn create(db: &SqlitePool, user_id: &str, role: Role) -> ClResult<()> {
	let res = sqlx::query("INSERT OR IGNORE INTO users (user_id, role, created_at) VALUES (?, ?, ?)")
		.bind(user_id)
		.bind(role.as_str())
		.bind(Timestamp::now().0)
		.execute(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	if res.rows_affected() == 0 {
		return Err(Error::Conflict(format!("user {} already exists", user_id)));
	}
	Ok(())
}

pub(crate) async fn read(db: &SqlitePool, user_id: &str) -> ClResult<User> {
	let res = sqlx::query(
		"SELECT user_id, role, usage_task, usage_event, usage_contact, usage_shopping_list,
		usage_category, created_at
		FROM users WHERE user_id = ?",
	)
	.bind(user_id)
	.fetch_one(db)
	.await;

	let (user_id, role, usage, created_at) = map_res(res, |row| {
		let role: String = row.try_get("role")?;
		let usage = Usage {
			task: to_u32(row.try_get("usage_task")?),
			event: to_u32(row.try_get("usage_event")?),
			contact: to_u32(row.try_get("usage_contact")?),
			shopping_list: to_u32(row.try_get("usage_shopping_list")?),
			category: to_u32(row.try_get("usage_category")?),
		};
		Ok((
			row.try_get::<Box<str>, _>("user_id")?,
			role,
			usage,
			row.try_get("created_at").map(Timestamp)?,
		))
	})?;

	Ok(User { user_id, role: role.parse()?, usage, created_at })
}

pub(crate) async fn update_role(db: &SqlitePool, user_id: &str, role: Role) -> ClResult<()> {
	let res = sqlx::query("UPDATE users SET role = ? WHERE user_id = ?")
		.bind(role.as_str())
		.bind(user_id)
		.execute(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	if res.rows_affected() == 0 {
		return Err(Error::NotFound);
	}
	Ok(())
}

/// Increments a counter in one statement, guarded by `counter < limit`
pub(crate) async fn increment_usage(
	db: &SqlitePool,
	user_id: &str,
	resource: ResourceType,
	limit: u32,
) -> ClResult<bool> {
	let col = usage_column(resource);
	let res = sqlx::query(&format!(
		"UPDATE users SET {col} = {col} + 1 WHERE user_id = ? AND {col} < ?"
	))
	.bind(user_id)
	.bind(i64::from(limit))
	.execute(db)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	if res.rows_affected() == 1 {
		return Ok(true);
	}
	if exists(db, user_id).await? { Ok(false) } else { Err(Error::NotFound) }
}

pub(crate) async fn decrement_usage(
	db: &SqlitePool,
	user_id: &str,
	resource: ResourceType,
) -> ClResult<u32> {
	let col = usage_column(resource);
	let res = sqlx::query(&format!(
		"UPDATE users SET {col} = max({col} - 1, 0) WHERE user_id = ? RETURNING {col}"
	))
	.bind(user_id)
	.fetch_one(db)
	.await;

	map_res(res, |row| row.try_get::<i64, _>(0).map(to_u32))
}

pub(crate) async fn reset_usage(
	db: &SqlitePool,
	user_id: &str,
	resource: Option<ResourceType>,
) -> ClResult<()> {
	let set = match resource {
		Some(resource) => format!("{} = 0", usage_column(resource)),
		None => ResourceType::ALL
			.iter()
			.map(|r| format!("{} = 0", usage_column(*r)))
			.collect::<Vec<_>>()
			.join(", "),
	};
	let res = sqlx::query(&format!("UPDATE users SET {} WHERE user_id = ?", set))
		.bind(user_id)
		.execute(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	if res.rows_affected() == 0 {
		return Err(Error::NotFound);
	}
	Ok(())
}

// vim: ts=4
