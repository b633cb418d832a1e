//! Shared utilities for SQLite adapter
//!
//! Error mapping helpers and column names used across the domain modules.

use daybook_types::prelude::*;
use sqlx::sqlite::SqliteRow;

/// Usage counter column of a resource type
pub(crate) fn usage_column(resource: ResourceType) -> &'static str {
	match resource {
		ResourceType::Task => "usage_task",
		ResourceType::Event => "usage_event",
		ResourceType::Contact => "usage_contact",
		ResourceType::ShoppingList => "usage_shopping_list",
		ResourceType::Category => "usage_category",
	}
}

/// Converts a stored counter, clamping values that do not fit
pub(crate) fn to_u32(value: i64) -> u32 {
	u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

/// Log database error for debugging
pub(crate) fn inspect(err: &sqlx::Error) {
	warn!("DB: {:#?}", err);
}

/// Map a single-row query result, translating SQL errors to ClResult
pub(crate) fn map_res<T, F>(row: Result<SqliteRow, sqlx::Error>, f: F) -> ClResult<T>
where
	F: FnOnce(SqliteRow) -> Result<T, sqlx::Error>,
{
	match row {
		Ok(row) => f(row).inspect_err(inspect).map_err(|_| Error::DbError),
		Err(sqlx::Error::RowNotFound) => Err(Error::NotFound),
		Err(err) => {
			inspect(&err);
			Err(Error::DbError)
		}
	}
}

/// Collect an iterator of query results, translating errors
pub(crate) fn collect_res<T>(
	iter: impl Iterator<Item = Result<T, sqlx::Error>> + Unpin,
) -> ClResult<Vec<T>> {
	let mut items = Vec::new();
	for item in iter {
		items.push(item.inspect_err(inspect).map_err(|_| Error::DbError)?);
	}
	Ok(items)
}


// vim: ts=4
