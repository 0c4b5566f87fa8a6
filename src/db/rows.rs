//! Shared row decoding for single-row and multi-row reads.
//!
//! Each persisted type implements [`FromRow`] once; [`query_one`] and
//! [`query_all`] are the two read entry points built on it.

use crate::libs::error::{Context, StoreResult};
use rusqlite::{params_from_iter, Connection, OptionalExtension, Params, Row};

/// Ids bound per `IN (...)` statement; SQLite caps the number of bound
/// variables per statement.
pub const IDS_PER_QUERY: usize = 500;

/// Decodes a value from the named columns of a result row.
pub trait FromRow: Sized {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// Runs `sql` and decodes the first row, if any.
pub fn query_one<T: FromRow, P: Params>(conn: &Connection, sql: &str, params: P, context: &str) -> StoreResult<Option<T>> {
    conn.query_row(sql, params, |row| T::from_row(row))
        .optional()
        .context(context)
}

/// Runs `sql` and decodes every row in result order.
pub fn query_all<T: FromRow, P: Params>(conn: &Connection, sql: &str, params: P, context: &str) -> StoreResult<Vec<T>> {
    let mut stmt = conn.prepare_cached(sql).context(context)?;
    let rows = stmt.query_map(params, |row| T::from_row(row)).context(context)?;
    rows.collect::<rusqlite::Result<Vec<T>>>().context(context)
}

/// `?, ?, ?` placeholder list for an `IN (...)` clause.
fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

/// Runs `{select} (?, ...) {tail}` once per chunk of [`IDS_PER_QUERY`] ids
/// and concatenates the rows. Ordering from `tail` holds within a chunk only.
pub fn query_all_by_ids<T: FromRow>(
    conn: &Connection,
    select: &str,
    tail: &str,
    ids: &[i64],
    context: &str,
) -> StoreResult<Vec<T>> {
    let mut rows = Vec::new();
    for chunk in ids.chunks(IDS_PER_QUERY) {
        let sql = format!("{select} ({}) {tail}", placeholders(chunk.len()));
        rows.extend(query_all::<T, _>(conn, &sql, params_from_iter(chunk.iter()), context)?);
    }
    Ok(rows)
}
