//! Work log repository: the append-only ledger in the `work_logs` table.
//!
//! Only `append` writes. There is no update or delete; the table's triggers
//! reject both.

use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};

use super::DatabaseError;
use crate::model::{NewWorkLogEntry, WorkLogEntry};

/// Fixed-width RFC 3339 so that text order matches time order.
fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
}

fn entry_from_row(row: &Row<'_>) -> Result<WorkLogEntry, rusqlite::Error> {
    let raw: String = row.get("timestamp")?;
    let timestamp = parse_timestamp(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;

    Ok(WorkLogEntry {
        id: row.get("id")?,
        order_id: row.get("order_id")?,
        station_id: row.get("station_id")?,
        worker_username: row.get("worker_username")?,
        action: row.get("action")?,
        timestamp,
    })
}

/// Latest timestamp already recorded for `order_id`.
fn last_timestamp(conn: &Connection, order_id: i64) -> Result<Option<DateTime<Utc>>, DatabaseError> {
    let raw: Option<String> = conn.query_row(
        "SELECT MAX(timestamp) FROM work_logs WHERE order_id = ?1",
        params![order_id],
        |r| r.get(0),
    )?;
    match raw {
        Some(s) => match parse_timestamp(&s) {
            Ok(dt) => Ok(Some(dt)),
            Err(e) => {
                log::warn!(
                    "Unparsable ledger timestamp '{}' for order {}: {}",
                    s,
                    order_id,
                    e
                );
                Ok(None)
            }
        },
        None => Ok(None),
    }
}

/// Appends an entry stamped at `now`. If the order already has a later
/// entry, that entry's timestamp is used instead, so per-order timestamps
/// never decrease in insertion order.
pub fn append(
    conn: &Connection,
    entry: &NewWorkLogEntry,
    now: DateTime<Utc>,
) -> Result<WorkLogEntry, DatabaseError> {
    let timestamp = match last_timestamp(conn, entry.order_id)? {
        Some(last) if last > now => last,
        _ => now,
    };

    conn.execute(
        "INSERT INTO work_logs (order_id, station_id, worker_username, action, timestamp)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            entry.order_id,
            entry.station_id,
            entry.worker_username,
            entry.action,
            format_timestamp(timestamp),
        ],
    )?;

    Ok(WorkLogEntry {
        id: conn.last_insert_rowid(),
        order_id: entry.order_id,
        station_id: entry.station_id,
        worker_username: entry.worker_username.clone(),
        action: entry.action.clone(),
        timestamp,
    })
}

/// All entries for one order, oldest first.
pub fn find_for_order(conn: &Connection, order_id: i64) -> Result<Vec<WorkLogEntry>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT * FROM work_logs WHERE order_id = ?1 ORDER BY timestamp ASC, id ASC",
    )?;
    let rows = stmt
        .query_map(params![order_id], entry_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// The whole ledger keyed by order ID, each list oldest first.
pub fn find_all_grouped(conn: &Connection) -> Result<HashMap<i64, Vec<WorkLogEntry>>, DatabaseError> {
    let mut stmt =
        conn.prepare("SELECT * FROM work_logs ORDER BY order_id ASC, timestamp ASC, id ASC")?;
    let mut grouped: HashMap<i64, Vec<WorkLogEntry>> = HashMap::new();
    for entry in stmt.query_map([], entry_from_row)? {
        let entry = entry?;
        grouped.entry(entry.order_id).or_default().push(entry);
    }
    Ok(grouped)
}

/// Total number of ledger entries.
pub fn count(conn: &Connection) -> Result<u64, DatabaseError> {
    let count: u64 = conn.query_row("SELECT COUNT(*) FROM work_logs", [], |r| r.get(0))?;
    Ok(count)
}
