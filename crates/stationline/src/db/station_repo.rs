//! Station repository: CRUD operations for the `stations` table.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::DatabaseError;
use crate::model::{NewStation, Station};

fn station_from_row(row: &Row<'_>) -> Result<Station, rusqlite::Error> {
    Ok(Station {
        id: row.get("id")?,
        step: row.get("step")?,
        state_code: row.get("state_code")?,
        name: row.get("name")?,
        status: row.get("status")?,
    })
}

/// Lists every station ordered ascending by `step`.
pub fn list_ordered(conn: &Connection) -> Result<Vec<Station>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT * FROM stations ORDER BY step ASC")?;
    let rows = stmt
        .query_map([], station_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Finds a station by its ID.
pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Station>, DatabaseError> {
    let station = conn
        .query_row(
            "SELECT * FROM stations WHERE id = ?1",
            params![id],
            station_from_row,
        )
        .optional()?;
    Ok(station)
}

/// Finds the station occupying `step`, if any.
pub fn find_by_step(conn: &Connection, step: i32) -> Result<Option<Station>, DatabaseError> {
    let station = conn
        .query_row(
            "SELECT * FROM stations WHERE step = ?1",
            params![step],
            station_from_row,
        )
        .optional()?;
    Ok(station)
}

/// Inserts a station and returns it with its assigned ID.
pub fn insert(conn: &Connection, station: &NewStation) -> Result<Station, DatabaseError> {
    conn.execute(
        "INSERT INTO stations (step, state_code, name, status) VALUES (?1, ?2, ?3, ?4)",
        params![station.step, station.state_code, station.name, station.status],
    )?;
    Ok(Station {
        id: conn.last_insert_rowid(),
        step: station.step,
        state_code: station.state_code.clone(),
        name: station.name.clone(),
        status: station.status.clone(),
    })
}

/// Overwrites all fields of station `id`. Returns `false` if no row matched.
pub fn update(conn: &Connection, id: i64, station: &NewStation) -> Result<bool, DatabaseError> {
    let changed = conn.execute(
        "UPDATE stations SET step = ?2, state_code = ?3, name = ?4, status = ?5 WHERE id = ?1",
        params![id, station.step, station.state_code, station.name, station.status],
    )?;
    Ok(changed > 0)
}

/// Deletes station `id`. Returns `false` if no row matched.
pub fn delete(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let changed = conn.execute("DELETE FROM stations WHERE id = ?1", params![id])?;
    Ok(changed > 0)
}
