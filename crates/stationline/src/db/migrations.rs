//! Schema versioning.
//!
//! Each schema step is an embedded SQL file. Applied versions are recorded in
//! `_migrations`; a step and its record commit together.

use rusqlite::{params, Connection};

use super::error::DatabaseError;

struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[
    SchemaStep {
        version: 1,
        name: "stations",
        sql: include_str!("sql/001_create_stations.sql"),
    },
    SchemaStep {
        version: 2,
        name: "orders",
        sql: include_str!("sql/002_create_orders.sql"),
    },
    SchemaStep {
        version: 3,
        name: "work_logs",
        sql: include_str!("sql/003_create_work_logs.sql"),
    },
];

fn schema_version(conn: &Connection) -> Result<u32, DatabaseError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;
    let version = conn.query_row("SELECT COALESCE(MAX(version), 0) FROM _migrations", [], |r| {
        r.get(0)
    })?;
    Ok(version)
}

/// Brings the schema up to date. Safe to call on every open.
pub fn run_all(conn: &Connection) -> Result<(), DatabaseError> {
    let current = schema_version(conn)?;

    for step in SCHEMA_STEPS.iter().filter(|s| s.version > current) {
        log::info!("Applying schema v{} ({})", step.version, step.name);

        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(step.sql)
            .map_err(|e| DatabaseError::Migration {
                version: step.version,
                reason: e.to_string(),
            })?;
        tx.execute(
            "INSERT INTO _migrations (version, description) VALUES (?1, ?2)",
            params![step.version, step.name],
        )?;
        tx.commit()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_exists(conn: &Connection, table: &str) -> bool {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |r| r.get::<_, u32>(0),
        )
        .unwrap()
            == 1
    }

    #[test]
    fn test_fresh_db_gets_every_step() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys=ON;").unwrap();
        run_all(&conn).unwrap();

        let count: u32 = conn
            .query_row("SELECT COUNT(*) FROM _migrations", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, SCHEMA_STEPS.len() as u32);
    }

    #[test]
    fn test_rerun_is_noop() {
        let conn = Connection::open_in_memory().unwrap();
        run_all(&conn).unwrap();
        run_all(&conn).unwrap();
        assert_eq!(schema_version(&conn).unwrap(), 3);

        let count: u32 = conn
            .query_row("SELECT COUNT(*) FROM _migrations", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, SCHEMA_STEPS.len() as u32);
    }

    #[test]
    fn test_all_tables_created() {
        let conn = Connection::open_in_memory().unwrap();
        run_all(&conn).unwrap();

        assert!(table_exists(&conn, "stations"));
        assert!(table_exists(&conn, "orders"));
        assert!(table_exists(&conn, "work_logs"));
    }

    #[test]
    fn test_station_steps_are_unique() {
        let conn = Connection::open_in_memory().unwrap();
        run_all(&conn).unwrap();

        conn.execute(
            "INSERT INTO stations (step, state_code, name) VALUES (1, 'CUTTING', 'Cutting')",
            [],
        )
        .unwrap();
        let duplicate = conn.execute(
            "INSERT INTO stations (step, state_code, name) VALUES (1, 'SEWING', 'Sewing')",
            [],
        );
        assert!(duplicate.is_err());
    }

    #[test]
    fn test_work_logs_reject_update_and_delete() {
        let conn = Connection::open_in_memory().unwrap();
        run_all(&conn).unwrap();

        conn.execute(
            "INSERT INTO work_logs (order_id, station_id, worker_username, timestamp)
             VALUES (1, 1, 'alice', '2026-01-01T00:00:00.000000Z')",
            [],
        )
        .unwrap();

        let update = conn.execute("UPDATE work_logs SET worker_username = 'mallory'", []);
        assert!(update.is_err());
        let delete = conn.execute("DELETE FROM work_logs", []);
        assert!(delete.is_err());

        let count: u32 = conn
            .query_row("SELECT COUNT(*) FROM work_logs", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
