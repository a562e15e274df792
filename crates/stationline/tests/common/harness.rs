//! Test harness for isolated test execution.
//!
//! `TestHarness` owns a temporary directory holding a file-backed database
//! and hands out the pipeline and station admin bound to it.

#![allow(dead_code)]

use std::path::PathBuf;

use tempfile::TempDir;

use stationline::db::{work_log_repo, Database};
use stationline::model::{Station, WorkLogEntry};
use stationline::{OrderPipeline, StationAdmin};

use super::builders::station;

pub struct TestHarness {
    temp_dir: TempDir,
    pub db_path: PathBuf,
    pub db: Database,
    pub pipeline: OrderPipeline,
    pub admin: StationAdmin,
}

impl TestHarness {
    /// A harness with an empty production line.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("data").join("stationline.db");
        let db = Database::open(&db_path).expect("Failed to open test database");

        Self {
            pipeline: OrderPipeline::new(db.clone()),
            admin: StationAdmin::new(db.clone()),
            temp_dir,
            db_path,
            db,
        }
    }

    /// A harness whose line holds the given `(step, state_code)` stations.
    pub fn with_line(line: &[(i32, &str)]) -> Self {
        let harness = Self::new();
        for (step, code) in line {
            harness
                .admin
                .create(station(*step, code))
                .expect("Failed to create station");
        }
        harness
    }

    pub fn temp_path(&self) -> &std::path::Path {
        self.temp_dir.path()
    }

    /// The station with `state_code`. Panics if absent.
    pub fn station(&self, state_code: &str) -> Station {
        self.admin
            .list()
            .expect("Failed to list stations")
            .into_iter()
            .find(|s| s.state_code == state_code)
            .unwrap_or_else(|| panic!("no station {}", state_code))
    }

    pub fn logs(&self, order_number: &str) -> Vec<WorkLogEntry> {
        self.pipeline
            .order_logs(order_number)
            .expect("Failed to read order logs")
    }

    pub fn ledger_size(&self) -> u64 {
        self.db
            .with_conn(work_log_repo::count)
            .expect("Failed to count ledger")
    }
}
