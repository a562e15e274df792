//! The production line: stations sorted by step.

use rusqlite::Connection;

use crate::db::{station_repo, DatabaseError};
use crate::model::Station;

/// Where an order goes after finishing at a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStop<'a> {
    Station(&'a Station),
    EndOfLine,
}

/// Snapshot of the station list, sorted ascending by `step`.
#[derive(Debug, Clone, Default)]
pub struct StationRegistry {
    stations: Vec<Station>,
}

impl StationRegistry {
    pub fn new(mut stations: Vec<Station>) -> Self {
        stations.sort_by_key(|s| s.step);
        Self { stations }
    }

    /// Reads the current line from storage.
    pub fn load(conn: &Connection) -> Result<Self, DatabaseError> {
        Ok(Self::new(station_repo::list_ordered(conn)?))
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    /// The station every new order starts at.
    pub fn first(&self) -> Option<&Station> {
        self.stations.first()
    }

    pub fn get(&self, station_id: i64) -> Option<&Station> {
        self.stations.iter().find(|s| s.id == station_id)
    }

    /// Where an order scanned at `station_id` moves next. `None` if the
    /// station is not on the line.
    pub fn next_stop(&self, station_id: i64) -> Option<NextStop<'_>> {
        let position = self.stations.iter().position(|s| s.id == station_id)?;
        Some(match self.stations.get(position + 1) {
            Some(next) => NextStop::Station(next),
            None => NextStop::EndOfLine,
        })
    }
}
