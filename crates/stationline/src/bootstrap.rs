//! First-start seeding of the production line.

use crate::config::StationConfig;
use crate::db::{station_repo, Database};
use crate::error::StationError;
use crate::model::NewStation;

/// Seeds the stations from configuration if the line is still empty.
/// Returns how many stations were inserted; an existing line is never
/// touched.
pub fn seed_stations(db: &Database, stations: &[StationConfig]) -> Result<usize, StationError> {
    let inserted = db.with_transaction(|conn| {
        if !station_repo::list_ordered(conn)?.is_empty() {
            return Ok(0);
        }
        for station in stations {
            station_repo::insert(conn, &NewStation::from(station))?;
        }
        Ok(stations.len())
    })?;

    if inserted > 0 {
        log::info!("Seeded {} stations from configuration", inserted);
    } else {
        log::debug!("Station registry already populated, skipping seed");
    }
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(step: i32, code: &str) -> StationConfig {
        StationConfig {
            step,
            state_code: code.to_string(),
            name: code.to_string(),
            status: None,
        }
    }

    #[test]
    fn seeds_empty_registry_once() {
        let db = Database::open_in_memory().unwrap();
        let line = vec![station(2, "SEWING"), station(1, "CUTTING")];

        assert_eq!(seed_stations(&db, &line).unwrap(), 2);
        assert_eq!(seed_stations(&db, &line).unwrap(), 0);

        let stations = db.with_conn(station_repo::list_ordered).unwrap();
        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].state_code, "CUTTING");
    }

    #[test]
    fn existing_line_is_left_alone() {
        let db = Database::open_in_memory().unwrap();
        seed_stations(&db, &[station(1, "MANUAL")]).unwrap();

        assert_eq!(seed_stations(&db, &[station(1, "CUTTING"), station(2, "SEWING")]).unwrap(), 0);
        let stations = db.with_conn(station_repo::list_ordered).unwrap();
        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].state_code, "MANUAL");
    }

    #[test]
    fn duplicate_steps_roll_back_the_seed() {
        let db = Database::open_in_memory().unwrap();
        let result = seed_stations(&db, &[station(1, "A"), station(1, "B")]);
        assert!(matches!(result, Err(StationError::Database(_))));
        assert!(db.with_conn(station_repo::list_ordered).unwrap().is_empty());
    }
}
