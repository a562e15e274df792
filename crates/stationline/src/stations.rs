//! Station administration: maintains the production line.
//!
//! Every change keeps the line totally ordered by `step` and keeps the
//! station labels stored on orders in sync.

use crate::db::{order_repo, station_repo, Database, DatabaseError};
use crate::error::StationError;
use crate::model::{check_state_code, NewStation, Station};

/// Outcome of a guarded write: the outer error aborts the transaction, the
/// inner one is a rejected request that leaves storage untouched.
type Guarded<T> = Result<Result<T, StationError>, DatabaseError>;

#[derive(Clone)]
pub struct StationAdmin {
    db: Database,
}

impl StationAdmin {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// The line in step order.
    pub fn list(&self) -> Result<Vec<Station>, StationError> {
        Ok(self.db.with_conn(station_repo::list_ordered)?)
    }

    pub fn get(&self, id: i64) -> Result<Option<Station>, StationError> {
        Ok(self.db.with_conn(|conn| station_repo::find_by_id(conn, id))?)
    }

    /// Adds a station. Fails with `Validation` on a blank state code and
    /// with `DuplicateStep` if the step is taken.
    pub fn create(&self, station: NewStation) -> Result<Station, StationError> {
        validate(&station)?;
        let outcome: Guarded<Station> = self.db.with_transaction(|conn| {
            if let Some(existing) = station_repo::find_by_step(conn, station.step)? {
                return Ok(Err(StationError::DuplicateStep {
                    step: station.step,
                    state_code: existing.state_code,
                }));
            }
            Ok(Ok(station_repo::insert(conn, &station)?))
        });

        let created = outcome??;
        log::info!(
            "Station '{}' added at step {} (id {})",
            created.state_code,
            created.step,
            created.id
        );
        Ok(created)
    }

    /// Replaces station `id`. A changed `state_code` is copied onto every
    /// order currently at the station.
    pub fn update(&self, id: i64, station: NewStation) -> Result<Station, StationError> {
        validate(&station)?;
        let outcome: Guarded<(Station, usize)> = self.db.with_transaction(|conn| {
            let Some(current) = station_repo::find_by_id(conn, id)? else {
                return Ok(Err(StationError::NotFound(id)));
            };

            if let Some(existing) = station_repo::find_by_step(conn, station.step)? {
                if existing.id != id {
                    return Ok(Err(StationError::DuplicateStep {
                        step: station.step,
                        state_code: existing.state_code,
                    }));
                }
            }

            station_repo::update(conn, id, &station)?;
            let relabeled = if current.state_code != station.state_code {
                order_repo::relabel_station(conn, id, &station.state_code)?
            } else {
                0
            };

            let updated = Station {
                id,
                step: station.step,
                state_code: station.state_code.clone(),
                name: station.name.clone(),
                status: station.status.clone(),
            };
            Ok(Ok((updated, relabeled)))
        });

        let (updated, relabeled) = outcome??;
        if relabeled > 0 {
            log::info!(
                "Station {} relabeled to '{}' on {} order(s)",
                id,
                updated.state_code,
                relabeled
            );
        }
        Ok(updated)
    }

    /// Removes station `id`. Returns `Ok(false)` for an unknown id and
    /// fails with `InUse` while any order points at the station.
    pub fn delete(&self, id: i64) -> Result<bool, StationError> {
        let outcome: Guarded<bool> = self.db.with_transaction(|conn| {
            if station_repo::find_by_id(conn, id)?.is_none() {
                return Ok(Ok(false));
            }

            let orders = order_repo::count_at_station(conn, id)?;
            if orders > 0 {
                return Ok(Err(StationError::InUse {
                    station_id: id,
                    orders,
                }));
            }

            Ok(Ok(station_repo::delete(conn, id)?))
        });

        let deleted = outcome??;
        if deleted {
            log::info!("Station {} removed", id);
        }
        Ok(deleted)
    }
}

fn validate(station: &NewStation) -> Result<(), StationError> {
    check_state_code(station.step, &station.state_code)
        .map_err(|message| StationError::Validation { message })
}
