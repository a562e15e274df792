use chrono::{NaiveDate, Utc};
use tracing::{debug, info, info_span, warn};

use crate::db::{order_repo, work_log_repo, Database, DatabaseError};
use crate::metrics::{self, OrderStatistics, PerformanceMetrics};
use crate::model::{
    NewOrder, NewWorkLogEntry, Order, OrderDetails, WorkLogEntry, ORDER_CREATED_ACTION,
    SYSTEM_ACTOR,
};
use crate::registry::StationRegistry;
use crate::search::{self, SearchCriteria};

use super::error::PipelineError;
use super::transitions;

/// Moves orders along the production line and records every move in the
/// work log.
///
/// Each write operation runs as one transaction: the order update and its
/// ledger entry commit together or not at all.
#[derive(Clone)]
pub struct OrderPipeline {
    db: Database,
}

impl OrderPipeline {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Creates an order and places it at the first station. With no
    /// stations on the line the order stays `PENDING` and nothing is logged.
    pub fn create_order(&self, new: NewOrder) -> Result<Order, PipelineError> {
        let order_number = new.order_number.clone();
        let _span = info_span!("create_order", order_number = %order_number).entered();

        let created = self.db.with_transaction(|conn| {
            if order_repo::find_by_number(conn, &new.order_number)?.is_some() {
                return Ok(None);
            }

            let registry = StationRegistry::load(conn)?;
            let mut order = transitions::enter_line(Order::pending(new), &registry);
            order.id = order_repo::insert(conn, &order)?;

            if let Some(station_id) = order.current_station_id {
                work_log_repo::append(
                    conn,
                    &NewWorkLogEntry {
                        order_id: order.id,
                        station_id: Some(station_id),
                        worker_username: SYSTEM_ACTOR.to_string(),
                        action: Some(ORDER_CREATED_ACTION.to_string()),
                    },
                    Utc::now(),
                )?;
            }
            Ok(Some(order))
        })?;

        match created {
            Some(order) => {
                info!(
                    order_id = order.id,
                    state = %order.order_state,
                    station = order.current_station.as_deref().unwrap_or("-"),
                    "Order created"
                );
                Ok(order)
            }
            None => {
                warn!("Rejected duplicate order number");
                Err(PipelineError::DuplicateOrderNumber(order_number))
            }
        }
    }

    /// Records work done on an order at `station_id` and moves the order to
    /// the station after it, completing the order after the last station.
    ///
    /// Returns `Ok(false)` without writing anything if the order number or
    /// the station is unknown.
    pub fn advance_station(
        &self,
        order_number: &str,
        station_id: i64,
        worker_username: &str,
    ) -> Result<bool, DatabaseError> {
        let _span = info_span!("advance_station", order_number, station_id).entered();

        self.db.with_transaction(|conn| {
            let Some(order) = order_repo::find_by_number(conn, order_number)? else {
                debug!("Unknown order");
                return Ok(false);
            };

            let registry = StationRegistry::load(conn)?;
            let Some(next) = transitions::advance(&order, &registry, station_id) else {
                warn!("Station is not on the line");
                return Ok(false);
            };

            work_log_repo::append(
                conn,
                &NewWorkLogEntry {
                    order_id: order.id,
                    station_id: Some(station_id),
                    worker_username: worker_username.to_string(),
                    action: None,
                },
                Utc::now(),
            )?;
            order_repo::update(conn, &next)?;

            if order.current_station_id != Some(station_id) && order.current_station_id.is_some() {
                debug!(
                    stored_station_id = order.current_station_id,
                    "Scanned station differs from stored position"
                );
            }
            info!(
                worker = worker_username,
                state = %next.order_state,
                station = next.current_station.as_deref().unwrap_or("-"),
                "Order advanced"
            );
            Ok(true)
        })
    }

    /// Blocks an order and logs the reason at the order's current station.
    ///
    /// Returns `Ok(false)` if the order number is unknown.
    pub fn report_issue(
        &self,
        order_number: &str,
        reason: &str,
        worker_username: &str,
    ) -> Result<bool, DatabaseError> {
        let _span = info_span!("report_issue", order_number).entered();

        self.db.with_transaction(|conn| {
            let Some(order) = order_repo::find_by_number(conn, order_number)? else {
                debug!("Unknown order");
                return Ok(false);
            };

            let blocked = transitions::block(&order, reason);
            order_repo::update(conn, &blocked)?;
            work_log_repo::append(
                conn,
                &NewWorkLogEntry {
                    order_id: order.id,
                    station_id: order.current_station_id,
                    worker_username: worker_username.to_string(),
                    action: Some(transitions::issue_action(reason)),
                },
                Utc::now(),
            )?;

            info!(worker = worker_username, reason, "Order blocked");
            Ok(true)
        })
    }

    pub fn order_by_number(&self, order_number: &str) -> Result<Option<Order>, DatabaseError> {
        self.db
            .with_conn(|conn| order_repo::find_by_number(conn, order_number))
    }

    pub fn list_orders(&self) -> Result<Vec<Order>, DatabaseError> {
        self.db.with_conn(order_repo::find_all)
    }

    /// Orders dated within the inclusive range; open on a missing bound.
    pub fn orders_in_date_range(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Order>, DatabaseError> {
        self.db
            .with_conn(|conn| order_repo::find_in_date_range(conn, from, to))
    }

    /// Replaces the descriptive fields of order `id`. Workflow fields are
    /// left alone. Returns `Ok(None)` if the order does not exist.
    pub fn update_order(
        &self,
        id: i64,
        details: OrderDetails,
    ) -> Result<Option<Order>, DatabaseError> {
        self.db.with_transaction(|conn| {
            let Some(mut order) = order_repo::find_by_id(conn, id)? else {
                return Ok(None);
            };
            order.details = details;
            order_repo::update(conn, &order)?;
            Ok(Some(order))
        })
    }

    /// Deletes order `id`. Its ledger entries are kept.
    pub fn delete_order(&self, id: i64) -> Result<bool, DatabaseError> {
        let deleted = self.db.with_transaction(|conn| {
            if !order_repo::exists(conn, id)? {
                return Ok(false);
            }
            order_repo::delete(conn, id)
        })?;
        if deleted {
            info!(order_id = id, "Order deleted");
        }
        Ok(deleted)
    }

    /// The order's ledger, oldest first. Empty for an unknown order.
    pub fn order_logs(&self, order_number: &str) -> Result<Vec<WorkLogEntry>, DatabaseError> {
        self.db.with_conn(|conn| {
            match order_repo::find_by_number(conn, order_number)? {
                Some(order) => work_log_repo::find_for_order(conn, order.id),
                None => Ok(Vec::new()),
            }
        })
    }

    pub fn search_orders(&self, criteria: &SearchCriteria) -> Result<Vec<Order>, DatabaseError> {
        let orders = self.list_orders()?;
        Ok(search::search(&orders, criteria))
    }

    /// Statistics over the orders dated within the range.
    pub fn statistics(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<OrderStatistics, DatabaseError> {
        let orders = self.orders_in_date_range(from, to)?;
        Ok(metrics::statistics(&orders))
    }

    /// Throughput metrics over all orders.
    pub fn performance_metrics(&self) -> Result<PerformanceMetrics, DatabaseError> {
        let (orders, ledger) = self.db.with_conn(|conn| {
            Ok((
                order_repo::find_all(conn)?,
                work_log_repo::find_all_grouped(conn)?,
            ))
        })?;
        Ok(metrics::performance_metrics(&orders, &ledger))
    }
}
