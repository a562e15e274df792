//! Order state transitions.
//!
//! Pure functions: they take the current order and the registry and return
//! the next order. Storage and the ledger are handled by the engine.

use crate::model::{Order, OrderState, COMPLETED_MARKER, ISSUE_REPORTED_PREFIX};
use crate::registry::{NextStop, StationRegistry};

/// Places a new order at the first station, or leaves it `PENDING` when the
/// line has no stations.
pub fn enter_line(mut order: Order, registry: &StationRegistry) -> Order {
    match registry.first() {
        Some(first) => {
            order.current_station_id = Some(first.id);
            order.current_station = Some(first.state_code.clone());
            order.order_state = OrderState::InProgress;
        }
        None => {
            order.current_station_id = None;
            order.current_station = None;
            order.order_state = OrderState::Pending;
        }
    }
    order
}

/// Moves an order past `scanned_station_id`.
///
/// The move is keyed by the scanned station, not by the order's stored
/// pointer. Returns `None` if the station is not on the line.
///
/// A mid-line move keeps `BLOCKED` as is. A `PENDING` order, or a
/// `COMPLETED` order scanned again mid-line, becomes `IN_PROGRESS` once it
/// points at a station. Leaving the last station completes the order and
/// clears the blocked flag.
pub fn advance(
    order: &Order,
    registry: &StationRegistry,
    scanned_station_id: i64,
) -> Option<Order> {
    let mut next = order.clone();
    match registry.next_stop(scanned_station_id)? {
        NextStop::Station(station) => {
            next.current_station_id = Some(station.id);
            next.current_station = Some(station.state_code.clone());
            if matches!(
                next.order_state,
                OrderState::Pending | OrderState::Completed
            ) {
                next.order_state = OrderState::InProgress;
            }
        }
        NextStop::EndOfLine => {
            next.order_state = OrderState::Completed;
            next.current_station_id = None;
            next.current_station = Some(COMPLETED_MARKER.to_string());
            next.is_blocked = false;
        }
    }
    Some(next)
}

/// Blocks an order where it stands.
pub fn block(order: &Order, reason: &str) -> Order {
    let mut next = order.clone();
    next.is_blocked = true;
    next.block_reason = Some(reason.to_string());
    next.order_state = OrderState::Blocked;
    next
}

/// Ledger action recorded for a reported issue.
pub fn issue_action(reason: &str) -> String {
    format!("{}{}", ISSUE_REPORTED_PREFIX, reason)
}
