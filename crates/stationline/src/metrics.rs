//! Order statistics and throughput metrics.
//!
//! Both functions work on a snapshot of orders (and, for throughput, the
//! ledger) and never touch storage.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::model::{Order, OrderState, WorkLogEntry};

/// Reported when no completed order has enough ledger history.
pub const NO_AVERAGE: &str = "0.0";

/// Reported when no order qualifies as fastest.
pub const NO_FASTEST_ORDER: &str = "N/A";

/// Counts by state plus the current load per station.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatistics {
    pub total_orders: u64,
    pub completed: u64,
    pub in_progress: u64,
    pub cancelled: u64,
    /// Orders flagged blocked or in the `BLOCKED` state.
    pub blocked: u64,
    /// Station label -> number of `IN_PROGRESS` orders sitting there.
    pub station_counts: BTreeMap<String, u64>,
}

/// Throughput figures derived from the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    /// Mean first-to-last ledger span of completed orders, in hours, two decimals.
    pub avg_completion_time: String,
    /// Station label with the most `IN_PROGRESS` orders.
    pub bottleneck_station: Option<String>,
    pub bottleneck_count: u64,
    /// `"<order number> (<minutes> min)"`.
    pub fastest_order: String,
}

/// Summarizes a set of orders.
pub fn statistics(orders: &[Order]) -> OrderStatistics {
    let mut stats = OrderStatistics {
        total_orders: orders.len() as u64,
        ..Default::default()
    };

    for order in orders {
        match order.order_state {
            OrderState::Completed => stats.completed += 1,
            OrderState::InProgress => stats.in_progress += 1,
            OrderState::Cancelled => stats.cancelled += 1,
            OrderState::Pending | OrderState::Blocked => {}
        }
        if order.is_blocked || order.order_state == OrderState::Blocked {
            stats.blocked += 1;
        }
    }

    for (label, count) in station_load(orders) {
        stats.station_counts.insert(label, count);
    }

    stats
}

/// `IN_PROGRESS` orders per station label, in first-seen order.
fn station_load(orders: &[Order]) -> Vec<(String, u64)> {
    let mut load: Vec<(String, u64)> = Vec::new();
    for order in orders.iter().filter(|o| o.is_in_progress()) {
        let Some(label) = order.current_station.as_deref() else {
            continue;
        };
        match load.iter_mut().find(|(l, _)| l == label) {
            Some((_, count)) => *count += 1,
            None => load.push((label.to_string(), 1)),
        }
    }
    load
}

/// Whole minutes between an order's first and last ledger entries.
/// `None` with fewer than two entries.
fn ledger_span_minutes(entries: &[WorkLogEntry]) -> Option<i64> {
    if entries.len() < 2 {
        return None;
    }
    let first = entries.first()?;
    let last = entries.last()?;
    Some((last.timestamp - first.timestamp).num_minutes())
}

/// Computes throughput metrics. `ledger` maps order ID to that order's
/// entries, oldest first.
pub fn performance_metrics(
    orders: &[Order],
    ledger: &HashMap<i64, Vec<WorkLogEntry>>,
) -> PerformanceMetrics {
    let spans: Vec<(&Order, i64)> = orders
        .iter()
        .filter(|o| o.is_completed())
        .filter_map(|o| {
            let entries = ledger.get(&o.id)?;
            ledger_span_minutes(entries).map(|minutes| (o, minutes))
        })
        .collect();

    let avg_completion_time = if spans.is_empty() {
        NO_AVERAGE.to_string()
    } else {
        let total_hours: f64 = spans.iter().map(|(_, m)| *m as f64 / 60.0).sum();
        format!("{:.2}", total_hours / spans.len() as f64)
    };

    // Strictly-less keeps the first order on ties.
    let mut fastest: Option<(&Order, i64)> = None;
    for &(order, minutes) in &spans {
        if fastest.map_or(true, |(_, best)| minutes < best) {
            fastest = Some((order, minutes));
        }
    }
    let fastest_order = match fastest {
        Some((order, minutes)) => format!("{} ({} min)", order.order_number, minutes),
        None => NO_FASTEST_ORDER.to_string(),
    };

    // Strictly-greater keeps the first-seen station on ties.
    let mut bottleneck: Option<(String, u64)> = None;
    for (label, count) in station_load(orders) {
        if bottleneck.as_ref().map_or(true, |(_, best)| count > *best) {
            bottleneck = Some((label, count));
        }
    }
    let (bottleneck_station, bottleneck_count) = match bottleneck {
        Some((label, count)) => (Some(label), count),
        None => (None, 0),
    };

    PerformanceMetrics {
        avg_completion_time,
        bottleneck_station,
        bottleneck_count,
        fastest_order,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewOrder, COMPLETED_MARKER};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn order(id: i64, number: &str, state: OrderState, label: Option<&str>) -> Order {
        let mut order = Order::pending(NewOrder::new(number));
        order.id = id;
        order.order_state = state;
        order.current_station = label.map(str::to_string);
        order
    }

    fn completed(id: i64, number: &str) -> Order {
        order(id, number, OrderState::Completed, Some(COMPLETED_MARKER))
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 1, 8, 0, 0).unwrap()
    }

    /// Ledger entries at the given minute offsets from `start()`.
    fn entries(order_id: i64, offsets: &[i64]) -> Vec<WorkLogEntry> {
        offsets
            .iter()
            .enumerate()
            .map(|(i, minutes)| WorkLogEntry {
                id: order_id * 100 + i as i64,
                order_id,
                station_id: Some(1),
                worker_username: "alice".to_string(),
                action: None,
                timestamp: start() + Duration::minutes(*minutes),
            })
            .collect()
    }

    #[test]
    fn statistics_counts_states() {
        let mut flagged = order(5, "E", OrderState::InProgress, Some("CUTTING"));
        flagged.is_blocked = true;
        let orders = vec![
            order(1, "A", OrderState::InProgress, Some("CUTTING")),
            order(2, "B", OrderState::InProgress, Some("SEWING")),
            completed(3, "C"),
            order(4, "D", OrderState::Blocked, Some("SEWING")),
            flagged,
            order(6, "F", OrderState::Cancelled, None),
            order(7, "G", OrderState::Pending, None),
        ];

        let stats = statistics(&orders);
        assert_eq!(stats.total_orders, 7);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.in_progress, 3);
        assert_eq!(stats.cancelled, 1);
        assert_eq!(stats.blocked, 2);
        assert_eq!(stats.station_counts.get("CUTTING"), Some(&2));
        assert_eq!(stats.station_counts.get("SEWING"), Some(&1));
        assert_eq!(stats.station_counts.len(), 2);
    }

    #[test]
    fn statistics_of_nothing() {
        let stats = statistics(&[]);
        assert_eq!(stats, OrderStatistics::default());
    }

    #[test]
    fn no_completed_orders() {
        let orders = vec![order(1, "A", OrderState::InProgress, Some("CUTTING"))];
        let metrics = performance_metrics(&orders, &HashMap::new());
        assert_eq!(metrics.avg_completion_time, "0.0");
        assert_eq!(metrics.fastest_order, "N/A");
        assert_eq!(metrics.bottleneck_station.as_deref(), Some("CUTTING"));
        assert_eq!(metrics.bottleneck_count, 1);
    }

    #[test]
    fn average_and_fastest_over_qualifying_orders() {
        let orders = vec![completed(1, "SLOW"), completed(2, "QUICK"), completed(3, "SOLO")];
        let mut ledger = HashMap::new();
        ledger.insert(1, entries(1, &[0, 60, 180]));
        ledger.insert(2, entries(2, &[0, 30]));
        // A single entry does not count as a zero-length run.
        ledger.insert(3, entries(3, &[0]));

        let metrics = performance_metrics(&orders, &ledger);
        // (3h + 0.5h) / 2
        assert_eq!(metrics.avg_completion_time, "1.75");
        assert_eq!(metrics.fastest_order, "QUICK (30 min)");
    }

    #[test]
    fn partial_minutes_are_truncated() {
        let orders = vec![completed(1, "A")];
        let mut ledger = HashMap::new();
        let mut run = entries(1, &[0, 0]);
        run[1].timestamp = start() + Duration::seconds(179);
        ledger.insert(1, run);

        let metrics = performance_metrics(&orders, &ledger);
        assert_eq!(metrics.fastest_order, "A (2 min)");
        assert_eq!(metrics.avg_completion_time, "0.03");
    }

    #[test]
    fn completed_orders_without_history_are_skipped() {
        let orders = vec![completed(1, "A")];
        let metrics = performance_metrics(&orders, &HashMap::new());
        assert_eq!(metrics.avg_completion_time, "0.0");
        assert_eq!(metrics.fastest_order, "N/A");
    }

    #[test]
    fn unfinished_orders_are_not_timed() {
        let orders = vec![order(1, "A", OrderState::InProgress, Some("SEWING"))];
        let mut ledger = HashMap::new();
        ledger.insert(1, entries(1, &[0, 45]));

        let metrics = performance_metrics(&orders, &ledger);
        assert_eq!(metrics.fastest_order, "N/A");
    }

    #[test]
    fn fastest_tie_keeps_first_order() {
        let orders = vec![completed(1, "FIRST"), completed(2, "SECOND")];
        let mut ledger = HashMap::new();
        ledger.insert(1, entries(1, &[0, 10]));
        ledger.insert(2, entries(2, &[0, 10]));

        let metrics = performance_metrics(&orders, &ledger);
        assert_eq!(metrics.fastest_order, "FIRST (10 min)");
    }

    #[test]
    fn bottleneck_is_busiest_station() {
        let orders = vec![
            order(1, "A", OrderState::InProgress, Some("CUTTING")),
            order(2, "B", OrderState::InProgress, Some("SEWING")),
            order(3, "C", OrderState::InProgress, Some("SEWING")),
            // Blocked orders are not current load.
            order(4, "D", OrderState::Blocked, Some("CUTTING")),
            order(5, "E", OrderState::Blocked, Some("CUTTING")),
        ];
        let metrics = performance_metrics(&orders, &HashMap::new());
        assert_eq!(metrics.bottleneck_station.as_deref(), Some("SEWING"));
        assert_eq!(metrics.bottleneck_count, 2);
    }

    #[test]
    fn no_bottleneck_without_active_orders() {
        let orders = vec![completed(1, "A")];
        let metrics = performance_metrics(&orders, &HashMap::new());
        assert!(metrics.bottleneck_station.is_none());
        assert_eq!(metrics.bottleneck_count, 0);
    }

    #[test]
    fn metrics_serialize_camel_case() {
        let metrics = performance_metrics(&[], &HashMap::new());
        let value = serde_json::to_value(&metrics).unwrap();
        assert_eq!(value["avgCompletionTime"], "0.0");
        assert_eq!(value["fastestOrder"], "N/A");
        assert!(value["bottleneckStation"].is_null());
        assert_eq!(value["bottleneckCount"], 0);
    }
}
