//! Domain types shared by the pipeline, search and metrics engines.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Label written to `current_station` once an order has left the last station.
pub const COMPLETED_MARKER: &str = "COMPLETED";

/// Worker name recorded for entries the system writes on its own behalf.
pub const SYSTEM_ACTOR: &str = "SYSTEM";

/// Ledger action recorded when an order enters the line.
pub const ORDER_CREATED_ACTION: &str = "ORDER_CREATED";

/// Prefix of the ledger action recorded when an issue blocks an order.
pub const ISSUE_REPORTED_PREFIX: &str = "ISSUE_REPORTED: ";

// ─── Station ────────────────────────────────────────────────────────────────

/// A production station. Stations are ordered by `step`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub id: i64,
    /// Position on the line. Unique per line.
    pub step: i32,
    /// Label copied onto orders sitting at this station.
    pub state_code: String,
    pub name: String,
    /// Free-form descriptive text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Station fields supplied on create or update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStation {
    pub step: i32,
    pub state_code: String,
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Rejects a blank `state_code`, which would leave orders at the station
/// without a readable label.
pub fn check_state_code(step: i32, state_code: &str) -> Result<(), String> {
    if state_code.trim().is_empty() {
        return Err(format!("Station at step {} has an empty state_code", step));
    }
    Ok(())
}

// ─── Order ──────────────────────────────────────────────────────────────────

/// Workflow state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderState {
    Pending,
    InProgress,
    Completed,
    Cancelled,
    Blocked,
}

impl OrderState {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderState::Pending => "PENDING",
            OrderState::InProgress => "IN_PROGRESS",
            OrderState::Completed => "COMPLETED",
            OrderState::Cancelled => "CANCELLED",
            OrderState::Blocked => "BLOCKED",
        }
    }

    /// Parses a stored state name, ignoring ASCII case.
    pub fn parse(s: &str) -> Option<Self> {
        [
            OrderState::Pending,
            OrderState::InProgress,
            OrderState::Completed,
            OrderState::Cancelled,
            OrderState::Blocked,
        ]
        .into_iter()
        .find(|state| state.as_str().eq_ignore_ascii_case(s))
    }
}

impl std::fmt::Display for OrderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive order fields. These are the only fields a plain edit may touch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    #[serde(default)]
    pub ordering_store: Option<String>,
    #[serde(default)]
    pub delivery_address: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_tel: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub customer_address: Option<String>,
    #[serde(default)]
    pub order_detail: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Input for order creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub order_number: String,
    #[serde(flatten)]
    pub details: OrderDetails,
}

impl NewOrder {
    pub fn new(order_number: impl Into<String>) -> Self {
        Self {
            order_number: order_number.into(),
            details: OrderDetails::default(),
        }
    }
}

/// A manufacturing order and its position on the line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Row id; `0` until the order has been inserted.
    pub id: i64,
    pub order_number: String,
    #[serde(flatten)]
    pub details: OrderDetails,
    pub current_station_id: Option<i64>,
    /// State code of the current station, or [`COMPLETED_MARKER`].
    pub current_station: Option<String>,
    pub order_state: OrderState,
    pub is_blocked: bool,
    pub block_reason: Option<String>,
}

impl Order {
    /// An unsaved order that has not been placed on the line yet.
    pub fn pending(new: NewOrder) -> Self {
        Self {
            id: 0,
            order_number: new.order_number,
            details: new.details,
            current_station_id: None,
            current_station: None,
            order_state: OrderState::Pending,
            is_blocked: false,
            block_reason: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.order_state == OrderState::Completed
    }

    pub fn is_in_progress(&self) -> bool {
        self.order_state == OrderState::InProgress
    }
}

// ─── Work log ───────────────────────────────────────────────────────────────

/// One immutable ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkLogEntry {
    pub id: i64,
    pub order_id: i64,
    /// `None` when an issue was reported on an order with no current station.
    pub station_id: Option<i64>,
    pub worker_username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Ledger entry before it is appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorkLogEntry {
    pub order_id: i64,
    pub station_id: Option<i64>,
    pub worker_username: String,
    pub action: Option<String>,
}
