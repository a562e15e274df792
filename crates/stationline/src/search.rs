//! Ad-hoc order filtering.
//!
//! Every criterion is optional and criteria combine with AND. The filter is
//! stable: matching orders keep their input order.

use std::cmp::Ordering;

use serde_json::{Map, Value};

use crate::model::{Order, OrderState};

/// Parsed search criteria.
///
/// Build from a request body with [`SearchCriteria::from_map`], or fill the
/// fields directly. `None` means "not supplied".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchCriteria {
    /// Inclusive lower bound, compared as text against `YYYY-MM-DD`.
    pub date_from: Option<String>,
    /// Inclusive upper bound, compared as text against `YYYY-MM-DD`.
    pub date_to: Option<String>,
    pub amount_min: Option<f64>,
    pub amount_max: Option<f64>,
    pub order_number: Option<String>,
    pub ordering_store: Option<String>,
    pub customer_name: Option<String>,
    /// Matched case-sensitively, unlike the other text fields.
    pub customer_tel: Option<String>,
    pub customer_email: Option<String>,
    /// Station label, order state, or `BLOCKED`.
    pub state: Option<String>,
    pub exclude_completed: bool,
}

/// String form of a JSON value; strings are taken verbatim.
fn value_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A criterion that is absent, null, or blank counts as not supplied.
fn text_criterion(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key) {
        None | Some(Value::Null) => None,
        Some(value) => {
            let s = value_string(value);
            if s.trim().is_empty() {
                None
            } else {
                Some(s)
            }
        }
    }
}

/// Unparsable numbers are dropped rather than rejecting the query.
fn amount_criterion(map: &Map<String, Value>, key: &str) -> Option<f64> {
    let raw = text_criterion(map, key)?;
    match raw.trim().parse::<f64>() {
        Ok(amount) => Some(amount),
        Err(_) => {
            log::debug!("Ignoring unparsable search bound {}='{}'", key, raw);
            None
        }
    }
}

impl SearchCriteria {
    /// Reads the camelCase criteria keys of a request body.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let exclude_completed = match map.get("excludeCompleted") {
            None | Some(Value::Null) => false,
            Some(value) => value_string(value).eq_ignore_ascii_case("true"),
        };

        Self {
            date_from: text_criterion(map, "dateFrom"),
            date_to: text_criterion(map, "dateTo"),
            amount_min: amount_criterion(map, "amountMin"),
            amount_max: amount_criterion(map, "amountMax"),
            order_number: text_criterion(map, "orderNumber"),
            ordering_store: text_criterion(map, "orderingStore"),
            customer_name: text_criterion(map, "customerName"),
            customer_tel: text_criterion(map, "customerTel"),
            customer_email: text_criterion(map, "customerEmail"),
            state: text_criterion(map, "state"),
            exclude_completed,
        }
    }

    /// Like [`from_map`](Self::from_map); anything but an object yields no criteria.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::from_map(map),
            _ => Self::default(),
        }
    }

    /// Whether `order` satisfies every supplied criterion.
    pub fn matches(&self, order: &Order) -> bool {
        let d = &order.details;

        // Undated orders pass date bounds.
        if let Some(date) = d.date.map(|date| date.to_string()) {
            if self.date_from.as_deref().is_some_and(|from| date.as_str() < from) {
                return false;
            }
            if self.date_to.as_deref().is_some_and(|to| date.as_str() > to) {
                return false;
            }
        }

        // Orders without an amount fail any amount bound. A NaN bound
        // compares as unordered and rejects nothing.
        if let Some(min) = self.amount_min {
            if !d
                .amount
                .is_some_and(|amount| amount.partial_cmp(&min) != Some(Ordering::Less))
            {
                return false;
            }
        }
        if let Some(max) = self.amount_max {
            if !d
                .amount
                .is_some_and(|amount| amount.partial_cmp(&max) != Some(Ordering::Greater))
            {
                return false;
            }
        }

        let text_checks = [
            (&self.order_number, Some(&order.order_number)),
            (&self.ordering_store, d.ordering_store.as_ref()),
            (&self.customer_name, d.customer_name.as_ref()),
            (&self.customer_email, d.customer_email.as_ref()),
        ];
        for (term, field) in text_checks {
            if let Some(term) = term {
                if !field.is_some_and(|f| contains_ignore_case(f, term)) {
                    return false;
                }
            }
        }

        if let Some(tel) = &self.customer_tel {
            if !d.customer_tel.as_deref().is_some_and(|f| f.contains(tel.as_str())) {
                return false;
            }
        }

        if let Some(state) = &self.state {
            if !matches_state(order, state) {
                return false;
            }
        }

        !(self.exclude_completed && order.order_state == OrderState::Completed)
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// A state term matches the station label, the order state, or the blocked flag.
fn matches_state(order: &Order, term: &str) -> bool {
    let at_station = order
        .current_station
        .as_deref()
        .is_some_and(|label| contains_ignore_case(label, term));
    let in_state = contains_ignore_case(order.order_state.as_str(), term);
    let blocked = term.eq_ignore_ascii_case(OrderState::Blocked.as_str()) && order.is_blocked;

    at_station || in_state || blocked
}

/// Returns the orders matching `criteria`, in input order.
pub fn search(orders: &[Order], criteria: &SearchCriteria) -> Vec<Order> {
    orders
        .iter()
        .filter(|order| criteria.matches(order))
        .cloned()
        .collect()
}
