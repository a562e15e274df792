//! Builder patterns for creating test data programmatically.

#![allow(dead_code)]

use chrono::NaiveDate;

use stationline::config::{Config, StationConfig};
use stationline::model::{NewOrder, NewStation};

/// Builder for `NewOrder` instances.
pub struct OrderBuilder {
    order: NewOrder,
}

impl OrderBuilder {
    pub fn new(order_number: &str) -> Self {
        Self {
            order: NewOrder::new(order_number),
        }
    }

    pub fn store(mut self, store: &str) -> Self {
        self.order.details.ordering_store = Some(store.to_string());
        self
    }

    pub fn customer(mut self, name: &str) -> Self {
        self.order.details.customer_name = Some(name.to_string());
        self
    }

    pub fn tel(mut self, tel: &str) -> Self {
        self.order.details.customer_tel = Some(tel.to_string());
        self
    }

    pub fn email(mut self, email: &str) -> Self {
        self.order.details.customer_email = Some(email.to_string());
        self
    }

    pub fn amount(mut self, amount: f64) -> Self {
        self.order.details.amount = Some(amount);
        self
    }

    /// Sets the order date from `YYYY-MM-DD`.
    pub fn date(mut self, date: &str) -> Self {
        self.order.details.date =
            Some(NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("bad test date"));
        self
    }

    pub fn build(self) -> NewOrder {
        self.order
    }
}

/// Builder for `Config` instances describing a production line.
pub struct LineConfigBuilder {
    version: String,
    database_path: Option<std::path::PathBuf>,
    stations: Vec<StationConfig>,
}

impl LineConfigBuilder {
    pub fn new() -> Self {
        Self {
            version: "1.0".to_string(),
            database_path: None,
            stations: vec![],
        }
    }

    pub fn database_path(mut self, path: &std::path::Path) -> Self {
        self.database_path = Some(path.to_path_buf());
        self
    }

    /// Appends a station; its name is the capitalized state code.
    pub fn station(mut self, step: i32, state_code: &str) -> Self {
        self.stations.push(StationConfig {
            step,
            state_code: state_code.to_string(),
            name: capitalize(state_code),
            status: None,
        });
        self
    }

    pub fn build(self) -> Config {
        Config {
            version: self.version,
            database_path: self.database_path,
            stations: self.stations,
        }
    }

    pub fn to_json(self) -> String {
        serde_json::to_string_pretty(&self.build()).expect("config serializes")
    }
}

impl Default for LineConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Shorthand for a `NewStation` named after its code.
pub fn station(step: i32, state_code: &str) -> NewStation {
    NewStation {
        step,
        state_code: state_code.to_string(),
        name: capitalize(state_code),
        status: None,
    }
}

fn capitalize(code: &str) -> String {
    let lower = code.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
