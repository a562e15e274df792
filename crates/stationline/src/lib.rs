pub mod bootstrap;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod pipeline;
pub mod registry;
pub mod search;
pub mod stations;

pub use config::{load_config, load_config_from_str, Config, StationConfig};
pub use db::{Database, DatabaseError};
pub use error::{ConfigError, Result, StationError, StationlineError};
pub use logging::LogFormat;
pub use metrics::{OrderStatistics, PerformanceMetrics};
pub use model::{
    NewOrder, NewStation, Order, OrderDetails, OrderState, Station, WorkLogEntry,
};
pub use pipeline::{OrderPipeline, PipelineError};
pub use registry::StationRegistry;
pub use search::SearchCriteria;
pub use stations::StationAdmin;
