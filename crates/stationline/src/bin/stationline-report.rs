use std::path::PathBuf;
use std::process::ExitCode;

use log::{error, info};
use serde::Serialize;

use stationline::{
    bootstrap, load_config, Database, LogFormat, OrderPipeline, OrderStatistics,
    PerformanceMetrics, Result,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    statistics: OrderStatistics,
    performance: PerformanceMetrics,
}

fn run(config_path: PathBuf) -> Result<()> {
    let config = load_config(&config_path)?;
    let db_path = config.database_path()?;
    let db = Database::open(&db_path)?;

    bootstrap::seed_stations(&db, &config.stations)?;

    let pipeline = OrderPipeline::new(db);
    let report = Report {
        statistics: pipeline.statistics(None, None)?,
        performance: pipeline.performance_metrics()?,
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn main() -> ExitCode {
    let format = match std::env::var("STATIONLINE_LOG_FORMAT").as_deref() {
        Ok("json") => LogFormat::Json,
        _ => LogFormat::Pretty,
    };
    if let Err(e) = stationline::logging::init(format) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let Some(config_path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        eprintln!("Usage: stationline-report <config.json>");
        return ExitCode::from(2);
    };

    info!(
        "stationline-report v{} using {}",
        env!("CARGO_PKG_VERSION"),
        config_path.display()
    );

    match run(config_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
