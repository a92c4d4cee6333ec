use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use airwatch::config::AirWatchConfig;
use airwatch::{telemetry, web};

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = AirWatchConfig::load_from_path(config_path)?;

    telemetry::init_logging(&config.logging)?;
    info!("Starting airwatch {}", airwatch::VERSION);

    web::run(config).await
}
