use log::{error, info, LevelFilter};

use weather_runner::config::MonitorConfig;
use weather_runner::monitor::analyze;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = MonitorConfig::new();

    let level = config
        .as_ref()
        .map(|config| config.log_level)
        .unwrap_or(LevelFilter::Info);
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp_secs()
        .init();

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            return;
        }
    };

    info!("Starting data monitor");
    info!("Data directory: {}", config.data_dir.display());
    info!(
        "Configured thresholds - MAX: {}°C, MIN: {}°C",
        config.thresholds.max_temp, config.thresholds.min_temp
    );

    analyze(&config.data_dir, &config.thresholds).await;
    info!("Analysis finished");
}
