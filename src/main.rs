use log::{error, LevelFilter};

use weather_runner::config::RunnerConfig;
use weather_runner::runner::{run, SIMULATED_LATENCY};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Load configuration
    let config = RunnerConfig::new();

    // Initialize logging
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

    // A panic inside the run surfaces here as a JoinError; the exit code stays 0
    if let Err(e) = tokio::spawn(run(config, SIMULATED_LATENCY)).await {
        error!("Run aborted: {:?}", e);
    }
}
