/// One collection cycle: collect, save, and report if the save succeeded
use log::info;
use tokio::time::Duration;

use crate::config::RunnerConfig;
use crate::report::{generate_report, ReportOutcome};
use crate::sensor::collect;
use crate::storage::save_reading;
use crate::utils::{format_datetime, mask_api_key, now_local};

/// Delay imitating the round trip to a remote station
pub const SIMULATED_LATENCY: Duration = Duration::from_secs(2);

#[derive(Debug)]
pub enum RunOutcome {
    /// The reading was stored and a report pass followed
    Saved(ReportOutcome),
    /// The reading could not be stored, so no report was attempted
    SaveFailed,
}

pub async fn run(config: RunnerConfig, latency: Duration) -> RunOutcome {
    // First timestamp of the run, taken before any blocking I/O
    info!("Run started at: {}", format_datetime(&now_local()));
    info!("Starting weather runner");
    info!("Using data directory: {}", config.data_dir.display());
    info!("Configured API key: {}", mask_api_key(&config.api_key));

    let reading = collect(latency).await;

    let outcome = if save_reading(&reading, &config.data_dir, config.max_retries).await {
        RunOutcome::Saved(generate_report(&config.data_dir).await)
    } else {
        RunOutcome::SaveFailed
    };

    info!("Run completed");
    outcome
}
