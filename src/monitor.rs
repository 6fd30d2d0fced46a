/// Temperature anomaly detection over recent readings
use anyhow::{Context, Result};
use log::{debug, error, info};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::config::Thresholds;
use crate::models::{Anomaly, AnomalyKind, AnomalyReport, Reading};
use crate::storage::{list_readings, load_reading, stamped_file_name, write_json};
use crate::utils::now_local;

/// How many of the newest readings are checked
pub const MONITOR_WINDOW: usize = 10;

const ANOMALY_PREFIX: &str = "anomalies_";

#[derive(Debug)]
pub enum MonitorOutcome {
    NoData,
    Clear { checked: usize },
    Written { path: PathBuf, report: AnomalyReport },
    /// Unexpected failure, already logged
    Failed,
}

/// Classify one reading against the thresholds
pub fn check_reading(file: &str, reading: &Reading, thresholds: &Thresholds) -> Option<Anomaly> {
    let (kind, threshold) = if reading.temperature > thresholds.max_temp {
        (AnomalyKind::HighTemperature, thresholds.max_temp)
    } else if reading.temperature < thresholds.min_temp {
        (AnomalyKind::LowTemperature, thresholds.min_temp)
    } else {
        return None;
    };

    Some(Anomaly {
        file: file.to_string(),
        kind,
        value: reading.temperature,
        threshold,
        timestamp: reading.timestamp,
    })
}

/// Check the newest readings in `dir` and write an anomaly report if needed
///
/// Never fails: unexpected errors are logged and reported as
/// [`MonitorOutcome::Failed`].
pub async fn analyze(dir: &Path, thresholds: &Thresholds) -> MonitorOutcome {
    match try_analyze(dir, thresholds).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Failed to analyze data: {:?}", e);
            MonitorOutcome::Failed
        }
    }
}

async fn try_analyze(dir: &Path, thresholds: &Thresholds) -> Result<MonitorOutcome> {
    info!("Analyzing data...");

    if fs::metadata(dir).await.is_err() {
        fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create data directory {}", dir.display()))?;
        info!("Created data directory: {}", dir.display());
    }

    let names = list_readings(dir)
        .await
        .context("Failed to list reading files")?;
    info!("Found {} data file(s)", names.len());

    if names.is_empty() {
        info!("No files to analyze");
        return Ok(MonitorOutcome::NoData);
    }

    // Newest first
    let recent: Vec<&String> = names.iter().rev().take(MONITOR_WINDOW).collect();

    let mut anomalies = Vec::new();
    for name in &recent {
        debug!("Analyzing file: {}", name);
        match load_reading(&dir.join(name.as_str())).await {
            Ok(reading) => anomalies.extend(check_reading(name, &reading, thresholds)),
            Err(e) => error!("Error analyzing file {}: {}", name, e),
        }
    }

    if anomalies.is_empty() {
        info!("No anomalies detected");
        return Ok(MonitorOutcome::Clear {
            checked: recent.len(),
        });
    }

    info!("{} anomaly(ies) detected", anomalies.len());

    let report = AnomalyReport {
        timestamp: now_local(),
        hostname: local_hostname(),
        anomalies_count: anomalies.len(),
        anomalies,
    };

    let file_name = stamped_file_name(ANOMALY_PREFIX, &report.timestamp);
    let path = write_json(dir, &file_name, &report, 0)
        .await
        .context("Failed to write anomaly report")?;
    info!("Anomaly report written to {}", path.display());

    for anomaly in &report.anomalies {
        info!(
            "ALERT: {} - value: {} (threshold: {}) - file: {}",
            anomaly.kind, anomaly.value, anomaly.threshold, anomaly.file
        );
    }

    Ok(MonitorOutcome::Written { path, report })
}

fn local_hostname() -> String {
    hostname::get()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "unknown".to_string())
}
