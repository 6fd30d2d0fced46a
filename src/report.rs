/// Summary report over the most recent stored readings
use anyhow::{Context, Result};
use log::{error, info, warn};
use std::path::{Path, PathBuf};

use crate::models::{Reading, Report};
use crate::storage::{list_readings, load_reading, stamped_file_name, write_json};
use crate::utils::{mean, now_local};

/// How many of the newest readings a report covers
pub const REPORT_WINDOW: usize = 10;

const REPORT_PREFIX: &str = "report_";

/// What a report pass ended up doing
#[derive(Debug)]
pub enum ReportOutcome {
    /// No reading files in the directory
    NoData,
    /// Reading files exist but none of the selected ones could be parsed
    Unparsable { candidates: usize },
    Written { path: PathBuf, report: Report },
    /// Unexpected failure, already logged
    Failed,
}

/// Build a report from readings in list order
///
/// Returns `None` for an empty slice. `latest_status` comes from the last
/// reading.
pub fn summarize(readings: &[Reading]) -> Option<Report> {
    let latest = readings.last()?;
    let avg_temperature = mean(readings.iter().map(|r| r.temperature))?;
    let avg_humidity = mean(readings.iter().map(|r| r.humidity))?;

    Some(Report {
        timestamp: now_local(),
        data_points: readings.len(),
        avg_temperature,
        avg_humidity,
        latest_status: latest.status,
    })
}

/// Generate a report from the newest readings in `dir`
///
/// Never fails: unexpected errors are logged with their full chain and
/// reported as [`ReportOutcome::Failed`].
pub async fn generate_report(dir: &Path) -> ReportOutcome {
    match try_generate_report(dir).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Failed to generate report: {:?}", e);
            ReportOutcome::Failed
        }
    }
}

async fn try_generate_report(dir: &Path) -> Result<ReportOutcome> {
    let names = list_readings(dir)
        .await
        .context("Failed to list reading files")?;

    if names.is_empty() {
        warn!("No data available to generate a report");
        return Ok(ReportOutcome::NoData);
    }

    let selected = &names[names.len().saturating_sub(REPORT_WINDOW)..];

    let mut readings = Vec::with_capacity(selected.len());
    for name in selected {
        match load_reading(&dir.join(name)).await {
            Ok(reading) => readings.push(reading),
            Err(e) => error!("Error reading file {}: {}", name, e),
        }
    }

    let report = match summarize(&readings) {
        Some(report) => report,
        None => {
            warn!(
                "Found {} data file(s) but none could be parsed, skipping report",
                selected.len()
            );
            return Ok(ReportOutcome::Unparsable {
                candidates: selected.len(),
            });
        }
    };

    let file_name = stamped_file_name(REPORT_PREFIX, &report.timestamp);
    let path = write_json(dir, &file_name, &report, 0)
        .await
        .context("Failed to write report")?;

    info!("Report generated and saved to {}", path.display());
    info!(
        "Summary: {} data points, avg temperature {:.2}°C, avg humidity {:.2}%, latest status {}",
        report.data_points, report.avg_temperature, report.avg_humidity, report.latest_status
    );

    Ok(ReportOutcome::Written { path, report })
}
