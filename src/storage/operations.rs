/// File operations for storing and loading readings
use log::{error, info};
use serde::Serialize;
use std::path::{Path, PathBuf};
use time::PrimitiveDateTime;
use tokio::fs;

use crate::models::Reading;
use crate::storage::files::execute_with_retry;
use crate::storage::{StoreError, JSON_EXTENSION, READING_PREFIX};
use crate::utils::file_stamp;

/// File name `<prefix><YYYYMMDD_HHMMSS>.json` for the given time
pub fn stamped_file_name(prefix: &str, dt: &PrimitiveDateTime) -> String {
    format!("{}{}{}", prefix, file_stamp(dt), JSON_EXTENSION)
}

/// File name of a reading, derived from its own timestamp
pub fn reading_file_name(reading: &Reading) -> String {
    stamped_file_name(READING_PREFIX, &reading.timestamp)
}

/// Write a value as pretty-printed JSON into `dir/file_name`
///
/// The directory (and its parents) is created before every attempt, so a
/// missing or freshly removed directory is not an error.
pub async fn write_json<T: Serialize>(
    dir: &Path,
    file_name: &str,
    value: &T,
    max_retries: u32,
) -> Result<PathBuf, StoreError> {
    let path = dir.join(file_name);
    let body = serde_json::to_string_pretty(value).map_err(|source| StoreError::Encode {
        path: path.clone(),
        source,
    })?;

    let description = format!("writing {}", path.display());
    let target = path.as_path();
    let contents = body.as_bytes();
    execute_with_retry(&description, max_retries, move || async move {
        fs::create_dir_all(dir)
            .await
            .map_err(|e| StoreError::io(dir, e))?;
        fs::write(target, contents)
            .await
            .map_err(|e| StoreError::io(target, e))
    })
    .await?;

    Ok(path)
}

/// Save a reading to `dir`, returning whether it reached the disk
///
/// Failures are logged and never propagated. Readings from the same second
/// share a file name, so the later one replaces the earlier.
pub async fn save_reading(reading: &Reading, dir: &Path, max_retries: u32) -> bool {
    match write_json(dir, &reading_file_name(reading), reading, max_retries).await {
        Ok(path) => {
            info!("Data saved to {}", path.display());
            true
        }
        Err(e) => {
            error!("Failed to save data: {}", e);
            false
        }
    }
}

/// Load a single reading file
pub async fn load_reading(path: &Path) -> Result<Reading, StoreError> {
    let raw = fs::read(path)
        .await
        .map_err(|e| StoreError::io(path, e))?;

    serde_json::from_slice(&raw).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// List the names of all reading files in `dir`, oldest first
///
/// Names embed a zero-padded timestamp, so lexicographic order is
/// chronological order.
pub async fn list_readings(dir: &Path) -> Result<Vec<String>, StoreError> {
    let mut entries = fs::read_dir(dir)
        .await
        .map_err(|e| StoreError::io(dir, e))?;

    let mut names = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| StoreError::io(dir, e))?
    {
        // Skip names that are not valid UTF-8
        if let Ok(name) = entry.file_name().into_string() {
            if name.starts_with(READING_PREFIX) && name.ends_with(JSON_EXTENSION) {
                names.push(name);
            }
        }
    }

    names.sort();
    Ok(names)
}
