pub mod files;
pub mod operations;

use std::path::PathBuf;
use thiserror::Error;

pub use files::execute_with_retry;
pub use operations::{
    list_readings, load_reading, reading_file_name, save_reading, stamped_file_name, write_json,
};

/// Prefix and extension shared by all reading files
pub const READING_PREFIX: &str = "data_";
pub const JSON_EXTENSION: &str = ".json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid reading in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}
