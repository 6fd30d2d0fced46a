use anyhow::{anyhow, Context, Result};
use log::LevelFilter;
use std::env;
use std::path::PathBuf;

const DEFAULT_LOG_LEVEL: &str = "INFO";
const DEFAULT_DATA_DIR: &str = "./data";
const DEFAULT_MAX_RETRIES: &str = "3";
const DEFAULT_API_KEY: &str = "default-key";
const DEFAULT_MAX_TEMP: &str = "30";
const DEFAULT_MIN_TEMP: &str = "10";

/// Settings for one collection run, read from the environment
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub log_level: LevelFilter,
    pub data_dir: PathBuf,
    /// Extra write attempts the store makes after a failed save
    pub max_retries: u32,
    /// Only ever logged in masked form
    pub api_key: String,
}

impl RunnerConfig {
    pub fn new() -> Result<Self> {
        // Load environment variables
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_level = parse_log_level(
            &lookup("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        )?;

        let data_dir =
            PathBuf::from(lookup("DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()));

        let max_retries = lookup("MAX_RETRIES")
            .unwrap_or_else(|| DEFAULT_MAX_RETRIES.to_string())
            .trim()
            .parse()
            .context("Invalid MAX_RETRIES")?;

        let api_key = lookup("EXAMPLE_API_KEY").unwrap_or_else(|| DEFAULT_API_KEY.to_string());

        Ok(RunnerConfig {
            log_level,
            data_dir,
            max_retries,
            api_key,
        })
    }
}

/// Settings for the anomaly monitor
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub log_level: LevelFilter,
    pub data_dir: PathBuf,
    pub thresholds: Thresholds,
}

/// Temperature bounds outside of which a reading is reported
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub max_temp: f64,
    pub min_temp: f64,
}

impl MonitorConfig {
    pub fn new() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_level = parse_log_level(
            &lookup("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        )?;

        let data_dir =
            PathBuf::from(lookup("DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()));

        let max_temp = lookup("MAX_TEMP")
            .unwrap_or_else(|| DEFAULT_MAX_TEMP.to_string())
            .trim()
            .parse()
            .context("Invalid MAX_TEMP")?;

        let min_temp = lookup("MIN_TEMP")
            .unwrap_or_else(|| DEFAULT_MIN_TEMP.to_string())
            .trim()
            .parse()
            .context("Invalid MIN_TEMP")?;

        Ok(MonitorConfig {
            log_level,
            data_dir,
            thresholds: Thresholds { max_temp, min_temp },
        })
    }
}

/// Map a level name to a filter, accepting the WARNING/CRITICAL spellings too
pub fn parse_log_level(value: &str) -> Result<LevelFilter> {
    let name = value.trim().to_ascii_uppercase();
    match name.as_str() {
        "WARNING" => Ok(LevelFilter::Warn),
        "CRITICAL" => Ok(LevelFilter::Error),
        _ => name
            .parse()
            .map_err(|_| anyhow!("Invalid LOG_LEVEL: '{}'", value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = RunnerConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.log_level, LevelFilter::Info);
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.api_key, "default-key");
    }

    #[test]
    fn test_config_overrides() {
        let config = RunnerConfig::from_lookup(lookup_from(&[
            ("LOG_LEVEL", "debug"),
            ("DATA_DIR", "/tmp/t1"),
            ("MAX_RETRIES", "0"),
            ("EXAMPLE_API_KEY", "secret-value"),
        ]))
        .unwrap();

        assert_eq!(config.log_level, LevelFilter::Debug);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/t1"));
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.api_key, "secret-value");
    }

    #[test]
    fn test_invalid_max_retries() {
        let err = RunnerConfig::from_lookup(lookup_from(&[("MAX_RETRIES", "lots")])).unwrap_err();
        assert!(err.to_string().contains("MAX_RETRIES"));

        assert!(RunnerConfig::from_lookup(lookup_from(&[("MAX_RETRIES", "-1")])).is_err());
    }

    #[test]
    fn test_log_level_names() {
        assert_eq!(parse_log_level("INFO").unwrap(), LevelFilter::Info);
        assert_eq!(parse_log_level("WARNING").unwrap(), LevelFilter::Warn);
        assert_eq!(parse_log_level("warn").unwrap(), LevelFilter::Warn);
        assert_eq!(parse_log_level("CRITICAL").unwrap(), LevelFilter::Error);
        assert_eq!(parse_log_level("off").unwrap(), LevelFilter::Off);
        assert!(parse_log_level("LOUD").is_err());
    }

    #[test]
    fn test_monitor_thresholds() {
        let config = MonitorConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(
            config.thresholds,
            Thresholds {
                max_temp: 30.0,
                min_temp: 10.0
            }
        );

        let config =
            MonitorConfig::from_lookup(lookup_from(&[("MAX_TEMP", "28.5"), ("MIN_TEMP", "16")]))
                .unwrap();
        assert_eq!(config.thresholds.max_temp, 28.5);
        assert_eq!(config.thresholds.min_temp, 16.0);

        assert!(MonitorConfig::from_lookup(lookup_from(&[("MIN_TEMP", "cold")])).is_err());
    }
}
