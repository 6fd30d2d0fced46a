use serde::{Deserialize, Serialize};
use std::fmt;
use time::PrimitiveDateTime;

use crate::utils::iso_timestamp;

/// Sky condition reported with every reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Sunny,
    Cloudy,
    Rainy,
    Windy,
    Stormy,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::Sunny,
        Status::Cloudy,
        Status::Rainy,
        Status::Windy,
        Status::Stormy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Sunny => "sunny",
            Status::Cloudy => "cloudy",
            Status::Rainy => "rainy",
            Status::Windy => "windy",
            Status::Stormy => "stormy",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One simulated sensor sample, stored as `data_<stamp>.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    #[serde(with = "iso_timestamp")]
    pub timestamp: PrimitiveDateTime,
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub pressure: f64,
    pub status: Status,
}

/// Summary over the most recent readings, stored as `report_<stamp>.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(with = "iso_timestamp")]
    pub timestamp: PrimitiveDateTime,
    pub data_points: usize,
    pub avg_temperature: f64,
    pub avg_humidity: f64,
    pub latest_status: Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    HighTemperature,
    LowTemperature,
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnomalyKind::HighTemperature => f.write_str("high_temperature"),
            AnomalyKind::LowTemperature => f.write_str("low_temperature"),
        }
    }
}

/// A reading whose temperature crossed one of the monitor thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub file: String,
    #[serde(rename = "type")]
    pub kind: AnomalyKind,
    pub value: f64,
    pub threshold: f64,
    #[serde(with = "iso_timestamp")]
    pub timestamp: PrimitiveDateTime,
}

/// Output of one monitor pass, stored as `anomalies_<stamp>.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyReport {
    #[serde(with = "iso_timestamp")]
    pub timestamp: PrimitiveDateTime,
    pub hostname: String,
    pub anomalies_count: usize,
    pub anomalies: Vec<Anomaly>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_reading_json_layout() {
        let reading = Reading {
            timestamp: datetime!(2024-06-01 12:30:00.250000),
            temperature: 21.4,
            humidity: 55.0,
            wind_speed: 12.3,
            pressure: 1012.8,
            status: Status::Cloudy,
        };

        let value = serde_json::to_value(&reading).unwrap();
        assert_eq!(value["timestamp"], "2024-06-01T12:30:00.250000");
        assert_eq!(value["temperature"], 21.4);
        assert_eq!(value["status"], "cloudy");
    }

    #[test]
    fn test_reading_rejects_unknown_status() {
        let raw = r#"{
            "timestamp": "2024-06-01T12:30:00",
            "temperature": 21.4,
            "humidity": 55.0,
            "wind_speed": 12.3,
            "pressure": 1012.8,
            "status": "foggy"
        }"#;
        assert!(serde_json::from_str::<Reading>(raw).is_err());
    }

    #[test]
    fn test_anomaly_kind_serializes_as_type() {
        let anomaly = Anomaly {
            file: "data_20240601_123000.json".to_string(),
            kind: AnomalyKind::HighTemperature,
            value: 33.1,
            threshold: 30.0,
            timestamp: datetime!(2024-06-01 12:30:00),
        };

        let value = serde_json::to_value(&anomaly).unwrap();
        assert_eq!(value["type"], "high_temperature");
        assert_eq!(AnomalyKind::LowTemperature.to_string(), "low_temperature");
    }

    #[test]
    fn test_status_names() {
        let names: Vec<&str> = Status::ALL.iter().map(Status::as_str).collect();
        assert_eq!(names, ["sunny", "cloudy", "rainy", "windy", "stormy"]);
    }
}
