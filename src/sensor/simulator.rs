/// Simulated weather sensor producing random readings
use log::info;
use rand::Rng;
use std::ops::RangeInclusive;
use tokio::time::{sleep, Duration};

use crate::models::{Reading, Status};
use crate::utils::{now_local, round_to_tenth};

// Sampling ranges for each measurement
pub const TEMPERATURE_RANGE: RangeInclusive<f64> = 15.0..=35.0; // °C
pub const HUMIDITY_RANGE: RangeInclusive<f64> = 30.0..=90.0; // %
pub const WIND_SPEED_RANGE: RangeInclusive<f64> = 0.0..=100.0; // km/h
pub const PRESSURE_RANGE: RangeInclusive<f64> = 990.0..=1030.0; // hPa

/// Generate one reading from the thread-local random source
pub fn generate() -> Reading {
    generate_with(&mut rand::thread_rng())
}

/// Generate one reading from the given random source
///
/// Every measurement is drawn uniformly from its range and rounded to one
/// decimal place; the status is drawn uniformly from [`Status::ALL`].
pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Reading {
    Reading {
        timestamp: now_local(),
        temperature: round_to_tenth(rng.gen_range(TEMPERATURE_RANGE)),
        humidity: round_to_tenth(rng.gen_range(HUMIDITY_RANGE)),
        wind_speed: round_to_tenth(rng.gen_range(WIND_SPEED_RANGE)),
        pressure: round_to_tenth(rng.gen_range(PRESSURE_RANGE)),
        status: Status::ALL[rng.gen_range(0..Status::ALL.len())],
    }
}

/// Collect a reading as if it came from a remote station
///
/// Waits `latency` to imitate the network round trip before sampling.
pub async fn collect(latency: Duration) -> Reading {
    info!("Collecting data...");

    // Simulate network delay
    sleep(latency).await;

    let reading = generate();
    info!(
        "Collected data: temp={:.1}°C, humidity={:.1}%, wind={:.1} km/h, pressure={:.1} hPa, status={}",
        reading.temperature, reading.humidity, reading.wind_speed, reading.pressure, reading.status
    );
    reading
}
