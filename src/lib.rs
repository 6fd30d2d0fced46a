pub mod config;
pub mod models;
pub mod monitor;
pub mod report;
pub mod runner;
pub mod sensor;
pub mod storage;
pub mod utils;
