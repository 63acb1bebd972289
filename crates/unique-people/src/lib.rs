pub mod config;
pub mod error;
pub mod people;
pub mod telemetry;
