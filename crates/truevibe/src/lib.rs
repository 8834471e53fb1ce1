pub mod config;
pub mod error;
pub mod scorecards;
pub mod telemetry;
