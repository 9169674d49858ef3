//! Application configuration module.
//!
//! Loads the TOML config file holding API settings, fetch sizes, filter
//! thresholds and output paths.

#[allow(clippy::module_inception)]
mod config;

#[allow(clippy::module_name_repetitions)]
pub use config::AppConfig;
