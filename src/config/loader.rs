/// Configuration loading from an optional TOML file plus PANCHANG__* env vars
use std::path::Path;

use crate::error::{PanchangError, Result};
use crate::types::{Config, Location};

/// Upper bound for the Ekadashi scan cap (ten years)
const MAX_SCAN_DAYS: u32 = 3660;

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let settings = ::config::Config::builder()
        .add_source(::config::File::from(path.as_ref()).required(false))
        .add_source(
            ::config::Environment::with_prefix("PANCHANG")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: Config = settings.try_deserialize()?;

    // Validate config
    validate_config(&config)?;

    Ok(config)
}

pub fn validate_config(config: &Config) -> Result<()> {
    // Location must resolve to a real zone and valid coordinates
    Location::try_from(&config.location)
        .map_err(|e| PanchangError::Config(format!("Invalid location: {}", e)))?;

    if config.ekadashi_scan_days == 0 || config.ekadashi_scan_days > MAX_SCAN_DAYS {
        return Err(PanchangError::Config(format!(
            "Invalid ekadashi_scan_days: {} (expected 1..={})",
            config.ekadashi_scan_days, MAX_SCAN_DAYS
        )));
    }

    if config.log_level.trim().is_empty() {
        return Err(PanchangError::Config("log_level is empty".to_string()));
    }

    if let Some(path) = &config.festival_rules_path {
        if path.trim().is_empty() {
            return Err(PanchangError::Config("festival_rules_path is empty".to_string()));
        }
    }

    Ok(())
}
