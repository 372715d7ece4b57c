//! Seed data loading from a TOML file.
//!
//! The employees and duties listed in the seed file are inserted at startup when
//! they are not already present. See `crate::core::seed` for the insertion rules.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the whole seed file
#[derive(Debug, Default, Deserialize)]
pub struct SeedConfig {
    /// Personnel to seed
    #[serde(default)]
    pub employees: Vec<EmployeeSeed>,
    /// Duty types to seed
    #[serde(default)]
    pub duties: Vec<DutySeed>,
}

/// Seed entry for a single employee
#[derive(Debug, Deserialize, Clone)]
pub struct EmployeeSeed {
    /// External employee code, used to detect existing rows
    pub employee_code: String,
    /// Full name
    pub name: String,
    /// Rank or designation
    pub designation: String,
    /// Contact number
    pub mobile_number: String,
}

/// Seed entry for a single duty type
#[derive(Debug, Deserialize, Clone)]
pub struct DutySeed {
    /// Duty label, used (ignoring case) to detect existing rows
    pub duty_type: String,
    /// Longer description of the duty
    pub description: String,
    /// Whether this is a standing duty
    #[serde(default)]
    pub is_permanent: bool,
}

/// Parses seed configuration from TOML text.
///
/// # Errors
/// Returns [`Error::Config`] if the TOML syntax is invalid or required fields are missing.
pub fn parse_seed_config(contents: &str) -> Result<SeedConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse seed file: {e}"),
    })
}

/// Loads seed configuration from a TOML file.
///
/// Returns `Ok(None)` when the file does not exist, so seeding is optional.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_seed_config<P: AsRef<Path>>(path: P) -> Result<Option<SeedConfig>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read seed file {}: {e}", path.display()),
    })?;

    parse_seed_config(&contents).map(Some)
}
