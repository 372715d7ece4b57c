//! Application configuration assembled from the environment.

/// Database configuration and connection management
pub mod database;

/// Seed data loading from the TOML seed file
pub mod seed;

/// HTTP server binding configuration
pub mod server;

use crate::errors::Result;
use server::ServerConfig;
use std::path::PathBuf;

/// Default seed file location when `ROSTER_SEED_FILE` is not set.
pub const DEFAULT_SEED_FILE: &str = "config.toml";

/// Top-level configuration for the service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Database connection URL
    pub database_url: String,
    /// HTTP binding
    pub server: ServerConfig,
    /// Path of the optional TOML seed file
    pub seed_file: PathBuf,
}

impl AppConfig {
    /// Loads configuration from environment variables (after `.env` has been read).
    ///
    /// # Errors
    /// Returns an error if any variable holds an invalid value.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: database::get_database_url(),
            server: ServerConfig::from_env()?,
            seed_file: std::env::var("ROSTER_SEED_FILE")
                .map_or_else(|_| PathBuf::from(DEFAULT_SEED_FILE), PathBuf::from),
        })
    }
}
