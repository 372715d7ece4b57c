//! HTTP server binding configuration.

use crate::errors::{Error, Result};
use std::net::{IpAddr, SocketAddr};

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host name or IP address to bind
    pub host: String,
    /// TCP port to bind
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// Reads `ROSTER_HOST` and `ROSTER_PORT`, falling back to the defaults.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if `ROSTER_PORT` is not a valid port number.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let host = std::env::var("ROSTER_HOST").unwrap_or(defaults.host);
        let port = match std::env::var("ROSTER_PORT") {
            Ok(value) => parse_port(&value)?,
            Err(_) => defaults.port,
        };
        Ok(Self { host, port })
    }

    /// Resolves the configured host and port into a socket address.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the host is neither `localhost` nor an IP address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self.host.parse().map_err(|e| Error::Config {
            message: format!("ROSTER_HOST must be an IPv4 or IPv6 address: {e}"),
        })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

fn parse_port(value: &str) -> Result<u16> {
    value.trim().parse::<u16>().map_err(|_| Error::Config {
        message: format!("ROSTER_PORT must be a valid port number, got '{value}'"),
    })
}
