//! logship Configuration
//!
//! TOML-based configuration loading with sensible defaults.
//! An empty file is a valid configuration: one catch-all route, a one-second
//! flush timer and console logging at `info`.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use logship_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[shipper]\nmax_ready_entries = 16").unwrap();
//! assert_eq!(config.shipper.max_ready_entries, 16);
//! ```
//!
//! # Example Config
//!
//! ```toml
//! [log]
//! level = "info"
//! format = "console"
//!
//! [shipper]
//! flush_interval_ms = 1000
//! max_ready_entries = 64
//! protocol_version = 2
//!
//! [[routes]]
//! name = "audit"
//! pattern = "audit\\..*"
//! capacity = 1048576
//!
//! [[routes]]
//! name = "default"
//! pattern = ".*"
//! capacity = 262144
//! ```

mod error;
mod logging;
mod routes;
mod shipper;
mod validation;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use error::{ConfigError, Result};
pub use logging::{LogConfig, LogFormat, LogLevel, LogOutput};
pub use routes::RouteConfig;
pub use shipper::ShipperConfig;

use logship_routing::RoutingTable;
use serde::Deserialize;

/// Main configuration structure
///
/// All sections are optional with sensible defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub log: LogConfig,

    /// Send timer and backpressure settings
    pub shipper: ShipperConfig,

    /// Routing rules (log type → arena capacity), first match wins
    pub routes: Vec<RouteConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log: LogConfig::default(),
            shipper: ShipperConfig::default(),
            routes: routes::default_routes(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read, contains invalid TOML or fails
    /// validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    ///
    /// Prefer using the `FromStr` trait implementation.
    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }

    /// Compile the configured routes into a routing table
    pub fn routing_table(&self) -> Result<RoutingTable> {
        routes::build_table(&self.routes)
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
