//! Configuration error types

use std::io;

use logship_routing::RoutingError;
use thiserror::Error;

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur when loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("failed to read config file '{path}': {source}")]
    IoError {
        /// Path to the file
        path: String,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// No routes configured
    #[error("no routes are configured - at least one route is required")]
    NoRoutes,

    /// Two routes share a name
    #[error("route '{name}' is defined more than once")]
    DuplicateRoute {
        /// The repeated name
        name: String,
    },

    /// Validation error - invalid value
    #[error("{component} '{name}' has invalid {field}: {message}")]
    InvalidValue {
        /// Component type
        component: &'static str,
        /// Name of the component
        name: String,
        /// Field name
        field: &'static str,
        /// Error message
        message: String,
    },

    /// Routes could not be compiled into a routing table
    #[error("invalid routing: {0}")]
    Routing(#[from] RoutingError),
}

impl ConfigError {
    /// Create a DuplicateRoute error
    pub fn duplicate_route(name: impl Into<String>) -> Self {
        Self::DuplicateRoute { name: name.into() }
    }

    /// Create an InvalidValue error
    pub fn invalid_value(
        component: &'static str,
        name: impl Into<String>,
        field: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            component,
            name: name.into(),
            field,
            message: message.into(),
        }
    }
}
