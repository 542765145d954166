//! Routing error types

use thiserror::Error;

/// Result type for routing operations
pub type Result<T> = std::result::Result<T, RoutingError>;

/// Errors from building or querying a routing table
///
/// All of these are configuration errors: retrying cannot fix them.
#[derive(Debug, Error)]
pub enum RoutingError {
    /// Rule pattern is not a valid regular expression
    #[error("routing rule '{name}' has invalid pattern: {source}")]
    InvalidPattern {
        /// Name of the offending rule
        name: String,
        /// Regex compilation error
        #[source]
        source: regex::Error,
    },

    /// Rule capacity cannot hold any arena
    #[error("routing rule '{name}' has invalid capacity {capacity}")]
    InvalidCapacity {
        /// Name of the offending rule
        name: String,
        /// Configured capacity
        capacity: usize,
    },

    /// Two rules share a name
    #[error("duplicate routing rule '{name}'")]
    DuplicateRule {
        /// The repeated name
        name: String,
    },

    /// Table has no rules at all
    #[error("routing table has no rules")]
    Empty,

    /// No rule matches the log type and there is no catch-all
    #[error("no routing rule matches log type '{log_type}'")]
    NoMatchingRule {
        /// Log type that failed to resolve
        log_type: String,
    },
}

impl RoutingError {
    /// Create an InvalidPattern error
    #[inline]
    pub fn invalid_pattern(name: impl Into<String>, source: regex::Error) -> Self {
        Self::InvalidPattern {
            name: name.into(),
            source,
        }
    }

    /// Create an InvalidCapacity error
    #[inline]
    pub fn invalid_capacity(name: impl Into<String>, capacity: usize) -> Self {
        Self::InvalidCapacity {
            name: name.into(),
            capacity,
        }
    }

    /// Create a DuplicateRule error
    #[inline]
    pub fn duplicate_rule(name: impl Into<String>) -> Self {
        Self::DuplicateRule { name: name.into() }
    }

    /// Create a NoMatchingRule error
    #[inline]
    pub fn no_matching_rule(log_type: impl Into<String>) -> Self {
        Self::NoMatchingRule {
            log_type: log_type.into(),
        }
    }
}
