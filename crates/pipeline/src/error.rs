//! Pipeline error types

use logship_protocol::ProtocolError;
use logship_routing::RoutingError;
use thiserror::Error;

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Arena or header encoding failed
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The log type has no route
    #[error(transparent)]
    Routing(#[from] RoutingError),

    /// Row can never fit an arena of its stream, even an empty one
    #[error("row of {len} bytes exceeds usable capacity {max} for stream '{identity}'")]
    RowTooLarge {
        /// Display form of the stream identity
        identity: String,
        /// Row length in bytes
        len: usize,
        /// Usable arena capacity (capacity minus header)
        max: usize,
    },
}

impl PipelineError {
    /// Create a RowTooLarge error
    #[inline]
    pub fn row_too_large(identity: impl ToString, len: usize, max: usize) -> Self {
        Self::RowTooLarge {
            identity: identity.to_string(),
            len,
            max,
        }
    }

    /// Check if this error comes from configuration (routes or identity size)
    ///
    /// Such errors repeat for every row of the stream.
    pub fn is_fatal_config(&self) -> bool {
        match self {
            Self::Protocol(e) => e.is_fatal_config(),
            Self::Routing(_) => true,
            Self::RowTooLarge { .. } => false,
        }
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PipelineError::row_too_large("nginx", 100, 52);
        assert!(err.to_string().contains("100 bytes"));
        assert!(err.to_string().contains("capacity 52"));
        assert!(err.to_string().contains("nginx"));

        let err: PipelineError = RoutingError::no_matching_rule("app").into();
        assert!(err.to_string().contains("app"));

        let err: PipelineError = ProtocolError::header_too_large(80, 64).into();
        assert!(err.to_string().contains("80"));
    }

    #[test]
    fn test_fatal_config_classification() {
        assert!(PipelineError::from(RoutingError::no_matching_rule("x")).is_fatal_config());
        assert!(PipelineError::from(ProtocolError::header_too_large(80, 64)).is_fatal_config());
        assert!(!PipelineError::row_too_large("x", 2, 1).is_fatal_config());
        assert!(!PipelineError::from(ProtocolError::ArenaClosed { digestion_id: 3 }).is_fatal_config());
    }
}
