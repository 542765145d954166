//! Receiver error types

use logship_protocol::ProtocolError;
use thiserror::Error;

/// Result type for receiver operations
pub type Result<T> = std::result::Result<T, ReceiverError>;

/// Errors decoding an inbound frame
///
/// Unsupported versions and an unavailable sink are statuses, not errors;
/// see `ProtocolStatus`.
#[derive(Debug, Error)]
pub enum ReceiverError {
    /// Frame ended mid-field: the peer went away while sending
    #[error("connection closed mid-frame: {0}")]
    ConnectionClosed(#[source] ProtocolError),

    /// Frame is complete but malformed
    #[error("protocol error: {0}")]
    Protocol(#[source] ProtocolError),
}

impl ReceiverError {
    /// Classify a decode failure
    pub fn from_decode(err: ProtocolError) -> Self {
        if err.is_truncated() {
            Self::ConnectionClosed(err)
        } else {
            Self::Protocol(err)
        }
    }

    #[inline]
    pub fn is_connection_closed(&self) -> bool {
        matches!(self, Self::ConnectionClosed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncation_is_connection_closed() {
        let err = ReceiverError::from_decode(ProtocolError::truncated("log type", 5, 1));
        assert!(err.is_connection_closed());
        assert!(err.to_string().contains("connection closed"));
        assert!(err.to_string().contains("log type"));
    }

    #[test]
    fn test_malformed_is_protocol_error() {
        let err = ReceiverError::from_decode(ProtocolError::MalformedUtf { offset: 3 });
        assert!(!err.is_connection_closed());
        assert!(matches!(err, ReceiverError::Protocol(_)));
    }
}
