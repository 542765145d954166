//! Shipper error types

use logship_pipeline::PipelineError;
use thiserror::Error;

/// Errors reported by a transport
#[derive(Debug, Error)]
pub enum TransportError {
    /// Transport cannot reach its peer right now
    #[error("transport unavailable: {0}")]
    Unavailable(String),

    /// Peer refused the frame
    #[error("frame {digestion_id} rejected: {reason}")]
    Rejected {
        /// Digestion id of the refused frame (0 if unknown)
        digestion_id: u64,
        /// Peer-supplied reason
        reason: String,
    },

    /// I/O failure while sending
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport was shut down
    #[error("transport is closed")]
    Closed,
}

impl TransportError {
    /// Create an Unavailable error
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable(reason.into())
    }

    /// Create a Rejected error
    pub fn rejected(digestion_id: u64, reason: impl Into<String>) -> Self {
        Self::Rejected {
            digestion_id,
            reason: reason.into(),
        }
    }

    /// Check if resending the same frame can never succeed
    #[inline]
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// Shipper errors
#[derive(Debug, Error)]
pub enum ShipperError {
    /// Flushing or draining the arena manager failed
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// Transport refused a frame; it and every later frame were requeued
    #[error("send failed with {requeued} arena(s) requeued: {source}")]
    Send {
        /// Arenas put back on the ready queue
        requeued: usize,
        /// Transport error
        #[source]
        source: TransportError,
    },
}

/// Result type for shipper operations
pub type Result<T> = std::result::Result<T, ShipperError>;
