//! Receiver - decodes inbound frames and dispatches them to a listener
//!
//! Per frame:
//! 1. Unsupported protocol version → `InvalidVersion`, bytes untouched
//! 2. Listener unavailable → `SinkUnavailable`, bytes untouched
//! 3. Decode header and exactly `row length` payload bytes
//! 4. Hand the frame to the listener and return its status
//!
//! A frame that ends early is reported as `ConnectionClosed`; any other
//! decode failure as `Protocol`.

use std::sync::Arc;

use bytes::Bytes;
use logship_protocol::{DecodedFrame, is_supported_version};
use tracing::{debug, warn};

use crate::error::{ReceiverError, Result};
use crate::listener::{Listener, ProtocolStatus};
use crate::metrics::{ReceiverMetrics, ReceiverMetricsSnapshot};

/// Decodes frames for one listener
///
/// Safe to share across connections; each call handles one frame.
pub struct Receiver {
    listener: Arc<dyn Listener>,
    metrics: ReceiverMetrics,
}

impl Receiver {
    pub fn new(listener: Arc<dyn Listener>) -> Self {
        Self {
            listener,
            metrics: ReceiverMetrics::new(),
        }
    }

    /// Handle one inbound frame sent with protocol `version`
    ///
    /// # Errors
    ///
    /// `ConnectionClosed` for a truncated frame, `Protocol` for a malformed
    /// one. Rejections are returned as `Ok(status)`.
    pub fn receive(&self, version: u16, frame: Bytes) -> Result<ProtocolStatus> {
        if !is_supported_version(version) {
            self.metrics.record_invalid_version();
            debug!(version, "rejected frame with unsupported protocol version");
            return Ok(ProtocolStatus::InvalidVersion);
        }

        if !self.listener.is_available() {
            self.metrics.record_sink_unavailable();
            return Ok(ProtocolStatus::SinkUnavailable);
        }

        let frame_len = frame.len();
        let mut buf = frame;
        let decoded = match DecodedFrame::decode(&mut buf) {
            Ok(decoded) => decoded,
            Err(e) if e.is_truncated() => {
                self.metrics.record_truncated();
                warn!(version, frame_len, error = %e, "frame truncated, treating as closed connection");
                return Err(ReceiverError::ConnectionClosed(e));
            }
            Err(e) => {
                self.metrics.record_decode_error();
                return Err(ReceiverError::from_decode(e));
            }
        };

        if !buf.is_empty() {
            debug!(
                digestion_id = decoded.digestion_id,
                trailing = buf.len(),
                "ignoring bytes after row region"
            );
        }

        let row_length = decoded.row_length();
        let status = self.listener.on_frame(decoded);
        if status.is_ok() {
            self.metrics.record_frame(row_length);
        }
        Ok(status)
    }

    pub fn metrics(&self) -> ReceiverMetricsSnapshot {
        self.metrics.snapshot()
    }
}

impl std::fmt::Debug for Receiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Receiver")
            .field("metrics", &self.metrics.snapshot())
            .finish()
    }
}

#[cfg(test)]
#[path = "receiver_test.rs"]
mod receiver_test;
