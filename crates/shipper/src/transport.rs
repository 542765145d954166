//! Transport abstraction
//!
//! The shipper hands complete frames to a `Transport`; connection handling,
//! retries and TLS belong to the implementation.

use async_trait::async_trait;

use crate::error::TransportError;

/// Transport health for one type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Health {
    #[default]
    Operational,
    Failed,
}

impl Health {
    #[inline]
    pub fn is_operational(self) -> bool {
        self == Self::Operational
    }
}

/// Outbound frame transport
///
/// Implementations must be cheap to call concurrently from the shipper's
/// timer task and from `close()`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one complete frame
    ///
    /// `frame` borrows the arena; copy it if it must outlive the call.
    async fn send(&self, type_tag: u8, version: u16, frame: &[u8]) -> Result<(), TransportError>;

    /// Current health for frames of `type_tag`
    fn health(&self, type_tag: u8) -> Health;

    /// Transport name for logging
    fn name(&self) -> &'static str {
        "transport"
    }
}
