//! logship - Receiver
//!
//! The receiving end of the wire: checks the protocol version and the
//! listener's availability, decodes the arena frame and forwards the stream
//! identity and rows to a [`Listener`].
//!
//! Versions 1 and 2 share the frame layout and decode identically.

mod error;
mod listener;
mod metrics;
mod receiver;

pub use error::{ReceiverError, Result};
pub use listener::{Listener, ProtocolStatus};
pub use metrics::{ReceiverMetrics, ReceiverMetricsSnapshot};
pub use receiver::Receiver;
