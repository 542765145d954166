//! logship - Shipper
//!
//! Moves closed arenas from an [`ArenaManager`](logship_pipeline::ArenaManager)
//! to an external [`Transport`], on a timer and on demand, and reports a
//! polled [`Availability`] signal for backpressure.
//!
//! # Example
//!
//! ```ignore
//! let manager = Arc::new(ArenaManager::new(config.routing_table()?));
//! let shipper = Shipper::start(Arc::clone(&manager), transport, &config.shipper);
//!
//! if shipper.availability().is_operational() {
//!     manager.put(&identity, row)?;
//! }
//!
//! shipper.close().await?;
//! ```

mod availability;
mod error;
mod metrics;
mod shipper;
mod transport;

pub use availability::{Availability, FailureCauses};
pub use error::{Result, ShipperError, TransportError};
pub use metrics::{ShipperMetrics, ShipperMetricsSnapshot};
pub use shipper::Shipper;
pub use transport::{Health, Transport};
