//! logship - Pipeline
//!
//! The producer side of the shipper: rows go in, closed arenas come out.
//!
//! # Architecture
//!
//! ```text
//! [Producers]                  [ArenaManager]                      [Shipper]
//!   put(id, row) ──┐     RoutingTable (cached per identity)
//!   put(id, row) ──┼──→  identity → current ByteArena ──rollover──→ ReadyQueue ──→ take_ready()
//!   put(id, row) ──┘           ↑                        flush ──→   (FIFO, ids)        │
//!                          ArenaPool  ←─────────────────── release ←──────────────────┘
//! ```
//!
//! # Key Design
//!
//! - **Fixed-size arenas**: capacity comes from the routing table and never grows
//! - **Pooling**: shipped arenas are reused for streams of the same capacity
//! - **Ordered ids**: digestion ids are process-wide and strictly increasing,
//!   and the ready queue hands arenas out in id order
//! - **Whole rows**: a row that cannot fit an empty arena is rejected, never split
//!
//! # Example
//!
//! ```
//! use logship_pipeline::ArenaManager;
//! use logship_protocol::{ColumnTag, StreamIdentity};
//! use logship_routing::RoutingTable;
//!
//! let manager = ArenaManager::new(RoutingTable::catch_all(4096).unwrap());
//! let identity = StreamIdentity::builder("app")
//!     .typed_column("line", &[ColumnTag::String])
//!     .build()
//!     .unwrap();
//!
//! manager.put(&identity, b"hello").unwrap();
//!
//! let mut frames = Vec::new();
//! manager
//!     .for_each_ready(|entry| frames.push(entry.frame().to_vec()))
//!     .unwrap();
//! assert_eq!(frames.len(), 1);
//! ```

mod error;
mod manager;
mod metrics;
mod pool;
mod ready;

pub use error::{PipelineError, Result};
pub use manager::ArenaManager;
pub use metrics::{ManagerMetrics, ManagerMetricsSnapshot, PoolMetrics, PoolMetricsSnapshot};
pub use pool::ArenaPool;
pub use ready::{ReadyArena, ReadyQueue};
