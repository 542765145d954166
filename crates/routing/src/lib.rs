//! logship - Routing
//!
//! Ordered `(regex, capacity)` rules deciding how large the arenas of a
//! stream are. Rules are compiled once when the table is built; lookups are
//! a linear scan where the first rule whose pattern matches the whole log
//! type wins.
//!
//! # Design
//!
//! Resolution happens once per new stream identity (the arena manager caches
//! the result), so the regex scan stays off the per-row hot path.
//!
//! # Example
//!
//! ```
//! use logship_routing::RoutingTable;
//!
//! let table = RoutingTable::builder()
//!     .rule("audit", "audit\\..*", 1024 * 1024)
//!     .unwrap()
//!     .rule("default", ".*", 64 * 1024)
//!     .unwrap()
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(table.resolve("audit.login").unwrap(), 1024 * 1024);
//! assert_eq!(table.resolve("nginx").unwrap(), 64 * 1024);
//! ```

mod error;
mod table;


pub use error::{Result, RoutingError};
pub use table::{RoutingRule, RoutingTable, RoutingTableBuilder};
