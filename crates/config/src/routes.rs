//! Route configuration
//!
//! Routes map log types to arena capacities. They are evaluated in order;
//! the first pattern matching the whole log type wins.
//!
//! # Example
//!
//! ```toml
//! [[routes]]
//! name = "audit"
//! pattern = "audit\\..*"
//! capacity = 1048576
//!
//! [[routes]]
//! name = "default"
//! pattern = ".*"
//! capacity = 262144
//! ```

use logship_protocol::DEFAULT_ARENA_CAPACITY;
use logship_routing::{RoutingTable, RoutingTableBuilder};
use serde::Deserialize;

use crate::Result;

/// One routing rule as written in configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RouteConfig {
    /// Unique rule name
    pub name: String,

    /// Regular expression matched against the whole log type
    pub pattern: String,

    /// Arena capacity in bytes
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl RouteConfig {
    /// Route matching every log type with the default capacity
    pub fn catch_all() -> Self {
        Self {
            name: "default".into(),
            pattern: ".*".into(),
            capacity: DEFAULT_ARENA_CAPACITY,
        }
    }
}

fn default_capacity() -> usize {
    DEFAULT_ARENA_CAPACITY
}

pub(crate) fn default_routes() -> Vec<RouteConfig> {
    vec![RouteConfig::catch_all()]
}

/// Compile routes into a routing table, preserving their order
pub(crate) fn build_table(routes: &[RouteConfig]) -> Result<RoutingTable> {
    let builder = routes
        .iter()
        .try_fold(RoutingTableBuilder::new(), |builder, route| {
            builder.rule(route.name.as_str(), route.pattern.as_str(), route.capacity)
        })?;
    Ok(builder.build()?)
}
