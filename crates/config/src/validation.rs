//! Configuration validation
//!
//! Validates config consistency:
//! - At least one route, with unique names
//! - Route patterns compile
//! - Route capacities can hold the reserved header and fit the length slot
//! - Shipper backpressure threshold and protocol version are usable

use std::collections::HashSet;

use logship_protocol::{MAX_ARENA_CAPACITY, RESERVED_HEADER_LEN, is_supported_version};

use crate::Config;
use crate::error::{ConfigError, Result};
use crate::routes::build_table;

/// Validate the entire configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_routes(config)?;
    validate_shipper(config)?;
    Ok(())
}

fn validate_routes(config: &Config) -> Result<()> {
    if config.routes.is_empty() {
        return Err(ConfigError::NoRoutes);
    }

    let mut names = HashSet::new();
    for route in &config.routes {
        if route.name.is_empty() {
            return Err(ConfigError::invalid_value(
                "route",
                &route.pattern,
                "name",
                "must not be empty",
            ));
        }
        if !names.insert(route.name.as_str()) {
            return Err(ConfigError::duplicate_route(&route.name));
        }
        if route.capacity <= RESERVED_HEADER_LEN {
            return Err(ConfigError::invalid_value(
                "route",
                &route.name,
                "capacity",
                format!("must be larger than {RESERVED_HEADER_LEN} bytes"),
            ));
        }
        if route.capacity > MAX_ARENA_CAPACITY {
            return Err(ConfigError::invalid_value(
                "route",
                &route.name,
                "capacity",
                format!("must not exceed {MAX_ARENA_CAPACITY} bytes"),
            ));
        }
    }

    // Compiles every pattern
    build_table(&config.routes)?;
    Ok(())
}

fn validate_shipper(config: &Config) -> Result<()> {
    let shipper = &config.shipper;

    if shipper.max_ready_entries == 0 {
        return Err(ConfigError::invalid_value(
            "shipper",
            "shipper",
            "max_ready_entries",
            "must be greater than zero",
        ));
    }

    if !is_supported_version(shipper.protocol_version) {
        return Err(ConfigError::invalid_value(
            "shipper",
            "shipper",
            "protocol_version",
            format!("unsupported version {}", shipper.protocol_version),
        ));
    }

    Ok(())
}
