//! Routing table for log type → arena capacity lookup
//!
//! The table is compiled once from configuration. Patterns are anchored, so
//! a rule matches only when it covers the whole log type.

use std::collections::HashSet;

use regex::Regex;

use crate::{Result, RoutingError};

/// Pattern matching every log type
pub const CATCH_ALL_PATTERN: &str = ".*";

/// One compiled routing rule
#[derive(Debug, Clone)]
pub struct RoutingRule {
    /// Rule name (unique within a table)
    name: String,

    /// Pattern as written in configuration
    pattern: String,

    /// Anchored, compiled pattern
    regex: Regex,

    /// Arena capacity in bytes for matching streams
    capacity: usize,
}

impl RoutingRule {
    /// Compile a rule
    ///
    /// # Errors
    ///
    /// Returns `InvalidPattern` for a bad regex and `InvalidCapacity` for a
    /// zero capacity.
    pub fn new(name: impl Into<String>, pattern: impl Into<String>, capacity: usize) -> Result<Self> {
        let name = name.into();
        let pattern = pattern.into();

        if capacity == 0 {
            return Err(RoutingError::invalid_capacity(name, capacity));
        }

        let regex = Regex::new(&format!("^(?:{pattern})$"))
            .map_err(|e| RoutingError::invalid_pattern(name.clone(), e))?;

        Ok(Self {
            name,
            pattern,
            regex,
            capacity,
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Check if this rule covers the whole log type
    #[inline]
    pub fn matches(&self, log_type: &str) -> bool {
        self.regex.is_match(log_type)
    }
}

/// Ordered list of routing rules; first match wins
///
/// # Example
///
/// ```
/// use logship_routing::RoutingTable;
///
/// let table = RoutingTable::catch_all(4096).unwrap();
/// assert_eq!(table.resolve("anything").unwrap(), 4096);
/// ```
#[derive(Debug, Clone)]
pub struct RoutingTable {
    rules: Vec<RoutingRule>,
}

impl RoutingTable {
    /// Create a builder
    #[inline]
    #[must_use]
    pub fn builder() -> RoutingTableBuilder {
        RoutingTableBuilder::new()
    }

    /// Table with a single rule matching every log type
    pub fn catch_all(capacity: usize) -> Result<Self> {
        Self::builder()
            .rule("default", CATCH_ALL_PATTERN, capacity)?
            .build()
    }

    /// Resolve the arena capacity for a log type
    ///
    /// O(rules) scan; deterministic for a fixed rule order.
    ///
    /// # Errors
    ///
    /// `NoMatchingRule` if no rule matches. No default capacity is assumed.
    pub fn resolve(&self, log_type: &str) -> Result<usize> {
        self.resolve_rule(log_type)
            .map(RoutingRule::capacity)
            .ok_or_else(|| RoutingError::no_matching_rule(log_type))
    }

    /// Find the first rule matching a log type
    #[inline]
    pub fn resolve_rule(&self, log_type: &str) -> Option<&RoutingRule> {
        self.rules.iter().find(|rule| rule.matches(log_type))
    }

    /// Rules in evaluation order
    #[inline]
    pub fn rules(&self) -> &[RoutingRule] {
        &self.rules
    }

    /// Get the number of rules
    #[inline]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

/// Builder for constructing routing tables with validation
#[derive(Debug, Default)]
pub struct RoutingTableBuilder {
    rules: Vec<RoutingRule>,
    names: HashSet<String>,
}

impl RoutingTableBuilder {
    /// Create a new builder
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule (evaluated after every rule added before it)
    ///
    /// # Errors
    ///
    /// Fails on an invalid pattern, a zero capacity or a repeated name.
    pub fn rule(
        self,
        name: impl Into<String>,
        pattern: impl Into<String>,
        capacity: usize,
    ) -> Result<Self> {
        let rule = RoutingRule::new(name, pattern, capacity)?;
        self.add(rule)
    }

    /// Append an already compiled rule
    pub fn add(mut self, rule: RoutingRule) -> Result<Self> {
        if !self.names.insert(rule.name.clone()) {
            return Err(RoutingError::duplicate_rule(rule.name));
        }
        self.rules.push(rule);
        Ok(self)
    }

    /// Build the routing table
    ///
    /// # Errors
    ///
    /// Returns `Empty` if no rules were added.
    pub fn build(self) -> Result<RoutingTable> {
        if self.rules.is_empty() {
            return Err(RoutingError::Empty);
        }
        Ok(RoutingTable { rules: self.rules })
    }
}
