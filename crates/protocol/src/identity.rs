//! Stream identity
//!
//! `StreamIdentity` names a logical log stream and carries the column
//! metadata serialized into every arena header for that stream.
//!
//! Equality and hashing deliberately leave out `client_hostname`: rows from
//! the same stream shipped by different hosts share one current arena and one
//! pool bucket. The hostname written into an arena header is the one carried
//! by the identity that opened the arena.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::tags::ColumnTag;
use crate::{ProtocolError, RESERVED_HEADER_LEN, Result, mutf8};

/// Identity of a logical log stream
#[derive(Debug, Clone)]
pub struct StreamIdentity {
    file_prefix_pattern: String,
    log_type: String,
    client_hostname: String,
    properties: BTreeMap<String, String>,
    headers: Vec<String>,
    column_types: Vec<Vec<u8>>,
}

impl StreamIdentity {
    /// Start building an identity for the given log type
    pub fn builder(log_type: impl Into<String>) -> StreamIdentityBuilder {
        StreamIdentityBuilder::new(log_type)
    }

    #[inline]
    pub fn file_prefix_pattern(&self) -> &str {
        &self.file_prefix_pattern
    }

    #[inline]
    pub fn log_type(&self) -> &str {
        &self.log_type
    }

    #[inline]
    pub fn client_hostname(&self) -> &str {
        &self.client_hostname
    }

    #[inline]
    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    /// Column names, in order
    #[inline]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Tag sequence per column, parallel to `headers()`
    #[inline]
    pub fn column_types(&self) -> &[Vec<u8>] {
        &self.column_types
    }

    /// Same stream, reported by another host
    #[must_use]
    pub fn with_hostname(&self, hostname: impl Into<String>) -> Self {
        Self {
            client_hostname: hostname.into(),
            ..self.clone()
        }
    }

    /// Bytes the serialized header occupies, reserved slots included
    pub fn header_len(&self) -> usize {
        let columns: usize = self
            .headers
            .iter()
            .zip(&self.column_types)
            .map(|(name, tags)| utf_len(name) + 1 + tags.len())
            .sum();
        let properties: usize = self
            .properties
            .iter()
            .map(|(k, v)| utf_len(k) + utf_len(v))
            .sum();

        RESERVED_HEADER_LEN
            + utf_len(&self.file_prefix_pattern)
            + utf_len(&self.log_type)
            + utf_len(&self.client_hostname)
            + 4
            + columns
            + 1
            + properties
    }

    /// Check that every field fits its length prefix
    fn validate(&self) -> Result<()> {
        let strings = [
            &self.file_prefix_pattern,
            &self.log_type,
            &self.client_hostname,
        ]
        .into_iter()
        .chain(&self.headers)
        .chain(self.properties.iter().flat_map(|(k, v)| [k, v]));

        for s in strings {
            let len = mutf8::encoded_len(s);
            if len > mutf8::MAX_ENCODED_LEN {
                return Err(ProtocolError::string_too_long(len));
            }
        }

        for (name, tags) in self.headers.iter().zip(&self.column_types) {
            if tags.len() > u8::MAX as usize {
                return Err(ProtocolError::TooManyTags {
                    column: name.clone(),
                    count: tags.len(),
                });
            }
        }

        if self.properties.len() > u8::MAX as usize {
            return Err(ProtocolError::TooManyProperties {
                count: self.properties.len(),
            });
        }

        Ok(())
    }
}

#[inline]
fn utf_len(s: &str) -> usize {
    2 + mutf8::encoded_len(s)
}

impl PartialEq for StreamIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.file_prefix_pattern == other.file_prefix_pattern
            && self.log_type == other.log_type
            && self.headers == other.headers
            && self.column_types == other.column_types
            && self.properties == other.properties
    }
}

impl Eq for StreamIdentity {}

impl Hash for StreamIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.file_prefix_pattern.hash(state);
        self.log_type.hash(state);
        self.headers.hash(state);
        self.column_types.hash(state);
        self.properties.hash(state);
    }
}

impl fmt::Display for StreamIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.file_prefix_pattern.is_empty() {
            write!(f, "{}", self.log_type)
        } else {
            write!(f, "{}:{}", self.log_type, self.file_prefix_pattern)
        }
    }
}

/// Builder for `StreamIdentity`
///
/// Columns are added as (name, tags) pairs so names and tag sequences can
/// never drift out of step.
#[derive(Debug, Clone, Default)]
pub struct StreamIdentityBuilder {
    file_prefix_pattern: String,
    log_type: String,
    client_hostname: String,
    properties: BTreeMap<String, String>,
    headers: Vec<String>,
    column_types: Vec<Vec<u8>>,
}

impl StreamIdentityBuilder {
    pub fn new(log_type: impl Into<String>) -> Self {
        Self {
            log_type: log_type.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn file_prefix_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.file_prefix_pattern = pattern.into();
        self
    }

    #[must_use]
    pub fn client_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.client_hostname = hostname.into();
        self
    }

    /// Add a column with a raw tag sequence
    #[must_use]
    pub fn column(mut self, name: impl Into<String>, tags: impl Into<Vec<u8>>) -> Self {
        self.headers.push(name.into());
        self.column_types.push(tags.into());
        self
    }

    /// Add a column described by `ColumnTag`s
    #[must_use]
    pub fn typed_column(self, name: impl Into<String>, tags: &[ColumnTag]) -> Self {
        self.column(name, ColumnTag::sequence(tags))
    }

    /// Set a property (later values replace earlier ones)
    #[must_use]
    pub fn property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Build the identity
    ///
    /// # Errors
    ///
    /// Fails if a string is longer than 65535 encoded bytes, a column has
    /// more than 255 tags, or there are more than 255 properties.
    pub fn build(self) -> Result<StreamIdentity> {
        let identity = StreamIdentity {
            file_prefix_pattern: self.file_prefix_pattern,
            log_type: self.log_type,
            client_hostname: self.client_hostname,
            properties: self.properties,
            headers: self.headers,
            column_types: self.column_types,
        };
        identity.validate()?;
        Ok(identity)
    }
}

#[cfg(test)]
#[path = "identity_test.rs"]
mod identity_test;
