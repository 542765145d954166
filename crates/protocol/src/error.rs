//! Protocol error types
//!
//! Errors raised while building stream identities, writing byte arenas and
//! decoding frames.

use thiserror::Error;

/// Errors that can occur during protocol operations
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The serialized header does not fit the arena capacity
    #[error("header needs {required} bytes but arena capacity is {capacity}")]
    HeaderTooLarge { required: usize, capacity: usize },

    /// Arena capacity cannot be described by the 4-byte row length slot
    #[error("arena capacity {capacity} exceeds maximum {max}")]
    CapacityTooLarge { capacity: usize, max: usize },

    /// Modified UTF-8 body longer than the 2-byte length prefix allows
    #[error("encoded string is {len} bytes, maximum is {max}")]
    StringTooLong { len: usize, max: usize },

    /// A column carries more type tags than the 1-byte count allows
    #[error("column '{column}' has {count} type tags, maximum is 255")]
    TooManyTags { column: String, count: usize },

    /// More properties than the 1-byte count allows
    #[error("identity has {count} properties, maximum is 255")]
    TooManyProperties { count: usize },

    /// Write attempted on an arena that was already closed
    #[error("arena is closed (digestion id {digestion_id})")]
    ArenaClosed { digestion_id: u64 },

    /// Reset attempted on an arena that still holds unsent rows
    #[error("arena still holds {data_length} bytes of rows and cannot be reset")]
    ArenaInUse { data_length: usize },

    /// Frame ended before a field could be read
    #[error("truncated frame reading {field}: needed {needed} bytes, {remaining} remaining")]
    Truncated {
        field: &'static str,
        needed: usize,
        remaining: usize,
    },

    /// Byte sequence is not valid modified UTF-8
    #[error("malformed modified UTF-8 at byte {offset}")]
    MalformedUtf { offset: usize },

    /// Decoded code units do not form a valid string
    #[error("invalid UTF-16 sequence in string field")]
    InvalidUtf16,

    /// A count or length field holds a negative value
    #[error("negative {field}: {value}")]
    NegativeLength { field: &'static str, value: i32 },
}

impl ProtocolError {
    /// Create a header too large error
    #[inline]
    pub fn header_too_large(required: usize, capacity: usize) -> Self {
        Self::HeaderTooLarge { required, capacity }
    }

    /// Create a string too long error
    #[inline]
    pub fn string_too_long(len: usize) -> Self {
        Self::StringTooLong {
            len,
            max: crate::mutf8::MAX_ENCODED_LEN,
        }
    }

    /// Create a truncated frame error
    #[inline]
    pub fn truncated(field: &'static str, needed: usize, remaining: usize) -> Self {
        Self::Truncated {
            field,
            needed,
            remaining,
        }
    }

    /// Check if the frame ended early (peer went away mid-frame)
    #[inline]
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }

    /// Check if this is a configuration problem that no retry can fix
    pub fn is_fatal_config(&self) -> bool {
        matches!(
            self,
            Self::HeaderTooLarge { .. }
                | Self::CapacityTooLarge { .. }
                | Self::StringTooLong { .. }
                | Self::TooManyTags { .. }
                | Self::TooManyProperties { .. }
        )
    }
}
