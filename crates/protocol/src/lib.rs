//! logship Protocol - byte-arena wire format
//!
//! This crate provides the types that travel between producers, the shipper
//! and the receiver:
//! - `StreamIdentity` - Logical stream key plus its column metadata
//! - `ByteArena` - Fixed-capacity frame buffer (header + append-only rows)
//! - `DecodedFrame` - A frame parsed back on the receiving side
//! - `ColumnTag` - Type tags describing each column
//! - `mutf8` - The modified UTF-8 string codec used by every string field
//!
//! # Wire Format
//!
//! All integers are big-endian. Strings are a 2-byte length followed by a
//! modified UTF-8 body.
//!
//! ```text
//! [u64 digestion id][u32 row length]
//! [utf prefix pattern][utf log type][utf hostname]
//! [i32 N][N x utf column name]
//! [N x (u8 k)(k tag bytes)]
//! [u8 P][P x (utf key)(utf value)]
//! [row length bytes of rows]
//! ```
//!
//! Protocol versions 1 and 2 share this layout.

mod arena;
mod error;
mod frame;
mod identity;
pub mod mutf8;
mod tags;

pub use arena::ByteArena;
pub use error::ProtocolError;
pub use frame::DecodedFrame;
pub use identity::{StreamIdentity, StreamIdentityBuilder};
pub use tags::ColumnTag;

// Re-export bytes for convenience
pub use bytes::{Bytes, BytesMut};

/// Result type for protocol operations
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// First protocol version using the arena layout
pub const PROTOCOL_V1: u16 = 1;

/// Current protocol version (same layout as v1)
pub const PROTOCOL_V2: u16 = 2;

/// Version written by default
pub const CURRENT_PROTOCOL_VERSION: u16 = PROTOCOL_V2;

/// Transport type tag identifying binary log arenas
pub const BINARY_LOG_TYPE_TAG: u8 = 0x4C;

/// Offset of the 8-byte digestion id slot
pub const DIGESTION_ID_OFFSET: usize = 0;

/// Offset of the 4-byte row-region length slot
pub const ROW_LENGTH_OFFSET: usize = 8;

/// Bytes reserved at the front of every frame
pub const RESERVED_HEADER_LEN: usize = 12;

/// Largest capacity the 4-byte row length slot can describe
pub const MAX_ARENA_CAPACITY: usize = i32::MAX as usize;

/// Default arena capacity in bytes (256KB)
pub const DEFAULT_ARENA_CAPACITY: usize = 256 * 1024;

/// Check whether a protocol version uses the arena layout
#[inline]
pub const fn is_supported_version(version: u16) -> bool {
    matches!(version, PROTOCOL_V1 | PROTOCOL_V2)
}

#[cfg(test)]
mod error_test;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_versions() {
        assert!(is_supported_version(PROTOCOL_V1));
        assert!(is_supported_version(PROTOCOL_V2));
        assert!(!is_supported_version(0));
        assert!(!is_supported_version(3));
        assert!(!is_supported_version(99));
    }
}
