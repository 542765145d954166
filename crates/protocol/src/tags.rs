//! Column type tags
//!
//! Each column of a stream carries a short sequence of type tags written
//! verbatim into the arena header. Composite types are expressed by
//! prefixing container tags, e.g. `[List, String]` for an array of strings.
//!
//! NOTE: These values are used on the wire and must not be renumbered.

/// Type tag for one level of a column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ColumnTag {
    /// Unrecognised tag byte (kept so decoding never fails on new tags)
    Unknown = 0,
    Boolean = 1,
    Int = 2,
    Long = 3,
    Double = 4,
    String = 5,
    /// Milliseconds since the epoch
    Timestamp = 6,
    Binary = 7,
    /// Container: the following tag describes the element type
    List = 16,
    /// Container: the following two tags describe key and value
    Map = 17,
}

impl ColumnTag {
    /// Parse a tag from its wire byte
    #[inline]
    pub const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Boolean,
            2 => Self::Int,
            3 => Self::Long,
            4 => Self::Double,
            5 => Self::String,
            6 => Self::Timestamp,
            7 => Self::Binary,
            16 => Self::List,
            17 => Self::Map,
            _ => Self::Unknown,
        }
    }

    /// Wire byte for this tag
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Check if this tag wraps other tags
    #[inline]
    pub const fn is_container(self) -> bool {
        matches!(self, Self::List | Self::Map)
    }

    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Boolean => "boolean",
            Self::Int => "int",
            Self::Long => "long",
            Self::Double => "double",
            Self::String => "string",
            Self::Timestamp => "timestamp",
            Self::Binary => "binary",
            Self::List => "list",
            Self::Map => "map",
        }
    }

    /// Pack a tag sequence into the raw bytes stored per column
    pub fn sequence(tags: &[ColumnTag]) -> Vec<u8> {
        tags.iter().map(|t| t.as_u8()).collect()
    }
}

impl std::fmt::Display for ColumnTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_u8_roundtrip() {
        for tag in [
            ColumnTag::Boolean,
            ColumnTag::Int,
            ColumnTag::Long,
            ColumnTag::Double,
            ColumnTag::String,
            ColumnTag::Timestamp,
            ColumnTag::Binary,
            ColumnTag::List,
            ColumnTag::Map,
        ] {
            assert_eq!(ColumnTag::from_u8(tag.as_u8()), tag);
        }
    }

    #[test]
    fn test_unknown_byte() {
        assert_eq!(ColumnTag::from_u8(99), ColumnTag::Unknown);
    }

    #[test]
    fn test_sequence() {
        let seq = ColumnTag::sequence(&[ColumnTag::List, ColumnTag::String]);
        assert_eq!(seq, vec![16, 5]);
        assert!(ColumnTag::List.is_container());
        assert!(!ColumnTag::String.is_container());
    }
}
