//! Frame decoding
//!
//! Parses a closed arena frame back into its digestion id, stream identity
//! and row payload. Fields are read in the exact order `ByteArena` writes
//! them; every read is bounds-checked so a short buffer surfaces as
//! `ProtocolError::Truncated` instead of a panic.

use bytes::{Buf, Bytes};

use crate::identity::StreamIdentity;
use crate::{ProtocolError, RESERVED_HEADER_LEN, Result, mutf8};

/// A frame decoded from the wire
#[derive(Debug, Clone)]
pub struct DecodedFrame {
    /// Digestion id stamped when the arena was closed
    pub digestion_id: u64,

    /// Stream identity from the header (hostname included)
    pub identity: StreamIdentity,

    /// Row region, exactly as written by producers
    pub payload: Bytes,
}

impl DecodedFrame {
    /// Decode one frame from the front of `buf`
    ///
    /// Consumes exactly the frame's bytes; anything after the row region is
    /// left in `buf`.
    pub fn decode(buf: &mut Bytes) -> Result<Self> {
        need(buf, RESERVED_HEADER_LEN, "reserved header")?;
        let digestion_id = buf.get_u64();
        let row_length = read_len(buf.get_i32(), "row length")?;

        let file_prefix_pattern = read_utf(buf, "file prefix pattern")?;
        let log_type = read_utf(buf, "log type")?;
        let client_hostname = read_utf(buf, "client hostname")?;

        need(buf, 4, "header count")?;
        let header_count = read_len(buf.get_i32(), "header count")?;
        // Each name takes at least its 2-byte prefix; don't trust the count for allocation
        let mut headers = Vec::with_capacity(header_count.min(buf.remaining() / 2));
        for _ in 0..header_count {
            headers.push(read_utf(buf, "column name")?);
        }

        let mut builder = StreamIdentity::builder(log_type)
            .file_prefix_pattern(file_prefix_pattern)
            .client_hostname(client_hostname);

        for name in headers {
            need(buf, 1, "column tag count")?;
            let tag_count = buf.get_u8() as usize;
            need(buf, tag_count, "column tags")?;
            let tags = buf.split_to(tag_count);
            builder = builder.column(name, tags.to_vec());
        }

        need(buf, 1, "property count")?;
        let property_count = buf.get_u8();
        for _ in 0..property_count {
            let key = read_utf(buf, "property key")?;
            let value = read_utf(buf, "property value")?;
            builder = builder.property(key, value);
        }

        need(buf, row_length, "row region")?;
        let payload = buf.split_to(row_length);

        Ok(Self {
            digestion_id,
            identity: builder.build()?,
            payload,
        })
    }

    /// Length of the row region
    #[inline]
    pub fn row_length(&self) -> usize {
        self.payload.len()
    }
}

#[inline]
fn need(buf: &Bytes, needed: usize, field: &'static str) -> Result<()> {
    if buf.remaining() < needed {
        return Err(ProtocolError::truncated(field, needed, buf.remaining()));
    }
    Ok(())
}

#[inline]
fn read_len(value: i32, field: &'static str) -> Result<usize> {
    usize::try_from(value).map_err(|_| ProtocolError::NegativeLength { field, value })
}

fn read_utf(buf: &mut Bytes, field: &'static str) -> Result<String> {
    need(buf, 2, field)?;
    let len = buf.get_u16() as usize;
    need(buf, len, field)?;
    let body = buf.split_to(len);
    mutf8::decode(&body)
}

#[cfg(test)]
#[path = "frame_test.rs"]
mod frame_test;
