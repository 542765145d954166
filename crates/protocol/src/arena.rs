//! ByteArena - fixed-capacity frame buffer
//!
//! An arena is one wire frame under construction: a self-describing header
//! followed by an append-only row region.
//!
//! # Memory Layout
//!
//! ```text
//! ┌──────────────┬────────────┬──────────────────────────┬───────────────────┐
//! │ 8 bytes      │ 4 bytes    │ identity + column meta   │ rows ...          │
//! │ digestion id │ row length │ (see StreamIdentity)     │                   │
//! └──────────────┴────────────┴──────────────────────────┴───────────────────┘
//! 0              8            12                         data_start          position
//! ```
//!
//! The two reserved slots stay zero while rows are appended and are
//! back-patched exactly once by `close`.

use crate::identity::StreamIdentity;
use crate::{
    DIGESTION_ID_OFFSET, MAX_ARENA_CAPACITY, ProtocolError, ROW_LENGTH_OFFSET,
    RESERVED_HEADER_LEN, Result, mutf8,
};

/// Fixed-capacity byte buffer holding one header and a run of rows
pub struct ByteArena {
    /// Backing storage, allocated once at full capacity
    buf: Box<[u8]>,

    /// Write cursor
    position: usize,

    /// First byte of the row region
    data_start: usize,

    /// Set by `close`; the arena accepts no writes afterwards
    closed: bool,

    /// Digestion id stamped by `close`
    digestion_id: u64,

    /// Identity whose header is currently serialized
    identity: StreamIdentity,
}

impl ByteArena {
    /// Allocate an arena and serialize the identity header into it
    ///
    /// # Errors
    ///
    /// `HeaderTooLarge` if the header does not fit `capacity`, or
    /// `CapacityTooLarge` if the row length slot cannot describe `capacity`.
    pub fn new(identity: StreamIdentity, capacity: usize) -> Result<Self> {
        if capacity > MAX_ARENA_CAPACITY {
            return Err(ProtocolError::CapacityTooLarge {
                capacity,
                max: MAX_ARENA_CAPACITY,
            });
        }

        let mut arena = Self {
            buf: vec![0u8; capacity].into_boxed_slice(),
            position: 0,
            data_start: 0,
            closed: false,
            digestion_id: 0,
            identity,
        };
        arena.write_header()?;
        Ok(arena)
    }

    /// Rewind the arena and serialize a new header for reuse
    ///
    /// Only legal on a closed arena (returned from the ready queue) or one
    /// that holds no rows yet.
    pub fn reset(&mut self, identity: StreamIdentity) -> Result<()> {
        if !self.closed && !self.is_empty() {
            return Err(ProtocolError::ArenaInUse {
                data_length: self.data_length(),
            });
        }

        self.position = 0;
        self.data_start = 0;
        self.closed = false;
        self.digestion_id = 0;
        self.identity = identity;
        self.write_header()
    }

    fn write_header(&mut self) -> Result<()> {
        let required = self.identity.header_len();
        if required > self.buf.len() {
            return Err(ProtocolError::header_too_large(required, self.buf.len()));
        }

        let id = &self.identity;
        let mut cursor = Cursor::new(&mut self.buf);

        // Reserved slots, patched by close()
        cursor.write(&[0u8; RESERVED_HEADER_LEN]);
        cursor.write_utf(id.file_prefix_pattern());
        cursor.write_utf(id.log_type());
        cursor.write_utf(id.client_hostname());

        cursor.write(&(id.headers().len() as i32).to_be_bytes());
        for name in id.headers() {
            cursor.write_utf(name);
        }
        for tags in id.column_types() {
            cursor.write(&[tags.len() as u8]);
            cursor.write(tags);
        }

        cursor.write(&[id.properties().len() as u8]);
        for (key, value) in id.properties() {
            cursor.write_utf(key);
            cursor.write_utf(value);
        }

        let written = cursor.pos;
        debug_assert_eq!(written, required);
        self.data_start = written;
        self.position = written;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Writes
    // -------------------------------------------------------------------------

    /// Append raw row bytes
    ///
    /// Returns `Ok(false)` without writing anything when `data` does not fit.
    ///
    /// # Errors
    ///
    /// `ArenaClosed` if the arena was already closed.
    pub fn put(&mut self, data: &[u8]) -> Result<bool> {
        self.ensure_open()?;
        if !self.available(data.len()) {
            return Ok(false);
        }
        self.buf[self.position..self.position + data.len()].copy_from_slice(data);
        self.position += data.len();
        Ok(true)
    }

    /// Append a single byte
    #[inline]
    pub fn put_u8(&mut self, value: u8) -> Result<bool> {
        self.put(&[value])
    }

    /// Append a big-endian 4-byte integer
    #[inline]
    pub fn put_i32(&mut self, value: i32) -> Result<bool> {
        self.put(&value.to_be_bytes())
    }

    /// Append a big-endian 8-byte integer
    #[inline]
    pub fn put_i64(&mut self, value: i64) -> Result<bool> {
        self.put(&value.to_be_bytes())
    }

    /// Append a length-prefixed modified UTF-8 string
    ///
    /// # Errors
    ///
    /// `StringTooLong` if the body exceeds 65535 bytes, `ArenaClosed` if closed.
    pub fn put_utf(&mut self, value: &str) -> Result<bool> {
        self.ensure_open()?;
        let len = mutf8::encoded_len(value);
        if len > mutf8::MAX_ENCODED_LEN {
            return Err(ProtocolError::string_too_long(len));
        }
        if !self.available(2 + len) {
            return Ok(false);
        }
        let mut cursor = Cursor::at(&mut self.buf, self.position);
        cursor.write_utf(value);
        self.position = cursor.pos;
        Ok(true)
    }

    /// Check whether `len` more bytes fit
    #[inline]
    pub fn available(&self, len: usize) -> bool {
        len <= self.buf.len() - self.position
    }

    /// Close the arena, stamping the digestion id and row-region length
    ///
    /// The write cursor does not move. Closing twice is rejected.
    pub fn close(&mut self, digestion_id: u64) -> Result<()> {
        self.ensure_open()?;
        let data_length = self.data_length() as u32;
        self.buf[DIGESTION_ID_OFFSET..DIGESTION_ID_OFFSET + 8]
            .copy_from_slice(&digestion_id.to_be_bytes());
        self.buf[ROW_LENGTH_OFFSET..ROW_LENGTH_OFFSET + 4]
            .copy_from_slice(&data_length.to_be_bytes());
        self.digestion_id = digestion_id;
        self.closed = true;
        Ok(())
    }

    #[inline]
    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            Err(ProtocolError::ArenaClosed {
                digestion_id: self.digestion_id,
            })
        } else {
            Ok(())
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Allocated size in bytes
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes of rows written so far
    #[inline]
    pub fn data_length(&self) -> usize {
        self.position - self.data_start
    }

    /// Bytes taken by the serialized header
    #[inline]
    pub fn header_length(&self) -> usize {
        self.data_start
    }

    /// Largest single row this arena could ever hold
    #[inline]
    pub fn usable_capacity(&self) -> usize {
        self.buf.len() - self.data_start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data_length() == 0
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Digestion id, once closed
    #[inline]
    pub fn digestion_id(&self) -> Option<u64> {
        self.closed.then_some(self.digestion_id)
    }

    #[inline]
    pub fn identity(&self) -> &StreamIdentity {
        &self.identity
    }

    /// The complete frame written so far (header + rows)
    #[inline]
    pub fn frame(&self) -> &[u8] {
        &self.buf[..self.position]
    }

    /// The row region
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.buf[self.data_start..self.position]
    }
}

impl std::fmt::Debug for ByteArena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteArena")
            .field("identity", &self.identity.to_string())
            .field("capacity", &self.capacity())
            .field("header_length", &self.data_start)
            .field("data_length", &self.data_length())
            .field("closed", &self.closed)
            .finish()
    }
}

/// Write cursor over a slice whose free space was checked up front
struct Cursor<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(buf: &'a mut [u8]) -> Self {
        Self::at(buf, 0)
    }

    fn at(buf: &'a mut [u8], pos: usize) -> Self {
        Self { buf, pos }
    }

    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
    }

    fn write_utf(&mut self, s: &str) {
        let len = mutf8::encoded_len(s);
        self.write(&(len as u16).to_be_bytes());
        let written = mutf8::encode_into(s, &mut self.buf[self.pos..self.pos + len]);
        self.pos += written;
    }
}

#[cfg(test)]
#[path = "arena_test.rs"]
mod arena_test;
