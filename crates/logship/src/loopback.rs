//! In-process transport and a listener that prints decoded rows
//!
//! The loopback stands in for a network hop: each frame is copied into a
//! `Bytes` buffer, as it would be after a socket read, and handed straight to
//! a `Receiver`.

use std::io::Write;

use async_trait::async_trait;
use bytes::{Buf, Bytes};
use logship_protocol::{DecodedFrame, ProtocolError, mutf8};
use logship_receiver::{Listener, ProtocolStatus, Receiver};
use logship_shipper::{Health, Transport, TransportError};
use tracing::warn;

/// Transport delivering frames to an in-process receiver
pub struct LoopbackTransport {
    receiver: Receiver,
}

impl LoopbackTransport {
    pub fn new(receiver: Receiver) -> Self {
        Self { receiver }
    }

    pub fn receiver(&self) -> &Receiver {
        &self.receiver
    }
}

#[async_trait]
impl Transport for LoopbackTransport {
    async fn send(&self, _type_tag: u8, version: u16, frame: &[u8]) -> Result<(), TransportError> {
        let digestion_id = frame
            .get(..8)
            .and_then(|id| id.try_into().ok())
            .map_or(0, u64::from_be_bytes);

        let status = self
            .receiver
            .receive(version, Bytes::copy_from_slice(frame))
            .map_err(|e| TransportError::rejected(digestion_id, e.to_string()))?;

        match status {
            ProtocolStatus::Ok => Ok(()),
            ProtocolStatus::SinkUnavailable => Err(TransportError::unavailable(status.as_str())),
            ProtocolStatus::InvalidVersion => {
                Err(TransportError::rejected(digestion_id, status.as_str()))
            }
        }
    }

    fn health(&self, _type_tag: u8) -> Health {
        Health::Operational
    }

    fn name(&self) -> &'static str {
        "loopback"
    }
}

/// Prints each row of a decoded frame as one tab-separated line
///
/// `<digestion id>\t<log type>\t<hostname>\t<row>`
#[derive(Debug, Default)]
pub struct StdoutListener;

impl Listener for StdoutListener {
    fn on_frame(&self, frame: DecodedFrame) -> ProtocolStatus {
        let rows = match decode_rows(frame.payload.clone()) {
            Ok(rows) => rows,
            Err(e) => {
                warn!(digestion_id = frame.digestion_id, error = %e, "frame rows are not text lines");
                return ProtocolStatus::Ok;
            }
        };

        let identity = &frame.identity;
        let mut out = std::io::stdout().lock();
        for row in rows {
            let written = writeln!(
                out,
                "{}\t{}\t{}\t{}",
                frame.digestion_id,
                identity.log_type(),
                identity.client_hostname(),
                row
            );
            if let Err(e) = written {
                warn!(error = %e, "stdout unavailable");
                return ProtocolStatus::SinkUnavailable;
            }
        }
        ProtocolStatus::Ok
    }
}

/// Encode a text line as a single length-prefixed string row
pub fn encode_row(line: &str) -> logship_protocol::Result<Vec<u8>> {
    let len = mutf8::encoded_len(line);
    if len > mutf8::MAX_ENCODED_LEN {
        return Err(ProtocolError::string_too_long(len));
    }
    let mut row = Vec::with_capacity(2 + len);
    row.extend_from_slice(&(len as u16).to_be_bytes());
    row.extend_from_slice(&mutf8::encode(line));
    Ok(row)
}

/// Split a row region written by `encode_row` back into lines
pub fn decode_rows(mut payload: Bytes) -> logship_protocol::Result<Vec<String>> {
    let mut rows = Vec::new();
    while payload.has_remaining() {
        if payload.remaining() < 2 {
            return Err(ProtocolError::truncated(
                "row length",
                2,
                payload.remaining(),
            ));
        }
        let len = payload.get_u16() as usize;
        if payload.remaining() < len {
            return Err(ProtocolError::truncated("row", len, payload.remaining()));
        }
        rows.push(mutf8::decode(&payload.split_to(len))?);
    }
    Ok(rows)
}
