//! Listener interface
//!
//! The receiver hands each decoded frame to a `Listener` (typically a sink
//! that persists the rows) and relays the status it returns.

use std::fmt;

use logship_protocol::DecodedFrame;

/// Outcome of handling one inbound frame, as sent back to the peer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ProtocolStatus {
    /// Frame accepted
    Ok = 0,
    /// Sink is overloaded or down; the frame was not decoded
    SinkUnavailable = 1,
    /// Protocol version is not supported; the frame was not decoded
    InvalidVersion = 2,
}

impl ProtocolStatus {
    /// Wire code
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Parse a wire code
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Ok),
            1 => Some(Self::SinkUnavailable),
            2 => Some(Self::InvalidVersion),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::SinkUnavailable => "SINK_UNAVAILABLE",
            Self::InvalidVersion => "INVALID_VERSION",
        }
    }
}

impl fmt::Display for ProtocolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Consumer of decoded frames
pub trait Listener: Send + Sync {
    /// Whether the sink can take another frame
    ///
    /// Checked before any byte of the frame is decoded.
    fn is_available(&self) -> bool {
        true
    }

    /// Handle one decoded frame
    fn on_frame(&self, frame: DecodedFrame) -> ProtocolStatus;
}
