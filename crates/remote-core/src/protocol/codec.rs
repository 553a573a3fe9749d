//! JSON codec for command frames.
//!
//! Outbound frames are compact JSON objects (see [`super::commands`]).  An
//! empty frame encodes to nothing at all: there is no such thing as an empty
//! message on the channel.
//!
//! Inbound frames from the host are parsed as generic JSON.  The client does
//! not interpret them yet; parsing only guarantees that whatever handler is
//! plugged in later receives structured data.

use serde_json::Value;
use thiserror::Error;

use crate::protocol::commands::Frame;

/// Errors that can occur while encoding or decoding frames.
#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    /// The frame could not be serialized.
    #[error("failed to serialize frame: {0}")]
    Serialize(String),

    /// An inbound message was not valid JSON.
    #[error("malformed inbound frame: {0}")]
    MalformedInbound(String),

    /// A message was valid JSON but not a command frame.
    #[error("not a command frame: {0}")]
    NotAFrame(String),
}

/// Encodes `frame` as JSON text.
///
/// Returns `Ok(None)` for an empty frame, which must not be sent.
///
/// # Errors
///
/// Returns [`ProtocolError::Serialize`] if serialization fails (only possible
/// for non-finite move deltas, which JSON cannot represent).
///
/// # Examples
///
/// ```rust
/// use remote_core::protocol::{encode_frame, Frame};
///
/// assert_eq!(encode_frame(&Frame::default()).unwrap(), None);
///
/// let frame = Frame { mc: Some(1), ..Frame::default() };
/// assert_eq!(encode_frame(&frame).unwrap().as_deref(), Some(r#"{"mc":1}"#));
/// ```
pub fn encode_frame(frame: &Frame) -> Result<Option<String>, ProtocolError> {
    if frame.is_empty() {
        return Ok(None);
    }
    if let Some([dx, dy]) = frame.mm {
        if !dx.is_finite() || !dy.is_finite() {
            return Err(ProtocolError::Serialize(format!(
                "non-finite move delta [{dx}, {dy}]"
            )));
        }
    }
    serde_json::to_string(frame)
        .map(Some)
        .map_err(|e| ProtocolError::Serialize(e.to_string()))
}

/// Parses an inbound message from the host into structured JSON.
///
/// # Errors
///
/// Returns [`ProtocolError::MalformedInbound`] when `text` is not valid JSON.
pub fn decode_inbound(text: &str) -> Result<Value, ProtocolError> {
    serde_json::from_str(text).map_err(|e| ProtocolError::MalformedInbound(e.to_string()))
}

/// Parses a command frame, as the receiving host would.
///
/// # Errors
///
/// Returns [`ProtocolError::MalformedInbound`] for invalid JSON and
/// [`ProtocolError::NotAFrame`] for JSON that does not have the frame shape.
pub fn decode_frame(text: &str) -> Result<Frame, ProtocolError> {
    let value = decode_inbound(text)?;
    serde_json::from_value(value).map_err(|e| ProtocolError::NotAFrame(e.to_string()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
