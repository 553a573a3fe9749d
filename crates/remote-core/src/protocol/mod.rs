//! Command frame protocol.
//!
//! - [`commands`] – the seven command kinds, the coalescing [`commands::CommandQueue`]
//!   and the [`commands::Frame`] it drains into.
//! - [`codec`] – JSON encoding of outbound frames and decoding of inbound ones.

pub mod codec;
pub mod commands;

pub use codec::{decode_frame, decode_inbound, encode_frame, ProtocolError};
pub use commands::{Command, CommandKind, CommandQueue, Frame, MouseButton, TextEdit};
