//! # remote-core
//!
//! Shared library for Web Remote containing the input-processing domain and
//! the command frame protocol.
//!
//! It has zero dependencies on OS APIs, UI toolkits, timers, or network
//! sockets: every function here can be driven from a unit test.
//!
//! # Architecture overview (for beginners)
//!
//! Web Remote turns a phone or tablet into a touchpad and keyboard for another
//! computer.  The client sees a noisy, high-frequency stream of press, move
//! and release notifications and has to turn it into a small number of
//! meaningful commands ("move the pointer by 4,2", "press the button") that
//! are batched into one JSON frame every few milliseconds.
//!
//! - **`domain`** – Pure input logic.  The [`GestureRecognizer`] is the
//!   centrepiece: a state machine that decides whether the user tapped,
//!   dragged, or tapped-then-dragged.  It measures motion with a
//!   [`MotionHistory`].  The [`TextEditBuffer`] infers text edits from a
//!   masked sentinel field.
//!
//! - **`protocol`** – What travels over the wire.  Commands are coalesced in a
//!   [`CommandQueue`] and drained into a [`Frame`], which the codec turns
//!   into a compact JSON object.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `remote_core::GestureRecognizer` instead of the full module path.
pub use domain::gesture::{GestureConfig, GestureRecognizer, GestureState};
pub use domain::motion::{MotionHistory, MotionSample, MotionTransform, Speed};
pub use domain::text_edit::TextEditBuffer;
pub use protocol::codec::{decode_inbound, encode_frame, ProtocolError};
pub use protocol::commands::{Command, CommandQueue, Frame, MouseButton, TextEdit};
