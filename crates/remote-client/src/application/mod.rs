//! Application layer for the remote client.
//!
//! # What lives here?
//!
//! - **`channel`** – The [`Channel`] / [`ChannelFactory`] seams the batcher
//!   talks to, plus the inert [`InboundHandler`] hook for host frames.
//!
//! - **`batcher`** – [`CommandBatcher`]: coalesces commands between flushes
//!   and owns the channel lifecycle (lazy open, reconnect on endpoint change,
//!   best-effort close).
//!
//! - **`keypad`** – [`Keypad`]: key forwarding and sentinel-based text edit
//!   capture over any [`TextField`].
//!
//! - **`surface`** – [`RemoteSurface`]: routes input events to the gesture
//!   recognizer and keypad, and exposes the flush/poll ticks the session loop
//!   drives.
//!
//! Nothing in this layer performs I/O or awaits; the infrastructure layer
//! supplies sockets and timers.

pub mod batcher;
pub mod channel;
pub mod keypad;
pub mod surface;

pub use batcher::{CommandBatcher, FlushOutcome};
pub use channel::{
    Channel, ChannelError, ChannelFactory, InboundHandler, InboundSender, InertInbound,
};
pub use keypad::{Keypad, TextField, VirtualTextField};
pub use surface::RemoteSurface;
