//! Channel abstraction: the persistent bidirectional message link to a host.
//!
//! The application layer never touches sockets directly.  It sees a
//! [`Channel`] (one open link) created on demand by a [`ChannelFactory`].
//! Production code plugs in the WebSocket factory from
//! `infrastructure::ws_channel`; tests plug in `mockall` mocks or the
//! in-memory factory from `infrastructure::memory`.
//!
//! # Lifecycle
//!
//! ```text
//!   (no channel) ──first flush / set_endpoint──► open ──close──► (no channel)
//! ```
//!
//! Opening is synchronous and must not block: a factory returns a handle
//! immediately and finishes any handshake in the background.  Text sent
//! before the handshake completes is queued by the channel, not lost.

use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;
use uuid::Uuid;

/// Where a channel delivers the text of every message it receives.
pub type InboundSender = UnboundedSender<String>;

/// Errors raised while opening, using or closing a channel.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// A flush needed a channel but no endpoint was ever set.
    #[error("no endpoint configured")]
    NoEndpoint,

    /// The endpoint string is not a usable WebSocket URL.
    #[error("invalid endpoint '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    /// The factory needs an async runtime and none is running.
    #[error("no async runtime available to drive the channel")]
    NoRuntime,

    /// The channel's connection has already ended.
    #[error("channel is closed")]
    Closed,

    /// The message could not be handed to the connection.
    #[error("send failed: {0}")]
    Send(String),

    /// The connection could not be shut down cleanly.
    #[error("close failed: {0}")]
    Close(String),
}

/// One open link to a host.
#[cfg_attr(test, mockall::automock)]
pub trait Channel: Send {
    /// Identifier used in log lines.
    fn id(&self) -> Uuid;

    /// Queues `text` as one message.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Closed`] or [`ChannelError::Send`] when the
    /// link can no longer carry messages.
    fn send(&mut self, text: String) -> Result<(), ChannelError>;

    /// Starts an orderly shutdown.  Further sends fail.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Close`] when the shutdown request cannot be
    /// delivered (usually because the link is already gone).
    fn close(&mut self) -> Result<(), ChannelError>;
}

/// Opens channels to a given endpoint.
#[cfg_attr(test, mockall::automock)]
pub trait ChannelFactory: Send {
    /// Opens a channel to `endpoint`.  Received message text goes to
    /// `inbound`.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::InvalidEndpoint`] for an unusable URL and
    /// [`ChannelError::NoRuntime`] when the factory cannot start its
    /// background work.
    fn open(&self, endpoint: &str, inbound: InboundSender)
        -> Result<Box<dyn Channel>, ChannelError>;
}

/// Consumer of frames received from the host.
pub trait InboundHandler {
    fn on_frame(&mut self, frame: Value);
}

/// Accepts inbound frames and does nothing with them.
///
/// Hosts do not send anything the client must act on yet; the frame is
/// parsed so a future handler gets structured data.
#[derive(Debug, Default, Clone, Copy)]
pub struct InertInbound;

impl InboundHandler for InertInbound {
    fn on_frame(&mut self, frame: Value) {
        debug!(keys = frame.as_object().map_or(0, |o| o.len()), "inbound frame ignored");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
