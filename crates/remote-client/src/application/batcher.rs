//! Command batcher: coalesces commands into one frame per flush and owns the
//! channel that carries those frames.
//!
//! # How batching works
//!
//! Input handlers call [`CommandBatcher::enqueue`] as often as they like.
//! Nothing is sent until [`CommandBatcher::flush`] runs (every 20 ms by
//! default, driven by the session loop).  Between flushes the queue holds at
//! most one value per command kind: moves are summed, everything else is
//! last-write-wins.  This turns a burst of 60 pointer moves into a single
//! `{"mm":[dx,dy]}` frame.
//!
//! # Channel ownership
//!
//! The batcher owns at most one live [`Channel`].  It is opened lazily on the
//! first flush that has something to send, and replaced whenever the
//! endpoint changes.  Every channel failure is logged and swallowed: a frame
//! that cannot be delivered is dropped, never retried, and the queue is
//! always left empty after a flush.

use remote_core::protocol::{encode_frame, Command, CommandQueue, Frame};
use tracing::{debug, info, warn};

use crate::application::channel::{Channel, ChannelError, ChannelFactory, InboundSender};

/// What a single [`CommandBatcher::flush`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// The queue was empty; nothing touched the channel.
    Idle,
    /// One frame of `bytes` bytes was handed to the channel.
    Sent { bytes: usize },
    /// The queue had content but the frame was dropped.
    Dropped,
}

/// Coalescing command queue plus channel lifecycle.
pub struct CommandBatcher {
    queue: CommandQueue,
    endpoint: Option<String>,
    channel: Option<Box<dyn Channel>>,
    factory: Box<dyn ChannelFactory>,
    inbound: InboundSender,
    frames_sent: u64,
}

impl CommandBatcher {
    /// Creates a batcher with no endpoint and no open channel.
    ///
    /// `inbound` receives the text of every message the host sends on any
    /// channel this batcher opens.
    pub fn new(factory: Box<dyn ChannelFactory>, inbound: InboundSender) -> Self {
        Self {
            queue: CommandQueue::new(),
            endpoint: None,
            channel: None,
            factory,
            inbound,
            frames_sent: 0,
        }
    }

    pub fn enqueue(&mut self, command: Command) {
        self.queue.enqueue(command);
    }

    pub fn enqueue_all(&mut self, commands: impl IntoIterator<Item = Command>) {
        for command in commands {
            self.queue.enqueue(command);
        }
    }

    /// Commands waiting for the next flush.
    pub fn pending(&self) -> &Frame {
        self.queue.pending()
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    pub fn has_channel(&self) -> bool {
        self.channel.is_some()
    }

    /// Number of frames successfully handed to a channel so far.
    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }

    /// Swaps the queue for an empty one and sends its content, if any.
    ///
    /// Never fails: an encoding error, a missing endpoint, a channel that
    /// cannot be opened or a rejected send all drop this frame and are
    /// logged at `warn`.  A channel whose send failed is discarded so the
    /// next flush opens a fresh one.
    pub fn flush(&mut self) -> FlushOutcome {
        let frame = self.queue.take();

        let text = match encode_frame(&frame) {
            Ok(Some(text)) => text,
            Ok(None) => return FlushOutcome::Idle,
            Err(e) => {
                warn!("dropping frame: {e}");
                return FlushOutcome::Dropped;
            }
        };

        let bytes = text.len();
        let channel = match self.current_channel() {
            Ok(channel) => channel,
            Err(e) => {
                warn!("dropping frame, no channel: {e}");
                return FlushOutcome::Dropped;
            }
        };

        let id = channel.id();
        match channel.send(text) {
            Ok(()) => {
                debug!(channel = %id, bytes, keys = ?frame.keys(), "frame sent");
                self.frames_sent += 1;
                FlushOutcome::Sent { bytes }
            }
            Err(e) => {
                warn!(channel = %id, "send failed, frame dropped: {e}");
                self.close_channel();
                FlushOutcome::Dropped
            }
        }
    }

    /// Stores `url` and replaces any open channel with a fresh one.
    ///
    /// The old channel is closed best-effort.  If the new one cannot be
    /// opened the endpoint is still stored, and the next flush retries.
    pub fn set_endpoint(&mut self, url: impl Into<String>) {
        let url = url.into();
        info!(endpoint = %url, "endpoint changed");
        self.endpoint = Some(url);
        if let Err(e) = self.reset_channel() {
            warn!("could not open channel after endpoint change: {e}");
        }
    }

    /// Closes the current channel (if any) and opens a new one to the stored
    /// endpoint.
    ///
    /// # Errors
    ///
    /// Returns the factory's error when the new channel cannot be opened,
    /// or [`ChannelError::NoEndpoint`] when no endpoint was ever set.
    pub fn reset_channel(&mut self) -> Result<(), ChannelError> {
        self.close_channel();
        self.current_channel().map(|_| ())
    }

    /// Closes the current channel, swallowing any close error.
    pub fn close_channel(&mut self) {
        if let Some(mut channel) = self.channel.take() {
            let id = channel.id();
            match channel.close() {
                Ok(()) => info!(channel = %id, "channel closed"),
                Err(e) => warn!(channel = %id, "ignoring channel close error: {e}"),
            }
        }
    }

    /// The open channel, opening one to the stored endpoint first if needed.
    fn current_channel(&mut self) -> Result<&mut Box<dyn Channel>, ChannelError> {
        if self.channel.is_none() {
            let endpoint = self.endpoint.as_deref().ok_or(ChannelError::NoEndpoint)?;
            let channel = self.factory.open(endpoint, self.inbound.clone())?;
            info!(channel = %channel.id(), endpoint, "channel opened");
            self.channel = Some(channel);
        }
        self.channel.as_mut().ok_or(ChannelError::Closed)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
