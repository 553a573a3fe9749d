//! In-memory channel for dry runs and tests.
//!
//! [`MemoryChannelFactory`] records every open, send and close into a shared
//! log instead of touching the network.  The factory is cheap to clone; all
//! clones share one log, so a test can hand one clone to the surface and keep
//! another to inspect what was sent:
//!
//! ```ignore
//! let factory = MemoryChannelFactory::new();
//! let surface = RemoteSurface::attach(&config, field, Box::new(factory.clone()), tx);
//! // ... drive the surface ...
//! assert_eq!(factory.sent(), vec![r#"{"mc":1}"#.to_string()]);
//! ```
//!
//! `web-remote --dry-run` uses it to print the frames a session would have
//! sent.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use crate::application::channel::{Channel, ChannelError, ChannelFactory, InboundSender};

#[derive(Debug, Default)]
struct MemoryLog {
    opened: Vec<String>,
    sent: Vec<String>,
    closes: usize,
    fail_open: bool,
    inbound: Option<InboundSender>,
}

/// A [`ChannelFactory`] whose channels only record what they are given.
#[derive(Debug, Clone, Default)]
pub struct MemoryChannelFactory {
    log: Arc<Mutex<MemoryLog>>,
}

impl MemoryChannelFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory whose every `open` fails with [`ChannelError::Closed`].
    pub fn failing() -> Self {
        let factory = Self::default();
        factory.lock().fail_open = true;
        factory
    }

    /// Endpoints passed to `open`, in order.
    pub fn opened(&self) -> Vec<String> {
        self.lock().opened.clone()
    }

    /// Text passed to `send` on any channel, in order.
    pub fn sent(&self) -> Vec<String> {
        self.lock().sent.clone()
    }

    /// Number of `close` calls on any channel.
    pub fn closes(&self) -> usize {
        self.lock().closes
    }

    /// Delivers `text` as if the host had sent it on the most recently
    /// opened channel.  Returns `false` when no channel was opened or the
    /// receiver is gone.
    pub fn push_inbound(&self, text: impl Into<String>) -> bool {
        match &self.lock().inbound {
            Some(tx) => tx.send(text.into()).is_ok(),
            None => false,
        }
    }

    fn lock(&self) -> MutexGuard<'_, MemoryLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ChannelFactory for MemoryChannelFactory {
    fn open(
        &self,
        endpoint: &str,
        inbound: InboundSender,
    ) -> Result<Box<dyn Channel>, ChannelError> {
        let mut log = self.lock();
        if log.fail_open {
            return Err(ChannelError::Closed);
        }
        log.opened.push(endpoint.to_string());
        log.inbound = Some(inbound);
        Ok(Box::new(MemoryChannel {
            id: Uuid::new_v4(),
            log: Arc::clone(&self.log),
            closed: false,
        }))
    }
}

/// A channel opened by [`MemoryChannelFactory`].
#[derive(Debug)]
pub struct MemoryChannel {
    id: Uuid,
    log: Arc<Mutex<MemoryLog>>,
    closed: bool,
}

impl Channel for MemoryChannel {
    fn id(&self) -> Uuid {
        self.id
    }

    fn send(&mut self, text: String) -> Result<(), ChannelError> {
        if self.closed {
            return Err(ChannelError::Closed);
        }
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .sent
            .push(text);
        Ok(())
    }

    fn close(&mut self) -> Result<(), ChannelError> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .closes += 1;
        if self.closed {
            return Err(ChannelError::Close("already closed".to_string()));
        }
        self.closed = true;
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
