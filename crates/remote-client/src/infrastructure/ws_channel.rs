//! WebSocket channel built on `tokio-tungstenite`.
//!
//! # How a send reaches the host
//!
//! ```text
//!  CommandBatcher ──send()──► mpsc queue ──► socket task ──► WebSocket ──► host
//!                                                │
//!  session loop ◄──── inbound mpsc ◄─────────────┘ (text messages from host)
//! ```
//!
//! [`WsChannelFactory::open`] returns immediately.  The handshake happens in
//! a spawned task, and anything sent before it completes waits in the
//! unbounded queue, so the very first frame after a reconnect is not lost.
//! If the handshake fails, queued and later frames are dropped and the next
//! `send` reports [`ChannelError::Closed`], which makes the batcher open a
//! fresh channel on the following flush.

use futures_util::{SinkExt, StreamExt};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio_tungstenite::{
    connect_async,
    tungstenite::{client::IntoClientRequest, Message as WsMessage},
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::application::channel::{Channel, ChannelError, ChannelFactory, InboundSender};

/// Instruction for the socket task.
#[derive(Debug)]
enum Outbound {
    Text(String),
    Close,
}

/// Opens [`WsChannel`]s on the current Tokio runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct WsChannelFactory;

impl WsChannelFactory {
    pub fn new() -> Self {
        Self
    }
}

impl ChannelFactory for WsChannelFactory {
    fn open(
        &self,
        endpoint: &str,
        inbound: InboundSender,
    ) -> Result<Box<dyn Channel>, ChannelError> {
        let request = endpoint
            .into_client_request()
            .map_err(|e| ChannelError::InvalidEndpoint {
                url: endpoint.to_string(),
                reason: e.to_string(),
            })?;
        let handle = Handle::try_current().map_err(|_| ChannelError::NoRuntime)?;

        let id = Uuid::new_v4();
        let (tx, rx) = unbounded_channel();
        let endpoint = endpoint.to_string();
        handle.spawn(drive_socket(id, endpoint.clone(), request, rx, inbound));

        Ok(Box::new(WsChannel { id, endpoint, tx }))
    }
}

/// Handle to one WebSocket connection driven by a background task.
#[derive(Debug)]
pub struct WsChannel {
    id: Uuid,
    endpoint: String,
    tx: UnboundedSender<Outbound>,
}

impl Channel for WsChannel {
    fn id(&self) -> Uuid {
        self.id
    }

    fn send(&mut self, text: String) -> Result<(), ChannelError> {
        self.tx
            .send(Outbound::Text(text))
            .map_err(|_| ChannelError::Closed)
    }

    fn close(&mut self) -> Result<(), ChannelError> {
        self.tx
            .send(Outbound::Close)
            .map_err(|_| {
                ChannelError::Close(format!("channel {} to {} already ended", self.id, self.endpoint))
            })
    }
}

/// Connects, then shuttles outbound text to the socket and inbound text to
/// `inbound` until either side closes.
async fn drive_socket(
    id: Uuid,
    endpoint: String,
    request: tokio_tungstenite::tungstenite::handshake::client::Request,
    mut outbound: UnboundedReceiver<Outbound>,
    inbound: InboundSender,
) {
    let ws_stream = match connect_async(request).await {
        Ok((stream, _response)) => stream,
        Err(e) => {
            warn!(channel = %id, %endpoint, "WebSocket connect failed: {e}");
            return;
        }
    };
    info!(channel = %id, %endpoint, "WebSocket connected");

    let (mut sink, mut stream) = ws_stream.split();

    loop {
        tokio::select! {
            msg = outbound.recv() => match msg {
                Some(Outbound::Text(text)) => {
                    if let Err(e) = sink.send(WsMessage::Text(text)).await {
                        warn!(channel = %id, "WebSocket send failed: {e}");
                        break;
                    }
                }
                Some(Outbound::Close) | None => {
                    // Best effort: the peer may already be gone.
                    if let Err(e) = sink.close().await {
                        debug!(channel = %id, "WebSocket close error ignored: {e}");
                    }
                    break;
                }
            },
            incoming = stream.next() => match incoming {
                Some(Ok(WsMessage::Text(text))) => {
                    if inbound.send(text).is_err() {
                        debug!(channel = %id, "inbound receiver dropped");
                    }
                }
                Some(Ok(WsMessage::Close(_))) | None => {
                    info!(channel = %id, "WebSocket closed by host");
                    break;
                }
                Some(Ok(WsMessage::Binary(data))) => {
                    debug!(channel = %id, len = data.len(), "ignoring binary message");
                }
                // Ping/Pong are answered by tungstenite itself.
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(channel = %id, "WebSocket receive error: {e}");
                    break;
                }
            },
        }
    }
    debug!(channel = %id, "socket task finished");
}

// ── Tests ─────────────────────────────────────────────────────────────────────
