//! The session loop: one cooperative task that drives a [`RemoteSurface`].
//!
//! # What the loop waits on
//!
//! ```text
//!            ┌── next input line ──────► surface.handle(event)
//!            ├── flush timer (20 ms) ──► surface.tick_flush(), re-arm
//!  select! ──┼── poll timer (90 ms) ───► surface.tick_poll(), re-arm
//!            │      (only while the text field has focus)
//!            └── inbound host frame ───► decode, hand to InboundHandler
//! ```
//!
//! Everything runs on a single task, so each branch sees a consistent
//! surface and no locks are needed.  Each timer is re-armed only after its
//! tick has finished, so a slow flush delays the next one instead of
//! piling ticks up.
//!
//! The loop ends on end of input or when `running` is cleared (Ctrl+C).
//! Either way the surface gets one last flush and is torn down before
//! [`run_session`] returns.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use remote_core::protocol::decode_inbound;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::unbounded_channel;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::application::{
    ChannelFactory, FlushOutcome, InboundHandler, InertInbound, RemoteSurface, VirtualTextField,
};
use crate::domain::{parse_event_line, ClientConfig, SurfaceEvent};

/// Counters reported when a session ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Input events handed to the surface.
    pub events: u64,
    /// Input lines that were not valid events.
    pub malformed_lines: u64,
    /// Frames handed to a channel.
    pub frames_sent: u64,
    /// Frames dropped because no channel could carry them.
    pub frames_dropped: u64,
    /// Inbound host frames received.
    pub inbound_frames: u64,
}

impl SessionSummary {
    fn record_flush(&mut self, outcome: FlushOutcome) {
        match outcome {
            FlushOutcome::Idle => {}
            FlushOutcome::Sent { .. } => self.frames_sent += 1,
            FlushOutcome::Dropped => self.frames_dropped += 1,
        }
    }
}

/// Runs one surface until `input` ends or `running` becomes `false`.
///
/// `input` yields one JSON [`SurfaceEvent`] per line; malformed lines are
/// logged and skipped.
///
/// # Errors
///
/// Currently never fails: read errors on `input` end the session like end
/// of input does.  The `Result` leaves room for setup failures.
pub async fn run_session<R>(
    config: ClientConfig,
    input: R,
    factory: Box<dyn ChannelFactory>,
    running: Arc<AtomicBool>,
) -> anyhow::Result<SessionSummary>
where
    R: AsyncBufRead + Unpin,
{
    let (inbound_tx, mut inbound_rx) = unbounded_channel::<String>();
    let mut surface = RemoteSurface::attach(&config, VirtualTextField::new(), factory, inbound_tx);
    let mut inbound_handler = InertInbound;
    let mut summary = SessionSummary::default();
    let mut lines = input.lines();

    let flush_timer = sleep(config.flush_period);
    tokio::pin!(flush_timer);
    let poll_timer = sleep(config.poll_period);
    tokio::pin!(poll_timer);

    loop {
        if !running.load(Ordering::Relaxed) {
            info!("shutdown requested; ending session");
            break;
        }

        let polling = surface.text_polling();

        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => match parse_event_line(&line) {
                    Ok(Some(event)) => {
                        let focus = matches!(event, SurfaceEvent::Focus);
                        summary.events += 1;
                        surface.handle(event);
                        if focus {
                            // Polling starts a full period after focus.
                            poll_timer.as_mut().reset(Instant::now() + config.poll_period);
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        summary.malformed_lines += 1;
                        warn!("skipping input line: {e}");
                    }
                },
                Ok(None) => {
                    info!("input closed; ending session");
                    break;
                }
                Err(e) => {
                    warn!("input read failed; ending session: {e}");
                    break;
                }
            },
            () = &mut flush_timer => {
                summary.record_flush(surface.tick_flush());
                flush_timer.as_mut().reset(Instant::now() + config.flush_period);
            }
            () = &mut poll_timer, if polling => {
                surface.tick_poll();
                poll_timer.as_mut().reset(Instant::now() + config.poll_period);
            }
            Some(text) = inbound_rx.recv() => {
                summary.inbound_frames += 1;
                match decode_inbound(&text) {
                    Ok(frame) => inbound_handler.on_frame(frame),
                    Err(e) => warn!("dropping inbound frame: {e}"),
                }
            }
        }
    }

    if surface.text_polling() {
        surface.flush_text();
    }
    summary.record_flush(surface.tick_flush());
    surface.teardown();
    debug!(?summary, "session finished");

    Ok(summary)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
