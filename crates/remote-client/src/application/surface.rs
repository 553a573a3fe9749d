//! RemoteSurface: one attached input surface.
//!
//! A surface wires together the three stateful parts of the client:
//!
//! ```text
//!  SurfaceEvent ──► GestureRecognizer ──┐
//!               └─► Keypad ─────────────┴──► CommandBatcher ──► Channel
//! ```
//!
//! It is driven from outside by three kinds of call: [`RemoteSurface::handle`]
//! for each input event, [`RemoteSurface::tick_flush`] on the flush timer and
//! [`RemoteSurface::tick_poll`] on the text poll timer.  All three run to
//! completion on one task, so none of the state below needs a lock.
//!
//! After [`RemoteSurface::teardown`] every call is a no-op: a timer that
//! fires late must not send anything on behalf of a surface that is gone.

use remote_core::domain::gesture::GestureRecognizer;
use tracing::{debug, info};

use crate::application::batcher::{CommandBatcher, FlushOutcome};
use crate::application::channel::{ChannelFactory, InboundSender};
use crate::application::keypad::{Keypad, TextField};
use crate::domain::{ClientConfig, SurfaceEvent};

/// One input surface bound to one batcher and channel.
pub struct RemoteSurface<F: TextField> {
    recognizer: GestureRecognizer,
    keypad: Keypad<F>,
    batcher: CommandBatcher,
    alive: bool,
}

impl<F: TextField> RemoteSurface<F> {
    /// Attaches a surface using `config`.
    ///
    /// When `config.endpoint` is set the channel is opened right away;
    /// otherwise it is opened by the first flush after an endpoint arrives.
    pub fn attach(
        config: &ClientConfig,
        field: F,
        factory: Box<dyn ChannelFactory>,
        inbound: InboundSender,
    ) -> Self {
        let recognizer =
            GestureRecognizer::with_transform(config.gesture_config(), config.motion_transform());
        let keypad = Keypad::new(field, config.effective_pad_len());
        let mut batcher = CommandBatcher::new(factory, inbound);
        if let Some(endpoint) = &config.endpoint {
            batcher.set_endpoint(endpoint.clone());
        }
        info!(
            tap_window_ms = config.gesture_config().tap_window_ms,
            pad_len = config.effective_pad_len(),
            "surface attached"
        );
        Self {
            recognizer,
            keypad,
            batcher,
            alive: true,
        }
    }

    /// Routes one input event to the recognizer, the keypad or the batcher.
    pub fn handle(&mut self, event: SurfaceEvent) {
        if !self.alive {
            return;
        }
        debug!(event = event.type_name(), "input event");
        match event {
            SurfaceEvent::Press { x, y, t } => {
                let commands = match (x, y) {
                    (Some(x), Some(y)) => self.recognizer.press_at(x, y, t),
                    _ => self.recognizer.on_press(t),
                };
                self.batcher.enqueue_all(commands);
            }
            SurfaceEvent::Move { x, y, t } => {
                let commands = self.recognizer.move_to(x, y, t);
                self.batcher.enqueue_all(commands);
            }
            SurfaceEvent::MoveBy { dx, dy, t } => {
                let commands = self.recognizer.on_move(dx, dy, t);
                self.batcher.enqueue_all(commands);
            }
            SurfaceEvent::Release { t } => {
                let commands = self.recognizer.on_release(t);
                self.batcher.enqueue_all(commands);
            }
            SurfaceEvent::Tap => {
                let commands = self.recognizer.on_tap();
                self.batcher.enqueue_all(commands);
            }
            SurfaceEvent::DoubleTap => {
                let commands = self.recognizer.on_double_tap();
                self.batcher.enqueue_all(commands);
            }
            SurfaceEvent::KeyDown { code } => {
                self.batcher.enqueue_all(self.keypad.key_down(code));
            }
            SurfaceEvent::KeyUp { code } => {
                self.batcher.enqueue_all(self.keypad.key_up(code));
            }
            SurfaceEvent::Focus => self.keypad.focus(),
            SurfaceEvent::Blur => {
                // Text typed since the last poll would otherwise be lost.
                self.batcher.enqueue_all(self.keypad.flush());
                self.keypad.blur();
            }
            SurfaceEvent::FieldClick => self.keypad.click(),
            SurfaceEvent::FieldValue { value } => self.keypad.field_mut().set_value(&value),
            SurfaceEvent::Endpoint { url } => self.batcher.set_endpoint(url),
        }
    }

    /// Flush timer tick.
    pub fn tick_flush(&mut self) -> FlushOutcome {
        if !self.alive {
            return FlushOutcome::Idle;
        }
        self.batcher.flush()
    }

    /// Text poll timer tick.
    pub fn tick_poll(&mut self) {
        if !self.alive {
            return;
        }
        let edit = self.keypad.poll();
        self.batcher.enqueue_all(edit);
    }

    /// Reads the text field immediately instead of waiting for the next poll.
    pub fn flush_text(&mut self) {
        if !self.alive {
            return;
        }
        let edit = self.keypad.flush();
        self.batcher.enqueue_all(edit);
    }

    /// `true` while the text poll timer should be running.
    pub fn text_polling(&self) -> bool {
        self.alive && self.keypad.is_listening()
    }

    /// Detaches the surface: stops listening and closes the channel.
    ///
    /// Idempotent.  Pending commands that were not flushed are discarded.
    pub fn teardown(&mut self) {
        if !self.alive {
            return;
        }
        self.alive = false;
        self.keypad.blur();
        self.batcher.close_channel();
        info!(frames_sent = self.batcher.frames_sent(), "surface torn down");
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn recognizer(&self) -> &GestureRecognizer {
        &self.recognizer
    }

    pub fn keypad(&self) -> &Keypad<F> {
        &self.keypad
    }

    pub fn batcher(&self) -> &CommandBatcher {
        &self.batcher
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
