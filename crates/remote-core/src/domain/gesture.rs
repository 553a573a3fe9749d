//! Gesture recognition for a touch-driven pointer.
//!
//! A remote touchpad only sees three primitives: *press*, *move* and
//! *release*.  From those it has to decide what the user meant:
//!
//! | User does                              | Host receives                     |
//! |----------------------------------------|-----------------------------------|
//! | slide a finger                         | `move` deltas                     |
//! | tap                                    | `click` (from the tap detector)   |
//! | tap, then within 180 ms press and slide | `press`, `move` deltas, `release` |
//!
//! The last row is what makes click-and-drag possible on a touch screen with
//! no physical button to hold down.
//!
//! # State machine
//!
//! ```text
//!            press                first move              first move after a recent tap
//!   Idle ───────────▶ Touching ─────────────▶ Moving      Touching ─────────────▶ Dragging
//!    ▲                   │                      │                                     │
//!    └────── release ────┴──────────────────────┴───────────── release ──────────────┘
//! ```
//!
//! [`GestureState`] holds the flags and timestamps and exposes each
//! transition as a pure function returning a [`Transition`], so the whole
//! machine can be tested without any input surface.  [`GestureRecognizer`]
//! adds the [`MotionHistory`] and turns moves into displacement commands.

use tracing::trace;

use crate::domain::motion::{MotionHistory, MotionTransform, ScaledIdentity, MIN_HISTORY_LEN};
use crate::protocol::commands::{Command, MouseButton};

/// Default maximum gap, in milliseconds, between a tap and the next press for
/// that press to start a drag.
pub const DEFAULT_TAP_WINDOW_MS: u64 = 180;

/// Tunables for [`GestureRecognizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureConfig {
    /// Tap-then-press window, in milliseconds.
    pub tap_window_ms: u64,
    /// Length of the motion history ring (at least 2).
    pub history_len: usize,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            tap_window_ms: DEFAULT_TAP_WINDOW_MS,
            history_len: MIN_HISTORY_LEN,
        }
    }
}

/// Coarse phase derived from the [`GestureState`] flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    Touching,
    Moving,
    Dragging,
}

/// Mutable state of one input surface's recognizer.
///
/// Timestamps are `None` until the corresponding event has happened once.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureState {
    pub touching: bool,
    pub moving: bool,
    pub dragging: bool,
    pub last_press_time: Option<u64>,
    pub last_release_time: Option<u64>,
    /// Release time of the last press/release pair that never moved.
    pub last_tap_time: Option<u64>,
    pub press_position: Option<(f64, f64)>,
}

/// Result of applying one input to a [`GestureState`].
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: GestureState,
    /// Button commands produced by the transition, in emission order.
    pub commands: Vec<Command>,
}

impl GestureState {
    pub fn phase(&self) -> GesturePhase {
        if self.dragging {
            GesturePhase::Dragging
        } else if self.moving {
            GesturePhase::Moving
        } else if self.touching {
            GesturePhase::Touching
        } else {
            GesturePhase::Idle
        }
    }

    /// A finger (or button) went down at `now`.
    ///
    /// Movement tracking restarts: a press never continues an earlier motion.
    pub fn press(self, now: u64, position: Option<(f64, f64)>) -> Transition {
        let mut next = self;
        let mut commands = Vec::new();
        next.last_press_time = Some(now);
        next.press_position = position;
        next.set_touching(true, &mut commands);
        next.set_moving(false, 0, &mut commands);
        Transition {
            state: next,
            commands,
        }
    }

    /// A move was observed.  Starts moving when touching, and promotes to a
    /// drag when the press followed a tap within `tap_window_ms`.
    pub fn motion(self, tap_window_ms: u64) -> Transition {
        let mut next = self;
        let mut commands = Vec::new();
        if next.touching && !next.moving {
            next.set_moving(true, tap_window_ms, &mut commands);
        }
        Transition {
            state: next,
            commands,
        }
    }

    /// The finger lifted at `now`.  A release that never moved records a tap;
    /// a release that ends a drag emits `release`.
    pub fn release(self, now: u64) -> Transition {
        let mut next = self;
        let mut commands = Vec::new();
        next.last_release_time = Some(now);
        if !next.moving {
            next.last_tap_time = Some(now);
        }
        next.set_touching(false, &mut commands);
        Transition {
            state: next,
            commands,
        }
    }

    /// The external tap detector saw a tap: one click unless moving.
    pub fn tap(self) -> Transition {
        self.clicks(1)
    }

    /// The external tap detector saw a double tap: two clicks unless moving.
    pub fn double_tap(self) -> Transition {
        self.clicks(2)
    }

    fn clicks(self, count: usize) -> Transition {
        let commands = if self.moving {
            Vec::new()
        } else {
            vec![Command::Click(MouseButton::Primary); count]
        };
        Transition {
            state: self,
            commands,
        }
    }

    fn set_touching(&mut self, touching: bool, out: &mut Vec<Command>) {
        if self.touching == touching {
            return;
        }
        self.touching = touching;
        self.set_moving(false, 0, out);
    }

    fn set_moving(&mut self, moving: bool, tap_window_ms: u64, out: &mut Vec<Command>) {
        if self.moving == moving {
            return;
        }
        self.moving = moving;
        if moving {
            if !self.dragging && self.pressed_within_tap_window(tap_window_ms) {
                self.set_dragging(true, out);
            }
        } else {
            self.set_dragging(false, out);
        }
    }

    fn set_dragging(&mut self, dragging: bool, out: &mut Vec<Command>) {
        if self.dragging == dragging {
            return;
        }
        self.dragging = dragging;
        out.push(if dragging {
            Command::Press(MouseButton::Primary)
        } else {
            Command::Release(MouseButton::Primary)
        });
    }

    fn pressed_within_tap_window(&self, tap_window_ms: u64) -> bool {
        match (self.last_press_time, self.last_tap_time) {
            (Some(press), Some(tap)) => press.saturating_sub(tap) < tap_window_ms,
            _ => false,
        }
    }
}

/// Stateful recognizer for one input surface.
#[derive(Debug)]
pub struct GestureRecognizer {
    state: GestureState,
    config: GestureConfig,
    history: MotionHistory,
    transform: Box<dyn MotionTransform>,
    /// Last absolute pointer position, for [`move_to`](Self::move_to).
    last_position: Option<(f64, f64)>,
}

impl GestureRecognizer {
    /// Creates a recognizer reporting raw displacements.
    pub fn new(config: GestureConfig) -> Self {
        Self::with_transform(config, Box::new(ScaledIdentity::default()))
    }

    /// Creates a recognizer whose move deltas come from `transform`.
    pub fn with_transform(config: GestureConfig, transform: Box<dyn MotionTransform>) -> Self {
        Self {
            state: GestureState::default(),
            history: MotionHistory::new(config.history_len),
            config,
            transform,
            last_position: None,
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn history(&self) -> &MotionHistory {
        &self.history
    }

    pub fn config(&self) -> GestureConfig {
        self.config
    }

    /// Press without a known position.  The first [`move_to`](Self::move_to)
    /// afterwards only establishes a position and moves by zero.
    pub fn on_press(&mut self, now: u64) -> Vec<Command> {
        self.last_position = None;
        self.apply(|s| s.press(now, None))
    }

    /// Press at an absolute position; later [`move_to`](Self::move_to) calls
    /// are measured from here.
    pub fn press_at(&mut self, x: f64, y: f64, now: u64) -> Vec<Command> {
        self.last_position = Some((x, y));
        self.apply(|s| s.press(now, Some((x, y))))
    }

    /// Relative move of `(dx, dy)` observed at `now`.
    ///
    /// Every call while moving yields exactly one `move` command, after any
    /// drag `press` it triggered.
    pub fn on_move(&mut self, dx: f64, dy: f64, now: u64) -> Vec<Command> {
        self.history.push(dx, dy, now);
        let tap_window_ms = self.config.tap_window_ms;
        let mut commands = self.apply(|s| s.motion(tap_window_ms));
        if self.state.moving {
            let (adj_x, adj_y) = self.history.adjusted_delta(self.transform.as_ref());
            commands.push(Command::Move {
                dx: adj_x,
                dy: adj_y,
            });
        }
        commands
    }

    /// Move to an absolute position; the delta is taken from the previous
    /// absolute position (zero if none is known).
    pub fn move_to(&mut self, x: f64, y: f64, now: u64) -> Vec<Command> {
        let (dx, dy) = match self.last_position {
            Some((px, py)) => (x - px, y - py),
            None => (0.0, 0.0),
        };
        self.last_position = Some((x, y));
        self.on_move(dx, dy, now)
    }

    pub fn on_release(&mut self, now: u64) -> Vec<Command> {
        self.apply(|s| s.release(now))
    }

    pub fn on_tap(&mut self) -> Vec<Command> {
        self.apply(GestureState::tap)
    }

    pub fn on_double_tap(&mut self) -> Vec<Command> {
        self.apply(GestureState::double_tap)
    }

    fn apply(&mut self, f: impl FnOnce(GestureState) -> Transition) -> Vec<Command> {
        let before = self.state.phase();
        let Transition { state, commands } = f(self.state);
        self.state = state;
        let after = state.phase();
        if before != after {
            trace!(?before, ?after, "gesture phase changed");
        }
        commands
    }
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
