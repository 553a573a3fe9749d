//! Client configuration types.
//!
//! [`ClientConfig`] is the single source of truth for all runtime settings.
//! It is built once at startup from the TOML file and CLI overrides (see
//! `infrastructure::storage` and `main.rs`) or from defaults in tests.
//!
//! # Design rationale
//!
//! Keeping configuration as a plain struct (no global state, no environment
//! reads inside the domain) lets tests build a surface with, say, a 5 ms
//! flush period without touching any files.

use std::time::Duration;

use remote_core::domain::gesture::{GestureConfig, DEFAULT_TAP_WINDOW_MS};
use remote_core::domain::motion::{
    MotionStrategy, MotionTransform, DEFAULT_TARGET_PIXELS_PER_SECOND, MIN_HISTORY_LEN,
};
use remote_core::domain::text_edit::DEFAULT_PAD_LEN;

/// Default batch flush period.
pub const DEFAULT_FLUSH_PERIOD: Duration = Duration::from_millis(20);

/// Default text-field poll period.
pub const DEFAULT_POLL_PERIOD: Duration = Duration::from_millis(90);

/// All runtime configuration for one remote surface.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// WebSocket URL of the receiving host.  `None` until one is set; the
    /// first flush without an endpoint drops its frame.
    pub endpoint: Option<String>,

    /// Delay between the end of one flush and the start of the next.
    pub flush_period: Duration,

    /// Delay between text-field polls while the field has focus.
    pub poll_period: Duration,

    /// Tap-then-press window that turns a press-and-slide into a drag.
    pub tap_window: Duration,

    /// Length of the motion history ring (clamped to at least 2).
    pub history_len: usize,

    /// Sentinel pad characters per side of the caret (clamped to at least 1).
    pub pad_len: usize,

    /// Factor applied to every reported move delta.
    pub movement_multiplier: f64,

    /// How raw motion becomes reported displacement.
    pub motion_strategy: MotionStrategy,

    /// Target speed for [`MotionStrategy::Normalized`].
    pub target_pixels_per_second: f64,
}

impl Default for ClientConfig {
    /// | Field                    | Default    |
    /// |--------------------------|------------|
    /// | endpoint                 | none       |
    /// | flush_period             | 20 ms      |
    /// | poll_period              | 90 ms      |
    /// | tap_window               | 180 ms     |
    /// | history_len              | 2          |
    /// | pad_len                  | 15         |
    /// | movement_multiplier      | 1.0        |
    /// | motion_strategy          | identity   |
    /// | target_pixels_per_second | 325.0      |
    fn default() -> Self {
        Self {
            endpoint: None,
            flush_period: DEFAULT_FLUSH_PERIOD,
            poll_period: DEFAULT_POLL_PERIOD,
            tap_window: Duration::from_millis(DEFAULT_TAP_WINDOW_MS),
            history_len: MIN_HISTORY_LEN,
            pad_len: DEFAULT_PAD_LEN,
            movement_multiplier: 1.0,
            motion_strategy: MotionStrategy::Identity,
            target_pixels_per_second: DEFAULT_TARGET_PIXELS_PER_SECOND,
        }
    }
}

impl ClientConfig {
    /// Recognizer settings derived from this configuration.
    pub fn gesture_config(&self) -> GestureConfig {
        GestureConfig {
            tap_window_ms: u64::try_from(self.tap_window.as_millis()).unwrap_or(u64::MAX),
            history_len: self.history_len.max(MIN_HISTORY_LEN),
        }
    }

    /// The motion transform selected by `motion_strategy`.
    pub fn motion_transform(&self) -> Box<dyn MotionTransform> {
        self.motion_strategy
            .build(self.movement_multiplier, self.target_pixels_per_second)
    }

    /// Effective sentinel pad length.
    pub fn effective_pad_len(&self) -> usize {
        self.pad_len.max(1)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_flush_period_is_20ms() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.flush_period, Duration::from_millis(20));
    }

    #[test]
    fn test_default_poll_period_is_90ms() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.poll_period, Duration::from_millis(90));
    }

    #[test]
    fn test_default_tap_window_is_180ms() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.gesture_config().tap_window_ms, 180);
    }

    #[test]
    fn test_default_has_no_endpoint() {
        assert_eq!(ClientConfig::default().endpoint, None);
    }

    #[test]
    fn test_default_text_and_motion_settings() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.pad_len, 15);
        assert_eq!(cfg.history_len, 2);
        assert_eq!(cfg.motion_strategy, MotionStrategy::Identity);
    }

    #[test]
    fn test_history_and_pad_are_clamped() {
        // Arrange
        let cfg = ClientConfig {
            history_len: 0,
            pad_len: 0,
            ..ClientConfig::default()
        };

        // Act / Assert
        assert_eq!(cfg.gesture_config().history_len, 2);
        assert_eq!(cfg.effective_pad_len(), 1);
    }

    #[test]
    fn test_motion_transform_uses_multiplier() {
        // Arrange
        let cfg = ClientConfig {
            movement_multiplier: 2.0,
            ..ClientConfig::default()
        };
        let mut history = remote_core::MotionHistory::default();
        history.push(1.0, -1.0, 10);

        // Act
        let delta = history.adjusted_delta(cfg.motion_transform().as_ref());

        // Assert
        assert_eq!(delta, (2.0, -2.0));
    }
}
