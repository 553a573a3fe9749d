//! Motion vector history: a short ring of recent pointer displacements.
//!
//! Every processed move notification pushes one [`MotionSample`] (the
//! displacement since the previous notification plus its timestamp).  The ring
//! always holds exactly `N` samples; it starts pre-filled with zero samples and
//! discards the oldest one on every insert.
//!
//! Two adjacent samples are enough to describe the instantaneous motion:
//!
//! ```text
//! pixels            = sqrt(dx² + dy²)          (of the newer sample)
//! pixels_per_second = pixels * 1000 / dt       (dt in milliseconds)
//! ```
//!
//! How that motion becomes the displacement actually sent to the host is a
//! pluggable [`MotionTransform`].  The default ([`ScaledIdentity`]) passes the
//! raw displacement through, scaled by a multiplier.  [`SpeedNormalized`]
//! rescales each step to a target speed so that perceived pointer speed does
//! not depend on how often the input surface happens to sample.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Smallest history that can still produce a speed (two adjacent samples).
pub const MIN_HISTORY_LEN: usize = 2;

/// Default target speed for [`SpeedNormalized`], in pixels per second.
pub const DEFAULT_TARGET_PIXELS_PER_SECOND: f64 = 325.0;

/// One recorded displacement.  Immutable once recorded.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionSample {
    /// Horizontal displacement since the previous sample, in pixels.
    pub dx: f64,
    /// Vertical displacement since the previous sample, in pixels.
    pub dy: f64,
    /// Timestamp of the notification, in milliseconds.
    pub t: u64,
}

impl MotionSample {
    /// The sample the ring is pre-filled with.
    pub const ZERO: MotionSample = MotionSample {
        dx: 0.0,
        dy: 0.0,
        t: 0,
    };

    pub fn new(dx: f64, dy: f64, t: u64) -> Self {
        Self { dx, dy, t }
    }
}

/// Instantaneous motion between two adjacent samples.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Speed {
    pub dx: f64,
    pub dy: f64,
    /// Euclidean length of `(dx, dy)`.
    pub pixels: f64,
    /// `pixels * 1000 / dt`, or `0.0` when `pixels` is zero.
    pub pixels_per_second: f64,
}

/// Computes the speed of `newer` relative to the sample recorded before it.
///
/// Never panics.  A zero-length displacement yields a zero speed without
/// dividing, whatever the time difference.
pub fn step_speed(newer: &MotionSample, older: &MotionSample) -> Speed {
    let dt = newer.t as f64 - older.t as f64;
    let pixels = (newer.dx * newer.dx + newer.dy * newer.dy).sqrt();

    if pixels == 0.0 {
        return Speed {
            dx: newer.dx,
            dy: newer.dy,
            pixels: 0.0,
            pixels_per_second: 0.0,
        };
    }

    Speed {
        dx: newer.dx,
        dy: newer.dy,
        pixels,
        pixels_per_second: pixels * 1000.0 / dt,
    }
}

/// Fixed-length FIFO of the most recent [`MotionSample`]s.
#[derive(Debug, Clone)]
pub struct MotionHistory {
    /// Oldest sample at the front, newest at the back.  Always `capacity` long.
    samples: VecDeque<MotionSample>,
    capacity: usize,
}

impl MotionHistory {
    /// Creates a history of `len` zero samples.  `len` is clamped to at least
    /// [`MIN_HISTORY_LEN`].
    pub fn new(len: usize) -> Self {
        let capacity = len.max(MIN_HISTORY_LEN);
        let samples = std::iter::repeat(MotionSample::ZERO).take(capacity).collect();
        Self { samples, capacity }
    }

    /// Records a displacement, discarding the oldest sample.  O(1).
    pub fn push(&mut self, dx: f64, dy: f64, t: u64) {
        self.samples.pop_front();
        self.samples.push_back(MotionSample::new(dx, dy, t));
    }

    /// Number of samples held (always the configured length).
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always `false`: the ring is pre-filled.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Configured length of the ring.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The newest sample.
    pub fn latest(&self) -> MotionSample {
        self.nth_newest(0)
    }

    /// The sample recorded just before [`latest`](Self::latest).
    pub fn previous(&self) -> MotionSample {
        self.nth_newest(1)
    }

    /// Speed of the newest step.
    pub fn last_speed(&self) -> Speed {
        step_speed(&self.latest(), &self.previous())
    }

    /// Speeds of the `steps` newest adjacent pairs, newest first.
    ///
    /// `steps` is clamped to `1..=len-1`, the number of pairs in the ring.
    pub fn speeds(&self, steps: usize) -> Vec<Speed> {
        let steps = steps.clamp(1, self.capacity - 1);
        (0..steps)
            .map(|i| step_speed(&self.nth_newest(i), &self.nth_newest(i + 1)))
            .collect()
    }

    /// Displacement to report for the newest step, as decided by `transform`.
    pub fn adjusted_delta(&self, transform: &dyn MotionTransform) -> (f64, f64) {
        transform.apply(self)
    }

    fn nth_newest(&self, n: usize) -> MotionSample {
        // The ring is never shorter than MIN_HISTORY_LEN, and callers stay
        // within `capacity - 1`.
        self.samples[self.capacity - 1 - n]
    }
}

impl Default for MotionHistory {
    fn default() -> Self {
        Self::new(MIN_HISTORY_LEN)
    }
}

// ── Transform strategies ──────────────────────────────────────────────────────

/// Turns the motion recorded in a [`MotionHistory`] into the displacement that
/// is sent to the host.
pub trait MotionTransform: fmt::Debug + Send + Sync {
    fn apply(&self, history: &MotionHistory) -> (f64, f64);
}

/// Raw displacement of the newest sample, multiplied by `multiplier`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledIdentity {
    pub multiplier: f64,
}

impl Default for ScaledIdentity {
    fn default() -> Self {
        Self { multiplier: 1.0 }
    }
}

impl MotionTransform for ScaledIdentity {
    fn apply(&self, history: &MotionHistory) -> (f64, f64) {
        let speed = history.last_speed();
        (speed.dx * self.multiplier, speed.dy * self.multiplier)
    }
}

/// Scales the newest displacement by `target_pixels_per_second / pixels_per_second`.
///
/// A step without a usable speed (no movement, or a zero/negative time
/// difference) falls back to the scaled raw displacement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedNormalized {
    pub target_pixels_per_second: f64,
    pub multiplier: f64,
}

impl Default for SpeedNormalized {
    fn default() -> Self {
        Self {
            target_pixels_per_second: DEFAULT_TARGET_PIXELS_PER_SECOND,
            multiplier: 1.0,
        }
    }
}

impl MotionTransform for SpeedNormalized {
    fn apply(&self, history: &MotionHistory) -> (f64, f64) {
        let speed = history.last_speed();
        let pps = speed.pixels_per_second;
        let scale = if pps.is_finite() && pps > 0.0 {
            self.target_pixels_per_second / pps
        } else {
            1.0
        };
        (
            speed.dx * scale * self.multiplier,
            speed.dy * scale * self.multiplier,
        )
    }
}

/// Named selection of a [`MotionTransform`], as written in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionStrategy {
    /// [`ScaledIdentity`].
    #[default]
    Identity,
    /// [`SpeedNormalized`].
    Normalized,
}

impl MotionStrategy {
    /// Builds the transform this strategy names.
    pub fn build(self, multiplier: f64, target_pixels_per_second: f64) -> Box<dyn MotionTransform> {
        match self {
            MotionStrategy::Identity => Box::new(ScaledIdentity { multiplier }),
            MotionStrategy::Normalized => Box::new(SpeedNormalized {
                target_pixels_per_second,
                multiplier,
            }),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_history_is_prefilled_with_zero_samples() {
        // Arrange / Act
        let history = MotionHistory::new(4);

        // Assert
        assert_eq!(history.len(), 4);
        assert_eq!(history.latest(), MotionSample::ZERO);
        assert_eq!(history.previous(), MotionSample::ZERO);
    }

    #[test]
    fn test_history_length_is_clamped_to_two() {
        assert_eq!(MotionHistory::new(0).len(), 2);
        assert_eq!(MotionHistory::new(1).capacity(), 2);
    }

    #[test]
    fn test_push_discards_oldest_and_keeps_length() {
        // Arrange
        let mut history = MotionHistory::new(2);

        // Act
        history.push(1.0, 1.0, 10);
        history.push(2.0, 2.0, 20);
        history.push(3.0, 3.0, 30);

        // Assert
        assert_eq!(history.len(), 2);
        assert_eq!(history.latest(), MotionSample::new(3.0, 3.0, 30));
        assert_eq!(history.previous(), MotionSample::new(2.0, 2.0, 20));
    }

    #[test]
    fn test_step_speed_computes_pixels_and_rate() {
        // Arrange: a 3-4-5 triangle covered in 10 ms
        let older = MotionSample::new(0.0, 0.0, 100);
        let newer = MotionSample::new(3.0, 4.0, 110);

        // Act
        let speed = step_speed(&newer, &older);

        // Assert
        assert_eq!(speed.pixels, 5.0);
        assert_eq!(speed.pixels_per_second, 500.0);
        assert_eq!((speed.dx, speed.dy), (3.0, 4.0));
    }

    #[test]
    fn test_step_speed_zero_vector_has_zero_rate() {
        // Two identical zero-displacement samples must not divide by dt = 0.
        let sample = MotionSample::new(0.0, 0.0, 50);

        let speed = step_speed(&sample, &sample);

        assert_eq!(speed.pixels, 0.0);
        assert_eq!(speed.pixels_per_second, 0.0);
    }

    #[test]
    fn test_speeds_returns_newest_first_and_clamps_steps() {
        // Arrange
        let mut history = MotionHistory::new(3);
        history.push(1.0, 0.0, 10);
        history.push(2.0, 0.0, 20);
        history.push(4.0, 0.0, 30);

        // Act
        let speeds = history.speeds(10);

        // Assert: only two adjacent pairs exist in a ring of three
        assert_eq!(speeds.len(), 2);
        assert_eq!(speeds[0].dx, 4.0);
        assert_eq!(speeds[0].pixels_per_second, 400.0);
        assert_eq!(speeds[1].dx, 2.0);
        assert_eq!(speeds[1].pixels_per_second, 200.0);
    }

    #[test]
    fn test_speeds_zero_steps_still_returns_one() {
        let history = MotionHistory::default();
        assert_eq!(history.speeds(0).len(), 1);
    }

    #[test]
    fn test_scaled_identity_passes_raw_delta_through() {
        let mut history = MotionHistory::default();
        history.push(7.0, -2.0, 16);

        let delta = history.adjusted_delta(&ScaledIdentity::default());

        assert_eq!(delta, (7.0, -2.0));
    }

    #[test]
    fn test_scaled_identity_applies_multiplier() {
        let mut history = MotionHistory::default();
        history.push(2.0, 3.0, 16);

        let delta = history.adjusted_delta(&ScaledIdentity { multiplier: 2.5 });

        assert_eq!(delta, (5.0, 7.5));
    }

    #[test]
    fn test_speed_normalized_rescales_to_target_speed() {
        // Arrange: 5 px in 10 ms = 500 px/s; target 250 px/s halves the step
        let mut history = MotionHistory::default();
        history.push(0.0, 0.0, 100);
        history.push(3.0, 4.0, 110);
        let transform = SpeedNormalized {
            target_pixels_per_second: 250.0,
            multiplier: 1.0,
        };

        // Act
        let (dx, dy) = history.adjusted_delta(&transform);

        // Assert
        assert!((dx - 1.5).abs() < 1e-9);
        assert!((dy - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_speed_normalized_falls_back_when_dt_is_zero() {
        let mut history = MotionHistory::default();
        history.push(0.0, 0.0, 100);
        history.push(3.0, 4.0, 100);

        let delta = history.adjusted_delta(&SpeedNormalized::default());

        assert_eq!(delta, (3.0, 4.0));
    }

    #[test]
    fn test_motion_strategy_builds_matching_transform() {
        let mut history = MotionHistory::default();
        history.push(1.0, 1.0, 10);

        let identity = MotionStrategy::Identity.build(3.0, 325.0);

        assert_eq!(history.adjusted_delta(identity.as_ref()), (3.0, 3.0));
        assert_eq!(MotionStrategy::default(), MotionStrategy::Identity);
    }
}
