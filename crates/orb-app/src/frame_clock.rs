//! Variable-step frame timing.
//!
//! Each redraw advances the scene by the real time since the previous
//! redraw. Long stalls (a dragged window, a debugger break) are clamped so
//! the scene does not jump.

use std::time::Instant;
use tracing::warn;

/// Longest step handed to the scene, in seconds.
pub const MAX_FRAME_DELTA: f64 = 0.25;

#[derive(Debug, Default)]
pub struct FrameClock {
    previous: Option<Instant>,
}

impl FrameClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous call. The first call returns 0.
    pub fn tick(&mut self) -> f64 {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> f64 {
        let mut delta = self
            .previous
            .map_or(0.0, |prev| now.saturating_duration_since(prev).as_secs_f64());
        self.previous = Some(now);

        if delta > MAX_FRAME_DELTA {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                delta * 1000.0,
                MAX_FRAME_DELTA * 1000.0
            );
            delta = MAX_FRAME_DELTA;
        }

        delta
    }

    /// Forget the previous instant so the next tick starts from zero.
    pub fn reset(&mut self) {
        self.previous = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_first_tick_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick_at(Instant::now()), 0.0);
    }

    #[test]
    fn test_delta_is_time_between_ticks() {
        let mut clock = FrameClock::new();
        let start = Instant::now();
        clock.tick_at(start);
        let delta = clock.tick_at(start + Duration::from_millis(16));
        assert!((delta - 0.016).abs() < 1e-9);
        let delta = clock.tick_at(start + Duration::from_millis(50));
        assert!((delta - 0.034).abs() < 1e-9);
    }

    #[test]
    fn test_long_stall_is_clamped() {
        let mut clock = FrameClock::new();
        let start = Instant::now();
        clock.tick_at(start);
        let delta = clock.tick_at(start + Duration::from_secs(3));
        assert_eq!(delta, MAX_FRAME_DELTA);
    }

    #[test]
    fn test_out_of_order_instant_yields_zero() {
        let mut clock = FrameClock::new();
        let start = Instant::now() + Duration::from_secs(1);
        clock.tick_at(start);
        assert_eq!(clock.tick_at(start - Duration::from_millis(5)), 0.0);
    }

    #[test]
    fn test_reset_restarts_from_zero() {
        let mut clock = FrameClock::new();
        let start = Instant::now();
        clock.tick_at(start);
        clock.reset();
        assert_eq!(clock.tick_at(start + Duration::from_millis(100)), 0.0);
    }
}
