//! Wall-clock session timer for auto-generation.
//!
//! The driving timer fires at an irregular cadence (slow event loops,
//! backgrounded tabs, machine suspend), so elapsed time is always derived
//! from actual timestamps rather than an assumed fixed period. Large gaps
//! are credited in full: offline accumulation is part of the genre, and
//! clamping the delta would starve auto-generation after a suspend.

pub struct SessionClock {
    /// Timestamp of the last update (ms), None before the first frame.
    last_timestamp: Option<f64>,
    /// Total elapsed seconds fed to the engine since creation.
    pub total_seconds: f64,
}

impl SessionClock {
    pub fn new() -> Self {
        Self {
            last_timestamp: None,
            total_seconds: 0.0,
        }
    }

    /// Feed a wall-clock timestamp in milliseconds; returns the elapsed
    /// seconds since the previous call (0.0 on the first call).
    ///
    /// Clock rewinds (NTP steps, timer quirks) yield 0 rather than a
    /// negative delta.
    pub fn update(&mut self, now_ms: f64) -> f64 {
        let delta_ms = match self.last_timestamp {
            Some(prev) => (now_ms - prev).max(0.0),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);
        let seconds = delta_ms / 1000.0;
        self.total_seconds += seconds;
        seconds
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_update_is_zero() {
        let mut clock = SessionClock::new();
        assert_eq!(clock.update(12_345.0), 0.0);
    }

    #[test]
    fn deltas_are_in_seconds() {
        let mut clock = SessionClock::new();
        clock.update(0.0);
        assert!((clock.update(250.0) - 0.25).abs() < 1e-9);
        assert!((clock.update(1_250.0) - 1.0).abs() < 1e-9);
        assert!((clock.total_seconds - 1.25).abs() < 1e-9);
    }

    #[test]
    fn suspension_gap_credited_in_full() {
        let mut clock = SessionClock::new();
        clock.update(0.0);
        // 8 hours in the background
        let elapsed = clock.update(8.0 * 3600.0 * 1000.0);
        assert!((elapsed - 8.0 * 3600.0).abs() < 1e-6);
    }

    #[test]
    fn clock_rewind_yields_zero() {
        let mut clock = SessionClock::new();
        clock.update(5_000.0);
        assert_eq!(clock.update(3_000.0), 0.0);
        // And recovers once time moves forward again
        assert!((clock.update(3_500.0) - 0.5).abs() < 1e-9);
    }
}
