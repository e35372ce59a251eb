//! Game Clock
//!
//! A monotonic millisecond tick source shared by every substrate component.
//! The host's wall clock is injected through [`sync`](GameClock::sync) so
//! tests can drive time deterministically.

use crate::constants::MIN_TICK_INTERVAL_MS;

/// Monotonic clock driven by the host's `now_ms()`.
#[derive(Debug, Clone, Default)]
pub struct GameClock {
    now_ms: u64,
    last_rotation_ms: Option<u64>,
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Absorb the host's current time, ignoring regressions so the clock
    /// stays monotonic. Returns the elapsed milliseconds since the previous
    /// sync.
    pub fn sync(&mut self, host_now_ms: u64) -> u64 {
        let elapsed = host_now_ms.saturating_sub(self.now_ms);
        if host_now_ms > self.now_ms {
            self.now_ms = host_now_ms;
        }
        elapsed
    }

    /// Current time in milliseconds.
    pub fn now(&self) -> u64 {
        self.now_ms
    }

    /// Record a rotation evaluation at the current time. Returns `false`
    /// when the previous rotation ran within the minimum tick interval, in
    /// which case the caller must elide the duplicate tick.
    pub fn begin_rotation(&mut self) -> bool {
        if let Some(last) = self.last_rotation_ms {
            if self.now_ms.saturating_sub(last) < MIN_TICK_INTERVAL_MS {
                return false;
            }
        }
        self.last_rotation_ms = Some(self.now_ms);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_reports_elapsed() {
        let mut clock = GameClock::new();
        assert_eq!(clock.sync(100), 100);
        assert_eq!(clock.sync(175), 75);
        assert_eq!(clock.now(), 175);
    }

    #[test]
    fn test_sync_ignores_time_regression() {
        let mut clock = GameClock::new();
        clock.sync(1000);
        assert_eq!(clock.sync(900), 0);
        assert_eq!(clock.now(), 1000);
    }

    #[test]
    fn test_double_tick_is_elided() {
        let mut clock = GameClock::new();
        clock.sync(1000);
        assert!(clock.begin_rotation());
        clock.sync(1020);
        assert!(!clock.begin_rotation(), "second call within 50ms must be elided");
        clock.sync(1060);
        assert!(clock.begin_rotation());
    }
}
