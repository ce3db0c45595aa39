//! Lockout countdown primitive
//!
//! Owns a remaining duration decremented in fixed 1-second ticks. A tick
//! either subtracts or fires the terminal transition, never both; drift
//! between ticks is acceptable, skipping the terminal fire is not.

use std::time::Duration;

use crate::text::format_duration_mm_ss;

/// Fixed tick size for the lockout countdown.
pub const COUNTDOWN_TICK: Duration = Duration::from_millis(1_000);

/// Remaining lockout time, advanced one tick at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    remaining: Duration,
}

impl Countdown {
    /// Start a fresh countdown over `duration`.
    pub fn new(duration: Duration) -> Self {
        Self {
            remaining: duration,
        }
    }

    /// Remaining time before the countdown finishes.
    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Advance by one tick. Returns `true` exactly once, on the terminal
    /// tick; callers must not tick a finished countdown again.
    pub fn tick(&mut self) -> bool {
        if self.remaining > COUNTDOWN_TICK {
            self.remaining -= COUNTDOWN_TICK;
            false
        } else {
            self.remaining = Duration::ZERO;
            true
        }
    }

    /// Remaining time formatted as `minutes:seconds`.
    pub fn display(&self) -> String {
        format_duration_mm_ss(self.remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_down_in_one_second_ticks() {
        let mut countdown = Countdown::new(Duration::from_secs(3));
        assert!(!countdown.tick());
        assert_eq!(countdown.remaining(), Duration::from_secs(2));
        assert!(!countdown.tick());
        assert_eq!(countdown.remaining(), Duration::from_secs(1));
        assert!(countdown.tick());
        assert_eq!(countdown.remaining(), Duration::ZERO);
    }

    #[test]
    fn test_sixty_second_lockout_fires_on_sixtieth_tick() {
        let mut countdown = Countdown::new(Duration::from_millis(60_000));
        for _ in 0..59 {
            assert!(!countdown.tick());
        }
        assert!(countdown.tick());
    }

    #[test]
    fn test_sub_tick_duration_fires_immediately() {
        let mut countdown = Countdown::new(Duration::from_millis(400));
        assert!(countdown.tick());
    }

    #[test]
    fn test_display_formats_mm_ss() {
        let countdown = Countdown::new(Duration::from_secs(75));
        assert_eq!(countdown.display(), "1:15");
    }
}
