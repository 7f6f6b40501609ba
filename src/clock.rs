//! Simulated clock
//!
//! Hands out record timestamps independent of wall time. Each `tick` returns
//! the current value and then moves it forward, so the first record carries
//! exactly the configured start.

use chrono::{NaiveDateTime, TimeDelta};
use rand::Rng;
use std::ops::RangeInclusive;

/// Simulated seconds between consecutive records
pub const INCREMENT_SECS: RangeInclusive<f64> = 0.1..=2.5;

#[derive(Debug, Clone)]
pub struct SimulatedClock {
    next: NaiveDateTime,
    end: Option<NaiveDateTime>,
}

impl SimulatedClock {
    pub fn new(start: NaiveDateTime, end: Option<NaiveDateTime>) -> Self {
        Self { next: start, end }
    }

    /// Timestamp the next record will carry
    pub fn peek(&self) -> NaiveDateTime {
        self.next
    }

    pub fn end(&self) -> Option<NaiveDateTime> {
        self.end
    }

    /// True once the next timestamp lies past the configured end.
    pub fn exhausted(&self) -> bool {
        self.end.is_some_and(|end| self.next > end)
    }

    /// Return the current timestamp and advance by `increment`.
    pub fn tick(&mut self, increment: TimeDelta) -> NaiveDateTime {
        let current = self.next;
        // Saturate at the far future rather than wrap
        self.next = current.checked_add_signed(increment).unwrap_or(NaiveDateTime::MAX);
        current
    }

    /// Advance by a random increment drawn from `INCREMENT_SECS`.
    pub fn tick_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> NaiveDateTime {
        let secs = rng.random_range(INCREMENT_SECS);
        let increment = TimeDelta::microseconds((secs * 1_000_000.0).round() as i64);
        self.tick(increment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_first_tick_returns_start() {
        let mut clock = SimulatedClock::new(start(), None);
        assert_eq!(clock.tick(TimeDelta::seconds(1)), start());
        assert_eq!(clock.peek(), start() + TimeDelta::seconds(1));
    }

    #[test]
    fn test_random_ticks_are_monotonic_and_bounded() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut clock = SimulatedClock::new(start(), None);
        let mut prev = clock.tick_random(&mut rng);

        for _ in 0..1_000 {
            let ts = clock.tick_random(&mut rng);
            let delta = ts - prev;
            assert!(delta >= TimeDelta::milliseconds(100));
            assert!(delta <= TimeDelta::milliseconds(2_500));
            prev = ts;
        }
    }

    #[test]
    fn test_exhausted_only_after_passing_end() {
        let end = start() + TimeDelta::seconds(2);
        let mut clock = SimulatedClock::new(start(), Some(end));
        assert!(!clock.exhausted());

        clock.tick(TimeDelta::seconds(2));
        assert!(!clock.exhausted(), "landing exactly on the end is allowed");

        clock.tick(TimeDelta::microseconds(1));
        assert!(clock.exhausted());
    }

    #[test]
    fn test_no_end_never_exhausts() {
        let mut clock = SimulatedClock::new(start(), None);
        clock.tick(TimeDelta::days(10_000));
        assert!(!clock.exhausted());
    }
}
