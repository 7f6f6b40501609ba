//! Record generator
//!
//! Owns the simulated clock, the random source and the message source.
//! Draw order per record: clock increment, source file, level, message,
//! metrics. With a fixed seed and no backend the output is reproducible.

use crate::backend::MessageSource;
use crate::clock::SimulatedClock;
use crate::config::TimeWindow;
use crate::record::{Level, LogRecord, Metrics, SourceFile};
use chrono::NaiveDateTime;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct LogGenerator<R: Rng = StdRng> {
    clock: SimulatedClock,
    rng: R,
    messages: MessageSource,
}

impl LogGenerator<StdRng> {
    /// Generator seeded from the OS.
    pub fn from_os_rng(window: TimeWindow, messages: MessageSource) -> Self {
        Self::new(window, messages, StdRng::from_os_rng())
    }

    pub fn seeded(window: TimeWindow, messages: MessageSource, seed: u64) -> Self {
        Self::new(window, messages, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> LogGenerator<R> {
    pub fn new(window: TimeWindow, messages: MessageSource, rng: R) -> Self {
        Self {
            clock: SimulatedClock::new(window.start, window.end),
            rng,
            messages,
        }
    }

    /// Timestamp the next record would carry
    pub fn next_timestamp(&self) -> NaiveDateTime {
        self.clock.peek()
    }

    pub fn end(&self) -> Option<NaiveDateTime> {
        self.clock.end()
    }

    /// True when the next record would fall past the configured end.
    pub fn exhausted(&self) -> bool {
        self.clock.exhausted()
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Produce the next record and advance the clock.
    ///
    /// Does not check the end bound; callers check `exhausted` first.
    pub async fn next_record(&mut self) -> LogRecord {
        let timestamp = self.clock.tick_random(&mut self.rng);
        let source = SourceFile::random(&mut self.rng);
        let level = Level::random(&mut self.rng);

        let message = self.messages.message(level, source).await;
        let metrics = Metrics::random(&mut self.rng);

        LogRecord {
            timestamp,
            level,
            source,
            metrics,
            message,
        }
    }
}
