//! Paced generation loop
//!
//! Sequential: generate, write, sleep. A shutdown future (Ctrl+C in the
//! binary) is raced against the backend call and the sleep, never against
//! a write in progress.

use crate::config::PacingConfig;
use crate::error::Result;
use crate::generator::LogGenerator;
use crate::output::LogSink;
use crate::record::format_timestamp;
use chrono::NaiveDateTime;
use rand::Rng;
use std::future::Future;
use std::io::Write;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Next timestamp would exceed the configured end
    EndReached,
    Interrupted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub records: u64,
    pub last_timestamp: Option<NaiveDateTime>,
    pub stop: StopReason,
}

/// Real-time delay before the next line
pub fn sample_delay<R: Rng + ?Sized>(pacing: &PacingConfig, rng: &mut R) -> Duration {
    if pacing.max_delay <= pacing.min_delay {
        pacing.min_delay
    } else {
        rng.random_range(pacing.min_delay..=pacing.max_delay)
    }
}

/// Run until the clock passes its end or `shutdown` resolves.
pub async fn run<R, W, S>(
    generator: &mut LogGenerator<R>,
    sink: &mut LogSink<W>,
    pacing: &PacingConfig,
    shutdown: S,
) -> Result<RunSummary>
where
    R: Rng,
    W: Write,
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    let mut records = 0u64;
    let mut last_timestamp = None;

    let stop = loop {
        if generator.exhausted() {
            if let Some(end) = generator.end() {
                info!(
                    next = %format_timestamp(&generator.next_timestamp()),
                    end = %format_timestamp(&end),
                    "Next log timestamp would exceed LOG_END_DATE; stopping"
                );
            }
            break StopReason::EndReached;
        }

        let record = tokio::select! {
            _ = &mut shutdown => break StopReason::Interrupted,
            record = generator.next_record() => record,
        };

        sink.write_line(&record.to_string())?;
        records += 1;
        last_timestamp = Some(record.timestamp);

        let delay = sample_delay(pacing, generator.rng_mut());
        if !delay.is_zero() {
            tokio::select! {
                _ = &mut shutdown => break StopReason::Interrupted,
                _ = tokio::time::sleep(delay) => {}
            }
        }
    };

    if stop == StopReason::Interrupted {
        info!(records, "Log generation stopped");
    } else {
        info!(records, "Log generation finished");
    }

    Ok(RunSummary {
        records,
        last_timestamp,
        stop,
    })
}

/// Resolves on Ctrl+C. If the handler cannot be installed the future never
/// resolves and the run ends only at the configured end time.
pub async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MessageSource, TextBackend};
    use crate::config::{TimeWindow, parse_timestamp};
    use async_trait::async_trait;
    use chrono::TimeDelta;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn window(start: &str, end: Option<&str>) -> TimeWindow {
        TimeWindow {
            start: parse_timestamp(start).unwrap(),
            end: end.map(|e| parse_timestamp(e).unwrap()),
        }
    }

    #[test]
    fn test_delay_within_pacing_bounds() {
        let mut rng = StdRng::seed_from_u64(5);
        let pacing = PacingConfig::default();
        for _ in 0..200 {
            let d = sample_delay(&pacing, &mut rng);
            assert!(d >= pacing.min_delay && d <= pacing.max_delay);
        }
        assert_eq!(sample_delay(&PacingConfig::immediate(), &mut rng), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_stops_before_passing_end() {
        let tmp = tempfile::tempdir().unwrap();
        let w = window("2025-01-01T00:00:00", Some("2025-01-01T00:01:00"));
        let mut generator = LogGenerator::seeded(w, MessageSource::disabled(), 8);
        let mut sink = LogSink::open(tmp.path().join("out.log"), Vec::new()).unwrap();

        let summary = run(
            &mut generator,
            &mut sink,
            &PacingConfig::immediate(),
            std::future::pending(),
        )
        .await
        .unwrap();

        assert_eq!(summary.stop, StopReason::EndReached);
        // 60 simulated seconds at 0.1..=2.5s per record
        assert!(summary.records >= 25 && summary.records <= 601);
        assert!(summary.last_timestamp.unwrap() <= w.end.unwrap());
        assert!(generator.next_timestamp() > w.end.unwrap());
        assert_eq!(sink.lines_written(), summary.records);
    }

    #[tokio::test]
    async fn test_start_after_end_emits_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let w = window("2025-01-02T00:00:00", Some("2025-01-01T00:00:00"));
        let mut generator = LogGenerator::seeded(w, MessageSource::disabled(), 8);
        let mut sink = LogSink::open(tmp.path().join("out.log"), Vec::new()).unwrap();

        let summary = run(&mut generator, &mut sink, &PacingConfig::immediate(), std::future::pending())
            .await
            .unwrap();

        assert_eq!(summary.records, 0);
        assert_eq!(summary.last_timestamp, None);
        assert_eq!(summary.stop, StopReason::EndReached);
    }

    #[tokio::test]
    async fn test_start_equal_to_end_emits_one() {
        let tmp = tempfile::tempdir().unwrap();
        let w = window("2025-01-01T00:00:00", Some("2025-01-01T00:00:00"));
        let mut generator = LogGenerator::seeded(w, MessageSource::disabled(), 8);
        let mut sink = LogSink::open(tmp.path().join("out.log"), Vec::new()).unwrap();

        let summary = run(&mut generator, &mut sink, &PacingConfig::immediate(), std::future::pending())
            .await
            .unwrap();

        assert_eq!(summary.records, 1);
        assert_eq!(summary.last_timestamp, Some(w.start));
    }

    #[tokio::test(start_paused = true)]
    async fn test_interrupt_during_sleep() {
        let tmp = tempfile::tempdir().unwrap();
        let w = window("2025-01-01T00:00:00", None);
        let mut generator = LogGenerator::seeded(w, MessageSource::disabled(), 1);
        let mut sink = LogSink::open(tmp.path().join("out.log"), Vec::new()).unwrap();

        // Each gap is 500..=1500ms, so 1.2s allows one to three lines
        let shutdown = tokio::time::sleep(Duration::from_millis(1_200));
        let summary = run(&mut generator, &mut sink, &PacingConfig::default(), shutdown)
            .await
            .unwrap();

        assert_eq!(summary.stop, StopReason::Interrupted);
        assert!((1..=3).contains(&summary.records), "got {}", summary.records);
        assert!(generator.next_timestamp() - w.start >= TimeDelta::milliseconds(100));
    }

    struct Hanging;

    #[async_trait]
    impl TextBackend for Hanging {
        fn provider(&self) -> &str {
            "hanging"
        }

        async fn generate(&self, _prompt: &str) -> Result<String> {
            std::future::pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_interrupt_during_backend_call() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.log");
        let w = window("2025-01-01T00:00:00", None);
        let messages = MessageSource::new(Some(Box::new(Hanging)));
        let mut generator = LogGenerator::seeded(w, messages, 2);
        let mut sink = LogSink::open(&path, Vec::new()).unwrap();

        let shutdown = tokio::time::sleep(Duration::from_millis(100));
        let summary = run(&mut generator, &mut sink, &PacingConfig::immediate(), shutdown)
            .await
            .unwrap();

        assert_eq!(summary.stop, StopReason::Interrupted);
        assert_eq!(summary.records, 0);
        assert_eq!(summary.last_timestamp, None);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }
}
