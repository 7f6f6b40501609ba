//! Log Record Types
//!
//! One `LogRecord` is produced per loop iteration and rendered straight to a
//! single text line via `Display`. Nothing here outlives the iteration.

use chrono::{NaiveDateTime, Timelike};
use rand::Rng;
use rand::seq::IndexedRandom;
use std::fmt;
use std::ops::RangeInclusive;

// ============================================================================
// Enumerated fields
// ============================================================================

/// Severity level of a synthetic record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Level {
    pub const ALL: [Level; 5] = [
        Level::Debug,
        Level::Info,
        Level::Warning,
        Level::Error,
        Level::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        *Self::ALL.choose(rng).unwrap_or(&Level::Info)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source filename a record claims to originate from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFile {
    ModuleAlpha,
    ServiceBeta,
    UtilsGamma,
    MainDelta,
}

impl SourceFile {
    pub const ALL: [SourceFile; 4] = [
        SourceFile::ModuleAlpha,
        SourceFile::ServiceBeta,
        SourceFile::UtilsGamma,
        SourceFile::MainDelta,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFile::ModuleAlpha => "module_alpha.py",
            SourceFile::ServiceBeta => "service_beta.py",
            SourceFile::UtilsGamma => "utils_gamma.py",
            SourceFile::MainDelta => "main_delta.py",
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        *Self::ALL.choose(rng).unwrap_or(&SourceFile::MainDelta)
    }
}

impl fmt::Display for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Synthetic metrics
// ============================================================================

pub const CPU_USAGE_RANGE: RangeInclusive<f64> = 5.0..=80.0;
pub const MEMORY_MB_RANGE: RangeInclusive<u32> = 128..=2048;
pub const RESPONSE_TIME_MS_RANGE: RangeInclusive<u32> = 10..=500;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    /// Percentage, rounded to two decimal places
    pub cpu_usage: f64,
    pub memory_mb: u32,
    pub response_time_ms: u32,
}

impl Metrics {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let cpu = rng.random_range(CPU_USAGE_RANGE);
        Self {
            cpu_usage: (cpu * 100.0).round() / 100.0,
            memory_mb: rng.random_range(MEMORY_MB_RANGE),
            response_time_ms: rng.random_range(RESPONSE_TIME_MS_RANGE),
        }
    }
}

// ============================================================================
// Record
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub timestamp: NaiveDateTime,
    pub level: Level,
    pub source: SourceFile,
    pub metrics: Metrics,
    pub message: String,
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // {:?} keeps the trailing ".0" on whole percentages
        write!(
            f,
            "{} [{}] ({}): metric_cpu_usage={:?}% metric_memory_mb={}MB metric_response_time_ms={}ms - {}",
            format_timestamp(&self.timestamp),
            self.level,
            self.source,
            self.metrics.cpu_usage,
            self.metrics.memory_mb,
            self.metrics.response_time_ms,
            self.message,
        )
    }
}

/// ISO-8601 without offset; microseconds only when non-zero.
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    let micros = ts.nanosecond() / 1_000;
    if micros == 0 {
        ts.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        format!("{}.{:06}", ts.format("%Y-%m-%dT%H:%M:%S"), micros)
    }
}
