//! # loggen - Synthetic Application Log Generator
//!
//! Writes fake application log lines to `<LOG_DIR>/dummy_app.log` (and
//! stdout) on a simulated clock, optionally asking a text-generation
//! backend for each line's message.
//!
//! ```text
//!   env ──▶ Config ──▶ LogGenerator ──▶ LogRecord ──▶ LogSink ──▶ file + stdout
//!                        │    ▲
//!                        │    └── SimulatedClock, seeded Rng
//!                        ▼
//!                  MessageSource ──▶ TextBackend (groq | ollama) or fallback
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use loggen::{Config, LogGenerator, LogSink, MessageSource, runner};
//!
//! # async fn demo() -> loggen::Result<()> {
//! let config = Config::from_env();
//! let messages = MessageSource::from_config(config.backend.as_ref());
//! let mut generator = LogGenerator::from_os_rng(config.window, messages);
//! let mut sink = LogSink::open(config.log_file(), std::io::stdout())?;
//!
//! runner::run(&mut generator, &mut sink, &config.pacing, runner::ctrl_c()).await?;
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod clock;
pub mod config;
pub mod error;
pub mod generator;
pub mod output;
pub mod record;
pub mod runner;

pub use backend::{FALLBACK_NOT_CONFIGURED, MessageSource, TextBackend};
pub use clock::SimulatedClock;
pub use config::{BackendConfig, Config, GroqConfig, OllamaConfig, PacingConfig, TimeWindow};
pub use error::{Error, Result};
pub use generator::LogGenerator;
pub use output::{ExistingLogs, LogSink, prepare_log_dir};
pub use record::{Level, LogRecord, Metrics, SourceFile};
pub use runner::{RunSummary, StopReason};
