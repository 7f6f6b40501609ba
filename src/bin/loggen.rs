//! loggen - synthetic application log writer
//!
//! Usage:
//!   loggen
//!   loggen --delete-existing-logs
//!   LLM_PROVIDER=ollama LOG_END_DATE= loggen --keep-existing-logs

use anyhow::Context;
use clap::Parser;
use loggen::record::format_timestamp;
use loggen::{Config, ExistingLogs, LogGenerator, LogSink, MessageSource, prepare_log_dir, runner};
use tracing::info;

#[derive(Parser)]
#[command(name = "loggen", version)]
#[command(about = "Generate dummy application logs")]
struct Cli {
    /// Delete the existing log directory without prompting before generating new logs
    #[arg(long, conflicts_with = "keep_existing_logs")]
    delete_existing_logs: bool,

    /// Keep the existing log directory without prompting and append new logs
    #[arg(long)]
    keep_existing_logs: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let policy = ExistingLogs::from_flags(cli.delete_existing_logs, cli.keep_existing_logs);
    {
        let mut input = std::io::stdin().lock();
        let mut output = std::io::stdout();
        prepare_log_dir(&config.log_dir, policy, &mut input, &mut output)
            .context("preparing log directory")?;
    }

    let messages = MessageSource::from_config(config.backend.as_ref());
    let mut generator = LogGenerator::from_os_rng(config.window, messages);
    let mut sink = LogSink::open(config.log_file(), std::io::stdout())?;

    info!(path = %sink.path().display(), "Generating sequential dummy logs");
    info!(start = %format_timestamp(&config.window.start), "Starting logs from");
    match config.window.end {
        Some(end) => info!(end = %format_timestamp(&end), "Will stop if log time exceeds"),
        None => info!("Logs will be generated indefinitely or until Ctrl+C is pressed"),
    }
    info!("Press Ctrl+C to stop.");

    let summary = runner::run(&mut generator, &mut sink, &config.pacing, runner::ctrl_c())
        .await
        .with_context(|| format!("writing {}", sink.path().display()))?;

    info!(
        records = summary.records,
        stop = ?summary.stop,
        "Done"
    );
    Ok(())
}
