//! CLI entry point for seeding erased image regions with shaped noise

use clap::Parser;
use spectralfill::io::cli::{Cli, FileProcessor};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("spectralfill={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false).compact())
        .init();

    let result = FileProcessor::new(cli).and_then(|mut processor| processor.process());
    match result {
        Ok(count) => {
            tracing::debug!("Processed {count} file(s)");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
