mod chunking;
mod commands;
mod error;
mod prelude;
mod scanner;
mod storage;
mod utils;

use clap::Parser;
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::{filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt};

use commands::{Args, Command, Commands};
use prelude::*;

/// Splits Java sources into methods and feature files into scenarios, written as JSONL
#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing based on verbosity
    let log_level = match args.verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let indicatif_layer = IndicatifLayer::new();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_timer(tracing_subscriber::fmt::time::time())
                .with_writer(indicatif_layer.get_stderr_writer()),
        )
        .with(indicatif_layer)
        .with(LevelFilter::from_level(log_level))
        .init();

    match args.command {
        Commands::Scan(cmd) => cmd.execute().await,
        Commands::Extract(cmd) => cmd.execute().await,
    }
}
