mod cli;
mod commands;
mod config;
mod download;
mod platform;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan { input, json } => commands::scan::run(&input, json),

        Commands::Extract { input, output, raw } => commands::extract::run(&input, &output, raw),

        Commands::Decode {
            input,
            symbol,
            json,
        } => commands::decode::run(&input, symbol.as_deref(), json),

        Commands::Sync {
            dir,
            platform,
            force,
            check,
        } => commands::sync::run(&dir, &platform, force, check),
    }
}
