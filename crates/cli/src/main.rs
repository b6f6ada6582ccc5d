//! Cinema - box office command line
//!
//! Thin front end over `cinema-core`: catalogue setup, booking and listings
//! against a local SQLite database.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;

use cinema_core::Settings;
use cli::Cli;

fn main() {
    let cli = Cli::parse();

    let settings = match Settings::load(&cli.config) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load config {}: {}", cli.config.display(), e);
            std::process::exit(1);
        }
    };

    // Initialize logging; RUST_LOG overrides the configured filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.filter));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if let Err(e) = commands::run(cli, &settings) {
        tracing::error!("{}", e);
        eprintln!("error: {}", e);
        if let Some(reason) = e.validation() {
            for (field, messages) in reason.field_errors() {
                for message in messages {
                    eprintln!("  {}: {}", field, message);
                }
            }
        }
        std::process::exit(1);
    }
}
