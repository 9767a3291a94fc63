//! # proptrack
//!
//! The main binary for proptrack completeness checks.
//!
//! This application provides:
//! - Shape listing from the TOML config
//! - Completeness reports for JSON objects
//! - Config-driven field mappings behind the completeness boundary
//!
//! ## Usage
//!
//! ```bash
//! proptrack shapes
//! proptrack check -s user_entity -i user.json
//! proptrack map -m to_persistence -i user.json
//! proptrack demo --incomplete
//! ```

use clap::Parser;
use proptrack::cli;
use proptrack::config::{AppConfig, LogFormat, LoggingConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    let cli = cli::Cli::parse();

    let config = match AppConfig::load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging);

    if let Err(e) = cli::execute(cli, &config) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing. `RUST_LOG` overrides the configured filter and
/// `PROPTRACK_LOG_FORMAT=json` overrides the configured format.
fn init_tracing(logging: &LoggingConfig) {
    let format = match std::env::var("PROPTRACK_LOG_FORMAT").as_deref() {
        Ok("json") => LogFormat::Json,
        Ok("text") => LogFormat::Text,
        _ => logging.format,
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.filter.as_str().into());

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
