//! # Sigil - Identity Inspector
//!
//! ## Usage
//!
//! ```bash
//! sigil check hierarchy.toml
//! sigil lineage hierarchy.toml Sub
//! sigil is-of-type hierarchy.toml Base Sub --strict
//! sigil validate-label @app.Base
//! ```
//!
//! Exit codes: 0 success, 1 error, 2 negative check result.

use clap::Parser;
use sigil::cli;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    // SIGIL_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("SIGIL_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "sigil=debug,sigil_core=debug"
    } else {
        "sigil=info,sigil_core=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    // Logs go to stderr so command output stays parseable.
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    match cli::execute(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            tracing::error!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
