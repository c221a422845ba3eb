//! # Graflat - object-graph flattener
//!
//! The main binary for the Graflat row exporter.
//!
//! ## Usage
//!
//! ```bash
//! # Flatten a snapshot to CSV on stdout
//! graflat dump -f snapshot.json --header
//!
//! # Quoted dialect into a file
//! graflat dump -f snapshot.json -o out.csv -t quoted
//!
//! # Report a snapshot's shape without dumping
//! graflat inspect -f snapshot.json
//! ```

use clap::Parser;
use graflat::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // Initialize tracing — GRAFLAT_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("GRAFLAT_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "graflat=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Parse CLI arguments
    let cli = cli::Cli::parse();

    if cli.verbose && !cli.quiet {
        eprintln!("graflat {}", env!("CARGO_PKG_VERSION"));
    }

    // Execute command
    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}
