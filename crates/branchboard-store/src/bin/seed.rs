//! # Demo Dashboard
//!
//! Loads the demo dataset into a fresh in-memory store and prints the
//! overview dashboard as JSON.
//!
//! ## Usage
//! ```bash
//! # Dashboard with the configured recent-activity limit (default: 5)
//! cargo run -p branchboard-store --bin seed
//!
//! # Show more log entries
//! cargo run -p branchboard-store --bin seed -- --recent 10
//!
//! # Verbose store logging
//! RUST_LOG=branchboard=trace cargo run -p branchboard-store --bin seed
//! ```
//!
//! JSON goes to stdout; logs go to stderr.

use std::env;

use branchboard_store::{demo, EntityStore, StoreConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let mut config = StoreConfig::from_env()?;

    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--recent" | "-r" => {
                if i + 1 < args.len() {
                    config.recent_activity_limit = args[i + 1].parse()?;
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Branchboard demo dashboard");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -r, --recent <N>   Recent activity entries to show (default: 5)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let recent = config.recent_activity_limit;
    let store = EntityStore::with_config(config);
    demo::seed(&store)?;

    let summary = store.dashboard_summary(recent);
    info!(
        total_revenue = %store.config().format_currency(summary.total_revenue),
        sales = summary.sale_count,
        "Dashboard ready"
    );

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - Default: INFO, DEBUG for branchboard crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,branchboard=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
