//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `redirect_monitor` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use redirect_monitor::initialization::init_logger_with;
use redirect_monitor::{run_server, run_trace, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments into Config
    let config = Config::parse();

    // Initialize logger based on config
    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    // With a positional URL this is a one-shot trace; without one it serves the API
    if config.url.is_some() {
        match run_trace(config).await {
            Ok(result) => {
                let rendered = serde_json::to_string_pretty(&result)
                    .context("Failed to render trace result")?;
                println!("{rendered}");
                Ok(())
            }
            Err(e) => {
                eprintln!("redirect_monitor error: {:#}", e);
                process::exit(1);
            }
        }
    } else {
        match run_server(config).await {
            Ok(()) => Ok(()),
            Err(e) => {
                eprintln!("redirect_monitor error: {:#}", e);
                process::exit(1);
            }
        }
    }
}
