//! redirect_monitor library: redirect chain tracing
//!
//! This library follows the redirect chain of a URL one hop at a time,
//! recording the status code, selected headers, and timing of every response
//! until the chain ends at a non-redirect response, a loop, a hop limit, or a
//! transport failure.
//!
//! # Example
//!
//! ```no_run
//! use redirect_monitor::{Config, run_trace};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     url: Some("example.com/start".to_string()),
//!     max_hops: 10,
//!     ..Default::default()
//! };
//!
//! let result = run_trace(config).await?;
//! println!("{} hops to {} (success: {})",
//!          result.total_steps, result.final_url, result.success);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

pub mod config;
mod error_handling;
pub mod initialization;
mod models;
pub mod server;
mod trace;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use error_handling::{ErrorType, InfoType, TraceError, TraceStats, WarningType};
pub use models::{RedirectStep, TraceRequest, TraceResult};
pub use run::{run_server, run_trace};
pub use trace::RedirectTracer;

// Internal run module (contains the entry points behind the binary)
mod run {
    use anyhow::{Context, Result};
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use std::time::Duration;

    use log::info;
    use tokio_util::sync::CancellationToken;

    use crate::config::{Config, LOGGING_INTERVAL_SECS};
    use crate::error_handling::TraceStats;
    use crate::initialization::init_trace_client;
    use crate::models::TraceResult;
    use crate::server::{start_api_server, AppState};
    use crate::trace::RedirectTracer;

    /// Traces the redirect chain of the URL in the configuration.
    ///
    /// This is the one-shot entry point behind the CLI. It builds an HTTP
    /// client from the configuration, follows the chain, and returns the
    /// completed result.
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration carrying the URL to trace, hop limit,
    ///   per-hop timeout, and User-Agent
    ///
    /// # Returns
    ///
    /// Returns a `TraceResult` describing every hop of the chain, or an error
    /// if the trace could not start.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - No URL was provided in the configuration
    /// - The HTTP client cannot be initialized
    /// - The URL fails validation before the first request
    ///
    /// Failures in the middle of a chain (loops, hop limits, transport
    /// errors) are not errors here; they come back as an unsuccessful
    /// `TraceResult` with the hops recorded so far.
    pub async fn run_trace(config: Config) -> Result<TraceResult> {
        let url = config
            .url
            .clone()
            .context("No URL to trace was provided")?;

        let client = init_trace_client(&config).context("Failed to initialize HTTP client")?;
        let stats = Arc::new(TraceStats::new());
        let tracer = RedirectTracer::new(client, config.max_hops, stats);

        let result = tracer.trace(&url).await?;
        Ok(result)
    }

    /// Runs the redirect tracing API server until a shutdown signal.
    ///
    /// Binds the listen address from the configuration, serves
    /// `POST /api/check-redirects` and `GET /status`, and logs a progress
    /// line at a fixed interval while the server is up.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The HTTP client cannot be initialized
    /// - The listen address cannot be bound
    pub async fn run_server(config: Config) -> Result<()> {
        let client = init_trace_client(&config).context("Failed to initialize HTTP client")?;
        let stats = Arc::new(TraceStats::new());
        let tracer = RedirectTracer::new(client, config.max_hops, stats);
        let state = AppState::new(tracer);

        let cancel = CancellationToken::new();
        let cancel_logging = cancel.child_token();

        let state_for_logging = state.clone();
        let logging_task = tokio::task::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(LOGGING_INTERVAL_SECS));
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        log_progress(&state_for_logging);
                    }
                    _ = cancel_logging.cancelled() => {
                        break;
                    }
                }
            }
        });

        let serve_result = start_api_server(&config.listen, config.port, state.clone()).await;

        cancel.cancel();
        if let Err(e) = logging_task.await {
            log::warn!("Progress logging task panicked: {:?}", e);
        }

        log_progress(&state);
        log_error_statistics(&state.stats);

        serve_result
    }

    /// Logs a progress line with trace counts and throughput.
    fn log_progress(state: &AppState) {
        let total = state.total_traces.load(Ordering::SeqCst);
        let failed = state.failed_traces.load(Ordering::SeqCst);
        let elapsed = state.start_time.elapsed().as_secs_f64();
        let rate = if elapsed > 0.0 {
            total as f64 / (elapsed / 60.0)
        } else {
            0.0
        };

        info!(
            "Served {} traces in {:.0} seconds ({} unsuccessful, ~{:.2} traces/min)",
            total, elapsed, failed, rate
        );
    }

    /// Logs the counters accumulated over the server's lifetime.
    fn log_error_statistics(stats: &TraceStats) {
        let total_errors = stats.total_errors();
        if total_errors > 0 {
            info!("Error Counts ({} total):", total_errors);
            for (name, count) in stats.error_breakdown() {
                info!("   {}: {}", name, count);
            }
        }

        let total_warnings = stats.total_warnings();
        let total_info = stats.total_info();
        if total_warnings > 0 || total_info > 0 {
            info!(
                "Trace events: {} warnings, {} info",
                total_warnings, total_info
            );
        }
    }
}
