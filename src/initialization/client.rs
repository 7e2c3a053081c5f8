//! HTTP client initialization.
//!
//! This module builds the HTTP client used for hop requests, configured for
//! manual redirect handling.

use reqwest::ClientBuilder;

use crate::config::Config;

/// Initializes the HTTP client for redirect tracing.
///
/// Creates a `reqwest::Client` with automatic redirect following disabled so
/// the tracer can follow the chain itself and record every intermediate URL.
/// The configured timeout applies to each hop request independently; a trace
/// of several hops is bounded only by hops × timeout.
///
/// # Arguments
///
/// * `config` - Configuration carrying the user-agent and per-hop timeout
///
/// # Returns
///
/// A configured HTTP client ready for hop requests. Clones share the same
/// connection pool.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_trace_client(config: &Config) -> Result<reqwest::Client, reqwest::Error> {
    ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(config.per_hop_timeout())
        .user_agent(config.user_agent.clone())
        .build()
}
