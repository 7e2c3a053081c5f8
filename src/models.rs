//! Wire-format types for redirect traces.
//!
//! These structs serialize to the JSON contract served by
//! `POST /api/check-redirects` and printed by the one-shot CLI mode.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timestamp format used in step records (`2024-01-15 09:30:00`).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Trace request body: the URL whose redirect chain should be followed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceRequest {
    /// URL to trace. A missing scheme is treated as https.
    pub url: String,
}

/// One HTTP exchange in a redirect chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedirectStep {
    /// Position in the chain, starting at 1.
    pub sequence: usize,
    /// HTTP status code returned by this hop.
    pub status_code: u16,
    /// URL requested at this hop.
    pub url: String,
    /// Local wall-clock time the response arrived, in [`TIMESTAMP_FORMAT`].
    pub timestamp: String,
    /// Time spent on this hop's request/response exchange.
    pub elapsed_ms: u64,
    /// Captured response headers (sorted by name for stable output).
    /// Omitted entirely when none of the captured headers were present.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

impl RedirectStep {
    /// Whether this step's status instructs the client to follow a redirect.
    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status_code)
    }
}

/// Complete record of one redirect trace.
///
/// A `TraceResult` is always renderable: soft failures (loops, hop limits,
/// transport errors mid-chain) populate `error` and clear `success` but keep
/// every step recorded before the failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceResult {
    /// URL as submitted by the caller, before normalization.
    pub original_url: String,
    /// URL of the last hop that produced a response, or the URL the tracer
    /// was about to request when no hop completed.
    pub final_url: String,
    /// True iff the terminal step's status is 2xx.
    pub success: bool,
    /// Number of recorded steps; always equals `steps.len()`.
    pub total_steps: usize,
    /// Human-readable wall-clock span of the whole trace, e.g. `"412.53ms"`.
    pub total_duration: String,
    /// Why the trace fell short of a 2xx terminal response. Omitted from the
    /// JSON when the trace completed normally.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Every hop of the chain, in request order.
    pub steps: Vec<RedirectStep>,
}

impl TraceResult {
    /// Number of redirect responses in the chain (steps with a 3xx status).
    pub fn redirect_count(&self) -> usize {
        self.steps.iter().filter(|s| s.is_redirect()).count()
    }
}

/// How a trace ended.
///
/// Exactly one of these applies to every trace. All variants except
/// `Completed` carry distinct error text into the result's `error` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceOutcome {
    /// A terminal response was reached (non-3xx, or 3xx without a usable
    /// `Location` header).
    Completed,
    /// The configured hop limit was reached before a terminal response.
    HopLimitExceeded { max_hops: usize },
    /// The chain revisited a URL it had already requested.
    RedirectLoop { url: String },
    /// A hop failed below HTTP (DNS, TCP, TLS, timeout) or the chain could
    /// not be continued; the message explains the failing hop.
    TransportFailed { message: String },
}

impl TraceOutcome {
    /// Error text for the wire `error` field. `None` for a completed trace.
    pub fn error_message(&self) -> Option<String> {
        match self {
            TraceOutcome::Completed => None,
            TraceOutcome::HopLimitExceeded { max_hops } => {
                Some(format!("Too many redirects (stopped after {max_hops} hops)"))
            }
            TraceOutcome::RedirectLoop { url } => {
                Some(format!("Redirect loop detected at {url}"))
            }
            TraceOutcome::TransportFailed { message } => Some(message.clone()),
        }
    }
}

/// Formats a duration the way `total_duration` is reported: two decimal
/// places with the largest unit that keeps the value below 1000 (ns, µs,
/// ms, or s).
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos < 1_000 {
        format!("{:.2}ns", nanos as f64)
    } else if nanos < 1_000_000 {
        format!("{:.2}µs", nanos as f64 / 1_000.0)
    } else if nanos < 1_000_000_000 {
        format!("{:.2}ms", nanos as f64 / 1_000_000.0)
    } else {
        format!("{:.2}s", duration.as_secs_f64())
    }
}
