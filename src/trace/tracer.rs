//! Redirect chain tracing.
//!
//! This module follows redirect chains manually, one hop at a time, to record
//! the full path from an initial URL to its terminal response.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use chrono::Local;
use log::{debug, warn};
use reqwest::header::HeaderMap;
use url::Url;

use crate::config::{CAPTURED_HEADERS, HEADER_LOCATION};
use crate::error_handling::{
    transport_error_message, update_error_stats, ErrorType, InfoType, TraceError, TraceStats,
    WarningType,
};
use crate::models::{format_duration, RedirectStep, TraceOutcome, TraceResult, TIMESTAMP_FORMAT};
use crate::trace::url::{
    canonical_key, is_relative_reference, resolve_location, validate_and_normalize_url,
};

/// Follows redirect chains hop by hop.
///
/// The tracer issues GET requests with automatic redirect following disabled,
/// records one step per response, and follows `Location` headers itself so
/// that loops and over-long chains can be cut off. A tracer is cheap to clone
/// and safe to share across concurrent traces; per-hop timeouts come from the
/// client it was built with.
#[derive(Clone)]
pub struct RedirectTracer {
    client: reqwest::Client,
    max_hops: usize,
    stats: Arc<TraceStats>,
}

impl RedirectTracer {
    /// Creates a tracer from a redirect-disabled client.
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client built with `redirect::Policy::none()`
    /// * `max_hops` - Maximum number of hops to record before giving up
    /// * `stats` - Shared statistics tracker updated as traces run
    pub fn new(client: reqwest::Client, max_hops: usize, stats: Arc<TraceStats>) -> Self {
        RedirectTracer {
            client,
            max_hops,
            stats,
        }
    }

    /// Statistics tracker shared by this tracer.
    pub fn stats(&self) -> &Arc<TraceStats> {
        &self.stats
    }

    /// Traces the redirect chain starting at `raw_url`.
    ///
    /// The input is normalized (https:// prefixed when no scheme is given)
    /// and validated before any request is sent. Everything that goes wrong
    /// after the first request leaves the chain recorded so far in the
    /// result: loops, hop-limit cutoffs, and transport failures all produce a
    /// renderable `TraceResult` with `success = false` and an explanatory
    /// `error`, never an `Err`.
    ///
    /// # Errors
    ///
    /// Returns `TraceError::InvalidUrl` when the input cannot be parsed as an
    /// http(s) URL; no network activity happens in that case.
    pub async fn trace(&self, raw_url: &str) -> Result<TraceResult, TraceError> {
        let start = Instant::now();
        let first_url = validate_and_normalize_url(raw_url).map_err(|e| {
            self.stats.increment_error(ErrorType::InvalidUrlError);
            e
        })?;

        let mut steps: Vec<RedirectStep> = Vec::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut current_url = first_url;

        let outcome = loop {
            if steps.len() >= self.max_hops {
                self.stats.increment_error(ErrorType::HopLimitExceededError);
                break TraceOutcome::HopLimitExceeded {
                    max_hops: self.max_hops,
                };
            }

            // Membership check and insert in one go: a repeated URL is not
            // requested again and records no extra step.
            if !visited.insert(canonical_key(&current_url)) {
                self.stats.increment_error(ErrorType::RedirectLoopError);
                break TraceOutcome::RedirectLoop {
                    url: current_url.to_string(),
                };
            }

            let hop_start = Instant::now();
            let response = match self.client.get(current_url.clone()).send().await {
                Ok(response) => response,
                Err(e) => {
                    update_error_stats(&self.stats, &e);
                    warn!("Hop {} failed for {current_url}: {e}", steps.len() + 1);
                    break TraceOutcome::TransportFailed {
                        message: transport_error_message(&e),
                    };
                }
            };

            let status = response.status();
            let headers = capture_headers(response.headers(), &self.stats);
            let location = headers.get(HEADER_LOCATION).cloned();

            steps.push(RedirectStep {
                sequence: steps.len() + 1,
                status_code: status.as_u16(),
                url: current_url.to_string(),
                timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
                elapsed_ms: hop_start.elapsed().as_millis() as u64,
                headers,
            });
            debug!(
                "Hop {}: {current_url} answered {}",
                steps.len(),
                status.as_u16()
            );

            if !status.is_redirection() {
                break TraceOutcome::Completed;
            }

            // A redirect status without a usable Location ends the chain
            // right there; it is a terminal response, not a failure.
            let Some(location) = location.filter(|l| !l.is_empty()) else {
                self.stats
                    .increment_warning(WarningType::RedirectWithoutLocation);
                warn!(
                    "Redirect status {} for {current_url} without Location header",
                    status.as_u16()
                );
                break TraceOutcome::Completed;
            };

            if is_relative_reference(&location) {
                self.stats
                    .increment_info(InfoType::RelativeLocationResolved);
            }
            let Some(next_url) = resolve_location(&current_url, &location) else {
                warn!("Unresolvable Location {location:?} from {current_url}");
                break TraceOutcome::TransportFailed {
                    message: format!("Invalid redirect Location '{location}'"),
                };
            };

            if current_url.scheme() == "http" && next_url.scheme() == "https" {
                self.stats.increment_info(InfoType::HttpsUpgradeRedirect);
            }
            self.stats.increment_info(InfoType::RedirectFollowed);
            current_url = next_url;
        };

        let success = matches!(outcome, TraceOutcome::Completed)
            && steps
                .last()
                .map(|s| (200..300).contains(&s.status_code))
                .unwrap_or(false);
        let final_url = steps
            .last()
            .map(|s| s.url.clone())
            .unwrap_or_else(|| current_url.to_string());

        Ok(TraceResult {
            original_url: raw_url.to_string(),
            final_url,
            success,
            total_steps: steps.len(),
            total_duration: format_duration(start.elapsed()),
            error: outcome.error_message(),
            steps,
        })
    }
}

/// Copies the captured response headers into a step record.
///
/// Lookup is case-insensitive; output uses the canonical names from
/// `CAPTURED_HEADERS`. Empty values are treated as absent, and values that
/// aren't valid UTF-8 are dropped with a warning counted.
fn capture_headers(headers: &HeaderMap, stats: &TraceStats) -> BTreeMap<String, String> {
    let mut captured = BTreeMap::new();
    for name in CAPTURED_HEADERS {
        if let Some(value) = headers.get(*name) {
            match value.to_str() {
                Ok(v) if !v.is_empty() => {
                    captured.insert((*name).to_string(), v.to_string());
                }
                Ok(_) => {}
                Err(_) => {
                    stats.increment_warning(WarningType::NonUtf8HeaderValue);
                    warn!("Dropping non-UTF-8 value for captured header {name}");
                }
            }
        }
    }
    captured
}
