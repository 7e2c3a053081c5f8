//! Error categorization.
//!
//! This module maps transport-level request failures to the error categories
//! tracked in trace statistics and to the messages reported on the wire.

use super::stats::TraceStats;
use super::types::ErrorType;

/// Categorizes a `reqwest::Error` into an `ErrorType`.
///
/// Hop requests never call `error_for_status`, so the interesting signal is
/// the transport-level failure kind rather than an HTTP status.
///
/// # Arguments
///
/// * `error` - The `reqwest::Error` to categorize
///
/// # Returns
///
/// The appropriate `ErrorType` for the error.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> ErrorType {
    if error.is_timeout() {
        ErrorType::HttpRequestTimeoutError
    } else if error.is_connect() {
        ErrorType::HttpRequestConnectError
    } else if error.is_builder() {
        ErrorType::HttpRequestBuilderError
    } else if error.is_request() {
        ErrorType::HttpRequestRequestError
    } else if error.is_body() {
        ErrorType::HttpRequestBodyError
    } else if error.is_decode() {
        ErrorType::HttpRequestDecodeError
    } else {
        ErrorType::HttpRequestOtherError
    }
}

/// Builds the wire error message for a hop that failed below HTTP.
///
/// The message lands in the result's `error` field next to the partial steps.
pub fn transport_error_message(error: &reqwest::Error) -> String {
    format!("Request failed: {error}")
}

/// Updates trace statistics based on a `reqwest::Error`.
///
/// Analyzes the error and increments the appropriate `ErrorType` counter.
///
/// # Arguments
///
/// * `stats` - The trace statistics tracker to update
/// * `error` - The `reqwest::Error` to categorize and record
pub fn update_error_stats(stats: &TraceStats, error: &reqwest::Error) {
    let error_type = categorize_reqwest_error(error);
    stats.increment_error(error_type);
}
