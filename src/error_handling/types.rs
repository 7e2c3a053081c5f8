//! Error type definitions.
//!
//! This module defines the typed failures plus the error, warning, and info
//! categories tracked in trace statistics.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Request-level trace failures.
///
/// These reject a trace before any network activity. Failures during the hop
/// loop never surface here; they are folded into the returned result as soft
/// failures instead.
#[derive(Error, Debug)]
pub enum TraceError {
    /// The input could not be parsed as a URL even after scheme normalization.
    /// Carries the rejected input for logging; the display text is the wire
    /// message.
    #[error("Invalid URL format")]
    InvalidUrl(String),
}

/// Types of errors that can occur while tracing a redirect chain.
///
/// This enum categorizes actual error conditions - traces that ended without
/// reaching a terminal response, plus rejected inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    /// Input rejected before any request was sent.
    InvalidUrlError,
    /// Chain revisited an already-requested URL.
    RedirectLoopError,
    /// Chain was cut off at the hop limit.
    HopLimitExceededError,
    /// Request hit the per-hop timeout.
    HttpRequestTimeoutError,
    /// Request failed to connect.
    HttpRequestConnectError,
    /// Request could not be built.
    HttpRequestBuilderError,
    /// Request failed while being sent.
    HttpRequestRequestError,
    /// Request failed reading the response body.
    HttpRequestBodyError,
    /// Response could not be decoded.
    HttpRequestDecodeError,
    /// Any other transport failure.
    HttpRequestOtherError,
}

/// Types of warnings that can occur while tracing a redirect chain.
///
/// Warnings indicate oddities in upstream responses that don't prevent the
/// trace from producing a result but are worth tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum WarningType {
    /// 3xx response carried no Location header, ending the chain there.
    RedirectWithoutLocation,
    /// Captured header was dropped because its value wasn't UTF-8.
    NonUtf8HeaderValue,
}

/// Types of informational metrics tracked while tracing.
///
/// Info metrics count notable events that aren't errors or warnings, such as
/// followed redirects or scheme upgrades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum InfoType {
    /// One redirect hop followed to the next URL.
    RedirectFollowed,
    /// Hop redirected from http to https.
    HttpsUpgradeRedirect,
    /// Relative Location resolved against the hop URL.
    RelativeLocationResolved,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    /// Returns a human-readable string representation of the error type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::InvalidUrlError => "Invalid URL",
            ErrorType::RedirectLoopError => "Redirect loop detected",
            ErrorType::HopLimitExceededError => "Hop limit exceeded",
            ErrorType::HttpRequestTimeoutError => "HTTP request timeout error",
            ErrorType::HttpRequestConnectError => "HTTP request connect error",
            ErrorType::HttpRequestBuilderError => "HTTP request builder error",
            ErrorType::HttpRequestRequestError => "HTTP request error",
            ErrorType::HttpRequestBodyError => "HTTP request body error",
            ErrorType::HttpRequestDecodeError => "HTTP request decode error",
            ErrorType::HttpRequestOtherError => "HTTP request other error",
        }
    }
}

impl WarningType {
    /// Returns a human-readable string representation of the warning type.
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningType::RedirectWithoutLocation => "Redirect without Location header",
            WarningType::NonUtf8HeaderValue => "Non-UTF-8 header value",
        }
    }
}

impl InfoType {
    /// Returns a human-readable string representation of the info type.
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoType::RedirectFollowed => "Redirect followed",
            InfoType::HttpsUpgradeRedirect => "HTTP to HTTPS redirect",
            InfoType::RelativeLocationResolved => "Relative Location resolved",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_error_type_as_str() {
        assert_eq!(
            ErrorType::HttpRequestTimeoutError.as_str(),
            "HTTP request timeout error"
        );
        assert_eq!(
            ErrorType::RedirectLoopError.as_str(),
            "Redirect loop detected"
        );
        assert_eq!(ErrorType::InvalidUrlError.as_str(), "Invalid URL");
    }

    #[test]
    fn test_warning_type_as_str() {
        assert_eq!(
            WarningType::RedirectWithoutLocation.as_str(),
            "Redirect without Location header"
        );
        assert_eq!(
            WarningType::NonUtf8HeaderValue.as_str(),
            "Non-UTF-8 header value"
        );
    }

    #[test]
    fn test_all_types_have_string_representation() {
        for error_type in ErrorType::iter() {
            assert!(
                !error_type.as_str().is_empty(),
                "{:?} should have non-empty string",
                error_type
            );
        }
        for warning_type in WarningType::iter() {
            assert!(
                !warning_type.as_str().is_empty(),
                "{:?} should have non-empty string",
                warning_type
            );
        }
        for info_type in InfoType::iter() {
            assert!(
                !info_type.as_str().is_empty(),
                "{:?} should have non-empty string",
                info_type
            );
        }
    }

    #[test]
    fn test_trace_error_display_is_wire_message() {
        let err = TraceError::InvalidUrl("ht!tp://broken".to_string());
        assert_eq!(err.to_string(), "Invalid URL format");
    }

    #[test]
    fn test_error_type_display_matches_as_str() {
        assert_eq!(
            ErrorType::HopLimitExceededError.to_string(),
            ErrorType::HopLimitExceededError.as_str()
        );
    }
}
