//! URL validation, normalization, and redirect-target resolution.

use log::warn;
use url::Url;

use crate::config::MAX_URL_LENGTH;
use crate::error_handling::TraceError;

/// Validates and normalizes a trace input URL.
///
/// Adds an https:// prefix if the input has no scheme, then parses and checks
/// that the result uses http or https. Rejects inputs longer than
/// `MAX_URL_LENGTH` to prevent abuse. The returned `Url` is what the first
/// hop requests; its rendered form is what step records show.
///
/// # Arguments
///
/// * `raw` - The URL string as submitted by the caller
///
/// # Errors
///
/// Returns `TraceError::InvalidUrl` when the input is too long, unparseable,
/// or not an http(s) URL.
pub fn validate_and_normalize_url(raw: &str) -> Result<Url, TraceError> {
    // Check length before normalization to prevent abuse
    if raw.len() > MAX_URL_LENGTH {
        warn!(
            "Rejecting URL exceeding maximum length ({} > {}): {}...",
            raw.len(),
            MAX_URL_LENGTH,
            truncate_for_log(raw)
        );
        return Err(TraceError::InvalidUrl(truncate_for_log(raw)));
    }

    // Normalize: add https:// prefix if missing
    let normalized = if !raw.starts_with("http://") && !raw.starts_with("https://") {
        format!("https://{raw}")
    } else {
        raw.to_string()
    };

    // The prefix can push an input over the limit
    if normalized.len() > MAX_URL_LENGTH {
        warn!(
            "Rejecting normalized URL exceeding maximum length ({} > {})",
            normalized.len(),
            MAX_URL_LENGTH
        );
        return Err(TraceError::InvalidUrl(truncate_for_log(raw)));
    }

    // Validate: check syntax and scheme
    match Url::parse(&normalized) {
        Ok(parsed) => match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            _ => {
                warn!("Rejecting unsupported scheme for URL: {raw}");
                Err(TraceError::InvalidUrl(truncate_for_log(raw)))
            }
        },
        Err(e) => {
            warn!("Rejecting invalid URL ({e}): {raw}");
            Err(TraceError::InvalidUrl(truncate_for_log(raw)))
        }
    }
}

/// Canonical visited-set key for a URL.
///
/// The fragment is stripped (it never reaches the server, so `/a` and `/a#x`
/// are the same hop) and the URL is rendered back to a string. Parsing has
/// already lowercased the scheme and host and dropped default ports, so those
/// differences cannot produce distinct keys. Trailing slashes and query
/// strings are preserved as distinct on purpose: servers routinely treat them
/// as different resources.
pub fn canonical_key(url: &Url) -> String {
    let mut key = url.clone();
    key.set_fragment(None);
    key.into()
}

/// Resolves a `Location` header value against the URL of the hop that sent it.
///
/// Absolute values replace the current URL; everything else (path-absolute,
/// path-relative, protocol-relative) is joined against the current hop as the
/// base. Returns `None` when the value cannot be resolved either way.
pub fn resolve_location(current: &Url, location: &str) -> Option<Url> {
    match Url::parse(location) {
        Ok(absolute) => Some(absolute),
        Err(_) => current.join(location).ok(),
    }
}

/// Whether a `Location` value is a relative reference that needs the hop URL
/// as a base to resolve.
pub fn is_relative_reference(location: &str) -> bool {
    Url::parse(location).is_err()
}

fn truncate_for_log(raw: &str) -> String {
    raw.chars().take(120).collect()
}
