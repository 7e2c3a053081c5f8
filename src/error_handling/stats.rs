//! Trace statistics tracking.
//!
//! This module provides thread-safe statistics tracking for errors, warnings,
//! and informational metrics while traces run.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::{ErrorType, InfoType, WarningType};

/// Thread-safe trace statistics tracker.
///
/// Tracks errors, warnings, and informational metrics using atomic counters,
/// allowing concurrent access from many in-flight traces. All types are
/// initialized to zero on creation, so `increment_*` never has to insert.
///
/// # Categories
///
/// - **Errors**: Traces that ended without a terminal response, and rejected inputs
/// - **Warnings**: Upstream response oddities that don't fail a trace
/// - **Info**: Notable events (followed redirects, scheme upgrades)
///
/// Shared across tasks with `Arc`.
pub struct TraceStats {
    errors: HashMap<ErrorType, AtomicUsize>,
    warnings: HashMap<WarningType, AtomicUsize>,
    info: HashMap<InfoType, AtomicUsize>,
}

impl TraceStats {
    /// Creates a tracker with every counter present and at zero.
    pub fn new() -> Self {
        let mut errors = HashMap::new();
        for error in ErrorType::iter() {
            errors.insert(error, AtomicUsize::new(0));
        }

        let mut warnings = HashMap::new();
        for warning in WarningType::iter() {
            warnings.insert(warning, AtomicUsize::new(0));
        }

        let mut info = HashMap::new();
        for info_type in InfoType::iter() {
            info.insert(info_type, AtomicUsize::new(0));
        }

        TraceStats {
            errors,
            warnings,
            info,
        }
    }

    /// Increment an error counter.
    ///
    /// Every variant is inserted by `new()`, so the lookup only misses if a
    /// variant was added without rebuilding the maps. That case is logged
    /// rather than panicking.
    pub fn increment_error(&self, error: ErrorType) {
        if let Some(counter) = self.errors.get(&error) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!("Error counter for {error:?} missing from stats map");
        }
    }

    /// Increment a warning counter.
    pub fn increment_warning(&self, warning: WarningType) {
        if let Some(counter) = self.warnings.get(&warning) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!("Warning counter for {warning:?} missing from stats map");
        }
    }

    /// Increment an info counter.
    pub fn increment_info(&self, info_type: InfoType) {
        if let Some(counter) = self.info.get(&info_type) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!("Info counter for {info_type:?} missing from stats map");
        }
    }

    /// Get the count for an error type.
    pub fn get_error_count(&self, error: ErrorType) -> usize {
        self.errors
            .get(&error)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Get the count for a warning type.
    pub fn get_warning_count(&self, warning: WarningType) -> usize {
        self.warnings
            .get(&warning)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Get the count for an info type.
    pub fn get_info_count(&self, info_type: InfoType) -> usize {
        self.info
            .get(&info_type)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Get total error count across all error types.
    pub fn total_errors(&self) -> usize {
        ErrorType::iter().map(|e| self.get_error_count(e)).sum()
    }

    /// Get total warning count across all warning types.
    pub fn total_warnings(&self) -> usize {
        WarningType::iter().map(|w| self.get_warning_count(w)).sum()
    }

    /// Get total info count across all info types.
    pub fn total_info(&self) -> usize {
        InfoType::iter().map(|i| self.get_info_count(i)).sum()
    }

    /// Per-type error counts with non-zero values, as displayable pairs.
    ///
    /// Used for the shutdown summary.
    pub fn error_breakdown(&self) -> Vec<(&'static str, usize)> {
        ErrorType::iter()
            .filter_map(|e| {
                let count = self.get_error_count(e);
                (count > 0).then(|| (e.as_str(), count))
            })
            .collect()
    }
}

impl Default for TraceStats {
    fn default() -> Self {
        Self::new()
    }
}
