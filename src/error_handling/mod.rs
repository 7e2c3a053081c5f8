//! Error handling and trace statistics.
//!
//! This module provides:
//! - Typed failures (`TraceError`, `InitializationError`)
//! - Error categorization for transport failures
//! - Trace statistics tracking (errors, warnings, info metrics)
//!
//! Counted types fall into:
//! - **Errors**: Traces ending without a terminal response, rejected inputs
//! - **Warnings**: Upstream oddities that don't fail a trace
//! - **Info**: Notable events (redirects followed, scheme upgrades)

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{categorize_reqwest_error, transport_error_message, update_error_stats};
pub use stats::TraceStats;
pub use types::{ErrorType, InfoType, InitializationError, TraceError, WarningType};

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_trace_stats_initialization() {
        let stats = TraceStats::new();
        // All counters should start at 0
        for error_type in ErrorType::iter() {
            assert_eq!(stats.get_error_count(error_type), 0);
        }
        for warning_type in WarningType::iter() {
            assert_eq!(stats.get_warning_count(warning_type), 0);
        }
        for info_type in InfoType::iter() {
            assert_eq!(stats.get_info_count(info_type), 0);
        }
    }

    #[test]
    fn test_trace_stats_increment() {
        let stats = TraceStats::new();
        stats.increment_error(ErrorType::RedirectLoopError);
        assert_eq!(stats.get_error_count(ErrorType::RedirectLoopError), 1);

        stats.increment_warning(WarningType::RedirectWithoutLocation);
        assert_eq!(
            stats.get_warning_count(WarningType::RedirectWithoutLocation),
            1
        );

        stats.increment_info(InfoType::RedirectFollowed);
        assert_eq!(stats.get_info_count(InfoType::RedirectFollowed), 1);
    }

    #[test]
    fn test_trace_stats_multiple_increments() {
        let stats = TraceStats::new();
        stats.increment_info(InfoType::RedirectFollowed);
        stats.increment_info(InfoType::RedirectFollowed);
        stats.increment_info(InfoType::RedirectFollowed);
        assert_eq!(stats.get_info_count(InfoType::RedirectFollowed), 3);
    }

    #[test]
    fn test_trace_stats_totals() {
        let stats = TraceStats::new();
        stats.increment_error(ErrorType::RedirectLoopError);
        stats.increment_error(ErrorType::HttpRequestTimeoutError);
        stats.increment_warning(WarningType::RedirectWithoutLocation);
        stats.increment_info(InfoType::RedirectFollowed);

        assert_eq!(stats.total_errors(), 2);
        assert_eq!(stats.total_warnings(), 1);
        assert_eq!(stats.total_info(), 1);
    }

    #[test]
    fn test_error_breakdown_skips_zero_counters() {
        let stats = TraceStats::new();
        stats.increment_error(ErrorType::HopLimitExceededError);
        stats.increment_error(ErrorType::HopLimitExceededError);

        let breakdown = stats.error_breakdown();
        assert_eq!(breakdown, vec![("Hop limit exceeded", 2)]);
    }
}
