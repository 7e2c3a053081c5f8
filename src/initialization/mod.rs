//! Application initialization and resource setup.
//!
//! This module provides functions to initialize the shared resources:
//! - HTTP client (redirects disabled, per-hop timeout)
//! - Logger (plain or JSON format)
//!
//! All initialization functions return proper error types for error handling.

mod client;
mod logger;

// Re-export public API
pub use client::init_trace_client;
pub use logger::init_logger_with;
