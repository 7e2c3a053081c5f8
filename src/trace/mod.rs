//! Redirect chain tracing: URL normalization and the hop loop.
//!
//! `url` holds the pure pieces (validation, canonical visited-set keys,
//! `Location` resolution); `tracer` drives the network loop and assembles
//! trace results.

mod tracer;
pub mod url;

pub use tracer::RedirectTracer;
