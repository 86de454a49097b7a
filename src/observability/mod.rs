//! Observability
//!
//! Structured logging through `tracing`; request spans come from
//! `tower-http`'s trace layer in the HTTP server.

mod logging;

pub use logging::{init_logging, LogFormat, DEFAULT_FILTER};
