//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Gate, verifier, forwarder produce:
//!     → logging.rs (structured log events, request-ID spans)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every span
//! - Secrets and tokens are never logged; only whether a token was present
//! - Denial reasons go to logs and metrics, never to the caller

pub mod logging;
pub mod metrics;
