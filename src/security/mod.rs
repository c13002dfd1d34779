//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → signing::Verifier (token check, fail closed)
//!     → Pass to forwarder
//!
//! Outgoing response:
//!     → headers.rs (CORS)
//! ```
//!
//! # Design Decisions
//! - Fail closed: reject on any authorization failure
//! - No trust in client input: path and token are opaque strings
//! - Authorization happens before any upstream I/O

pub mod headers;
