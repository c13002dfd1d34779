//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware, host adapter)
//!     → request.rs (request ID, `sign` extraction)
//!     → gate.rs (OPTIONS / 405 / verify / forward)
//!     → response.rs (preflight, file headers)
//!     → Send to client
//! ```

pub mod gate;
pub mod request;
pub mod response;
pub mod server;

pub use gate::{Clock, Gate, InboundRequest, SystemClock};
pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use server::HttpServer;
