//! Upstream storage subsystem.
//!
//! # Data Flow
//! ```text
//! Authorized path
//!     → link.rs (POST {ADDRESS}/api/fs/link, bearer TOKEN)
//!     → UpstreamLinkDescriptor { url, headers }
//!     → forwarder.rs (GET url with headers)
//!     → streamed response with download + CORS headers
//! ```
//!
//! # Design Decisions
//! - No caching: every request resolves a fresh link
//! - No retries
//! - Link and file calls share one pooled client; pooling never orders requests
//! - Every outbound call has a deadline

pub mod forwarder;
pub mod link;

pub use forwarder::Forwarder;
pub use link::{LinkResolver, UpstreamLinkDescriptor};
