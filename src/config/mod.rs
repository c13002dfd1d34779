//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment (ADDRESS, TOKEN, WORKER_ADDRESS, DISABLE_SIGN, ...)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → shared via Arc to the request gate
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the secret lives for the process lifetime
//! - All fields have defaults to allow minimal configs
//! - Environment wins over the file
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::GatewayConfig;
pub use schema::ListenerConfig;
pub use schema::LogFormat;
pub use schema::ObservabilityConfig;
pub use schema::SigningConfig;
pub use schema::TimeoutConfig;
pub use schema::TlsConfig;
pub use schema::UpstreamConfig;
