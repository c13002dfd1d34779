//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::signing::Secret;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Link-resolution API (`ADDRESS`, `TOKEN`).
    pub upstream: UpstreamConfig,

    /// Signed-URL settings.
    pub signing: SigningConfig,

    /// Public address of this gateway (`WORKER_ADDRESS`).
    ///
    /// Only `sign-cli` reads it, to print full links. The gateway itself never does.
    pub worker_address: Option<String>,

    /// Outbound and per-request timeouts.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl GatewayConfig {
    /// Key used to verify tokens: the dedicated signing secret if set,
    /// otherwise the upstream bearer token.
    pub fn signing_secret(&self) -> &Secret {
        self.signing.secret.as_ref().unwrap_or(&self.upstream.token)
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Upstream storage API.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL, e.g. "https://pan.example.com". `/api/fs/link` is appended.
    pub address: String,

    /// Bearer credential for the link API.
    pub token: Secret,
}

/// Signed-URL configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SigningConfig {
    /// Dedicated HMAC key. Falls back to `upstream.token` when absent.
    pub secret: Option<Secret>,

    /// Accept every request without checking its token.
    pub disable_sign: bool,
}

/// Timeout configuration for outbound calls and request handling.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Total time allowed for the link-resolution call, in seconds.
    pub link_secs: u64,

    /// Time allowed for the file host to answer with a response head, in seconds.
    pub fetch_secs: u64,

    /// Longest silence tolerated between body chunks from the file host, in seconds.
    pub read_secs: u64,

    /// Time allowed for the gateway to produce a response head, in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            link_secs: 15,
            fetch_secs: 30,
            read_secs: 30,
            request_secs: 60,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON lines.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
