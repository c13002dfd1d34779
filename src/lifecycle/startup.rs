//! Startup orchestration.
//!
//! # Responsibilities
//! - Turn a validated configuration into a ready request gate
//! - Build the shared outbound client with its connect deadline
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The secret is copied into the verifier once and never read from config again

use std::time::Duration;

use thiserror::Error;

use crate::config::{ConfigError, GatewayConfig};
use crate::http::gate::Gate;
use crate::signing::Verifier;
use crate::upstream::{Forwarder, LinkResolver};

/// Reasons the gateway cannot start.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("invalid upstream address: {0}")]
    UpstreamAddress(#[from] url::ParseError),

    #[error("failed to load TLS material: {0}")]
    Tls(std::io::Error),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },
}

/// Build the outbound client shared by link resolution and file fetches.
pub fn build_client(config: &GatewayConfig) -> Result<reqwest::Client, StartupError> {
    let client = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
        .user_agent(concat!("sign-proxy/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Assemble verifier and forwarder from `config`.
pub fn build_gate(config: &GatewayConfig) -> Result<Gate, StartupError> {
    let client = build_client(config)?;

    let links = LinkResolver::new(
        client.clone(),
        &config.upstream.address,
        config.upstream.token.clone(),
        Duration::from_secs(config.timeouts.link_secs),
    )?;
    let forwarder = Forwarder::new(
        client,
        links,
        Duration::from_secs(config.timeouts.fetch_secs),
        Duration::from_secs(config.timeouts.read_secs),
    );

    if config.signing.disable_sign {
        tracing::warn!("Signature checking is DISABLED; every GET is forwarded upstream");
    }
    let verifier = Verifier::new(config.signing_secret().clone(), config.signing.disable_sign);

    Ok(Gate::new(verifier, forwarder))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_unparseable_address() {
        let config = GatewayConfig::default();
        assert!(matches!(
            build_gate(&config),
            Err(StartupError::UpstreamAddress(_))
        ));
    }

    #[test]
    fn test_builds_with_valid_address() {
        let mut config = GatewayConfig::default();
        config.upstream.address = "http://127.0.0.1:5244".into();
        assert!(build_gate(&config).is_ok());
    }
}
