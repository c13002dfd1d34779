//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the upstream address is a usable absolute URL
//! - Check credentials are present
//! - Validate value ranges (timeouts > 0, bind address parses)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("upstream address (ADDRESS) is not set")]
    MissingUpstreamAddress,

    #[error("upstream address {0:?} is not an absolute http(s) URL")]
    InvalidUpstreamAddress(String),

    #[error("upstream token (TOKEN) is not set")]
    MissingUpstreamToken,

    #[error("signing secret is empty while signature checking is enabled")]
    MissingSigningSecret,

    #[error("bind address {0:?} is not a socket address")]
    InvalidBindAddress(String),

    #[error("timeout {0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("tls {0} path is empty")]
    EmptyTlsPath(&'static str),
}

/// Check `config` and collect every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let address = config.upstream.address.trim();
    if address.is_empty() {
        errors.push(ValidationError::MissingUpstreamAddress);
    } else {
        match Url::parse(address) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {}
            _ => errors.push(ValidationError::InvalidUpstreamAddress(address.to_string())),
        }
    }

    if config.upstream.token.is_empty() {
        errors.push(ValidationError::MissingUpstreamToken);
    }

    if !config.signing.disable_sign && config.signing_secret().is_empty() {
        errors.push(ValidationError::MissingSigningSecret);
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    let timeouts = &config.timeouts;
    for (name, value) in [
        ("connect_secs", timeouts.connect_secs),
        ("link_secs", timeouts.link_secs),
        ("fetch_secs", timeouts.fetch_secs),
        ("read_secs", timeouts.read_secs),
        ("request_secs", timeouts.request_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout(name));
        }
    }

    if let Some(tls) = &config.listener.tls {
        if tls.cert_path.trim().is_empty() {
            errors.push(ValidationError::EmptyTlsPath("cert"));
        }
        if tls.key_path.trim().is_empty() {
            errors.push(ValidationError::EmptyTlsPath("key"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
