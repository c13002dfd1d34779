//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::signing::Secret;

/// Upstream base URL.
pub const ENV_ADDRESS: &str = "ADDRESS";
/// Upstream bearer token, also the default signing secret.
pub const ENV_TOKEN: &str = "TOKEN";
/// Public address of this gateway.
pub const ENV_WORKER_ADDRESS: &str = "WORKER_ADDRESS";
/// `true` switches signature checking off.
pub const ENV_DISABLE_SIGN: &str = "DISABLE_SIGN";
/// Dedicated signing secret.
pub const ENV_SIGN_SECRET: &str = "SIGN_SECRET";
/// Listener address.
pub const ENV_BIND_ADDRESS: &str = "BIND_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a TOML file into a configuration without validating it.
pub fn read_config_file(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Overlay environment settings on top of `config`.
///
/// `lookup` abstracts `std::env::var` so the mapping can be exercised without
/// touching the real environment. Empty values are ignored, except for
/// `DISABLE_SIGN` where only the exact string `true` switches checking off.
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

    if let Some(address) = non_empty(ENV_ADDRESS) {
        config.upstream.address = address;
    }
    if let Some(token) = non_empty(ENV_TOKEN) {
        config.upstream.token = Secret::from(token);
    }
    if let Some(worker) = non_empty(ENV_WORKER_ADDRESS) {
        config.worker_address = Some(worker);
    }
    if let Some(secret) = non_empty(ENV_SIGN_SECRET) {
        config.signing.secret = Some(Secret::from(secret));
    }
    if let Some(bind) = non_empty(ENV_BIND_ADDRESS) {
        config.listener.bind_address = bind;
    }
    if let Some(flag) = lookup(ENV_DISABLE_SIGN) {
        config.signing.disable_sign = flag == "true";
    }
}

/// Load configuration: optional TOML file, then environment, then validation.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => GatewayConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
