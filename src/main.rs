//! Signed-URL download gateway.
//!
//! Authorizes `GET /<path>?sign=<signature>:<expiry>` requests and streams the
//! file behind `<path>` from an OpenList-style storage API, without exposing
//! that API or its token to the caller.
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌──────────────────────────────────────────────┐
//!                          │                 SIGN PROXY                   │
//!   Client Request         │  ┌────────┐   ┌──────────┐   ┌───────────┐   │
//!   ───────────────────────┼─▶│ server │──▶│   gate   │──▶│ verifier  │   │
//!                          │  │(axum)  │   │          │   │ HMAC/exp  │   │
//!                          │  └────────┘   └────┬─────┘   └───────────┘   │
//!                          │                    │ allow                   │
//!                          │                    ▼                         │
//!                          │              ┌───────────┐  POST /api/fs/link │
//!                          │              │ forwarder │───────────────────┼──▶ Storage API
//!   Client Response        │              │           │  GET data.url     │
//!   ◀──────────────────────┼──────────────│  stream   │───────────────────┼──▶ File host
//!                          │              └───────────┘                   │
//!                          └──────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use sign_proxy::config::load_config;
use sign_proxy::http::HttpServer;
use sign_proxy::lifecycle::signals::spawn_signal_listener;
use sign_proxy::lifecycle::{Shutdown, StartupError};
use sign_proxy::net::load_tls_config;
use sign_proxy::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "sign-proxy")]
#[command(about = "Signed-URL download gateway", long_about = None)]
struct Cli {
    /// TOML configuration file; environment variables override it.
    #[arg(short, long, env = "SIGN_PROXY_CONFIG")]
    config: Option<PathBuf>,

    /// Listener address, overriding the configured one.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref()).map_err(StartupError::from)?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);

    tracing::info!("sign-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.address,
        tls = config.listener.tls.is_some(),
        disable_sign = config.signing.disable_sign,
        dedicated_signing_secret = config.signing.secret.is_some(),
        worker_address = config.worker_address.as_deref().unwrap_or("-"),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    spawn_signal_listener(shutdown.clone());

    let tls = config.listener.tls.clone();
    let bind_address = config.listener.bind_address.clone();
    let server = HttpServer::new(config)?;

    match tls {
        Some(tls) => {
            let addr: SocketAddr = bind_address.parse()?;
            let rustls = load_tls_config(&tls).await.map_err(StartupError::Tls)?;
            server.run_tls(addr, rustls, shutdown.subscribe()).await?;
        }
        None => {
            let listener = TcpListener::bind(&bind_address)
                .await
                .map_err(|source| StartupError::Bind {
                    addr: bind_address.clone(),
                    source,
                })?;
            server.run(listener, shutdown.subscribe()).await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
