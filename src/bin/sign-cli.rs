use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand};

use sign_proxy::http::request::SIGN_PARAM;
use sign_proxy::signing::{sign, verify_token, Secret};

#[derive(Parser)]
#[command(name = "sign-cli")]
#[command(about = "Issue and check signed download links for sign-proxy", long_about = None)]
struct Cli {
    /// HMAC key. Falls back to SIGN_SECRET, then TOKEN.
    #[arg(short, long, env = "SIGN_SECRET", hide_env_values = true)]
    secret: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Produce a token (and a full link when a base URL is known)
    Sign {
        /// Resource path exactly as it will appear in the link, e.g. /movies/a.mp4
        #[arg(short, long)]
        path: String,

        /// Seconds from now until the token expires
        #[arg(short, long, default_value_t = 600, conflicts_with = "expiry")]
        ttl: u64,

        /// Absolute Unix expiry, instead of --ttl
        #[arg(short, long)]
        expiry: Option<u64>,

        /// Public gateway address used to print the full link
        #[arg(short, long, env = "WORKER_ADDRESS")]
        base_url: Option<String>,
    },
    /// Check a token against a path at the current time
    Verify {
        #[arg(short, long)]
        path: String,

        /// Token in `signature:expiry` form
        #[arg(short = 'k', long)]
        sign: String,
    },
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn resolve_secret(flag: Option<String>) -> Result<Secret, Box<dyn std::error::Error>> {
    let secret = flag
        .filter(|s| !s.is_empty())
        .or_else(|| std::env::var("TOKEN").ok().filter(|s| !s.is_empty()))
        .ok_or("no secret given: pass --secret or set SIGN_SECRET / TOKEN")?;
    Ok(Secret::from(secret))
}

fn signed_link(base_url: &str, path: &str, token: &str) -> String {
    let query: String = url::form_urlencoded::Serializer::new(String::new())
        .append_pair(SIGN_PARAM, token)
        .finish();
    format!("{}{}?{}", base_url.trim_end_matches('/'), path, query)
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let secret = resolve_secret(cli.secret)?;

    match cli.command {
        Commands::Sign {
            path,
            ttl,
            expiry,
            base_url,
        } => {
            let expiry = expiry.unwrap_or_else(|| now_unix().saturating_add(ttl));
            let token = sign(&path, expiry, &secret);

            println!("{}", token);
            if let Some(base_url) = base_url.filter(|b| !b.is_empty()) {
                println!("{}", signed_link(&base_url, &path, &token));
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Verify { path, sign } => match verify_token(&path, &sign, &secret, now_unix()) {
            Ok(expiry) => {
                println!("valid (expires at {})", expiry);
                Ok(ExitCode::SUCCESS)
            }
            Err(denial) => {
                println!("invalid: {}", denial);
                Ok(ExitCode::FAILURE)
            }
        },
    }
}
