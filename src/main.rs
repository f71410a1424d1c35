//! GiftPerch gateway
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server ──▶ route handler ──▶ validate ──▶ 400
//!                       (request id,        │
//!                        trace, timeout)    ├──▶ auth (profile) ──▶ 401
//!                                           │
//!                                           ▼
//!                                   one upstream call
//!                         ┌─────────────────┼──────────────────┐
//!                         ▼                 ▼                  ▼
//!                   search provider   auth service      profile table
//!                   (+ affiliate       /auth/v1/user     /rest/v1/profiles
//!                    link rewrite)
//!                         │                 │                  │
//!     Client Response     ▼                 ▼                  ▼
//!     ◀────────────── 200 payload  |  500 generic message (detail logged)
//! ```

use std::path::PathBuf;

use clap::Parser;

use giftperch_gateway::config::load_config;
use giftperch_gateway::lifecycle::startup;
use giftperch_gateway::observability::logging;

#[derive(Parser)]
#[command(name = "giftperch-gateway")]
#[command(about = "GiftPerch API gateway", long_about = None)]
struct Cli {
    /// Path to a TOML config file. Defaults and environment variables are
    /// used when omitted.
    #[arg(short, long, env = "GIFTPERCH_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    logging::init_logging(&config.observability);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "giftperch-gateway starting");

    startup::start(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
