//! chatgate binary: bind, assemble state, serve until ctrl-c.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use chatgate_core::GatewayConfig;
use chatgate_core::config::API_KEY_VAR;
use chatgate_server::{AppState, HttpTransport, serve};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Address to bind the gateway to
    #[arg(long, default_value = "0.0.0.0:8787")]
    addr: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let config = GatewayConfig::from_env();
    if config.api_key.is_none() {
        warn!("{API_KEY_VAR} is not set; chat requests will fail with MISSING_API_KEY");
    }

    let transport = Arc::new(HttpTransport::new()?);
    let state = AppState::new(config, transport);

    let listener = TcpListener::bind(&args.addr).await?;

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown.cancel();
        }
    });

    serve(listener, state, cancel).await
}
