// ABOUTME: Binary serving the extraction HTTP API.
// ABOUTME: Flags mirror the classic readability server: --host, --port, --wait-timeout.

use std::time::Duration;

use anyhow::Context;
use cetd_web::{router, AppState, Fetcher};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cetd-server")]
#[command(about = "Serve page info, readable HTML and extracted text over HTTP")]
struct Args {
    /// Host to listen on
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// Seconds to wait for a remote server when fetching a page
    #[arg(long, alias = "wait_timeout", default_value_t = 7)]
    wait_timeout: u64,
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let fetcher = Fetcher::builder()
        .timeout(Duration::from_secs(args.wait_timeout))
        .build()?;
    let app = router(AppState::new(fetcher));

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
