//! Exam Notice Bot — Binary Entrypoint
//! Spawns the watch loop and boots the keep-alive Axum server.

use std::net::SocketAddr;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use exam_notice_bot::{api, config::Config, metrics::Metrics, watch};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = Config::from_env()?;
    let metrics = Metrics::init(cfg.poll_interval_secs);
    let port = cfg.port;

    tokio::spawn(async move {
        if let Err(e) = watch::run_from_config(cfg).await {
            tracing::error!("watch loop exited: {e:#}");
        }
    });

    let app = api::create_router().merge(metrics.router());
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "keep-alive listener up");
    axum::serve(listener, app).await?;
    Ok(())
}
