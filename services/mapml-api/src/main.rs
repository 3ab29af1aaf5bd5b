//! MapML API service.
//!
//! HTTP server answering MapServer-style `GetMapML` requests for one map.

use anyhow::Result;
use clap::Parser;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use mapml_api::{build_router, state::AppState};

#[derive(Parser, Debug)]
#[command(name = "mapml-api")]
#[command(about = "MapML GetMapML server")]
struct Args {
    /// Listen address
    #[arg(short, long, env = "MAPML_LISTEN", default_value = "0.0.0.0:8080")]
    listen: String,

    /// Map file (YAML)
    #[arg(short, long, env = "MAPML_MAP_FILE", default_value = "config/map.yaml")]
    map: PathBuf,

    /// Log level
    #[arg(long, env = "MAPML_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()?;

    info!("Prometheus metrics exporter initialized");
    info!(map = ?args.map, "Starting MapML API server");

    let state = Arc::new(AppState::from_map_file(&args.map)?.with_prometheus(prometheus_handle));
    let app = build_router(state);

    let addr: SocketAddr = args.listen.parse()?;
    info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
