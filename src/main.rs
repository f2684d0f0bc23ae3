use axum::{Router, routing::get, routing::post};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use prtg_datasource::AppState;
use prtg_datasource::config::DatasourceConfig;
use prtg_datasource::datasource::Datasource;
use prtg_datasource::handlers;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("prtg_datasource=debug,tower_http=debug")
        }))
        .init();

    let config_path = std::env::var("PRTG_CONFIG").unwrap_or_else(|_| "./prtg.toml".to_string());
    let mut config = DatasourceConfig::load(&config_path)?;
    config.apply_env();

    let datasource = Datasource::from_config(&config.prtg)?;
    let state = AppState {
        datasource: Arc::new(datasource),
    };

    let app = Router::new()
        // Query endpoints
        .route("/api/v1/query", post(handlers::query::execute_query))
        // Editor metadata (groups, devices, tags, sensor types)
        .route("/api/v1/metadata", get(handlers::metadata::get_metadata))
        // Connection test
        .route("/api/v1/health", get(handlers::health::test_datasource))
        // Liveness
        .route("/healthz", get(handlers::health::healthz))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = config.server.listen_addr.parse()?;
    tracing::info!("prtg-datasource listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
