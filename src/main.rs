// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

use crate::application::chart_engine::ChartEngine;
use crate::application::connection::ConnectionService;
use crate::application::poller::{run_sample_loop, run_table_loop};
use crate::application::snapshot_source::SnapshotSource;
use crate::infrastructure::config::{load_chart_config, load_monitor_config};
use crate::infrastructure::http_source::HttpSnapshotSource;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{connect, disconnect, get_chart, get_table, health_check};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let monitor_config = load_monitor_config()?;
    let chart_config = load_chart_config()?;
    anyhow::ensure!(
        !chart_config.priority_classes.is_empty(),
        "config/chart.toml must define at least one priority class"
    );

    // Snapshot source (infrastructure layer)
    let source: Arc<dyn SnapshotSource> = Arc::new(HttpSnapshotSource::new(
        monitor_config.monitor.endpoint.clone(),
        monitor_config.monitor.session_id.clone(),
    ));

    // Prime the engine before serving so a priority class referencing a
    // queue the router does not report aborts startup instead of rendering.
    let first = source
        .fetch_snapshot()
        .await?
        .context("router returned no usable snapshot at startup")?;
    let engine = Arc::new(RwLock::new(ChartEngine::new(chart_config, first)?));

    let (connection, cadence_rx) = ConnectionService::new(source.clone(), &monitor_config.monitor);

    let state = Arc::new(AppState {
        engine: engine.clone(),
        table_html: Arc::new(RwLock::new(String::new())),
        connection,
    });

    // Prime the status table; a miss here is not fatal, the refresh loop
    // retries on its own cadence.
    match source.fetch_table().await {
        Ok(Some(fragment)) => *state.table_html.write().await = fragment,
        Ok(None) => {}
        Err(e) => tracing::warn!("initial table fetch failed: {e:#}"),
    }

    // Polling loops
    {
        let source = source.clone();
        let engine = engine.clone();
        tokio::spawn(async move {
            if let Err(e) = run_sample_loop(source, engine).await {
                // the charts would silently freeze without the loop
                tracing::error!("sample loop terminated: {e:#}");
                std::process::exit(1);
            }
        });
    }
    {
        let source = source.clone();
        let table = state.table_html.clone();
        tokio::spawn(run_table_loop(source, table, cadence_rx));
    }

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/chart", get(get_chart))
        .route("/table", get(get_table))
        .route("/connect", post(connect))
        .route("/disconnect", post(disconnect))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = "0.0.0.0:8080".parse().unwrap();
    tracing::info!("starting inet-monitor service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
