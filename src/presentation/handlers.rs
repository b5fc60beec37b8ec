// HTTP request handlers
use crate::presentation::app_state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Current rendered chart frame: columns and axis ticks for both directions
pub async fn get_chart(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let engine = state.engine.read().await;
    Json(engine.frame())
}

/// Latest status-table fragment, served verbatim
pub async fn get_table(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.table_html.read().await.clone())
}

pub async fn connect(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.connection.connect().await {
        Ok(()) => StatusCode::NO_CONTENT,
        Err(e) => {
            tracing::error!("connect failed: {e:#}");
            StatusCode::BAD_GATEWAY
        }
    }
}

pub async fn disconnect(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.connection.disconnect().await {
        Ok(()) => StatusCode::NO_CONTENT,
        Err(e) => {
            tracing::error!("disconnect failed: {e:#}");
            StatusCode::BAD_GATEWAY
        }
    }
}
