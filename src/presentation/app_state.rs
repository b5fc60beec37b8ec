// Application state for HTTP handlers
use crate::application::chart_engine::ChartEngine;
use crate::application::connection::ConnectionService;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RwLock<ChartEngine>>,
    pub table_html: Arc<RwLock<String>>,
    pub connection: ConnectionService,
}
