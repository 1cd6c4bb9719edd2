use crate::dashboard::DashboardService;
use axum::extract::FromRef;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type SharedDashboard = Arc<DashboardService>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub dashboard: SharedDashboard,
    pub hash: String,
}

impl ServerState {
    pub fn new(config: ServerConfig, dashboard: SharedDashboard) -> Self {
        Self {
            config,
            start_time: Instant::now(),
            dashboard,
            hash: env!("GIT_HASH").to_string(),
        }
    }
}

impl FromRef<ServerState> for SharedDashboard {
    fn from_ref(input: &ServerState) -> Self {
        input.dashboard.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
