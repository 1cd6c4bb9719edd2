mod config;
mod http_layers;
pub mod metrics;
mod routes;
mod server;
mod state;

pub use config::ServerConfig;
pub use http_layers::{log_requests, RequestsLoggingLevel};
pub use routes::make_view_routes;
pub use server::{make_app, run_server};
pub use state::{ServerState, SharedDashboard};
