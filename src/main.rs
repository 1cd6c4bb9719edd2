use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod catalog;
mod categories;
mod config;
mod dashboard;
mod game_store;
mod recommend;
mod sentiment;
mod server;
mod views;

use categories::CategoryRegistry;
use config::{AppConfig, CliConfig, FileConfig};
use dashboard::DashboardService;
use game_store::{GameStore, MySqlGameStore};
use server::{run_server, RequestsLoggingLevel};

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to a TOML configuration file. Values in the file override CLI
    /// arguments.
    #[clap(short, long)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    /// The port for the metrics server (Prometheus scraping).
    #[clap(long, default_value_t = 9091)]
    pub metrics_port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Path to the frontend directory to be statically served.
    #[clap(long)]
    pub frontend_dir_path: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading configuration from {:?}...", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };

    let cli_config = CliConfig {
        port: cli_args.port,
        metrics_port: cli_args.metrics_port,
        logging_level: cli_args.logging_level,
        frontend_dir_path: cli_args.frontend_dir_path,
    };
    let config = AppConfig::resolve(&cli_config, file_config, |key| std::env::var(key).ok())?;

    info!(
        "Connecting to MySQL at {}:{} (database {})...",
        config.database.host, config.database.port, config.database.database
    );
    let store = Arc::new(MySqlGameStore::new(&config.database));

    // Best-effort schema probe: a configured category with no matching
    // review column is a fatal misconfiguration, an unreachable database
    // at startup is not.
    let probed_columns = match store.review_table_columns().await {
        Ok(columns) => Some(columns),
        Err(err) => {
            warn!("Skipping schema check, database not reachable yet: {}", err);
            None
        }
    };

    let registry = match (&config.categories, &probed_columns) {
        (Some(names), _) => CategoryRegistry::new(names.clone())?,
        (None, Some(columns)) => {
            let discovered = CategoryRegistry::discover_from_columns(columns);
            if discovered.is_empty() {
                CategoryRegistry::default_set()
            } else {
                info!("Discovered {} categories from the review table", discovered.len());
                CategoryRegistry::new(discovered)?
            }
        }
        (None, None) => CategoryRegistry::default_set(),
    };

    if let Some(columns) = &probed_columns {
        if let Err(err) = registry.validate_against_columns(columns) {
            bail!("Review table does not match configured categories: {}", err);
        }
        info!("Review table columns match the configured categories");
    }

    info!("Initializing metrics...");
    server::metrics::init_metrics();

    let dashboard = Arc::new(DashboardService::new(store, registry));

    match dashboard.tag_catalog().await {
        catalog if catalog.tags.is_empty() => {
            warn!("Tag catalog is empty or unavailable at startup")
        }
        catalog => {
            server::metrics::init_catalog_metrics(
                catalog.tags.len(),
                dashboard.registry().names().len(),
            );
            info!("Catalog exposes {} tags", catalog.tags.len());
        }
    }

    info!("Ready to serve at port {}!", config.port);
    run_server(
        dashboard,
        config.logging_level,
        config.port,
        config.metrics_port,
        config.frontend_dir_path,
    )
    .await
}
