//! Roster: a JSON view of the student table.
//!
//! This is the application entry point. It loads configuration from a TOML
//! file, initializes tracing, builds a tokio runtime sized by the configured
//! worker count, creates the MySQL student store, sets up the Axum router and
//! starts the HTTP server.

mod config;
mod db;
mod error;
mod http;
mod logging;
mod middleware;
mod routes;
mod state;

use clap::Parser;

use config::{AppConfig, DEFAULT_CONFIG_PATH};

/// Roster: serves the student table as JSON
#[derive(Parser, Debug)]
#[command(name = "roster", version, about)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Log level filter (e.g., "roster=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}
use db::MySqlStudentStore;
use routes::create_router;
use state::AppState;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration
    let config = AppConfig::load(&args.config)?;

    // Initialize tracing with priority: CLI > env > config default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| config.logging.default_filter().to_string());
    logging::init_tracing(&config.logging, &log_filter)?;

    tracing::info!(path = %args.config, "Loaded configuration");

    let workers = config.http.worker_count();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(workers)
        .enable_all()
        .build()?;

    runtime.block_on(run(config, workers))
}

async fn run(config: AppConfig, workers: usize) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        host = %config.database.host,
        port = config.database.port,
        database = %config.database.name,
        user = %config.database.user,
        "Database configured"
    );
    let store = MySqlStudentStore::new(&config.database);
    tracing::info!(
        pooled = store.is_pooled(),
        pool_size = config.database.pool_size,
        "Initialized student store"
    );

    let listener = http::bind_listener(&config.http)?;
    tracing::info!(
        addr = %config.http.bind_address(),
        workers,
        backlog = config.http.backlog,
        request_timeout_secs = config.http.request_timeout_seconds,
        "Listener bound"
    );

    let state = AppState::new(config, store);
    let app = create_router(state);

    http::start_server(app, listener).await?;

    Ok(())
}
