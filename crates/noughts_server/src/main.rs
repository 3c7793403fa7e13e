//! `noughts` binary: serve, migrate, rankings.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use noughts_server::api::{self, AppState};
use noughts_server::cli::{Cli, Command};
use noughts_server::{
    GameService, LogMailer, LogNotifier, MemoryStore, QueueNotifier, ServerConfig, SqliteStore,
    Store, deliver,
};
use tracing::{info, instrument, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            host,
            port,
            db_path,
            memory,
        } => serve(config, host, port, db_path, memory).await,
        Command::Migrate { db_path } => migrate(db_path),
        Command::Rankings { db_path } => rankings(db_path),
    }
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn resolve_db_path(db_path: Option<String>) -> String {
    ServerConfig::default()
        .apply_env()
        .with_overrides(None, None, db_path)
        .db_path()
        .clone()
}

/// Run the HTTP server
async fn serve(
    config_path: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
    db_path: Option<String>,
    memory: bool,
) -> Result<()> {
    let config = match config_path {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    }
    .apply_env()
    .with_overrides(host, port, db_path);
    config.validate()?;

    init_tracing(config.log_filter());
    info!(?config, "Starting noughts server");

    if memory {
        warn!("Using in-memory store; all data is lost on exit");
        run_with_store(&config, MemoryStore::new()).await
    } else {
        let store = SqliteStore::new(config.db_path().clone());
        store.run_migrations()?;
        run_with_store(&config, store).await
    }
}

async fn run_with_store<S: Store>(config: &ServerConfig, store: S) -> Result<()> {
    if *config.notifications() {
        let (notifier, receiver) = QueueNotifier::channel();
        tokio::spawn(deliver(receiver, LogMailer));
        let app = api::router(AppState::new(GameService::new(store, notifier)));
        listen(config, app).await
    } else {
        let app = api::router(AppState::new(GameService::new(store, LogNotifier)));
        listen(config, app).await
    }
}

#[instrument(skip_all, fields(addr = %config.bind_address()))]
async fn listen(config: &ServerConfig, app: axum::Router) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!("Server ready at http://{}/", config.bind_address());

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutting down");
            }
        })
        .await?;
    Ok(())
}

/// Apply migrations and exit
fn migrate(db_path: Option<String>) -> Result<()> {
    init_tracing("info");
    let store = SqliteStore::new(resolve_db_path(db_path));
    let applied = store.run_migrations()?;
    info!(applied, path = store.db_path(), "Database up to date");
    Ok(())
}

/// Print the leaderboard
fn rankings(db_path: Option<String>) -> Result<()> {
    init_tracing("warn");
    let store = SqliteStore::new(resolve_db_path(db_path));
    store.run_migrations()?;
    let service = GameService::new(store, LogNotifier);

    println!(
        "{:>4}  {:<20} {:>5} {:>6} {:>5} {:>7}",
        "rank", "name", "won", "lost", "drawn", "ratio"
    );
    for line in service.rankings()? {
        println!(
            "{:>4}  {:<20} {:>5} {:>6} {:>5} {:>7.2}",
            line.rank(),
            line.name(),
            line.wins(),
            line.losses(),
            line.draws(),
            line.ratio()
        );
    }
    Ok(())
}
