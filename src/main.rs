//! Application entry point: lingo-coach HTTP service.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load `.env` files (working directory, then the per-user config
//!    directory) and parse the command line.
//! 3. Load [`AppConfig`] from disk (returns default on first run).
//! 4. Read provider credentials from the environment.
//! 5. Build [`AppState`] with one REST client per configured provider.
//! 6. Bind the listener and serve the router until the process is stopped.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use lingo_coach::api::{self, AppState};
use lingo_coach::config::{AppConfig, AppPaths, Credentials};

#[derive(Parser, Debug)]
#[command(name = "lingo-coach", about = "Language-practice backend service")]
struct Args {
    /// Settings file (defaults to the per-user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overriding `server.bind_addr`
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("lingo-coach starting up");

    // 2. Environment and arguments
    if let Err(e) = dotenvy::dotenv() {
        log::debug!("no .env in working directory: {e}");
    }
    let user_env = AppPaths::new().env_file;
    if user_env.exists() {
        if let Err(e) = dotenvy::from_path(&user_env) {
            log::warn!("Failed to read {}: {e}", user_env.display());
        }
    }
    let args = Args::parse();

    // 3. Configuration
    let loaded = match &args.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    let mut config = loaded.unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    if let Some(bind) = args.bind {
        config.server.bind_addr = bind;
    }

    // 4. Credentials
    let credentials = Credentials::from_env();
    log::debug!("credentials: {credentials:?}");

    // 5. State
    let bind_addr = config.server.bind_addr.clone();
    let state = Arc::new(AppState::from_config(config, credentials));

    // 6. Serve
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    log::info!("listening on http://{bind_addr}");
    axum::serve(listener, api::router(state))
        .await
        .context("server error")?;

    Ok(())
}
