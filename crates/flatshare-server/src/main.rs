//! flatshare server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! ledger under `data_dir`, and serves the JSON API under `/api`.
//!
//! ```
//! FLATSHARE_PORT=9000 flatshare-server --config /etc/flatshare.toml
//! ```

mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use axum::Router;
use clap::Parser;
use flatshare_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::settings::ServerConfig;

#[derive(Parser)]
#[command(author, version, about = "Flatshare roommate expense server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load config from {:?}", cli.config))?;

  let data_dir = server_cfg.data_dir();
  std::fs::create_dir_all(&data_dir)
    .with_context(|| format!("failed to create data dir {data_dir:?}"))?;

  let db_path = server_cfg.db_path();
  let store = SqliteStore::open(&db_path)
    .await
    .with_context(|| format!("failed to open store at {db_path:?}"))?;
  tracing::info!(path = %db_path.display(), "ledger opened");

  let address = server_cfg.address();
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app(store)).await.context("server error")?;

  Ok(())
}

fn app(store: SqliteStore) -> Router {
  Router::new()
    .nest("/api", flatshare_api::api_router(Arc::new(store)))
    .layer(TraceLayer::new_for_http())
}
