//! rollcall-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and serves the attendance API over HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use axum::http::HeaderValue;
use clap::Parser;
use rollcall_store_sqlite::SqliteStore;
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::{
  cors::{AllowOrigin, Any, CorsLayer},
  trace::TraceLayer,
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Rollcall attendance server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` with
/// `ROLLCALL_*` environment overrides.
#[derive(Deserialize, Clone)]
struct ServerConfig {
  #[serde(default = "default_host")]
  host:             String,
  #[serde(default = "default_port")]
  port:             u16,
  database_path:    PathBuf,
  /// Comma-separated list of allowed browser origins.
  frontend_origins: String,
  #[serde(default = "default_debug")]
  debug:            bool,
  #[serde(default = "default_app_name")]
  app_name:         String,
  #[serde(default = "default_app_version")]
  app_version:      String,
}

fn default_host() -> String {
  "127.0.0.1".to_string()
}

fn default_port() -> u16 {
  8000
}

fn default_debug() -> bool {
  true
}

fn default_app_name() -> String {
  "rollcall".to_string()
}

fn default_app_version() -> String {
  env!("CARGO_PKG_VERSION").to_string()
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  // Load configuration before tracing so the debug flag can pick the default
  // log level.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("ROLLCALL"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let default_level = if server_cfg.debug {
    LevelFilter::DEBUG
  } else {
    LevelFilter::INFO
  };
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy(),
    )
    .init();

  tracing::info!(
    app = %server_cfg.app_name,
    version = %server_cfg.app_version,
    "starting"
  );

  // Open the store, then apply the schema separately: a schema failure is
  // logged and the server still comes up, so operators can inspect a bad
  // database file through the API's error responses rather than a crash loop.
  let store = SqliteStore::connect(&server_cfg.database_path)
    .await
    .with_context(|| {
      format!("failed to open store at {:?}", server_cfg.database_path)
    })?;
  if let Err(e) = store.init_schema().await {
    tracing::error!("schema initialisation failed: {e}");
  }

  let cors = cors_layer(&server_cfg.frontend_origins)?;
  let app = rollcall_api::api_router(Arc::new(store))
    .layer(cors)
    .layer(TraceLayer::new_for_http());

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  tracing::info!("listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Build the CORS layer from the comma-separated origin list. Credentials are
/// never allowed, which keeps wildcard methods and headers legal.
fn cors_layer(origins: &str) -> anyhow::Result<CorsLayer> {
  let parsed = origins
    .split(',')
    .map(str::trim)
    .filter(|o| !o.is_empty())
    .map(|o| {
      HeaderValue::from_str(o)
        .with_context(|| format!("invalid frontend origin {o:?}"))
    })
    .collect::<anyhow::Result<Vec<_>>>()?;

  Ok(
    CorsLayer::new()
      .allow_origin(AllowOrigin::list(parsed))
      .allow_methods(Any)
      .allow_headers(Any),
  )
}
