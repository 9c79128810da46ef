//! courier-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) overlaid with
//! `COURIER_*` environment variables, opens the SQLite store, and serves the
//! JSON API over HTTP.
//!
//! # Demo data
//!
//! ```
//! cargo run -p courier-server -- --seed
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use courier_server::{AppState, ServerConfig, auth::TokenCodec};
use courier_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Courier messaging server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Register the demo users and messages, then exit.
  #[arg(long)]
  seed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .set_default("host", "127.0.0.1")?
    .set_default("port", 3000)?
    .set_default("store_path", "courier.db")?
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("COURIER"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // A missing secret is fatal here, never per request.
  let tokens = TokenCodec::new(&server_cfg.secret_key)
    .context("secret_key is unusable")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  // Open SQLite store.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  if cli.seed {
    courier_server::seed::seed(&store)
      .await
      .context("failed to seed store")?;
    return Ok(());
  }

  // Build application state.
  let state = AppState {
    store:  Arc::new(store),
    tokens: Arc::new(tokens),
    config: Arc::new(server_cfg.clone()),
  };

  let app = courier_server::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
