//! photoshare server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite store and the asset directory, repairs any unpaired writes, and
//! serves the JSON API over HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use photoshare_engine::{BroadcastSink, Engine};
use photoshare_server::{FsAssetStore, ServerConfig, expand_tilde};
use photoshare_store_sqlite::SqliteStore;
use tokio::{net::TcpListener, sync::broadcast::error::RecvError};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Activities a slow relay may fall behind by before it skips ahead.
const ACTIVITY_BUFFER: usize = 256;

#[derive(Parser)]
#[command(author, version, about = "photoshare server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
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
    .add_source(config::File::from(cli.config).required(false))
    .add_source(
      config::Environment::with_prefix("PHOTOSHARE")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true),
    )
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let asset_dir = expand_tilde(&server_cfg.asset_dir);

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  let assets = FsAssetStore::open(&asset_dir)
    .await
    .with_context(|| format!("failed to open asset directory {asset_dir:?}"))?;

  // Relay recorded activities into the log.
  let sink = Arc::new(BroadcastSink::new(ACTIVITY_BUFFER));
  let mut activities = sink.subscribe();
  tokio::spawn(async move {
    loop {
      match activities.recv().await {
        Ok(a) => tracing::info!(
          kind = %a.kind,
          actor = %a.actor_id,
          photo = ?a.photo_id,
          "activity"
        ),
        Err(RecvError::Lagged(skipped)) => {
          tracing::warn!(skipped, "activity relay fell behind")
        }
        Err(RecvError::Closed) => break,
      }
    }
  });

  let engine = Arc::new(
    Engine::new(store, assets)
      .with_sink(sink)
      .with_feed_config(server_cfg.feed),
  );

  let repaired = engine
    .reconcile()
    .await
    .context("startup reconciliation failed")?;
  if !repaired.is_empty() {
    tracing::warn!(count = repaired.len(), "repaired unpaired writes at startup");
  }

  let app = photoshare_server::app(engine);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
