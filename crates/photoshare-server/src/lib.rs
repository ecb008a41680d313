//! Server wiring for photoshare: configuration, the filesystem asset store
//! and router assembly. The binary in `main.rs` is a thin shell over this.

pub mod assets;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use photoshare_core::{assets::AssetStore, store::PhotoStore};
use photoshare_engine::{Engine, FeedConfig};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

pub use assets::FsAssetStore;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `PHOTOSHARE_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  pub asset_dir:  PathBuf,
  #[serde(default)]
  pub feed:       FeedConfig,
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The full application: the JSON API with request tracing.
pub fn app<S, A>(engine: Arc<Engine<S, A>>) -> Router
where
  S: PhotoStore + 'static,
  A: AssetStore + 'static,
{
  photoshare_api::api_router(engine).layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn config_defaults_feed_sizing() {
    let cfg: ServerConfig = config::Config::builder()
      .add_source(config::File::from_str(
        r#"
          host       = "127.0.0.1"
          port       = 3000
          store_path = "photoshare.db"
          asset_dir  = "images"
        "#,
        config::FileFormat::Toml,
      ))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();

    assert_eq!(cfg.address(), "127.0.0.1:3000");
    assert_eq!(cfg.feed, FeedConfig::default());
    assert_eq!(cfg.feed.default_limit, 5);
  }

  #[test]
  fn config_overrides_feed_table() {
    let cfg: ServerConfig = config::Config::builder()
      .add_source(config::File::from_str(
        r#"
          host       = "0.0.0.0"
          port       = 8080
          store_path = "db"
          asset_dir  = "img"

          [feed]
          max_window = 50
        "#,
        config::FileFormat::Toml,
      ))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();

    assert_eq!(cfg.feed.max_window, 50);
    assert_eq!(cfg.feed.overfetch_factor, 4);
  }

  #[test]
  fn tilde_expands_to_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(
      expand_tilde(Path::new("~/photos")),
      PathBuf::from(home).join("photos")
    );
    assert_eq!(expand_tilde(Path::new("/abs")), PathBuf::from("/abs"));
  }
}
