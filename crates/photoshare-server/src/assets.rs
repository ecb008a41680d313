//! Filesystem-backed [`AssetStore`].
//!
//! Every upload gets a fresh file name, so removing one photo's asset never
//! touches another's even when the bytes are identical.

use std::path::{Path, PathBuf};

use photoshare_core::assets::{AssetStore, NewAsset};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("asset io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("invalid asset reference: {0:?}")]
  InvalidRef(String),
}

#[derive(Debug, Clone)]
pub struct FsAssetStore {
  root: PathBuf,
}

impl FsAssetStore {
  /// Use `root` as the asset directory, creating it if needed.
  pub async fn open(root: impl AsRef<Path>) -> Result<Self, Error> {
    let root = root.as_ref().to_path_buf();
    tokio::fs::create_dir_all(&root).await?;
    Ok(Self { root })
  }

  pub fn root(&self) -> &Path { &self.root }

  /// Resolve a stored reference, refusing anything that could escape the
  /// asset directory.
  fn path_of(&self, file_ref: &str) -> Result<PathBuf, Error> {
    let valid = !file_ref.is_empty()
      && file_ref
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.')
      && !file_ref.starts_with('.');
    if !valid {
      return Err(Error::InvalidRef(file_ref.to_string()));
    }
    Ok(self.root.join(file_ref))
  }
}

fn extension(content_type: Option<&str>) -> &'static str {
  match content_type {
    Some("image/jpeg") => "jpg",
    Some("image/png") => "png",
    Some("image/gif") => "gif",
    Some("image/webp") => "webp",
    _ => "bin",
  }
}

impl AssetStore for FsAssetStore {
  type Error = Error;

  async fn put(&self, asset: NewAsset) -> Result<String, Error> {
    let file_ref = format!(
      "{}.{}",
      Uuid::new_v4().simple(),
      extension(asset.content_type.as_deref())
    );
    let path = self.path_of(&file_ref)?;

    tokio::fs::write(&path, &asset.data).await?;
    tracing::debug!(%file_ref, bytes = asset.data.len(), "asset stored");
    Ok(file_ref)
  }

  async fn remove(&self, file_ref: &str) -> Result<(), Error> {
    let path = self.path_of(file_ref)?;
    tokio::fs::remove_file(&path).await?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  async fn temp_store() -> FsAssetStore {
    let dir = std::env::temp_dir().join(format!("photoshare-assets-{}", Uuid::new_v4()));
    FsAssetStore::open(&dir).await.unwrap()
  }

  fn jpeg(data: &[u8]) -> NewAsset {
    NewAsset {
      data:         data.to_vec(),
      content_type: Some("image/jpeg".into()),
    }
  }

  #[tokio::test]
  async fn identical_uploads_get_separate_files() {
    let store = temp_store().await;
    let a = store.put(jpeg(b"same bytes")).await.unwrap();
    let b = store.put(jpeg(b"same bytes")).await.unwrap();

    assert_ne!(a, b);
    assert!(a.ends_with(".jpg"));
    store.remove(&b).await.unwrap();
    assert_eq!(tokio::fs::read(store.root().join(&a)).await.unwrap(), b"same bytes");

    tokio::fs::remove_dir_all(store.root()).await.unwrap();
  }

  #[tokio::test]
  async fn remove_deletes_file() {
    let store = temp_store().await;
    let file_ref = store.put(jpeg(b"bytes")).await.unwrap();
    store.remove(&file_ref).await.unwrap();

    assert!(!store.root().join(&file_ref).exists());
    assert!(matches!(store.remove(&file_ref).await, Err(Error::Io(_))));

    tokio::fs::remove_dir_all(store.root()).await.unwrap();
  }

  #[tokio::test]
  async fn refuses_path_traversal() {
    let store = temp_store().await;
    for bad in ["../etc/passwd", "", ".hidden", "a/b.jpg"] {
      assert!(matches!(store.remove(bad).await, Err(Error::InvalidRef(_))), "{bad}");
    }
    tokio::fs::remove_dir_all(store.root()).await.unwrap();
  }
}
