//! Error types for `photoshare-core`.
//!
//! The first group of variants is the caller-facing taxonomy; the wrappers at
//! the bottom carry failures from the storage and asset collaborators.

use thiserror::Error;
use uuid::Uuid;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  /// The operation needs an authenticated viewer and none was supplied.
  #[error("unauthorized")]
  Unauthorized,

  #[error("user not found: {0}")]
  UserNotFound(Uuid),

  /// Also returned for photos that exist but are hidden from the viewer.
  #[error("photo not found: {0}")]
  PhotoNotFound(Uuid),

  /// The owner has no photos at all. Distinct from "none visible", which is
  /// an empty `Ok` result.
  #[error("no photos found for user {0}")]
  NoPhotos(Uuid),

  #[error("invalid input: {0}")]
  InvalidInput(String),

  #[error("login name already taken: {0:?}")]
  Conflict(String),

  #[error("storage inconsistency: {0}")]
  StorageInconsistency(String),

  #[error("store error: {0}")]
  Store(#[source] BoxError),

  #[error("asset store error: {0}")]
  Asset(#[source] BoxError),
}

impl Error {
  /// Wrap a backend error from a [`crate::store::PhotoStore`].
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }

  /// Wrap a backend error from an [`crate::assets::AssetStore`].
  pub fn asset(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Asset(Box::new(e))
  }

  pub fn is_not_found(&self) -> bool {
    matches!(
      self,
      Self::UserNotFound(_) | Self::PhotoNotFound(_) | Self::NoPhotos(_)
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
