//! The binary asset store collaborator.
//!
//! Photo bytes never enter the entity store; they are handed to an
//! [`AssetStore`], which returns the reference kept on the photo.

use std::future::Future;

/// An uploaded file as received from the transport layer.
#[derive(Debug, Clone)]
pub struct NewAsset {
  pub data:         Vec<u8>,
  /// MIME type reported by the client, if any.
  pub content_type: Option<String>,
}

pub trait AssetStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist `asset` and return a stable reference to it.
  fn put(
    &self,
    asset: NewAsset,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + '_;

  /// Remove a previously stored asset. Used to roll back an upload whose
  /// metadata could not be written.
  fn remove<'a>(
    &'a self,
    file_ref: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
