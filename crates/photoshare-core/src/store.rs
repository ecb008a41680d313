//! The `PhotoStore` trait and supporting types.
//!
//! The trait is implemented by storage backends (e.g.
//! `photoshare-store-sqlite`). The engine depends on this abstraction, not on
//! any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  activity::{Activity, ActivityKind, NewActivity},
  photo::{Comment, LikeState, NewPhoto, Photo},
  user::{Credentials, NewUser, User},
};

// ─── Reconciliation ──────────────────────────────────────────────────────────

/// A primary write whose paired activity is missing from the journal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnpairedWrite {
  /// The activity kind that should exist.
  pub kind:      ActivityKind,
  pub actor_id:  Uuid,
  pub photo_id:  Uuid,
  /// The comment id for `NewComment`, the photo id for `PhotoUpload`.
  pub source_id: Uuid,
  /// Timestamp of the primary write; the repaired activity reuses it.
  pub at:        DateTime<Utc>,
}

impl UnpairedWrite {
  pub fn to_activity(&self) -> NewActivity {
    NewActivity {
      kind:       self.kind,
      actor_id:   self.actor_id,
      photo_id:   Some(self.photo_id),
      created_at: self.at,
    }
  }
}

// ─── Diagnostics ─────────────────────────────────────────────────────────────

/// Row counts per collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreCounts {
  pub users:      usize,
  pub photos:     usize,
  pub comments:   usize,
  pub likes:      usize,
  pub activities: usize,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a photoshare storage backend.
///
/// Comments and activities are append-only. Writes that pair a primary
/// entity with its activity (`create_photo`, `add_comment`) must become
/// visible to readers together. Not-found conditions are reported as `None`
/// rather than errors so that `Self::Error` only ever means a backend failure.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait PhotoStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a new user. Returns `None` if the login name is taken.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// All users in registration order.
  fn list_users(
    &self,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  fn get_credentials<'a>(
    &'a self,
    login_name: &'a str,
  ) -> impl Future<Output = Result<Option<Credentials>, Self::Error>> + Send + 'a;

  // ── Photos ────────────────────────────────────────────────────────────

  /// Persist a photo and its `PhotoUpload` activity as one unit.
  fn create_photo(
    &self,
    input: NewPhoto,
  ) -> impl Future<Output = Result<(Photo, Activity), Self::Error>> + Send + '_;

  fn get_photo(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Photo>, Self::Error>> + Send + '_;

  /// Fetch several photos at once. Missing ids are silently skipped.
  fn get_photos<'a>(
    &'a self,
    ids: &'a [Uuid],
  ) -> impl Future<Output = Result<Vec<Photo>, Self::Error>> + Send + 'a;

  /// All photos of `owner_id` in natural (upload) order.
  fn photos_of_user(
    &self,
    owner_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Photo>, Self::Error>> + Send + '_;

  // ── Social mutations ──────────────────────────────────────────────────

  /// Append a comment and its `NewComment` activity as one unit. Returns
  /// `None` if the photo does not exist.
  fn add_comment(
    &self,
    photo_id: Uuid,
    author_id: Uuid,
    text: String,
  ) -> impl Future<Output = Result<Option<(Comment, Activity)>, Self::Error>>
  + Send
  + '_;

  /// Atomically flip `user_id`'s like on the photo. Returns `None` if the
  /// photo does not exist.
  fn toggle_like(
    &self,
    photo_id: Uuid,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<LikeState>, Self::Error>> + Send + '_;

  // ── Activity journal ──────────────────────────────────────────────────

  fn record_activity(
    &self,
    input: NewActivity,
  ) -> impl Future<Output = Result<Activity, Self::Error>> + Send + '_;

  /// The `limit` most recent activities, newest first; ties on the
  /// timestamp go to the later insertion.
  fn recent_activities(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Activity>, Self::Error>> + Send + '_;

  /// Comments and photos whose paired activity is missing.
  ///
  /// Photos pair with the `PhotoUpload` naming them. Comments pair by
  /// `(photo, author, created_at)` and are counted, so two comments sharing
  /// a key need two activities.
  fn unpaired_writes(
    &self,
  ) -> impl Future<Output = Result<Vec<UnpairedWrite>, Self::Error>> + Send + '_;

  // ── Diagnostics ───────────────────────────────────────────────────────

  fn counts(&self) -> impl Future<Output = Result<StoreCounts, Self::Error>> + Send + '_;
}
