//! Activities, the append-only journal that drives the social feed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use uuid::Uuid;

/// What happened. The snake_case form is also the stored discriminant.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActivityKind {
  PhotoUpload,
  NewComment,
  UserLogin,
  UserLogout,
}

impl ActivityKind {
  /// Whether activities of this kind carry a related photo.
  pub fn has_photo(self) -> bool {
    matches!(self, Self::PhotoUpload | Self::NewComment)
  }
}

/// An immutable journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
  pub activity_id: Uuid,
  pub kind:        ActivityKind,
  pub actor_id:    Uuid,
  /// Present for uploads and comments, absent for login/logout.
  pub photo_id:    Option<Uuid>,
  pub created_at:  DateTime<Utc>,
}

/// Input to [`crate::store::PhotoStore::record_activity`]. Only login and
/// logout are recorded standalone; upload and comment activities are written
/// by the store together with their primary entity.
#[derive(Debug, Clone)]
pub struct NewActivity {
  pub kind:       ActivityKind,
  pub actor_id:   Uuid,
  pub photo_id:   Option<Uuid>,
  pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use super::*;

  #[test]
  fn kind_discriminant_matches_serde() {
    let kind = ActivityKind::NewComment;
    let tag: &'static str = kind.into();
    assert_eq!(tag, "new_comment");
    assert_eq!(serde_json::to_value(kind).unwrap(), "new_comment");
    assert_eq!(ActivityKind::from_str("user_logout").unwrap(), ActivityKind::UserLogout);
  }

  #[test]
  fn only_uploads_and_comments_have_photos() {
    assert!(ActivityKind::PhotoUpload.has_photo());
    assert!(ActivityKind::NewComment.has_photo());
    assert!(!ActivityKind::UserLogin.has_photo());
    assert!(!ActivityKind::UserLogout.has_photo());
  }
}
