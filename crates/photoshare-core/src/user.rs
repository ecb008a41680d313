//! Users: the people who upload, comment and appear in the feed.
//!
//! A user is referenced (never owned) by photos, comments, likes and
//! activities. Users are never deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user's public profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub user_id:     Uuid,
  /// Unique login handle.
  pub login_name:  String,
  pub first_name:  String,
  pub last_name:   String,
  pub location:    Option<String>,
  pub description: Option<String>,
  pub occupation:  Option<String>,
  pub created_at:  DateTime<Utc>,
}

impl User {
  pub fn summary(&self) -> UserSummary {
    UserSummary {
      user_id:    self.user_id,
      first_name: self.first_name.clone(),
      last_name:  self.last_name.clone(),
    }
  }

  pub fn display_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
  }
}

/// The slice of a user shown in lists and next to feed entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
  pub user_id:    Uuid,
  pub first_name: String,
  pub last_name:  String,
}

/// Input to [`crate::store::PhotoStore::create_user`].
///
/// `password_hash` is an opaque PHC string produced by the auth layer; the
/// store never sees a plaintext password.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub login_name:    String,
  pub password_hash: String,
  pub first_name:    String,
  pub last_name:     String,
  pub location:      Option<String>,
  pub description:   Option<String>,
  pub occupation:    Option<String>,
}

/// A user together with their stored password hash, for the auth layer only.
#[derive(Debug, Clone)]
pub struct Credentials {
  pub user:          User,
  pub password_hash: String,
}
