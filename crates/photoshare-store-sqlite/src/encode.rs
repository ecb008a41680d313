//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with a fixed six fractional
//! digits and a `Z` suffix, so lexical order in SQL equals time order. UUIDs
//! are stored as hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use photoshare_core::{
  activity::{Activity, ActivityKind},
  photo::{Comment, Photo},
  store::UnpairedWrite,
  user::{Credentials, User},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

/// Drop precision the column can't hold, so values handed back to callers
/// compare equal to what a later read returns.
pub fn truncate_dt(dt: DateTime<Utc>) -> DateTime<Utc> { dt.trunc_subsecs(6) }

/// The current time at storage precision.
pub fn now() -> DateTime<Utc> { truncate_dt(Utc::now()) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── ActivityKind ────────────────────────────────────────────────────────────

pub fn encode_kind(kind: ActivityKind) -> &'static str { kind.into() }

pub fn decode_kind(s: &str) -> Result<ActivityKind> {
  s.parse()
    .map_err(|_| Error::Decode(format!("unknown activity kind: {s:?}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:       String,
  pub login_name:    String,
  pub first_name:    String,
  pub last_name:     String,
  pub location:      Option<String>,
  pub description:   Option<String>,
  pub occupation:    Option<String>,
  pub created_at:    String,
  pub password_hash: String,
}

impl RawUser {
  pub fn into_credentials(self) -> Result<Credentials> {
    let user = User {
      user_id:     decode_uuid(&self.user_id)?,
      login_name:  self.login_name,
      first_name:  self.first_name,
      last_name:   self.last_name,
      location:    self.location,
      description: self.description,
      occupation:  self.occupation,
      created_at:  decode_dt(&self.created_at)?,
    };
    Ok(Credentials { user, password_hash: self.password_hash })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(self.into_credentials()?.user)
  }
}

/// Raw strings read directly from a `comments` row.
pub struct RawComment {
  pub comment_id: String,
  pub photo_id:   String,
  pub author_id:  String,
  pub text:       String,
  pub created_at: String,
}

impl RawComment {
  pub fn into_comment(self) -> Result<Comment> {
    Ok(Comment {
      comment_id: decode_uuid(&self.comment_id)?,
      photo_id:   decode_uuid(&self.photo_id)?,
      author_id:  decode_uuid(&self.author_id)?,
      text:       self.text,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// A `photos` row plus the rows of its child tables.
pub struct RawPhoto {
  pub photo_id:    String,
  pub owner_id:    String,
  pub file_ref:    String,
  pub uploaded_at: String,
  pub restricted:  bool,
  /// `photo_shares.user_id`, by position.
  pub shared_with: Vec<String>,
  pub likes:       Vec<String>,
  /// By insertion order.
  pub comments:    Vec<RawComment>,
}

impl RawPhoto {
  pub fn into_photo(self) -> Result<Photo> {
    let sharing_list = if self.restricted {
      Some(
        self
          .shared_with
          .iter()
          .map(|s| decode_uuid(s))
          .collect::<Result<Vec<_>>>()?,
      )
    } else {
      None
    };

    Ok(Photo {
      photo_id: decode_uuid(&self.photo_id)?,
      owner_id: decode_uuid(&self.owner_id)?,
      file_ref: self.file_ref,
      uploaded_at: decode_dt(&self.uploaded_at)?,
      comments: self
        .comments
        .into_iter()
        .map(RawComment::into_comment)
        .collect::<Result<_>>()?,
      likes: self
        .likes
        .iter()
        .map(|s| decode_uuid(s))
        .collect::<Result<_>>()?,
      sharing_list,
    })
  }
}

/// Raw strings read directly from an `activities` row.
pub struct RawActivity {
  pub activity_id: String,
  pub kind:        String,
  pub actor_id:    String,
  pub photo_id:    Option<String>,
  pub created_at:  String,
}

impl RawActivity {
  pub fn into_activity(self) -> Result<Activity> {
    Ok(Activity {
      activity_id: decode_uuid(&self.activity_id)?,
      kind:        decode_kind(&self.kind)?,
      actor_id:    decode_uuid(&self.actor_id)?,
      photo_id:    self.photo_id.as_deref().map(decode_uuid).transpose()?,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// A primary row found without its paired activity.
pub struct RawUnpaired {
  pub kind:      ActivityKind,
  pub source_id: String,
  pub photo_id:  String,
  pub actor_id:  String,
  pub at:        String,
}

impl RawUnpaired {
  pub fn into_unpaired(self) -> Result<UnpairedWrite> {
    Ok(UnpairedWrite {
      kind:      self.kind,
      actor_id:  decode_uuid(&self.actor_id)?,
      photo_id:  decode_uuid(&self.photo_id)?,
      source_id: decode_uuid(&self.source_id)?,
      at:        decode_dt(&self.at)?,
    })
  }
}
