//! Photos and the comments and likes they own.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::UserSummary;

// ─── Comment ─────────────────────────────────────────────────────────────────

/// A comment on a photo. Append-only; never edited or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
  pub comment_id: Uuid,
  pub photo_id:   Uuid,
  pub author_id:  Uuid,
  pub text:       String,
  pub created_at: DateTime<Utc>,
}

// ─── Photo ───────────────────────────────────────────────────────────────────

/// An uploaded photo with its comments, likes and sharing list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
  pub photo_id:     Uuid,
  pub owner_id:     Uuid,
  /// Reference returned by the asset store; no binary data lives here.
  pub file_ref:     String,
  pub uploaded_at:  DateTime<Utc>,
  /// Display order is insertion order.
  pub comments:     Vec<Comment>,
  /// Users who currently like the photo.
  pub likes:        BTreeSet<Uuid>,
  /// `None` means public. Users listed here may see the photo in addition
  /// to the owner.
  pub sharing_list: Option<Vec<Uuid>>,
}

impl Photo {
  pub fn comment_count(&self) -> usize { self.comments.len() }

  pub fn like_state(&self, user_id: Uuid) -> LikeState {
    LikeState {
      likes: self.likes.len(),
      liked: self.likes.contains(&user_id),
    }
  }
}

// ─── Views ───────────────────────────────────────────────────────────────────

/// A comment with its author resolved for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentView {
  #[serde(flatten)]
  pub comment: Comment,
  /// `None` if the author no longer resolves.
  pub author:  Option<UserSummary>,
}

/// A photo as handed to a viewer: a [`Photo`] whose comments carry their
/// author's summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoView {
  pub photo_id:     Uuid,
  pub owner_id:     Uuid,
  pub file_ref:     String,
  pub uploaded_at:  DateTime<Utc>,
  pub comments:     Vec<CommentView>,
  pub likes:        BTreeSet<Uuid>,
  pub sharing_list: Option<Vec<Uuid>>,
}

impl PhotoView {
  /// Attach authors from `authors`; ids missing from the map get `None`.
  pub fn new(photo: Photo, authors: &HashMap<Uuid, UserSummary>) -> Self {
    let comments = photo
      .comments
      .into_iter()
      .map(|comment| CommentView {
        author: authors.get(&comment.author_id).cloned(),
        comment,
      })
      .collect();
    Self {
      photo_id: photo.photo_id,
      owner_id: photo.owner_id,
      file_ref: photo.file_ref,
      uploaded_at: photo.uploaded_at,
      comments,
      likes: photo.likes,
      sharing_list: photo.sharing_list,
    }
  }

  pub fn comment_count(&self) -> usize { self.comments.len() }
}

/// Every distinct comment author across `photos`.
pub fn comment_authors<'a>(photos: impl IntoIterator<Item = &'a Photo>) -> BTreeSet<Uuid> {
  photos
    .into_iter()
    .flat_map(|p| p.comments.iter().map(|c| c.author_id))
    .collect()
}

/// Input to [`crate::store::PhotoStore::create_photo`].
#[derive(Debug, Clone)]
pub struct NewPhoto {
  pub owner_id:     Uuid,
  pub file_ref:     String,
  pub uploaded_at:  DateTime<Utc>,
  /// Must already be normalized with [`normalize_sharing_list`].
  pub sharing_list: Option<Vec<Uuid>>,
}

/// The outcome of a like toggle, from the toggling user's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeState {
  /// Like count after the toggle.
  pub likes: usize,
  /// Whether the toggling user now likes the photo.
  pub liked: bool,
}

/// Collapse duplicates and map an empty list to `None`, keeping first-seen
/// order. An empty list and no list are both public, so only one of them is
/// ever stored.
pub fn normalize_sharing_list(list: Option<Vec<Uuid>>) -> Option<Vec<Uuid>> {
  let mut seen = BTreeSet::new();
  let list: Vec<Uuid> = list?.into_iter().filter(|id| seen.insert(*id)).collect();
  (!list.is_empty()).then_some(list)
}
