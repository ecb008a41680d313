//! Selection over a user's photos under the visibility predicate.
//!
//! Every function takes the owner's photos in natural (insertion) order.
//! Indices in results always point into that unfiltered list: it is the
//! coordinate system navigation links use, so it must not shift with what a
//! particular viewer can see.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{photo::Photo, visibility::can_view};

/// A photo picked out of an owner's list, with its position in the full
/// natural-order list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedPhoto {
  pub photo:          Photo,
  pub original_index: usize,
}

/// Counts over the photos of one owner that a viewer can see.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
  pub photo_count:   usize,
  pub comment_count: usize,
}

/// The subset of `photos` visible to `viewer`, order preserved.
pub fn visible_photos(viewer: Uuid, photos: Vec<Photo>) -> Vec<Photo> {
  photos.into_iter().filter(|p| can_view(viewer, p)).collect()
}

fn visible_indexed(
  viewer: Uuid,
  photos: &[Photo],
) -> impl Iterator<Item = (usize, &Photo)> {
  photos.iter().enumerate().filter(move |(_, p)| can_view(viewer, p))
}

/// Pick the candidate with the greatest key; on ties the earliest one wins.
fn first_max_by_key<'a, K: Ord>(
  candidates: impl Iterator<Item = (usize, &'a Photo)>,
  key: impl Fn(&Photo) -> K,
) -> Option<RankedPhoto> {
  candidates
    .reduce(|best, next| if key(next.1) > key(best.1) { next } else { best })
    .map(|(original_index, photo)| RankedPhoto {
      photo: photo.clone(),
      original_index,
    })
}

/// The visible photo with the latest upload time. `None` when nothing is
/// visible, including when `photos` is empty; callers that need to tell those
/// apart check `photos.is_empty()` first.
pub fn most_recent(viewer: Uuid, photos: &[Photo]) -> Option<RankedPhoto> {
  first_max_by_key(visible_indexed(viewer, photos), |p| p.uploaded_at)
}

/// The visible photo with the most comments; ties go to the leftmost.
/// Invisible photos never compete, however many comments they have.
pub fn most_commented(viewer: Uuid, photos: &[Photo]) -> Option<RankedPhoto> {
  first_max_by_key(visible_indexed(viewer, photos), Photo::comment_count)
}

pub fn stats(viewer: Uuid, photos: &[Photo]) -> UserStats {
  visible_indexed(viewer, photos).fold(UserStats::default(), |acc, (_, p)| {
    UserStats {
      photo_count:   acc.photo_count + 1,
      comment_count: acc.comment_count + p.comment_count(),
    }
  })
}
