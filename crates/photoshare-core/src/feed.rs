//! Per-viewer filtering of the activity journal.
//!
//! The journal is global, but what a viewer may see depends on the photo
//! each entry points at. The store can't filter by that without per-viewer
//! indexing, so the feed overfetches a window of recent activities, filters
//! it here, and widens the window when filtering left it short.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{activity::Activity, photo::Photo, user::UserSummary, visibility::can_view};

// ─── Window policy ───────────────────────────────────────────────────────────

/// How many activities to pull for a feed of a given size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedWindow {
  /// The first fetch pulls `limit * overfetch_factor` activities.
  pub overfetch_factor: usize,
  /// Upper bound on a single fetch; the window never doubles past it.
  pub max_window:       usize,
}

impl Default for FeedWindow {
  fn default() -> Self {
    Self {
      overfetch_factor: 4,
      max_window:       200,
    }
  }
}

impl FeedWindow {
  pub fn initial(&self, limit: usize) -> usize {
    limit
      .saturating_mul(self.overfetch_factor.max(1))
      .clamp(limit.min(self.max_window), self.max_window.max(1))
  }

  /// The next, larger window, or `None` once `max_window` has been used.
  pub fn widen(&self, current: usize) -> Option<usize> {
    (current < self.max_window)
      .then(|| current.saturating_mul(2).min(self.max_window))
  }
}

// ─── Entries ─────────────────────────────────────────────────────────────────

/// A feed row: the activity plus what a reader needs to render it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
  pub activity:   Activity,
  /// `None` if the actor no longer resolves.
  pub actor:      Option<UserSummary>,
  /// File reference of the related photo, if the activity has one.
  pub photo_file: Option<String>,
}

/// Keep the activities `viewer` may see, newest first as given, dropping
/// duplicates and entries whose photo is missing from `photos` or hidden.
/// Activities without a photo are always kept. Stops after `limit` entries.
pub fn filter_visible<'a>(
  viewer: Uuid,
  activities: &'a [Activity],
  photos: &'a HashMap<Uuid, Photo>,
  limit: usize,
) -> Vec<(&'a Activity, Option<&'a Photo>)> {
  let mut seen = HashSet::new();
  activities
    .iter()
    .filter(|a| seen.insert(a.activity_id))
    .filter_map(|a| match a.photo_id {
      None => Some((a, None)),
      Some(photo_id) => photos
        .get(&photo_id)
        .filter(|p| can_view(viewer, p))
        .map(|p| (a, Some(p))),
    })
    .take(limit)
    .collect()
}
