//! The activity feed aggregator.
//!
//! Overfetch a window of the journal, filter it for the viewer, and widen
//! the window while the result is short and older entries remain. The
//! window policy lives in [`photoshare_core::feed::FeedWindow`].

use std::collections::{BTreeSet, HashMap};

use photoshare_core::{
  Error, Result, Viewer,
  activity::Activity,
  assets::AssetStore,
  feed::{FeedEntry, filter_visible},
  photo::Photo,
  store::PhotoStore,
};
use uuid::Uuid;

use crate::Engine;

impl<S, A> Engine<S, A>
where
  S: PhotoStore,
  A: AssetStore,
{
  /// The newest activities the viewer may see, newest first.
  ///
  /// `limit` defaults to the configured feed size and is capped at the
  /// maximum window.
  pub async fn recent_feed(&self, viewer: &Viewer, limit: Option<usize>) -> Result<Vec<FeedEntry>> {
    let viewer_id = viewer.require()?;
    let policy = self.feed.window();
    let limit = limit.unwrap_or(self.feed.default_limit).min(policy.max_window);
    if limit == 0 {
      return Ok(Vec::new());
    }

    let mut window = policy.initial(limit);
    loop {
      let activities = self.store.recent_activities(window).await.map_err(Error::store)?;
      let photo_ids: Vec<Uuid> = activities
        .iter()
        .filter_map(|a| a.photo_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
      let photos: HashMap<Uuid, Photo> = self
        .store
        .get_photos(&photo_ids)
        .await
        .map_err(Error::store)?
        .into_iter()
        .map(|p| (p.photo_id, p))
        .collect();

      let visible = filter_visible(viewer_id, &activities, &photos, limit);
      let exhausted = activities.len() < window;
      if visible.len() >= limit || exhausted {
        return self.enrich(visible).await;
      }

      match policy.widen(window) {
        Some(next) => {
          tracing::debug!(window, next, kept = visible.len(), limit, "feed window short, widening");
          window = next;
        }
        None => return self.enrich(visible).await,
      }
    }
  }

  async fn enrich(&self, visible: Vec<(&Activity, Option<&Photo>)>) -> Result<Vec<FeedEntry>> {
    let actors = self
      .summaries(visible.iter().map(|(a, _)| a.actor_id).collect())
      .await?;

    Ok(
      visible
        .into_iter()
        .map(|(activity, photo)| FeedEntry {
          activity:   activity.clone(),
          actor:      actors.get(&activity.actor_id).cloned(),
          photo_file: photo.map(|p| p.file_ref.clone()),
        })
        .collect(),
    )
  }
}
