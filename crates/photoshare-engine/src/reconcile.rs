//! Repair of primary writes that lost their paired activity, and row
//! counts for checking the store from outside.
//!
//! The SQLite store writes both halves in one transaction, so this only
//! finds anything after a crash in a backend without that guarantee, or
//! after rows were written behind the engine's back.

use photoshare_core::{
  Error, Result, Viewer,
  activity::Activity,
  assets::AssetStore,
  store::{PhotoStore, StoreCounts},
};

use crate::Engine;

impl<S, A> Engine<S, A>
where
  S: PhotoStore,
  A: AssetStore,
{
  /// Append the missing activity for every unpaired write, keeping the
  /// original timestamp. Returns the activities that were added.
  pub async fn reconcile(&self) -> Result<Vec<Activity>> {
    let unpaired = self.store.unpaired_writes().await.map_err(Error::store)?;
    let mut repaired = Vec::with_capacity(unpaired.len());

    for write in unpaired {
      let inconsistency = Error::StorageInconsistency(format!(
        "{} on photo {} by {} has no {} activity",
        write.source_id, write.photo_id, write.actor_id, write.kind,
      ));
      tracing::warn!(error = %inconsistency, "repairing unpaired write");

      let activity = self
        .store
        .record_activity(write.to_activity())
        .await
        .map_err(Error::store)?;
      self.emit(&activity);
      repaired.push(activity);
    }

    if !repaired.is_empty() {
      tracing::info!(count = repaired.len(), "reconciliation complete");
    }
    Ok(repaired)
  }

  /// Row counts per collection. Any signed-in user may read them.
  pub async fn counts(&self, viewer: &Viewer) -> Result<StoreCounts> {
    viewer.require()?;
    self.store.counts().await.map_err(Error::store)
  }
}
