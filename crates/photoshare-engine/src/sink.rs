//! [`BroadcastSink`] fans recorded activities out to in-process
//! subscribers over a tokio broadcast channel.

use photoshare_core::{activity::Activity, notify::ActivitySink};
use tokio::sync::broadcast;

#[derive(Debug, Clone)]
pub struct BroadcastSink {
  tx: broadcast::Sender<Activity>,
}

impl BroadcastSink {
  /// `capacity` bounds how far a slow subscriber may lag before it starts
  /// missing activities.
  pub fn new(capacity: usize) -> Self {
    let (tx, _) = broadcast::channel(capacity.max(1));
    Self { tx }
  }

  pub fn subscribe(&self) -> broadcast::Receiver<Activity> { self.tx.subscribe() }
}

impl ActivitySink for BroadcastSink {
  fn emit(&self, activity: &Activity) {
    // Only fails when nobody is subscribed.
    if self.tx.send(activity.clone()).is_err() {
      tracing::trace!(activity_id = %activity.activity_id, "no activity subscribers");
    }
  }
}
