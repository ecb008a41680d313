//! The visibility-scoped query, mutation and feed engine.
//!
//! [`Engine`] ties a [`PhotoStore`], an [`AssetStore`] and an
//! [`ActivitySink`] together. It is stateless per request: every operation
//! takes the viewer explicitly and goes straight to the store.

pub mod feed;
pub mod photos;
pub mod reconcile;
pub mod sink;
pub mod social;
pub mod users;

use std::sync::Arc;

use photoshare_core::{
  activity::Activity,
  assets::AssetStore,
  feed::FeedWindow,
  notify::{ActivitySink, NullSink},
  store::PhotoStore,
};
use serde::Deserialize;

pub use sink::BroadcastSink;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Feed sizing, deserialised from the `[feed]` table of the server config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
  /// Entries returned when the caller gives no limit.
  pub default_limit:    usize,
  pub overfetch_factor: usize,
  pub max_window:       usize,
}

impl Default for FeedConfig {
  fn default() -> Self {
    let window = FeedWindow::default();
    Self {
      default_limit:    5,
      overfetch_factor: window.overfetch_factor,
      max_window:       window.max_window,
    }
  }
}

impl FeedConfig {
  pub fn window(&self) -> FeedWindow {
    FeedWindow {
      overfetch_factor: self.overfetch_factor,
      max_window:       self.max_window,
    }
  }
}

// ─── Engine ──────────────────────────────────────────────────────────────────

pub struct Engine<S, A> {
  store:  S,
  assets: A,
  sink:   Arc<dyn ActivitySink>,
  feed:   FeedConfig,
}

impl<S, A> Engine<S, A>
where
  S: PhotoStore,
  A: AssetStore,
{
  /// An engine that discards notifications and uses the default feed sizing.
  pub fn new(store: S, assets: A) -> Self {
    Self {
      store,
      assets,
      sink: Arc::new(NullSink),
      feed: FeedConfig::default(),
    }
  }

  pub fn with_sink(mut self, sink: Arc<dyn ActivitySink>) -> Self {
    self.sink = sink;
    self
  }

  pub fn with_feed_config(mut self, feed: FeedConfig) -> Self {
    self.feed = feed;
    self
  }

  pub fn store(&self) -> &S { &self.store }

  pub fn feed_config(&self) -> &FeedConfig { &self.feed }

  /// Hand a durably recorded activity to the sink.
  fn emit(&self, activity: &Activity) {
    tracing::debug!(
      activity_id = %activity.activity_id,
      kind = %activity.kind,
      actor = %activity.actor_id,
      "activity recorded"
    );
    self.sink.emit(activity);
  }
}
