//! The outbound change-notification interface.
//!
//! After an activity is durably recorded the engine hands it to an
//! [`ActivitySink`]. Delivery to connected viewers is the sink's business.

use crate::activity::Activity;

pub trait ActivitySink: Send + Sync {
  /// Called once per recorded activity. Must not block.
  fn emit(&self, activity: &Activity);
}

/// Discards every activity.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ActivitySink for NullSink {
  fn emit(&self, _: &Activity) {}
}
