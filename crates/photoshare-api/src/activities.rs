//! Handler for the `/activities` feed.

use std::sync::Arc;

use axum::extract::State;
use photoshare_core::{assets::AssetStore, feed::FeedEntry, store::PhotoStore};
use photoshare_engine::Engine;
use serde::Deserialize;

use crate::{
  CurrentViewer,
  error::ApiError,
  extract::{Json, Query},
};

#[derive(Debug, Deserialize)]
pub struct FeedParams {
  /// Defaults to the configured feed size.
  pub limit: Option<usize>,
}

/// `GET /activities[?limit=<n>]`
pub async fn feed<S, A>(
  State(engine): State<Arc<Engine<S, A>>>,
  CurrentViewer(viewer): CurrentViewer,
  Query(params): Query<FeedParams>,
) -> Result<Json<Vec<FeedEntry>>, ApiError>
where
  S: PhotoStore,
  A: AssetStore,
{
  Ok(Json(engine.recent_feed(&viewer, params.limit).await?))
}
