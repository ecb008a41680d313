//! Login and logout journal endpoints, plus store diagnostics.
//!
//! Authentication itself happens on every request; these only record the
//! session boundaries in the activity journal.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode};
use photoshare_core::{
  assets::AssetStore,
  store::{PhotoStore, StoreCounts},
  user::UserSummary,
};
use photoshare_engine::Engine;

use crate::{CurrentViewer, error::ApiError, extract::Json};

/// `POST /admin/login`: records a `user_login` and returns the caller.
pub async fn login<S, A>(
  State(engine): State<Arc<Engine<S, A>>>,
  CurrentViewer(viewer): CurrentViewer,
) -> Result<Json<UserSummary>, ApiError>
where
  S: PhotoStore,
  A: AssetStore,
{
  let activity = engine.record_login(&viewer).await?;
  let user = engine.get_user(activity.actor_id).await?;
  tracing::info!(user_id = %user.user_id, "user logged in");
  Ok(Json(user.summary()))
}

/// `POST /admin/logout`
pub async fn logout<S, A>(
  State(engine): State<Arc<Engine<S, A>>>,
  CurrentViewer(viewer): CurrentViewer,
) -> Result<StatusCode, ApiError>
where
  S: PhotoStore,
  A: AssetStore,
{
  let activity = engine.record_logout(&viewer).await?;
  tracing::info!(user_id = %activity.actor_id, "user logged out");
  Ok(StatusCode::NO_CONTENT)
}

/// `GET /admin/counts`: rows per collection, for consistency checks.
pub async fn counts<S, A>(
  State(engine): State<Arc<Engine<S, A>>>,
  CurrentViewer(viewer): CurrentViewer,
) -> Result<Json<StoreCounts>, ApiError>
where
  S: PhotoStore,
  A: AssetStore,
{
  Ok(Json(engine.counts(&viewer).await?))
}
