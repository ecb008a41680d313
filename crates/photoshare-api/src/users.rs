//! Handlers for `/users` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/users` | Summaries in registration order |
//! | `POST` | `/users` | Body: [`RegisterBody`]; returns 201 + profile |
//! | `GET`  | `/users/:id` | 404 if not found |
//! | `GET`  | `/users/:id/photos` | Photos visible to the caller |
//! | `GET`  | `/users/:id/photos/recent` | Most recent visible photo + index |
//! | `GET`  | `/users/:id/photos/top-commented` | Most commented visible photo + index |
//! | `GET`  | `/users/:id/stats` | Visible photo and comment counts |

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use photoshare_core::{
  Error,
  assets::AssetStore,
  photo::PhotoView,
  query::{RankedPhoto, UserStats},
  store::PhotoStore,
  user::{NewUser, User, UserSummary},
};
use photoshare_engine::Engine;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  CurrentViewer,
  auth::hash_password,
  error::ApiError,
  extract::{Json, Path},
};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /users`
pub async fn list<S, A>(
  State(engine): State<Arc<Engine<S, A>>>,
  CurrentViewer(viewer): CurrentViewer,
) -> Result<Json<Vec<UserSummary>>, ApiError>
where
  S: PhotoStore,
  A: AssetStore,
{
  viewer.require()?;
  Ok(Json(engine.list_users().await?))
}

// ─── Register ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub login_name:  String,
  pub password:    String,
  pub first_name:  String,
  pub last_name:   String,
  pub location:    Option<String>,
  pub description: Option<String>,
  pub occupation:  Option<String>,
}

/// `POST /users`
pub async fn create<S, A>(
  State(engine): State<Arc<Engine<S, A>>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PhotoStore,
  A: AssetStore,
{
  if body.password.is_empty() {
    return Err(Error::InvalidInput("password is required".into()).into());
  }

  let user = engine
    .register(NewUser {
      login_name:    body.login_name,
      password_hash: hash_password(&body.password)?,
      first_name:    body.first_name,
      last_name:     body.last_name,
      location:      body.location,
      description:   body.description,
      occupation:    body.occupation,
    })
    .await?;
  Ok((StatusCode::CREATED, Json(user)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /users/:id`
pub async fn get_one<S, A>(
  State(engine): State<Arc<Engine<S, A>>>,
  CurrentViewer(viewer): CurrentViewer,
  Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError>
where
  S: PhotoStore,
  A: AssetStore,
{
  viewer.require()?;
  Ok(Json(engine.get_user(id).await?))
}

// ─── Photos ───────────────────────────────────────────────────────────────────

/// `GET /users/:id/photos`
pub async fn photos<S, A>(
  State(engine): State<Arc<Engine<S, A>>>,
  CurrentViewer(viewer): CurrentViewer,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<PhotoView>>, ApiError>
where
  S: PhotoStore,
  A: AssetStore,
{
  Ok(Json(engine.list_visible_photos(&viewer, id).await?))
}

/// `GET /users/:id/photos/recent`
pub async fn most_recent<S, A>(
  State(engine): State<Arc<Engine<S, A>>>,
  CurrentViewer(viewer): CurrentViewer,
  Path(id): Path<Uuid>,
) -> Result<Json<RankedPhoto>, ApiError>
where
  S: PhotoStore,
  A: AssetStore,
{
  let ranked = engine
    .most_recent_photo(&viewer, id)
    .await?
    .ok_or(ApiError::NoVisiblePhoto(id))?;
  Ok(Json(ranked))
}

/// `GET /users/:id/photos/top-commented`
pub async fn most_commented<S, A>(
  State(engine): State<Arc<Engine<S, A>>>,
  CurrentViewer(viewer): CurrentViewer,
  Path(id): Path<Uuid>,
) -> Result<Json<RankedPhoto>, ApiError>
where
  S: PhotoStore,
  A: AssetStore,
{
  let ranked = engine
    .most_commented_photo(&viewer, id)
    .await?
    .ok_or(ApiError::NoVisiblePhoto(id))?;
  Ok(Json(ranked))
}

/// `GET /users/:id/stats`
pub async fn stats<S, A>(
  State(engine): State<Arc<Engine<S, A>>>,
  CurrentViewer(viewer): CurrentViewer,
  Path(id): Path<Uuid>,
) -> Result<Json<UserStats>, ApiError>
where
  S: PhotoStore,
  A: AssetStore,
{
  Ok(Json(engine.user_stats(&viewer, id).await?))
}
