//! Handlers for `/photos` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/photos` | Multipart: `photo` file, optional `sharing_list` JSON array of user ids |
//! | `GET`  | `/photos/:id` | 404 if missing or hidden from the caller |
//! | `POST` | `/photos/:id/comments` | Body: `{"comment":"..."}`; returns 201 + comment |
//! | `POST` | `/photos/:id/like` | Toggles; returns `{"likes":n,"liked":b}` |

use std::sync::Arc;

use axum::{
  extract::{Multipart, State, multipart::MultipartRejection},
  http::StatusCode,
  response::IntoResponse,
};
use photoshare_core::{
  assets::{AssetStore, NewAsset},
  photo::{LikeState, PhotoView},
  store::PhotoStore,
};
use photoshare_engine::Engine;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  CurrentViewer,
  error::ApiError,
  extract::{Json, Path},
};

// ─── Upload ───────────────────────────────────────────────────────────────────

/// Parse the `sharing_list` form field. Blank or `null` means public.
fn parse_sharing_list(text: &str) -> Result<Option<Vec<Uuid>>, ApiError> {
  if text.trim().is_empty() {
    return Ok(None);
  }
  serde_json::from_str(text)
    .map_err(|e| ApiError::BadRequest(format!("sharing_list must be a JSON array of user ids: {e}")))
}

/// `POST /photos`
pub async fn upload<S, A>(
  State(engine): State<Arc<Engine<S, A>>>,
  CurrentViewer(viewer): CurrentViewer,
  multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PhotoStore,
  A: AssetStore,
{
  viewer.require()?;
  let mut multipart = multipart?;

  let mut asset = NewAsset {
    data:         Vec::new(),
    content_type: None,
  };
  let mut sharing_list = None;

  while let Some(field) = multipart
    .next_field()
    .await
    .map_err(|e| ApiError::BadRequest(e.body_text()))?
  {
    let name = field.name().map(str::to_owned);
    match name.as_deref() {
      Some("photo") => {
        asset.content_type = field.content_type().map(str::to_owned);
        asset.data = field
          .bytes()
          .await
          .map_err(|e| ApiError::BadRequest(e.body_text()))?
          .to_vec();
      }
      Some("sharing_list") => {
        let text = field
          .text()
          .await
          .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        sharing_list = parse_sharing_list(&text)?;
      }
      other => tracing::debug!(field = ?other, "ignoring unknown upload field"),
    }
  }

  let photo = engine.upload_photo(&viewer, asset, sharing_list).await?;
  Ok((StatusCode::CREATED, Json(photo)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /photos/:id`
pub async fn get_one<S, A>(
  State(engine): State<Arc<Engine<S, A>>>,
  CurrentViewer(viewer): CurrentViewer,
  Path(id): Path<Uuid>,
) -> Result<Json<PhotoView>, ApiError>
where
  S: PhotoStore,
  A: AssetStore,
{
  Ok(Json(engine.get_photo(&viewer, id).await?))
}

// ─── Comment ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CommentBody {
  pub comment: String,
}

/// `POST /photos/:id/comments`, body: `{"comment":"..."}`
pub async fn comment<S, A>(
  State(engine): State<Arc<Engine<S, A>>>,
  CurrentViewer(viewer): CurrentViewer,
  Path(id): Path<Uuid>,
  Json(body): Json<CommentBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PhotoStore,
  A: AssetStore,
{
  let comment = engine.add_comment(&viewer, id, &body.comment).await?;
  Ok((StatusCode::CREATED, Json(comment)))
}

// ─── Like ─────────────────────────────────────────────────────────────────────

/// `POST /photos/:id/like`
pub async fn like<S, A>(
  State(engine): State<Arc<Engine<S, A>>>,
  CurrentViewer(viewer): CurrentViewer,
  Path(id): Path<Uuid>,
) -> Result<Json<LikeState>, ApiError>
where
  S: PhotoStore,
  A: AssetStore,
{
  Ok(Json(engine.toggle_like(&viewer, id).await?))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sharing_list_field() {
    let id = Uuid::new_v4();
    assert_eq!(parse_sharing_list("").unwrap(), None);
    assert_eq!(parse_sharing_list("null").unwrap(), None);
    assert_eq!(parse_sharing_list("[]").unwrap(), Some(vec![]));
    assert_eq!(
      parse_sharing_list(&format!("[\"{id}\"]")).unwrap(),
      Some(vec![id])
    );
    assert!(matches!(
      parse_sharing_list("[\"not-a-uuid\"]"),
      Err(ApiError::BadRequest(_))
    ));
  }
}
