//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::{
    multipart::MultipartRejection,
    rejection::{JsonRejection, PathRejection, QueryRejection},
  },
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use photoshare_core::Error;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Core(#[from] Error),

  /// Credentials were supplied but did not check out.
  #[error("invalid credentials")]
  BadCredentials,

  #[error("bad request: {0}")]
  BadRequest(String),

  /// The owner has photos, but none the viewer may see.
  #[error("no visible photo for user {0}")]
  NoVisiblePhoto(Uuid),

  #[error("password hashing failed: {0}")]
  Hashing(String),
}

// Extractor rejections keep axum's message but take our status and body.
macro_rules! bad_request_from {
  ($($rejection:ty),*) => {
    $(
      impl From<$rejection> for ApiError {
        fn from(rejection: $rejection) -> Self { ApiError::BadRequest(rejection.body_text()) }
      }
    )*
  };
}

bad_request_from!(JsonRejection, PathRejection, QueryRejection, MultipartRejection);

impl ApiError {
  fn status(&self) -> StatusCode {
    match self {
      ApiError::BadCredentials => StatusCode::UNAUTHORIZED,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::NoVisiblePhoto(_) => StatusCode::NOT_FOUND,
      ApiError::Hashing(_) => StatusCode::INTERNAL_SERVER_ERROR,
      ApiError::Core(e) => match e {
        Error::Unauthorized => StatusCode::UNAUTHORIZED,
        Error::UserNotFound(_) | Error::PhotoNotFound(_) | Error::NoPhotos(_) => {
          StatusCode::NOT_FOUND
        }
        Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
        Error::Conflict(_) => StatusCode::CONFLICT,
        Error::StorageInconsistency(_) | Error::Store(_) | Error::Asset(_) => {
          StatusCode::INTERNAL_SERVER_ERROR
        }
      },
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let message = if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
      "internal server error".to_string()
    } else {
      self.to_string()
    };

    let mut res = (status, Json(json!({ "error": message }))).into_response();
    if status == StatusCode::UNAUTHORIZED {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"photoshare\""),
      );
    }
    res
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn taxonomy_maps_to_status() {
    let id = Uuid::new_v4();
    let cases = [
      (ApiError::from(Error::Unauthorized), StatusCode::UNAUTHORIZED),
      (Error::PhotoNotFound(id).into(), StatusCode::NOT_FOUND),
      (Error::NoPhotos(id).into(), StatusCode::NOT_FOUND),
      (ApiError::NoVisiblePhoto(id), StatusCode::NOT_FOUND),
      (Error::InvalidInput("x".into()).into(), StatusCode::BAD_REQUEST),
      (Error::Conflict("bob".into()).into(), StatusCode::CONFLICT),
      (
        Error::StorageInconsistency("x".into()).into(),
        StatusCode::INTERNAL_SERVER_ERROR,
      ),
    ];
    for (err, status) in cases {
      assert_eq!(err.status(), status, "{err}");
    }
  }

  #[test]
  fn no_photos_and_none_visible_read_differently() {
    let id = Uuid::new_v4();
    let no_photos = ApiError::from(Error::NoPhotos(id)).to_string();
    let none_visible = ApiError::NoVisiblePhoto(id).to_string();
    assert_ne!(no_photos, none_visible);
  }

  #[test]
  fn unauthorized_carries_challenge() {
    let res = ApiError::BadCredentials.into_response();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().contains_key(header::WWW_AUTHENTICATE));
  }
}
