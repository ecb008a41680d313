//! Viewer resolution from HTTP Basic credentials.
//!
//! No `Authorization` header means an anonymous viewer; the engine decides
//! which operations that is enough for. A header that is present but does
//! not verify is rejected outright with 401.

use std::{convert::Infallible, sync::Arc};

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{
  extract::{FromRequestParts, Request, State},
  http::{HeaderMap, header, request::Parts},
  middleware::Next,
  response::Response,
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use photoshare_core::{Viewer, assets::AssetStore, store::PhotoStore};
use photoshare_engine::Engine;
use rand_core::OsRng;

use crate::error::ApiError;

/// Hash a password into the argon2 PHC string kept in the user store.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| ApiError::Hashing(e.to_string()))
}

/// Split a `Basic` header into login name and password.
///
/// `Ok(None)` when there is no header at all.
fn basic_credentials(headers: &HeaderMap) -> Result<Option<(String, String)>, ApiError> {
  let Some(value) = headers.get(header::AUTHORIZATION) else {
    return Ok(None);
  };

  let encoded = value
    .to_str()
    .ok()
    .and_then(|v| v.strip_prefix("Basic "))
    .ok_or(ApiError::BadCredentials)?;
  let decoded = B64.decode(encoded).map_err(|_| ApiError::BadCredentials)?;
  let creds = String::from_utf8(decoded).map_err(|_| ApiError::BadCredentials)?;

  let (login, password) = creds.split_once(':').ok_or(ApiError::BadCredentials)?;
  Ok(Some((login.to_string(), password.to_string())))
}

/// Verify the request's credentials against the user store.
pub async fn verify_viewer<S, A>(headers: &HeaderMap, engine: &Engine<S, A>) -> Result<Viewer, ApiError>
where
  S: PhotoStore,
  A: AssetStore,
{
  let Some((login, password)) = basic_credentials(headers)? else {
    return Ok(Viewer::Anonymous);
  };

  let creds = engine
    .credentials(&login)
    .await?
    .ok_or(ApiError::BadCredentials)?;
  let parsed = PasswordHash::new(&creds.password_hash).map_err(|_| ApiError::BadCredentials)?;
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .map_err(|_| {
      tracing::debug!(%login, "password rejected");
      ApiError::BadCredentials
    })?;

  Ok(Viewer::User(creds.user.user_id))
}

/// Middleware that resolves the viewer once and stores it in the request
/// extensions for [`CurrentViewer`].
pub async fn resolve_viewer<S, A>(
  State(engine): State<Arc<Engine<S, A>>>,
  mut req: Request,
  next: Next,
) -> Result<Response, ApiError>
where
  S: PhotoStore + 'static,
  A: AssetStore + 'static,
{
  let viewer = verify_viewer(req.headers(), &engine).await?;
  req.extensions_mut().insert(viewer);
  Ok(next.run(req).await)
}

/// The viewer resolved for this request. Anonymous if the middleware did
/// not run.
#[derive(Debug, Clone, Copy)]
pub struct CurrentViewer(pub Viewer);

impl<St> FromRequestParts<St> for CurrentViewer
where
  St: Send + Sync,
{
  type Rejection = Infallible;

  async fn from_request_parts(parts: &mut Parts, _: &St) -> Result<Self, Self::Rejection> {
    Ok(CurrentViewer(
      parts.extensions.get::<Viewer>().copied().unwrap_or_default(),
    ))
  }
}

#[cfg(test)]
mod tests {
  use axum::http::HeaderValue;

  use super::*;

  fn headers(value: &str) -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    h
  }

  #[test]
  fn missing_header_is_anonymous() {
    assert!(basic_credentials(&HeaderMap::new()).unwrap().is_none());
  }

  #[test]
  fn splits_on_first_colon() {
    let value = format!("Basic {}", B64.encode("alice:pa:ss"));
    let (login, password) = basic_credentials(&headers(&value)).unwrap().unwrap();
    assert_eq!((login.as_str(), password.as_str()), ("alice", "pa:ss"));
  }

  #[test]
  fn malformed_header_is_rejected() {
    for value in ["Bearer abc", "Basic !!!not-base64!!!"] {
      assert!(matches!(
        basic_credentials(&headers(value)),
        Err(ApiError::BadCredentials)
      ));
    }
    let no_colon = format!("Basic {}", B64.encode("alice"));
    assert!(matches!(
      basic_credentials(&headers(&no_colon)),
      Err(ApiError::BadCredentials)
    ));
  }

  #[test]
  fn hash_verifies() {
    let hash = hash_password("secret").unwrap();
    let parsed = PasswordHash::new(&hash).unwrap();
    assert!(Argon2::default().verify_password(b"secret", &parsed).is_ok());
    assert!(Argon2::default().verify_password(b"wrong", &parsed).is_err());
  }
}
