//! JSON REST API for photoshare.
//!
//! Exposes an axum [`Router`] backed by an [`Engine`]. Every request passes
//! through [`auth::resolve_viewer`], which turns HTTP Basic credentials into
//! a [`photoshare_core::Viewer`]; handlers read it with [`CurrentViewer`].
//! TLS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", photoshare_api::api_router(engine.clone()))
//! ```

pub mod activities;
pub mod auth;
pub mod error;
pub mod extract;
pub mod photos;
pub mod session;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  extract::DefaultBodyLimit,
  middleware,
  routing::{get, post},
};
use photoshare_core::{assets::AssetStore, store::PhotoStore};
use photoshare_engine::Engine;

pub use auth::CurrentViewer;
pub use error::ApiError;

/// Largest accepted upload body.
pub const UPLOAD_LIMIT: usize = 16 * 1024 * 1024;

/// Build a fully-materialised API router for `engine`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, A>(engine: Arc<Engine<S, A>>) -> Router<()>
where
  S: PhotoStore + 'static,
  A: AssetStore + 'static,
{
  Router::new()
    // Users
    .route("/users", get(users::list::<S, A>).post(users::create::<S, A>))
    .route("/users/{id}", get(users::get_one::<S, A>))
    .route("/users/{id}/photos", get(users::photos::<S, A>))
    .route("/users/{id}/photos/recent", get(users::most_recent::<S, A>))
    .route("/users/{id}/photos/top-commented", get(users::most_commented::<S, A>))
    .route("/users/{id}/stats", get(users::stats::<S, A>))
    // Photos
    .route(
      "/photos",
      post(photos::upload::<S, A>).layer(DefaultBodyLimit::max(UPLOAD_LIMIT)),
    )
    .route("/photos/{id}", get(photos::get_one::<S, A>))
    .route("/photos/{id}/comments", post(photos::comment::<S, A>))
    .route("/photos/{id}/like", post(photos::like::<S, A>))
    // Feed
    .route("/activities", get(activities::feed::<S, A>))
    // Session journal
    .route("/admin/login", post(session::login::<S, A>))
    .route("/admin/logout", post(session::logout::<S, A>))
    .route("/admin/counts", get(session::counts::<S, A>))
    .layer(middleware::from_fn_with_state(
      engine.clone(),
      auth::resolve_viewer::<S, A>,
    ))
    .with_state(engine)
}
