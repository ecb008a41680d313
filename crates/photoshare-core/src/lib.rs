//! Core types and trait definitions for photoshare.
//!
//! This crate has no HTTP or database dependencies. It holds
//! the entity shapes, the visibility predicate, and the pure selection and
//! feed-filtering algorithms; every other crate builds on it.

// Native `async fn` in traits; the trait methods spell out their `Send` bounds.
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod activity;
pub mod assets;
pub mod error;
pub mod feed;
pub mod notify;
pub mod photo;
pub mod query;
pub mod store;
pub mod user;
pub mod viewer;
pub mod visibility;

pub use error::{Error, Result};
pub use viewer::Viewer;
