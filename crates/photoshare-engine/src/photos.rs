//! The photo query engine: listing, "most recent" and "most commented".
//!
//! The selections return the photo's index in the owner's unfiltered,
//! natural-order list, never in the viewer's filtered one; see
//! [`photoshare_core::query`].

use photoshare_core::{
  Error, Result, Viewer,
  assets::AssetStore,
  photo::{Photo, PhotoView, comment_authors},
  query::{self, RankedPhoto, UserStats},
  store::PhotoStore,
  visibility::can_view,
};
use uuid::Uuid;

use crate::Engine;

impl<S, A> Engine<S, A>
where
  S: PhotoStore,
  A: AssetStore,
{
  /// All of the owner's photos in natural order, or `UserNotFound`.
  async fn owner_photos(&self, owner_id: Uuid) -> Result<Vec<Photo>> {
    if self.store.get_user(owner_id).await.map_err(Error::store)?.is_none() {
      return Err(Error::UserNotFound(owner_id));
    }
    self.store.photos_of_user(owner_id).await.map_err(Error::store)
  }

  /// A single photo, reported as missing when `viewer_id` can't see it.
  pub(crate) async fn visible_photo(&self, viewer_id: Uuid, photo_id: Uuid) -> Result<Photo> {
    self
      .store
      .get_photo(photo_id)
      .await
      .map_err(Error::store)?
      .filter(|p| can_view(viewer_id, p))
      .ok_or(Error::PhotoNotFound(photo_id))
  }

  /// Resolve comment authors across `photos` in one pass.
  async fn with_authors(&self, photos: Vec<Photo>) -> Result<Vec<PhotoView>> {
    let authors = self.summaries(comment_authors(&photos)).await?;
    Ok(photos.into_iter().map(|p| PhotoView::new(p, &authors)).collect())
  }

  /// One photo by id, if the viewer may see it, with comment authors.
  pub async fn get_photo(&self, viewer: &Viewer, photo_id: Uuid) -> Result<PhotoView> {
    let viewer_id = viewer.require()?;
    let photo = self.visible_photo(viewer_id, photo_id).await?;
    let authors = self.summaries(comment_authors([&photo])).await?;
    Ok(PhotoView::new(photo, &authors))
  }

  /// The owner's photos the viewer can see, in natural order, with comment
  /// authors. An owner with no (visible) photos gives an empty list, not an
  /// error.
  pub async fn list_visible_photos(
    &self,
    viewer: &Viewer,
    owner_id: Uuid,
  ) -> Result<Vec<PhotoView>> {
    let viewer_id = viewer.require()?;
    let photos = self.owner_photos(owner_id).await?;
    let total = photos.len();
    let visible = query::visible_photos(viewer_id, photos);
    tracing::debug!(%owner_id, %viewer_id, total, visible = visible.len(), "listed photos");
    self.with_authors(visible).await
  }

  /// The most recently uploaded photo the viewer can see.
  ///
  /// `Err(NoPhotos)` when the owner has never uploaded anything;
  /// `Ok(None)` when they have, but nothing is visible to this viewer.
  pub async fn most_recent_photo(
    &self,
    viewer: &Viewer,
    owner_id: Uuid,
  ) -> Result<Option<RankedPhoto>> {
    let viewer_id = viewer.require()?;
    let photos = self.owner_photos(owner_id).await?;
    if photos.is_empty() {
      return Err(Error::NoPhotos(owner_id));
    }
    Ok(query::most_recent(viewer_id, &photos))
  }

  /// The visible photo with the most comments. Same contract as
  /// [`Self::most_recent_photo`].
  pub async fn most_commented_photo(
    &self,
    viewer: &Viewer,
    owner_id: Uuid,
  ) -> Result<Option<RankedPhoto>> {
    let viewer_id = viewer.require()?;
    let photos = self.owner_photos(owner_id).await?;
    if photos.is_empty() {
      return Err(Error::NoPhotos(owner_id));
    }
    Ok(query::most_commented(viewer_id, &photos))
  }

  pub async fn user_stats(&self, viewer: &Viewer, owner_id: Uuid) -> Result<UserStats> {
    let viewer_id = viewer.require()?;
    let photos = self.owner_photos(owner_id).await?;
    Ok(query::stats(viewer_id, &photos))
  }
}
