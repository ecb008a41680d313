//! The social mutation service: uploads, comments and likes.
//!
//! Uploads and comments are written together with their activity in one
//! store call and emitted to the sink only after that call succeeds. Likes
//! are not journaled.

use chrono::Utc;
use photoshare_core::{
  Error, Result, Viewer,
  assets::{AssetStore, NewAsset},
  photo::{Comment, LikeState, NewPhoto, Photo, normalize_sharing_list},
  store::PhotoStore,
};
use uuid::Uuid;

use crate::Engine;

impl<S, A> Engine<S, A>
where
  S: PhotoStore,
  A: AssetStore,
{
  /// Store the asset, then the photo and its `PhotoUpload` activity.
  ///
  /// An empty sharing list is stored as public. If the metadata write fails
  /// the asset is removed again, so neither half outlives the other.
  pub async fn upload_photo(
    &self,
    viewer: &Viewer,
    asset: NewAsset,
    sharing_list: Option<Vec<Uuid>>,
  ) -> Result<Photo> {
    let owner_id = viewer.require()?;
    if asset.data.is_empty() {
      return Err(Error::InvalidInput("no file uploaded".into()));
    }

    let sharing_list = normalize_sharing_list(sharing_list);
    for user_id in sharing_list.iter().flatten() {
      if self.store.get_user(*user_id).await.map_err(Error::store)?.is_none() {
        return Err(Error::InvalidInput(format!(
          "sharing list names unknown user {user_id}"
        )));
      }
    }

    let file_ref = self.assets.put(asset).await.map_err(Error::asset)?;
    let input = NewPhoto {
      owner_id,
      file_ref: file_ref.clone(),
      uploaded_at: Utc::now(),
      sharing_list,
    };

    match self.store.create_photo(input).await {
      Ok((photo, activity)) => {
        self.emit(&activity);
        Ok(photo)
      }
      Err(e) => {
        if let Err(cleanup) = self.assets.remove(&file_ref).await {
          tracing::warn!(%file_ref, error = %cleanup, "orphaned asset after failed upload");
        }
        Err(Error::store(e))
      }
    }
  }

  /// Append a comment to a photo the viewer can see.
  ///
  /// The text is validated before anything else is looked up, so a blank
  /// comment never touches the store.
  pub async fn add_comment(&self, viewer: &Viewer, photo_id: Uuid, text: &str) -> Result<Comment> {
    let author_id = viewer.require()?;
    if text.trim().is_empty() {
      return Err(Error::InvalidInput("comment cannot be empty".into()));
    }
    self.visible_photo(author_id, photo_id).await?;

    let (comment, activity) = self
      .store
      .add_comment(photo_id, author_id, text.to_owned())
      .await
      .map_err(Error::store)?
      .ok_or(Error::PhotoNotFound(photo_id))?;

    self.emit(&activity);
    Ok(comment)
  }

  /// Flip the viewer's like on a photo they can see.
  pub async fn toggle_like(&self, viewer: &Viewer, photo_id: Uuid) -> Result<LikeState> {
    let user_id = viewer.require()?;
    self.visible_photo(user_id, photo_id).await?;

    let state = self
      .store
      .toggle_like(photo_id, user_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::PhotoNotFound(photo_id))?;

    tracing::debug!(%photo_id, %user_id, likes = state.likes, liked = state.liked, "like toggled");
    Ok(state)
  }
}
