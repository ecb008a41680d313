//! The visibility predicate: may this viewer see this photo?
//!
//! A photo is visible if any of these hold:
//!
//! 1. it has no sharing list, or the list is empty;
//! 2. the viewer owns it;
//! 3. the viewer is on its sharing list.
//!
//! Comments and feed entries inherit the visibility of their photo. An
//! anonymous viewer sees nothing.

use uuid::Uuid;

use crate::{photo::Photo, viewer::Viewer};

/// Whether the authenticated user `viewer` may see `photo`.
pub fn can_view(viewer: Uuid, photo: &Photo) -> bool {
  match photo.sharing_list.as_deref() {
    None | Some([]) => true,
    Some(list) => viewer == photo.owner_id || list.contains(&viewer),
  }
}

/// [`can_view`] for a possibly anonymous viewer.
pub fn viewer_can_view(viewer: &Viewer, photo: &Photo) -> bool {
  viewer.user_id().is_some_and(|id| can_view(id, photo))
}
