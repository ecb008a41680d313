//! The identity a request is made on behalf of.
//!
//! Resolved by an outer auth layer and passed explicitly into every engine
//! operation; nothing in the core reads ambient session state.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "user_id", rename_all = "snake_case")]
pub enum Viewer {
  #[default]
  Anonymous,
  User(Uuid),
}

impl Viewer {
  pub fn user_id(&self) -> Option<Uuid> {
    match self {
      Self::Anonymous => None,
      Self::User(id) => Some(*id),
    }
  }

  /// The authenticated user id, or [`Error::Unauthorized`].
  pub fn require(&self) -> Result<Uuid> {
    self.user_id().ok_or(Error::Unauthorized)
  }
}

impl From<Uuid> for Viewer {
  fn from(id: Uuid) -> Self { Self::User(id) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn anonymous_is_unauthorized() {
    assert!(matches!(Viewer::Anonymous.require(), Err(Error::Unauthorized)));
    assert_eq!(Viewer::default(), Viewer::Anonymous);
  }

  #[test]
  fn user_resolves_to_own_id() {
    let id = Uuid::new_v4();
    assert_eq!(Viewer::from(id).require().unwrap(), id);
  }
}
