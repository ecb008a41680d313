//! Registration, profiles and the login/logout journal.

use std::collections::{BTreeSet, HashMap};

use chrono::Utc;
use photoshare_core::{
  Error, Result, Viewer,
  activity::{Activity, ActivityKind, NewActivity},
  assets::AssetStore,
  store::PhotoStore,
  user::{Credentials, NewUser, User, UserSummary},
};
use uuid::Uuid;

use crate::Engine;

impl<S, A> Engine<S, A>
where
  S: PhotoStore,
  A: AssetStore,
{
  /// Register a user. Login name, password hash and both names are required.
  pub async fn register(&self, input: NewUser) -> Result<User> {
    let required = [
      ("login_name", &input.login_name),
      ("password", &input.password_hash),
      ("first_name", &input.first_name),
      ("last_name", &input.last_name),
    ];
    if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
      return Err(Error::InvalidInput(format!("{field} is required")));
    }

    let login_name = input.login_name.clone();
    let user = self
      .store
      .create_user(input)
      .await
      .map_err(Error::store)?
      .ok_or(Error::Conflict(login_name))?;

    tracing::info!(user_id = %user.user_id, login_name = %user.login_name, "user registered");
    Ok(user)
  }

  pub async fn get_user(&self, user_id: Uuid) -> Result<User> {
    self
      .store
      .get_user(user_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::UserNotFound(user_id))
  }

  pub async fn list_users(&self) -> Result<Vec<UserSummary>> {
    let users = self.store.list_users().await.map_err(Error::store)?;
    Ok(users.iter().map(User::summary).collect())
  }

  /// Summaries for `ids`, each looked up once. Users that no longer resolve
  /// are left out.
  pub(crate) async fn summaries(&self, ids: BTreeSet<Uuid>) -> Result<HashMap<Uuid, UserSummary>> {
    let mut out = HashMap::with_capacity(ids.len());
    for id in ids {
      if let Some(user) = self.store.get_user(id).await.map_err(Error::store)? {
        out.insert(id, user.summary());
      }
    }
    Ok(out)
  }

  /// Stored credentials for the auth layer. `None` for unknown logins.
  pub async fn credentials(&self, login_name: &str) -> Result<Option<Credentials>> {
    self.store.get_credentials(login_name).await.map_err(Error::store)
  }

  pub async fn record_login(&self, viewer: &Viewer) -> Result<Activity> {
    self.record_session(viewer, ActivityKind::UserLogin).await
  }

  pub async fn record_logout(&self, viewer: &Viewer) -> Result<Activity> {
    self.record_session(viewer, ActivityKind::UserLogout).await
  }

  async fn record_session(&self, viewer: &Viewer, kind: ActivityKind) -> Result<Activity> {
    let actor_id = viewer.require()?;
    let activity = self
      .store
      .record_activity(NewActivity {
        kind,
        actor_id,
        photo_id: None,
        created_at: Utc::now(),
      })
      .await
      .map_err(Error::store)?;
    self.emit(&activity);
    Ok(activity)
  }
}
