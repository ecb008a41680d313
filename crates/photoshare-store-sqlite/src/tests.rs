//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Duration, TimeZone, Utc};
use photoshare_core::{
  activity::{ActivityKind, NewActivity},
  photo::NewPhoto,
  store::{PhotoStore, StoreCounts},
  user::{NewUser, User},
};
use uuid::Uuid;

use crate::{SqliteStore, encode::encode_uuid};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_user(login: &str) -> NewUser {
  NewUser {
    login_name:    login.into(),
    password_hash: "$argon2id$placeholder".into(),
    first_name:    login.to_uppercase(),
    last_name:     "Tester".into(),
    location:      None,
    description:   Some("likes photos".into()),
    occupation:    None,
  }
}

async fn user(s: &SqliteStore, login: &str) -> User {
  s.create_user(new_user(login)).await.unwrap().expect("fresh login")
}

fn new_photo(owner: Uuid, sharing_list: Option<Vec<Uuid>>) -> NewPhoto {
  NewPhoto {
    owner_id: owner,
    file_ref: format!("{}.jpg", Uuid::new_v4()),
    uploaded_at: Utc::now(),
    sharing_list,
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_user() {
  let s = store().await;
  let alice = user(&s, "alice").await;

  let fetched = s.get_user(alice.user_id).await.unwrap().unwrap();
  assert_eq!(fetched, alice);
  assert!(s.get_user(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_login_is_rejected() {
  let s = store().await;
  user(&s, "alice").await;
  assert!(s.create_user(new_user("alice")).await.unwrap().is_none());
  assert_eq!(s.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn list_users_in_registration_order() {
  let s = store().await;
  for login in ["carol", "alice", "bob"] {
    user(&s, login).await;
  }
  let logins: Vec<_> = s
    .list_users()
    .await
    .unwrap()
    .into_iter()
    .map(|u| u.login_name)
    .collect();
  assert_eq!(logins, vec!["carol", "alice", "bob"]);
}

#[tokio::test]
async fn credentials_carry_the_hash() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let creds = s.get_credentials("alice").await.unwrap().unwrap();
  assert_eq!(creds.user.user_id, alice.user_id);
  assert_eq!(creds.password_hash, "$argon2id$placeholder");
  assert!(s.get_credentials("mallory").await.unwrap().is_none());
}

// ─── Photos ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_photo_records_upload_activity() {
  let s = store().await;
  let alice = user(&s, "alice").await;

  let (photo, activity) = s.create_photo(new_photo(alice.user_id, None)).await.unwrap();
  assert_eq!(activity.kind, ActivityKind::PhotoUpload);
  assert_eq!(activity.photo_id, Some(photo.photo_id));
  assert_eq!(activity.actor_id, alice.user_id);

  let fetched = s.get_photo(photo.photo_id).await.unwrap().unwrap();
  assert_eq!(fetched, photo);
  assert_eq!(s.recent_activities(10).await.unwrap(), vec![activity]);
}

#[tokio::test]
async fn sharing_list_roundtrips_in_order() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let bob = user(&s, "bob").await;
  let carol = user(&s, "carol").await;

  let list = vec![carol.user_id, bob.user_id];
  let (shared, _) = s
    .create_photo(new_photo(alice.user_id, Some(list.clone())))
    .await
    .unwrap();
  let (public, _) = s
    .create_photo(new_photo(alice.user_id, Some(vec![])))
    .await
    .unwrap();

  let shared = s.get_photo(shared.photo_id).await.unwrap().unwrap();
  assert_eq!(shared.sharing_list, Some(list));
  let public = s.get_photo(public.photo_id).await.unwrap().unwrap();
  assert_eq!(public.sharing_list, None);
}

#[tokio::test]
async fn photos_of_user_in_natural_order() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let bob = user(&s, "bob").await;

  // Upload timestamps disagree with insertion order.
  let base = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
  let mut ids = Vec::new();
  for days in [3, 1, 2] {
    let mut input = new_photo(alice.user_id, None);
    input.uploaded_at = base + Duration::days(days);
    ids.push(s.create_photo(input).await.unwrap().0.photo_id);
  }
  s.create_photo(new_photo(bob.user_id, None)).await.unwrap();

  let photos = s.photos_of_user(alice.user_id).await.unwrap();
  let got: Vec<_> = photos.iter().map(|p| p.photo_id).collect();
  assert_eq!(got, ids);
  assert_eq!(photos[0].uploaded_at, base + Duration::days(3));
  assert!(s.photos_of_user(Uuid::new_v4()).await.unwrap().is_empty());
}

#[tokio::test]
async fn get_photos_skips_missing_ids() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let (a, _) = s.create_photo(new_photo(alice.user_id, None)).await.unwrap();
  let (b, _) = s.create_photo(new_photo(alice.user_id, None)).await.unwrap();

  let found = s
    .get_photos(&[b.photo_id, Uuid::new_v4(), a.photo_id])
    .await
    .unwrap();
  let ids: Vec<_> = found.iter().map(|p| p.photo_id).collect();
  assert_eq!(ids, vec![b.photo_id, a.photo_id]);
}

// ─── Comments ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_comment_appends_with_activity() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let bob = user(&s, "bob").await;
  let (photo, _) = s.create_photo(new_photo(alice.user_id, None)).await.unwrap();

  let (first, activity) = s
    .add_comment(photo.photo_id, bob.user_id, "nice!".into())
    .await
    .unwrap()
    .unwrap();
  let (second, _) = s
    .add_comment(photo.photo_id, alice.user_id, "thanks".into())
    .await
    .unwrap()
    .unwrap();

  assert_eq!(activity.kind, ActivityKind::NewComment);
  assert_eq!(activity.actor_id, bob.user_id);
  assert_eq!(activity.created_at, first.created_at);

  let photo = s.get_photo(photo.photo_id).await.unwrap().unwrap();
  assert_eq!(photo.comments, vec![first, second]);
  assert!(s.unpaired_writes().await.unwrap().is_empty());
}

#[tokio::test]
async fn comment_on_missing_photo_writes_nothing() {
  let s = store().await;
  let bob = user(&s, "bob").await;
  let result = s
    .add_comment(Uuid::new_v4(), bob.user_id, "hello".into())
    .await
    .unwrap();
  assert!(result.is_none());
  assert!(s.recent_activities(10).await.unwrap().is_empty());
}

// ─── Likes ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn toggle_like_is_its_own_inverse() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let bob = user(&s, "bob").await;
  let (photo, _) = s.create_photo(new_photo(alice.user_id, None)).await.unwrap();

  let on = s.toggle_like(photo.photo_id, bob.user_id).await.unwrap().unwrap();
  assert_eq!((on.likes, on.liked), (1, true));

  let other = s.toggle_like(photo.photo_id, alice.user_id).await.unwrap().unwrap();
  assert_eq!((other.likes, other.liked), (2, true));

  let off = s.toggle_like(photo.photo_id, bob.user_id).await.unwrap().unwrap();
  assert_eq!((off.likes, off.liked), (1, false));

  let photo = s.get_photo(photo.photo_id).await.unwrap().unwrap();
  assert!(photo.likes.contains(&alice.user_id));
  assert!(!photo.likes.contains(&bob.user_id));
}

#[tokio::test]
async fn toggle_like_on_missing_photo() {
  let s = store().await;
  let bob = user(&s, "bob").await;
  assert!(s.toggle_like(Uuid::new_v4(), bob.user_id).await.unwrap().is_none());
}

#[tokio::test]
async fn concurrent_toggles_by_different_users_all_land() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let (photo, _) = s.create_photo(new_photo(alice.user_id, None)).await.unwrap();

  let mut users = Vec::new();
  for i in 0..8 {
    users.push(user(&s, &format!("fan{i}")).await.user_id);
  }

  let photo_id = photo.photo_id;
  let handles: Vec<_> = users
    .into_iter()
    .map(|u| {
      let s = s.clone();
      tokio::spawn(async move { s.toggle_like(photo_id, u).await })
    })
    .collect();
  for h in handles {
    h.await.unwrap().unwrap();
  }

  let photo = s.get_photo(photo_id).await.unwrap().unwrap();
  assert_eq!(photo.likes.len(), 8);
}

#[tokio::test]
async fn concurrent_toggles_by_one_user_serialize() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let bob = user(&s, "bob").await;
  let (photo, _) = s.create_photo(new_photo(alice.user_id, None)).await.unwrap();

  let (photo_id, bob_id) = (photo.photo_id, bob.user_id);
  let handles: Vec<_> = (0..7)
    .map(|_| {
      let s = s.clone();
      tokio::spawn(async move { s.toggle_like(photo_id, bob_id).await })
    })
    .collect();

  let mut states = Vec::new();
  for h in handles {
    states.push(h.await.unwrap().unwrap().expect("photo exists"));
  }

  // Every toggle saw the one before it, so each result is self-consistent
  // and an odd number of flips leaves the like in place.
  assert!(states.iter().all(|st| st.likes == usize::from(st.liked)));
  assert_eq!(states.iter().filter(|st| st.liked).count(), 4);
  let photo = s.get_photo(photo_id).await.unwrap().unwrap();
  assert_eq!(photo.likes.len(), 1);
  assert!(photo.likes.contains(&bob_id));
}

#[tokio::test]
async fn concurrent_comments_are_all_kept() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let (photo, _) = s.create_photo(new_photo(alice.user_id, None)).await.unwrap();

  let mut authors = Vec::new();
  for i in 0..10 {
    authors.push(user(&s, &format!("critic{i}")).await.user_id);
  }

  let photo_id = photo.photo_id;
  let handles: Vec<_> = authors
    .into_iter()
    .enumerate()
    .map(|(i, author)| {
      let s = s.clone();
      tokio::spawn(async move { s.add_comment(photo_id, author, format!("take {i}")).await })
    })
    .collect();
  let mut comment_ids = Vec::new();
  for h in handles {
    let (comment, _) = h.await.unwrap().unwrap().expect("photo exists");
    comment_ids.push(comment.comment_id);
  }

  let photo = s.get_photo(photo_id).await.unwrap().unwrap();
  assert_eq!(photo.comments.len(), 10);
  assert!(comment_ids.iter().all(|id| photo.comments.iter().any(|c| c.comment_id == *id)));

  let journal = s.recent_activities(100).await.unwrap();
  let comment_activities = journal
    .iter()
    .filter(|a| a.kind == ActivityKind::NewComment)
    .count();
  assert_eq!(comment_activities, 10);
  assert!(s.unpaired_writes().await.unwrap().is_empty());
}

// ─── Activities ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn recent_activities_newest_first_with_insertion_tiebreak() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let at = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();

  let mut recorded = Vec::new();
  for kind in [ActivityKind::UserLogin, ActivityKind::UserLogout, ActivityKind::UserLogin] {
    recorded.push(
      s.record_activity(NewActivity {
        kind,
        actor_id: alice.user_id,
        photo_id: None,
        created_at: at,
      })
      .await
      .unwrap(),
    );
  }
  let older = s
    .record_activity(NewActivity {
      kind:       ActivityKind::UserLogin,
      actor_id:   alice.user_id,
      photo_id:   None,
      created_at: at - Duration::hours(1),
    })
    .await
    .unwrap();

  let recent = s.recent_activities(10).await.unwrap();
  let ids: Vec<_> = recent.iter().map(|a| a.activity_id).collect();
  assert_eq!(
    ids,
    vec![
      recorded[2].activity_id,
      recorded[1].activity_id,
      recorded[0].activity_id,
      older.activity_id,
    ]
  );
  assert_eq!(s.recent_activities(2).await.unwrap().len(), 2);
}

// ─── Reconciliation ──────────────────────────────────────────────────────────

#[tokio::test]
async fn unpaired_writes_are_reported() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let (photo, _) = s.create_photo(new_photo(alice.user_id, None)).await.unwrap();

  // Simulate a crash between the primary write and its activity.
  let orphan_comment = Uuid::new_v4();
  let orphan_photo = Uuid::new_v4();
  let (comment_id, photo_id, owner) = (
    encode_uuid(orphan_comment),
    encode_uuid(photo.photo_id),
    encode_uuid(alice.user_id),
  );
  let other_photo = encode_uuid(orphan_photo);
  s.conn
    .call(move |conn| {
      conn.execute(
        "INSERT INTO comments (comment_id, photo_id, author_id, text, created_at)
         VALUES (?1, ?2, ?3, 'lost', '2024-01-01T00:00:00.000000Z')",
        rusqlite::params![comment_id, photo_id, owner],
      )?;
      conn.execute(
        "INSERT INTO photos (photo_id, owner_id, file_ref, uploaded_at)
         VALUES (?1, ?2, 'lost.jpg', '2024-01-01T00:00:00.000000Z')",
        rusqlite::params![other_photo, owner],
      )?;
      Ok(())
    })
    .await
    .unwrap();

  let unpaired = s.unpaired_writes().await.unwrap();
  assert_eq!(unpaired.len(), 2);
  assert_eq!(unpaired[0].kind, ActivityKind::PhotoUpload);
  assert_eq!(unpaired[0].source_id, orphan_photo);
  assert_eq!(unpaired[1].kind, ActivityKind::NewComment);
  assert_eq!(unpaired[1].source_id, orphan_comment);
  assert_eq!(unpaired[1].photo_id, photo.photo_id);

  // Recording the missing activities closes the gap.
  for write in &unpaired {
    s.record_activity(write.to_activity()).await.unwrap();
  }
  assert!(s.unpaired_writes().await.unwrap().is_empty());
}

#[tokio::test]
async fn same_key_comments_need_one_activity_each() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let (photo, _) = s.create_photo(new_photo(alice.user_id, None)).await.unwrap();

  // Two comments by one author in the same microsecond, only one journaled.
  let (first, second) = (Uuid::new_v4(), Uuid::new_v4());
  let (photo_id, author) = (encode_uuid(photo.photo_id), encode_uuid(alice.user_id));
  let (first_id, second_id) = (encode_uuid(first), encode_uuid(second));
  s.conn
    .call(move |conn| {
      for (id, text) in [(&first_id, "one"), (&second_id, "two")] {
        conn.execute(
          "INSERT INTO comments (comment_id, photo_id, author_id, text, created_at)
           VALUES (?1, ?2, ?3, ?4, '2024-01-01T00:00:00.000000Z')",
          rusqlite::params![id, photo_id, author, text],
        )?;
      }
      conn.execute(
        "INSERT INTO activities (activity_id, kind, actor_id, photo_id, created_at)
         VALUES (?1, 'new_comment', ?2, ?3, '2024-01-01T00:00:00.000000Z')",
        rusqlite::params![encode_uuid(Uuid::new_v4()), author, photo_id],
      )?;
      Ok(())
    })
    .await
    .unwrap();

  let unpaired = s.unpaired_writes().await.unwrap();
  assert_eq!(unpaired.len(), 1);
  assert_eq!(unpaired[0].kind, ActivityKind::NewComment);
  assert_eq!(unpaired[0].source_id, second);

  s.record_activity(unpaired[0].to_activity()).await.unwrap();
  assert!(s.unpaired_writes().await.unwrap().is_empty());
}

// ─── Diagnostics ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn counts_cover_every_collection() {
  let s = store().await;
  assert_eq!(s.counts().await.unwrap(), StoreCounts::default());

  let alice = user(&s, "alice").await;
  let bob = user(&s, "bob").await;
  let (photo, _) = s.create_photo(new_photo(alice.user_id, None)).await.unwrap();
  s.add_comment(photo.photo_id, bob.user_id, "hi".into()).await.unwrap();
  s.toggle_like(photo.photo_id, bob.user_id).await.unwrap();

  assert_eq!(s.counts().await.unwrap(), StoreCounts {
    users:      2,
    photos:     1,
    comments:   1,
    likes:      1,
    activities: 2,
  });
}
