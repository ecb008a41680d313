//! [`SqliteStore`], the SQLite implementation of [`PhotoStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use photoshare_core::{
  activity::{Activity, ActivityKind, NewActivity},
  photo::{Comment, LikeState, NewPhoto, Photo},
  store::{PhotoStore, StoreCounts, UnpairedWrite},
  user::{Credentials, NewUser, User},
};

use crate::{
  encode::{
    RawActivity, RawComment, RawPhoto, RawUnpaired, RawUser, encode_dt,
    encode_kind, encode_uuid, now, truncate_dt,
  },
  schema::SCHEMA,
  Result,
};

// ─── Row helpers ─────────────────────────────────────────────────────────────

const USER_COLUMNS: &str = "user_id, login_name, first_name, last_name, \
  location, description, occupation, created_at, password_hash";

const ACTIVITY_COLUMNS: &str =
  "activity_id, kind, actor_id, photo_id, created_at";

fn user_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawUser> {
  Ok(RawUser {
    user_id:       row.get(0)?,
    login_name:    row.get(1)?,
    first_name:    row.get(2)?,
    last_name:     row.get(3)?,
    location:      row.get(4)?,
    description:   row.get(5)?,
    occupation:    row.get(6)?,
    created_at:    row.get(7)?,
    password_hash: row.get(8)?,
  })
}

fn activity_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawActivity> {
  Ok(RawActivity {
    activity_id: row.get(0)?,
    kind:        row.get(1)?,
    actor_id:    row.get(2)?,
    photo_id:    row.get(3)?,
    created_at:  row.get(4)?,
  })
}

/// Run a `photos` query selecting `photo_id, owner_id, file_ref,
/// uploaded_at, restricted` and attach each photo's shares, likes and
/// comments.
fn load_photos(
  conn: &rusqlite::Connection,
  sql: &str,
  params: impl rusqlite::Params,
) -> rusqlite::Result<Vec<RawPhoto>> {
  let mut stmt = conn.prepare(sql)?;
  let mut photos = stmt
    .query_map(params, |row| {
      Ok(RawPhoto {
        photo_id:    row.get(0)?,
        owner_id:    row.get(1)?,
        file_ref:    row.get(2)?,
        uploaded_at: row.get(3)?,
        restricted:  row.get(4)?,
        shared_with: Vec::new(),
        likes:       Vec::new(),
        comments:    Vec::new(),
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  for photo in &mut photos {
    load_children(conn, photo)?;
  }
  Ok(photos)
}

fn load_children(
  conn: &rusqlite::Connection,
  photo: &mut RawPhoto,
) -> rusqlite::Result<()> {
  let id = photo.photo_id.as_str();

  photo.shared_with = conn
    .prepare_cached(
      "SELECT user_id FROM photo_shares WHERE photo_id = ?1 ORDER BY position",
    )?
    .query_map(rusqlite::params![id], |r| r.get(0))?
    .collect::<rusqlite::Result<_>>()?;

  photo.likes = conn
    .prepare_cached("SELECT user_id FROM likes WHERE photo_id = ?1")?
    .query_map(rusqlite::params![id], |r| r.get(0))?
    .collect::<rusqlite::Result<_>>()?;

  photo.comments = conn
    .prepare_cached(
      "SELECT comment_id, photo_id, author_id, text, created_at
       FROM comments WHERE photo_id = ?1 ORDER BY seq",
    )?
    .query_map(rusqlite::params![id], |r| {
      Ok(RawComment {
        comment_id: r.get(0)?,
        photo_id:   r.get(1)?,
        author_id:  r.get(2)?,
        text:       r.get(3)?,
        created_at: r.get(4)?,
      })
    })?
    .collect::<rusqlite::Result<_>>()?;

  Ok(())
}

fn photo_exists(
  conn: &rusqlite::Connection,
  photo_id: &str,
) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(
        "SELECT 1 FROM photos WHERE photo_id = ?1",
        rusqlite::params![photo_id],
        |_| Ok(true),
      )
      .optional()?
      .unwrap_or(false),
  )
}

fn insert_activity(
  conn: &rusqlite::Connection,
  activity: &Activity,
) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT INTO activities (activity_id, kind, actor_id, photo_id, created_at)
     VALUES (?1, ?2, ?3, ?4, ?5)",
    rusqlite::params![
      encode_uuid(activity.activity_id),
      encode_kind(activity.kind),
      encode_uuid(activity.actor_id),
      activity.photo_id.map(encode_uuid),
      encode_dt(activity.created_at),
    ],
  )?;
  Ok(())
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A photoshare store backed by a single SQLite file.
///
/// Clones share one connection. All calls are serialized on the
/// connection's thread, so like toggles and paired writes never interleave.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn query_users(
    &self,
    filter: &'static str,
    param: Option<String>,
  ) -> Result<Vec<RawUser>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users {filter} ORDER BY seq");
    let raws = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = match param {
          Some(p) => stmt.query_map(rusqlite::params![p], user_row)?,
          None => stmt.query_map([], user_row)?,
        }
        .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(raws)
  }
}

// ─── PhotoStore impl ─────────────────────────────────────────────────────────

impl PhotoStore for SqliteStore {
  type Error = crate::Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<Option<User>> {
    let user = User {
      user_id:     Uuid::new_v4(),
      login_name:  input.login_name,
      first_name:  input.first_name,
      last_name:   input.last_name,
      location:    input.location,
      description: input.description,
      occupation:  input.occupation,
      created_at:  now(),
    };

    let row = user.clone();
    let hash = input.password_hash;

    let inserted = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "INSERT INTO users (
             user_id, login_name, password_hash, first_name, last_name,
             location, description, occupation, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
           ON CONFLICT (login_name) DO NOTHING",
          rusqlite::params![
            encode_uuid(row.user_id),
            row.login_name,
            hash,
            row.first_name,
            row.last_name,
            row.location,
            row.description,
            row.occupation,
            encode_dt(row.created_at),
          ],
        )?;
        Ok(n == 1)
      })
      .await?;

    Ok(inserted.then_some(user))
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    self
      .query_users("WHERE user_id = ?1", Some(encode_uuid(id)))
      .await?
      .pop()
      .map(RawUser::into_user)
      .transpose()
  }

  async fn list_users(&self) -> Result<Vec<User>> {
    self
      .query_users("", None)
      .await?
      .into_iter()
      .map(RawUser::into_user)
      .collect()
  }

  async fn get_credentials(&self, login_name: &str) -> Result<Option<Credentials>> {
    self
      .query_users("WHERE login_name = ?1", Some(login_name.to_owned()))
      .await?
      .pop()
      .map(RawUser::into_credentials)
      .transpose()
  }

  // ── Photos ────────────────────────────────────────────────────────────────

  async fn create_photo(&self, input: NewPhoto) -> Result<(Photo, Activity)> {
    let uploaded_at = truncate_dt(input.uploaded_at);
    let photo = Photo {
      photo_id: Uuid::new_v4(),
      owner_id: input.owner_id,
      file_ref: input.file_ref,
      uploaded_at,
      comments: Vec::new(),
      likes: Default::default(),
      sharing_list: input.sharing_list.filter(|l| !l.is_empty()),
    };
    let activity = Activity {
      activity_id: Uuid::new_v4(),
      kind:        ActivityKind::PhotoUpload,
      actor_id:    photo.owner_id,
      photo_id:    Some(photo.photo_id),
      created_at:  now(),
    };

    let (row, act) = (photo.clone(), activity.clone());
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let photo_id = encode_uuid(row.photo_id);
        tx.execute(
          "INSERT INTO photos (photo_id, owner_id, file_ref, uploaded_at, restricted)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![
            photo_id,
            encode_uuid(row.owner_id),
            row.file_ref,
            encode_dt(row.uploaded_at),
            row.sharing_list.is_some(),
          ],
        )?;
        for (position, user_id) in row.sharing_list.iter().flatten().enumerate() {
          tx.execute(
            "INSERT INTO photo_shares (photo_id, user_id, position) VALUES (?1, ?2, ?3)",
            rusqlite::params![photo_id, encode_uuid(*user_id), position as i64],
          )?;
        }
        insert_activity(&tx, &act)?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok((photo, activity))
  }

  async fn get_photo(&self, id: Uuid) -> Result<Option<Photo>> {
    let id_str = encode_uuid(id);
    let raws = self
      .conn
      .call(move |conn| {
        Ok(load_photos(
          conn,
          "SELECT photo_id, owner_id, file_ref, uploaded_at, restricted
           FROM photos WHERE photo_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    raws.into_iter().next().map(RawPhoto::into_photo).transpose()
  }

  async fn get_photos(&self, ids: &[Uuid]) -> Result<Vec<Photo>> {
    let ids: Vec<String> = ids.iter().copied().map(encode_uuid).collect();
    let raws = self
      .conn
      .call(move |conn| {
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
          out.extend(load_photos(
            conn,
            "SELECT photo_id, owner_id, file_ref, uploaded_at, restricted
             FROM photos WHERE photo_id = ?1",
            rusqlite::params![id],
          )?);
        }
        Ok(out)
      })
      .await?;

    raws.into_iter().map(RawPhoto::into_photo).collect()
  }

  async fn photos_of_user(&self, owner_id: Uuid) -> Result<Vec<Photo>> {
    let owner = encode_uuid(owner_id);
    let raws = self
      .conn
      .call(move |conn| {
        Ok(load_photos(
          conn,
          "SELECT photo_id, owner_id, file_ref, uploaded_at, restricted
           FROM photos WHERE owner_id = ?1 ORDER BY seq",
          rusqlite::params![owner],
        )?)
      })
      .await?;

    raws.into_iter().map(RawPhoto::into_photo).collect()
  }

  // ── Social mutations ──────────────────────────────────────────────────────

  async fn add_comment(
    &self,
    photo_id:  Uuid,
    author_id: Uuid,
    text:      String,
  ) -> Result<Option<(Comment, Activity)>> {
    let created_at = now();
    let comment = Comment {
      comment_id: Uuid::new_v4(),
      photo_id,
      author_id,
      text,
      created_at,
    };
    let activity = Activity {
      activity_id: Uuid::new_v4(),
      kind:        ActivityKind::NewComment,
      actor_id:    author_id,
      photo_id:    Some(photo_id),
      created_at,
    };

    let (row, act) = (comment.clone(), activity.clone());
    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let photo_id = encode_uuid(row.photo_id);
        if !photo_exists(&tx, &photo_id)? {
          return Ok(false);
        }
        tx.execute(
          "INSERT INTO comments (comment_id, photo_id, author_id, text, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![
            encode_uuid(row.comment_id),
            photo_id,
            encode_uuid(row.author_id),
            row.text,
            encode_dt(row.created_at),
          ],
        )?;
        insert_activity(&tx, &act)?;
        tx.commit()?;
        Ok(true)
      })
      .await?;

    Ok(inserted.then_some((comment, activity)))
  }

  async fn toggle_like(&self, photo_id: Uuid, user_id: Uuid) -> Result<Option<LikeState>> {
    let photo_id = encode_uuid(photo_id);
    let user_id = encode_uuid(user_id);

    let state = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if !photo_exists(&tx, &photo_id)? {
          return Ok(None);
        }
        let removed = tx.execute(
          "DELETE FROM likes WHERE photo_id = ?1 AND user_id = ?2",
          rusqlite::params![photo_id, user_id],
        )?;
        if removed == 0 {
          tx.execute(
            "INSERT INTO likes (photo_id, user_id) VALUES (?1, ?2)",
            rusqlite::params![photo_id, user_id],
          )?;
        }
        let likes: i64 = tx.query_row(
          "SELECT COUNT(*) FROM likes WHERE photo_id = ?1",
          rusqlite::params![photo_id],
          |r| r.get(0),
        )?;
        tx.commit()?;
        Ok(Some(LikeState {
          likes: likes as usize,
          liked: removed == 0,
        }))
      })
      .await?;

    Ok(state)
  }

  // ── Activity journal ──────────────────────────────────────────────────────

  async fn record_activity(&self, input: NewActivity) -> Result<Activity> {
    let activity = Activity {
      activity_id: Uuid::new_v4(),
      kind:        input.kind,
      actor_id:    input.actor_id,
      photo_id:    input.photo_id,
      created_at:  truncate_dt(input.created_at),
    };

    let row = activity.clone();
    self
      .conn
      .call(move |conn| {
        insert_activity(conn, &row)?;
        Ok(())
      })
      .await?;

    Ok(activity)
  }

  async fn recent_activities(&self, limit: usize) -> Result<Vec<Activity>> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let raws = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ACTIVITY_COLUMNS} FROM activities
           ORDER BY created_at DESC, seq DESC
           LIMIT ?1"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit], activity_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawActivity::into_activity).collect()
  }

  async fn unpaired_writes(&self) -> Result<Vec<UnpairedWrite>> {
    let raws = self
      .conn
      .call(|conn| {
        let mut photos = conn.prepare(
          "SELECT p.photo_id, p.owner_id, p.uploaded_at
           FROM photos p
           WHERE NOT EXISTS (
             SELECT 1 FROM activities a
             WHERE a.kind = 'photo_upload' AND a.photo_id = p.photo_id
           )
           ORDER BY p.seq",
        )?;
        let mut rows = photos
          .query_map([], |r| {
            let photo_id: String = r.get(0)?;
            Ok(RawUnpaired {
              kind:      ActivityKind::PhotoUpload,
              source_id: photo_id.clone(),
              photo_id,
              actor_id:  r.get(1)?,
              at:        r.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        // Activities carry no comment id, so comments are paired by
        // (photo, author, timestamp). Within one key the first `n` comments
        // by insertion order count as paired, where `n` is the number of
        // matching activities.
        let mut comments = conn.prepare(
          "SELECT comment_id, photo_id, author_id, created_at FROM (
             SELECT c.seq, c.comment_id, c.photo_id, c.author_id, c.created_at,
               (SELECT COUNT(*) FROM comments c2
                WHERE c2.photo_id   = c.photo_id
                  AND c2.author_id  = c.author_id
                  AND c2.created_at = c.created_at
                  AND c2.seq       <= c.seq) AS rank,
               (SELECT COUNT(*) FROM activities a
                WHERE a.kind       = 'new_comment'
                  AND a.photo_id   = c.photo_id
                  AND a.actor_id   = c.author_id
                  AND a.created_at = c.created_at) AS paired
             FROM comments c
           )
           WHERE rank > paired
           ORDER BY seq",
        )?;
        rows.extend(
          comments
            .query_map([], |r| {
              Ok(RawUnpaired {
                kind:      ActivityKind::NewComment,
                source_id: r.get(0)?,
                photo_id:  r.get(1)?,
                actor_id:  r.get(2)?,
                at:        r.get(3)?,
              })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        );
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUnpaired::into_unpaired).collect()
  }

  // ── Diagnostics ───────────────────────────────────────────────────────────

  async fn counts(&self) -> Result<StoreCounts> {
    let counts = self
      .conn
      .call(|conn| {
        let count = |table: &str| -> rusqlite::Result<usize> {
          let n: i64 =
            conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?;
          Ok(n as usize)
        };
        Ok(StoreCounts {
          users:      count("users")?,
          photos:     count("photos")?,
          comments:   count("comments")?,
          likes:      count("likes")?,
          activities: count("activities")?,
        })
      })
      .await?;
    Ok(counts)
  }
}
