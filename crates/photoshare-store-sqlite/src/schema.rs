//! SQL schema for the photoshare SQLite store.
//!
//! Executed once at connection startup. Every table carries an
//! autoincrementing `seq` column; it is the insertion order used for natural
//! photo order, comment display order and activity tie-breaking.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    seq           INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id       TEXT NOT NULL UNIQUE,
    login_name    TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    first_name    TEXT NOT NULL,
    last_name     TEXT NOT NULL,
    location      TEXT,
    description   TEXT,
    occupation    TEXT,
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS photos (
    seq         INTEGER PRIMARY KEY AUTOINCREMENT,
    photo_id    TEXT NOT NULL UNIQUE,
    owner_id    TEXT NOT NULL REFERENCES users(user_id),
    file_ref    TEXT NOT NULL,
    uploaded_at TEXT NOT NULL,
    restricted  INTEGER NOT NULL DEFAULT 0   -- 1 iff photo_shares rows exist
);

CREATE TABLE IF NOT EXISTS photo_shares (
    photo_id TEXT NOT NULL REFERENCES photos(photo_id),
    user_id  TEXT NOT NULL REFERENCES users(user_id),
    position INTEGER NOT NULL,
    PRIMARY KEY (photo_id, user_id)
);

-- Comments are strictly append-only.
CREATE TABLE IF NOT EXISTS comments (
    seq        INTEGER PRIMARY KEY AUTOINCREMENT,
    comment_id TEXT NOT NULL UNIQUE,
    photo_id   TEXT NOT NULL REFERENCES photos(photo_id),
    author_id  TEXT NOT NULL REFERENCES users(user_id),
    text       TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS likes (
    photo_id TEXT NOT NULL REFERENCES photos(photo_id),
    user_id  TEXT NOT NULL REFERENCES users(user_id),
    PRIMARY KEY (photo_id, user_id)
);

-- The activity journal. No UPDATE or DELETE is ever issued against it.
-- photo_id has no foreign key; readers drop dangling references.
CREATE TABLE IF NOT EXISTS activities (
    seq         INTEGER PRIMARY KEY AUTOINCREMENT,
    activity_id TEXT NOT NULL UNIQUE,
    kind        TEXT NOT NULL,   -- snake_case ActivityKind
    actor_id    TEXT NOT NULL REFERENCES users(user_id),
    photo_id    TEXT,
    created_at  TEXT NOT NULL    -- fixed-width RFC 3339, sorts lexically
);

CREATE INDEX IF NOT EXISTS photos_owner_idx      ON photos(owner_id);
CREATE INDEX IF NOT EXISTS comments_photo_idx    ON comments(photo_id);
CREATE INDEX IF NOT EXISTS activities_recent_idx ON activities(created_at, seq);
CREATE INDEX IF NOT EXISTS activities_photo_idx  ON activities(photo_id);

PRAGMA user_version = 1;
";
