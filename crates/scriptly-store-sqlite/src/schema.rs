//! SQL schema for the Scriptly SQLite store.
//!
//! Executed once at connection startup. Referential integrity across
//! collections is advisory only — `article_id` columns reference articles
//! that may never have existed or may be gone, and no foreign keys are
//! declared. Readers tolerate dangling references instead.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS articles (
    article_id TEXT PRIMARY KEY,
    title      TEXT NOT NULL,
    body_json  TEXT NOT NULL DEFAULT '{}',  -- open caller-supplied fields
    timestamp  INTEGER NOT NULL             -- epoch millis, server-assigned
);

CREATE TABLE IF NOT EXISTS comments (
    comment_id TEXT PRIMARY KEY,
    article_id TEXT NOT NULL,
    body_json  TEXT NOT NULL DEFAULT '{}',
    timestamp  INTEGER NOT NULL
);

-- One row per (article, user) like. Uniqueness of that pair is an
-- application-level invariant; the table deliberately carries no UNIQUE
-- constraint on it.
CREATE TABLE IF NOT EXISTS likes (
    like_id    TEXT PRIMARY KEY,
    article_id TEXT NOT NULL,
    user_email TEXT NOT NULL,
    extra_json TEXT NOT NULL DEFAULT '{}',
    timestamp  INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS community_posts (
    post_id    TEXT PRIMARY KEY,
    body_json  TEXT NOT NULL DEFAULT '{}',
    timestamp  INTEGER NOT NULL,
    likes      INTEGER NOT NULL DEFAULT 0,
    liked_by   TEXT NOT NULL DEFAULT '[]'   -- JSON array; semantically a set
);

CREATE TABLE IF NOT EXISTS community_comments (
    comment_id TEXT PRIMARY KEY,
    body_json  TEXT NOT NULL DEFAULT '{}',
    timestamp  INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    user_id    TEXT PRIMARY KEY,
    email      TEXT NOT NULL,
    name       TEXT,
    photo_url  TEXT,
    extra_json TEXT NOT NULL DEFAULT '{}'
);

CREATE INDEX IF NOT EXISTS articles_timestamp_idx ON articles(timestamp);
CREATE INDEX IF NOT EXISTS comments_article_idx   ON comments(article_id);
CREATE INDEX IF NOT EXISTS likes_article_idx      ON likes(article_id);
CREATE INDEX IF NOT EXISTS likes_pair_idx         ON likes(article_id, user_email);
CREATE INDEX IF NOT EXISTS users_email_idx        ON users(email);

PRAGMA user_version = 1;
";
