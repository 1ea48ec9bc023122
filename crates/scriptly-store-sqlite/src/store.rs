//! [`SqliteStore`] — the SQLite implementation of [`ContentStore`].

use std::{
  collections::{HashMap, HashSet},
  path::Path,
};

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use scriptly_core::{
  article::{Article, Comment, NewArticle, NewComment},
  community::{
    CommunityComment, CommunityPost, NewCommunityComment, NewCommunityPost,
  },
  engagement::{Like, NewLike, RankedArticle},
  store::{ContentStore, FeedQuery},
  user::{NewUser, User, UserPatch},
};

use crate::{
  encode::{
    RawArticle, RawComment, RawCommunityComment, RawPost, RawUser,
    encode_body, encode_members, encode_uuid,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Scriptly content store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

fn now_millis() -> i64 { Utc::now().timestamp_millis() }

/// LIKE pattern for a case-insensitive substring match on a lowercased
/// column.
fn search_pattern(search: &str) -> String {
  format!("%{}%", search.to_lowercase())
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
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

  /// Fetch a community post by id. `None` if not found.
  async fn get_post(&self, post_id: Uuid) -> Result<Option<CommunityPost>> {
    let id_str = encode_uuid(post_id);

    let raw: Option<RawPost> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT post_id, body_json, timestamp, likes, liked_by
             FROM community_posts WHERE post_id = ?1",
            rusqlite::params![id_str],
            |row| {
              Ok(RawPost {
                post_id:   row.get(0)?,
                body_json: row.get(1)?,
                timestamp: row.get(2)?,
                likes:     row.get(3)?,
                liked_by:  row.get(4)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawPost::into_post).transpose()
  }

  #[cfg(test)]
  pub(crate) fn raw_conn(&self) -> &tokio_rusqlite::Connection { &self.conn }
}

// ─── ContentStore impl ───────────────────────────────────────────────────────

impl ContentStore for SqliteStore {
  type Error = Error;

  // ── Articles ──────────────────────────────────────────────────────────────

  async fn add_article(&self, input: NewArticle) -> Result<Article> {
    let article = Article {
      article_id: Uuid::new_v4(),
      title:      input.title,
      timestamp:  now_millis(),
      body:       input.body,
    };

    let id_str    = encode_uuid(article.article_id);
    let title     = article.title.clone();
    let body_str  = encode_body(&article.body)?;
    let timestamp = article.timestamp;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO articles (article_id, title, body_json, timestamp)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, title, body_str, timestamp],
        )?;
        Ok(())
      })
      .await?;

    Ok(article)
  }

  async fn count_articles(&self, search: Option<&str>) -> Result<u64> {
    let pattern = search.map(search_pattern);

    let count: i64 = self
      .conn
      .call(move |conn| {
        let n = match pattern {
          Some(p) => conn.query_row(
            "SELECT COUNT(*) FROM articles WHERE LOWER(title) LIKE ?1",
            rusqlite::params![p],
            |row| row.get(0),
          )?,
          None => conn.query_row(
            "SELECT COUNT(*) FROM articles",
            [],
            |row| row.get(0),
          )?,
        };
        Ok(n)
      })
      .await?;

    Ok(count as u64)
  }

  async fn list_articles(&self, query: &FeedQuery) -> Result<Vec<Article>> {
    let pattern = query.search.as_deref().map(search_pattern);
    let limit   = i64::from(query.limit);
    let offset  = i64::from(query.offset());

    let raws: Vec<RawArticle> = self
      .conn
      .call(move |conn| {
        // Equal timestamps fall back to insertion order, newest first, so
        // page boundaries stay deterministic.
        let map_row = |row: &rusqlite::Row<'_>| {
          Ok(RawArticle {
            article_id: row.get(0)?,
            title:      row.get(1)?,
            body_json:  row.get(2)?,
            timestamp:  row.get(3)?,
          })
        };

        let rows = if let Some(p) = pattern {
          let mut stmt = conn.prepare(
            "SELECT article_id, title, body_json, timestamp FROM articles
             WHERE LOWER(title) LIKE ?1
             ORDER BY timestamp DESC, rowid DESC
             LIMIT ?2 OFFSET ?3",
          )?;
          stmt
            .query_map(rusqlite::params![p, limit, offset], map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(
            "SELECT article_id, title, body_json, timestamp FROM articles
             ORDER BY timestamp DESC, rowid DESC
             LIMIT ?1 OFFSET ?2",
          )?;
          stmt
            .query_map(rusqlite::params![limit, offset], map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawArticle::into_article).collect()
  }

  async fn latest_articles(&self) -> Result<Vec<Article>> {
    let cap = scriptly_core::store::LATEST_CAP as i64;

    let raws: Vec<RawArticle> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT article_id, title, body_json, timestamp FROM articles
           ORDER BY timestamp DESC, rowid DESC
           LIMIT ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![cap], |row| {
            Ok(RawArticle {
              article_id: row.get(0)?,
              title:      row.get(1)?,
              body_json:  row.get(2)?,
              timestamp:  row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawArticle::into_article).collect()
  }

  // ── Comments ──────────────────────────────────────────────────────────────

  async fn add_comment(
    &self,
    article_id: Uuid,
    input: NewComment,
  ) -> Result<Comment> {
    let comment = Comment {
      comment_id: Uuid::new_v4(),
      article_id,
      timestamp: now_millis(),
      body: input.body,
    };

    let id_str      = encode_uuid(comment.comment_id);
    let article_str = encode_uuid(comment.article_id);
    let body_str    = encode_body(&comment.body)?;
    let timestamp   = comment.timestamp;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO comments (comment_id, article_id, body_json, timestamp)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, article_str, body_str, timestamp],
        )?;
        Ok(())
      })
      .await?;

    Ok(comment)
  }

  async fn comments_for_article(&self, article_id: Uuid) -> Result<Vec<Comment>> {
    let article_str = encode_uuid(article_id);

    let raws: Vec<RawComment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT comment_id, article_id, body_json, timestamp FROM comments
           WHERE article_id = ?1
           ORDER BY timestamp DESC, rowid DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![article_str], |row| {
            Ok(RawComment {
              comment_id: row.get(0)?,
              article_id: row.get(1)?,
              body_json:  row.get(2)?,
              timestamp:  row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawComment::into_comment).collect()
  }

  // ── Engagement ledger ─────────────────────────────────────────────────────

  async fn has_liked(&self, article_id: Uuid, user_email: &str) -> Result<bool> {
    let article_str = encode_uuid(article_id);
    let email       = user_email.to_owned();

    let found: bool = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT 1 FROM likes WHERE article_id = ?1 AND user_email = ?2",
            rusqlite::params![article_str, email],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false))
      })
      .await?;

    Ok(found)
  }

  async fn count_likes(&self, article_id: Uuid) -> Result<u64> {
    let article_str = encode_uuid(article_id);

    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM likes WHERE article_id = ?1",
          rusqlite::params![article_str],
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(count as u64)
  }

  async fn add_like(&self, article_id: Uuid, input: NewLike) -> Result<Like> {
    let like = Like {
      like_id: Uuid::new_v4(),
      article_id,
      user_email: input.user_email,
      timestamp: now_millis(),
      extra: input.extra,
    };

    let id_str      = encode_uuid(like.like_id);
    let article_str = encode_uuid(like.article_id);
    let email       = like.user_email.clone();
    let extra_str   = encode_body(&like.extra)?;
    let timestamp   = like.timestamp;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO likes (like_id, article_id, user_email, extra_json, timestamp)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, article_str, email, extra_str, timestamp],
        )?;
        Ok(())
      })
      .await?;

    Ok(like)
  }

  async fn remove_like(&self, article_id: Uuid, user_email: &str) -> Result<bool> {
    let article_str = encode_uuid(article_id);
    let email       = user_email.to_owned();

    // Delete-one semantics: even if the de-facto uniqueness invariant has
    // been violated, at most one record goes.
    let deleted: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM likes WHERE like_id IN (
             SELECT like_id FROM likes
             WHERE article_id = ?1 AND user_email = ?2
             LIMIT 1
           )",
          rusqlite::params![article_str, email],
        )?)
      })
      .await?;

    Ok(deleted > 0)
  }

  async fn most_liked(&self, limit: usize) -> Result<Vec<RankedArticle>> {
    let limit_val = limit as i64;

    // Step 1: aggregate like counts per article, top `limit` groups.
    let groups: Vec<(String, i64)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT article_id, COUNT(*) AS total FROM likes
           GROUP BY article_id
           ORDER BY total DESC
           LIMIT ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![limit_val], |row| {
            Ok((row.get(0)?, row.get(1)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    if groups.is_empty() {
      return Ok(Vec::new());
    }

    // Step 2: fetch the corresponding articles. Ids referenced by likes but
    // absent from the article store simply don't come back.
    let ids: Vec<String> = groups.iter().map(|(id, _)| id.clone()).collect();
    let raws: Vec<RawArticle> = self
      .conn
      .call(move |conn| {
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
          "SELECT article_id, title, body_json, timestamp FROM articles
           WHERE article_id IN ({placeholders})"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(ids.iter()), |row| {
            Ok(RawArticle {
              article_id: row.get(0)?,
              title:      row.get(1)?,
              body_json:  row.get(2)?,
              timestamp:  row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    // Step 3: fetch order is unrelated to aggregate order. Pair each
    // article with its carried count and re-sort by that; stable sort keeps
    // store order among equal counts.
    let counts: HashMap<String, i64> = groups.into_iter().collect();
    let mut ranked = raws
      .into_iter()
      .map(|raw| {
        let total = counts.get(&raw.article_id).copied().unwrap_or(0);
        Ok(RankedArticle {
          article:     raw.into_article()?,
          total_likes: total as u64,
        })
      })
      .collect::<Result<Vec<_>>>()?;

    ranked.sort_by(|a, b| b.total_likes.cmp(&a.total_likes));
    Ok(ranked)
  }

  // ── Community posts ───────────────────────────────────────────────────────

  async fn add_post(&self, input: NewCommunityPost) -> Result<CommunityPost> {
    let post = CommunityPost {
      post_id:   Uuid::new_v4(),
      timestamp: now_millis(),
      likes:     0,
      liked_by:  Vec::new(),
      body:      input.body,
    };

    let id_str    = encode_uuid(post.post_id);
    let body_str  = encode_body(&post.body)?;
    let timestamp = post.timestamp;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO community_posts (post_id, body_json, timestamp)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, body_str, timestamp],
        )?;
        Ok(())
      })
      .await?;

    Ok(post)
  }

  async fn list_posts(&self) -> Result<Vec<CommunityPost>> {
    let raws: Vec<RawPost> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT post_id, body_json, timestamp, likes, liked_by
           FROM community_posts
           ORDER BY timestamp DESC, rowid DESC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawPost {
              post_id:   row.get(0)?,
              body_json: row.get(1)?,
              timestamp: row.get(2)?,
              likes:     row.get(3)?,
              liked_by:  row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPost::into_post).collect()
  }

  async fn toggle_post_like(&self, post_id: Uuid, user_email: &str) -> Result<()> {
    // Read-then-write: two round-trips, and the window between them is part
    // of the store contract. The write below is a single-row single-statement
    // update.
    let Some(post) = self.get_post(post_id).await? else {
      return Ok(());
    };

    let was_member = post.liked_by_user(user_email);
    let mut members = post.liked_by;
    if was_member {
      members.retain(|m| m != user_email);
    } else {
      members.push(user_email.to_owned());
    }

    // `likedBy` is semantically a set: normalise duplicates on write, and
    // derive the counter from the membership so `likes == |likedBy|` holds
    // even after a racing toggle.
    let mut seen = HashSet::new();
    members.retain(|m| seen.insert(m.clone()));

    let id_str      = encode_uuid(post_id);
    let likes       = members.len() as i64;
    let members_str = encode_members(&members)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE community_posts SET likes = ?2, liked_by = ?3
           WHERE post_id = ?1",
          rusqlite::params![id_str, likes, members_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(())
  }

  async fn post_liked_by(&self, post_id: Uuid, user_email: &str) -> Result<bool> {
    match self.get_post(post_id).await? {
      Some(post) => Ok(post.liked_by_user(user_email)),
      None => Ok(false),
    }
  }

  // ── Community comments ────────────────────────────────────────────────────

  async fn add_community_comment(
    &self,
    input: NewCommunityComment,
  ) -> Result<CommunityComment> {
    let comment = CommunityComment {
      comment_id: Uuid::new_v4(),
      timestamp:  now_millis(),
      body:       input.body,
    };

    let id_str    = encode_uuid(comment.comment_id);
    let body_str  = encode_body(&comment.body)?;
    let timestamp = comment.timestamp;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO community_comments (comment_id, body_json, timestamp)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, body_str, timestamp],
        )?;
        Ok(())
      })
      .await?;

    Ok(comment)
  }

  async fn list_community_comments(&self) -> Result<Vec<CommunityComment>> {
    let raws: Vec<RawCommunityComment> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT comment_id, body_json, timestamp FROM community_comments
           ORDER BY timestamp DESC, rowid DESC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawCommunityComment {
              comment_id: row.get(0)?,
              body_json:  row.get(1)?,
              timestamp:  row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawCommunityComment::into_comment)
      .collect()
  }

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn list_users(&self) -> Result<Vec<User>> {
    let raws: Vec<RawUser> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT user_id, email, name, photo_url, extra_json FROM users",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawUser {
              user_id:    row.get(0)?,
              email:      row.get(1)?,
              name:       row.get(2)?,
              photo_url:  row.get(3)?,
              extra_json: row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_user).collect()
  }

  async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
    let email = email.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT user_id, email, name, photo_url, extra_json FROM users
             WHERE email = ?1",
            rusqlite::params![email],
            |row| {
              Ok(RawUser {
                user_id:    row.get(0)?,
                email:      row.get(1)?,
                name:       row.get(2)?,
                photo_url:  row.get(3)?,
                extra_json: row.get(4)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn add_user(&self, input: NewUser) -> Result<User> {
    let user = User {
      user_id:   Uuid::new_v4(),
      email:     input.email,
      name:      input.name,
      photo_url: input.photo_url,
      extra:     input.extra,
    };

    let id_str    = encode_uuid(user.user_id);
    let email     = user.email.clone();
    let name      = user.name.clone();
    let photo_url = user.photo_url.clone();
    let extra_str = encode_body(&user.extra)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (user_id, email, name, photo_url, extra_json)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, email, name, photo_url, extra_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(user)
  }

  async fn patch_user(&self, user_id: Uuid, patch: UserPatch) -> Result<bool> {
    let id_str = encode_uuid(user_id);

    if patch.is_empty() {
      // Nothing to write; report whether the target exists.
      let exists: bool = self
        .conn
        .call(move |conn| {
          Ok(conn
            .query_row(
              "SELECT 1 FROM users WHERE user_id = ?1",
              rusqlite::params![id_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false))
        })
        .await?;
      return Ok(exists);
    }

    let name      = patch.name;
    let photo_url = patch.photo_url;

    let matched: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE users SET
             name      = COALESCE(?2, name),
             photo_url = COALESCE(?3, photo_url)
           WHERE user_id = ?1",
          rusqlite::params![id_str, name, photo_url],
        )?)
      })
      .await?;

    Ok(matched > 0)
  }
}
