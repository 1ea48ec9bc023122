//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Open body fields are stored as compact JSON objects, `likedBy` as a JSON
//! array, timestamps as integer epoch milliseconds, and UUIDs as hyphenated
//! lowercase strings.

use scriptly_core::{
  article::{Article, Comment},
  community::{CommunityComment, CommunityPost},
  user::User,
};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::Result;

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── Open body fields ────────────────────────────────────────────────────────

pub fn encode_body(body: &Map<String, Value>) -> Result<String> {
  Ok(serde_json::to_string(body)?)
}

pub fn decode_body(s: &str) -> Result<Map<String, Value>> {
  Ok(serde_json::from_str(s)?)
}

// ─── likedBy membership list ─────────────────────────────────────────────────

pub fn encode_members(members: &[String]) -> Result<String> {
  Ok(serde_json::to_string(members)?)
}

pub fn decode_members(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from an `articles` row.
pub struct RawArticle {
  pub article_id: String,
  pub title:      String,
  pub body_json:  String,
  pub timestamp:  i64,
}

impl RawArticle {
  pub fn into_article(self) -> Result<Article> {
    Ok(Article {
      article_id: decode_uuid(&self.article_id)?,
      title:      self.title,
      timestamp:  self.timestamp,
      body:       decode_body(&self.body_json)?,
    })
  }
}

/// Raw strings read directly from a `comments` row.
pub struct RawComment {
  pub comment_id: String,
  pub article_id: String,
  pub body_json:  String,
  pub timestamp:  i64,
}

impl RawComment {
  pub fn into_comment(self) -> Result<Comment> {
    Ok(Comment {
      comment_id: decode_uuid(&self.comment_id)?,
      article_id: decode_uuid(&self.article_id)?,
      timestamp:  self.timestamp,
      body:       decode_body(&self.body_json)?,
    })
  }
}

/// Raw strings read directly from a `community_posts` row.
pub struct RawPost {
  pub post_id:   String,
  pub body_json: String,
  pub timestamp: i64,
  pub likes:     i64,
  pub liked_by:  String,
}

impl RawPost {
  pub fn into_post(self) -> Result<CommunityPost> {
    Ok(CommunityPost {
      post_id:   decode_uuid(&self.post_id)?,
      timestamp: self.timestamp,
      likes:     self.likes,
      liked_by:  decode_members(&self.liked_by)?,
      body:      decode_body(&self.body_json)?,
    })
  }
}

/// Raw strings read directly from a `community_comments` row.
pub struct RawCommunityComment {
  pub comment_id: String,
  pub body_json:  String,
  pub timestamp:  i64,
}

impl RawCommunityComment {
  pub fn into_comment(self) -> Result<CommunityComment> {
    Ok(CommunityComment {
      comment_id: decode_uuid(&self.comment_id)?,
      timestamp:  self.timestamp,
      body:       decode_body(&self.body_json)?,
    })
  }
}

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:    String,
  pub email:      String,
  pub name:       Option<String>,
  pub photo_url:  Option<String>,
  pub extra_json: String,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:   decode_uuid(&self.user_id)?,
      email:     self.email,
      name:      self.name,
      photo_url: self.photo_url,
      extra:     decode_body(&self.extra_json)?,
    })
  }
}
