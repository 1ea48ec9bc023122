//! Article and comment types — the published content of the site.
//!
//! An article is create-once, read-many: nothing in the system mutates it
//! after insertion. Beyond the searchable `title` and the server-assigned
//! `timestamp`, the body is an open set of caller-supplied fields, carried
//! as a flattened JSON map so the wire shape matches whatever the client
//! posted.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A stored article. `timestamp` is epoch milliseconds, assigned by the
/// store at insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
  #[serde(rename = "_id")]
  pub article_id: Uuid,
  pub title:      String,
  pub timestamp:  i64,
  #[serde(flatten)]
  pub body:       Map<String, Value>,
}

/// Caller-supplied fields for a new article. Identity and timestamp are
/// assigned by the store.
#[derive(Debug, Clone, Deserialize)]
pub struct NewArticle {
  pub title: String,
  #[serde(flatten)]
  pub body:  Map<String, Value>,
}

/// A comment on an article. The article reference is advisory — no
/// foreign-key enforcement exists anywhere in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
  #[serde(rename = "_id")]
  pub comment_id: Uuid,
  #[serde(rename = "articleId")]
  pub article_id: Uuid,
  pub timestamp:  i64,
  #[serde(flatten)]
  pub body:       Map<String, Value>,
}

/// Caller-supplied fields for a new comment. The target article id comes
/// from the request path, not the body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewComment {
  #[serde(flatten)]
  pub body: Map<String, Value>,
}
