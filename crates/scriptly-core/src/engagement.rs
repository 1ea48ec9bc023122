//! Like records and the ranked-article projection.
//!
//! A like is the only entity in the system with a create/delete lifecycle:
//! created by "add like", destroyed by "remove like" (hard delete). The
//! (articleId, userEmail) pair is a de-facto unique key — enforced by
//! application logic, not by the storage layer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::article::Article;

/// A stored like. Conceptually keyed by (article_id, user_email); the store
/// holds no uniqueness constraint on the pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Like {
  #[serde(rename = "_id")]
  pub like_id:    Uuid,
  #[serde(rename = "articleId")]
  pub article_id: Uuid,
  #[serde(rename = "userEmail")]
  pub user_email: String,
  pub timestamp:  i64,
  #[serde(flatten)]
  pub extra:      Map<String, Value>,
}

/// Caller payload for a new like. Carries at least the user email; any
/// extra fields are stored alongside. The article id and timestamp are
/// merged in by the store.
#[derive(Debug, Clone, Deserialize)]
pub struct NewLike {
  #[serde(rename = "userEmail")]
  pub user_email: String,
  #[serde(flatten)]
  pub extra:      Map<String, Value>,
}

/// An article annotated with its aggregate like count, as produced by the
/// most-liked ranking. The count is carried explicitly with each record so
/// rank order never depends on fetch order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedArticle {
  #[serde(flatten)]
  pub article:     Article,
  #[serde(rename = "totalLikes")]
  pub total_likes: u64,
}
