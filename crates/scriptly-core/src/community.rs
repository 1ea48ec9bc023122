//! Community posts and comments.
//!
//! A community post carries its own denormalized engagement state: a `likes`
//! counter and a `likedBy` membership list. The list is represented as an
//! ordered collection but is semantically a set — membership, not order,
//! matters. Invariant: `likes == |likedBy|` at all times; both fields are
//! only ever written together in one compound update.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A stored community post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityPost {
  #[serde(rename = "_id")]
  pub post_id:   Uuid,
  pub timestamp: i64,
  pub likes:     i64,
  #[serde(rename = "likedBy")]
  pub liked_by:  Vec<String>,
  #[serde(flatten)]
  pub body:      Map<String, Value>,
}

impl CommunityPost {
  /// Membership test on the `likedBy` set.
  pub fn liked_by_user(&self, user_email: &str) -> bool {
    self.liked_by.iter().any(|m| m == user_email)
  }
}

/// Caller-supplied fields for a new post. Engagement state starts at
/// `likes = 0`, `likedBy = []`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCommunityPost {
  #[serde(flatten)]
  pub body: Map<String, Value>,
}

/// A comment in the community section. Not tied to any one post — community
/// comments live in a single flat feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityComment {
  #[serde(rename = "_id")]
  pub comment_id: Uuid,
  pub timestamp:  i64,
  #[serde(flatten)]
  pub body:       Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCommunityComment {
  #[serde(flatten)]
  pub body: Map<String, Value>,
}
