//! JSON REST API for Scriptly.
//!
//! Exposes an axum [`Router`] backed by any
//! [`scriptly_core::store::ContentStore`]. Transport concerns (listener,
//! request tracing) are the caller's responsibility.
//!
//! Every handler owns its own failure translation: store errors never
//! escape as panics, and only `/v1/api/post` swallows them into a negative
//! result instead of a 500.

pub mod articles;
pub mod community;
pub mod error;
pub mod likes;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, patch, post},
};
use scriptly_core::store::ContentStore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use error::ApiError;

// ─── Acknowledgements ────────────────────────────────────────────────────────

/// Insert acknowledgment returned by the create endpoints — the
/// `{ acknowledged, insertedId }` shape existing clients already parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertAck {
  pub acknowledged: bool,
  #[serde(rename = "insertedId")]
  pub inserted_id:  Uuid,
}

impl InsertAck {
  pub fn new(inserted_id: Uuid) -> Self {
    Self { acknowledged: true, inserted_id }
  }
}

/// Update acknowledgment returned by the patch endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAck {
  pub acknowledged:  bool,
  #[serde(rename = "matchedCount")]
  pub matched_count: u64,
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: ContentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route("/", get(root))
    // Feed
    .route("/totalPages", get(articles::total_pages::<S>))
    .route("/allArticle", get(articles::list_all::<S>))
    .route("/latestArticles", get(articles::latest::<S>))
    .route("/addArticle", post(articles::create::<S>))
    .route("/addComment/{id}", post(articles::create_comment::<S>))
    .route(
      "/allCommentsForAnArticle/{id}",
      get(articles::comments_for_article::<S>),
    )
    // Engagement
    .route("/mostLikedArticles", get(likes::most_liked::<S>))
    .route("/checkLike/{id}", get(likes::check::<S>))
    .route("/totalLikes/{id}", get(likes::total::<S>))
    .route("/addLike/{id}", post(likes::create::<S>))
    .route("/deleteLike/{id}", delete(likes::remove::<S>))
    // Community
    .route(
      "/v1/api/posts",
      get(community::list_posts::<S>).post(community::create_post::<S>),
    )
    .route("/v1/api/posts/{postId}/likes", post(community::toggle_like::<S>))
    .route("/v1/api/post", get(community::check_post_like::<S>))
    .route(
      "/v1/api/CommunityComments",
      get(community::list_comments::<S>).post(community::create_comment::<S>),
    )
    // Users
    .route("/v1/api/all-users", get(users::list::<S>))
    .route("/v1/api/post-user", post(users::create::<S>))
    .route("/v1/api/patch-user/{id}", patch(users::update::<S>))
    .with_state(store)
}

/// `GET /` — liveness banner.
async fn root() -> &'static str { "Scriptly Server Running" }

// ─── Integration tests ────────────────────────────────────────────────────────
