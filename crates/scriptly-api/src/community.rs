//! Handlers for the community section.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/v1/api/posts` | Body: post fields; returns insert ack |
//! | `GET`  | `/v1/api/posts` | Newest first |
//! | `POST` | `/v1/api/posts/:postId/likes` | Body: `{ userEmail }`; like toggle, 200 empty |
//! | `GET`  | `/v1/api/post` | `?post_Id=&userEmail=`; `{ Success }`, never errors |
//! | `POST` | `/v1/api/CommunityComments` | Body: comment fields |
//! | `GET`  | `/v1/api/CommunityComments` | Newest first |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
};
use scriptly_core::{
  community::{
    CommunityComment, CommunityPost, NewCommunityComment, NewCommunityPost,
  },
  store::{ContentStore, parse_id},
};
use serde::{Deserialize, Serialize};

use crate::{InsertAck, error::ApiError};

// ─── Posts ────────────────────────────────────────────────────────────────────

/// `POST /v1/api/posts`
pub async fn create_post<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewCommunityPost>,
) -> Result<Json<InsertAck>, ApiError>
where
  S: ContentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let post = store
    .add_post(body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(InsertAck::new(post.post_id)))
}

/// `GET /v1/api/posts`
pub async fn list_posts<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<CommunityPost>>, ApiError>
where
  S: ContentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let posts = store
    .list_posts()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(posts))
}

// ─── Like toggle ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ToggleLikeBody {
  #[serde(rename = "userEmail")]
  pub user_email: String,
}

/// `POST /v1/api/posts/:postId/likes` — flips the (post, user) like state.
/// Acks with an empty 200 either way.
pub async fn toggle_like<S>(
  State(store): State<Arc<S>>,
  Path(post_id): Path<String>,
  Json(body): Json<ToggleLikeBody>,
) -> Result<StatusCode, ApiError>
where
  S: ContentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let post_id =
    parse_id(&post_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;
  store
    .toggle_post_like(post_id, &body.user_email)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(StatusCode::OK)
}

// ─── Like status ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PostCheckParams {
  #[serde(rename = "post_Id")]
  pub post_id:    Option<String>,
  #[serde(rename = "userEmail")]
  pub user_email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PostLikeStatus {
  #[serde(rename = "Success")]
  pub success: bool,
}

/// `GET /v1/api/post?post_Id=...&userEmail=...`
///
/// Fail-safe read: a missing post, an unconvertible id, or a store failure
/// all degrade to `{ "Success": false }` — this endpoint never surfaces an
/// error.
pub async fn check_post_like<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<PostCheckParams>,
) -> Json<PostLikeStatus>
where
  S: ContentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Json(PostLikeStatus { success: liked_status(&*store, params).await })
}

async fn liked_status<S>(store: &S, params: PostCheckParams) -> bool
where
  S: ContentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let (Some(raw_id), Some(email)) = (params.post_id, params.user_email) else {
    return false;
  };
  let Ok(post_id) = parse_id(&raw_id) else {
    return false;
  };

  match store.post_liked_by(post_id, &email).await {
    Ok(liked) => liked,
    Err(e) => {
      tracing::warn!(error = %e, "post like check failed; reporting not liked");
      false
    }
  }
}

// ─── Comments ─────────────────────────────────────────────────────────────────

/// `POST /v1/api/CommunityComments`
pub async fn create_comment<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewCommunityComment>,
) -> Result<Json<InsertAck>, ApiError>
where
  S: ContentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let comment = store
    .add_community_comment(body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(InsertAck::new(comment.comment_id)))
}

/// `GET /v1/api/CommunityComments`
pub async fn list_comments<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<CommunityComment>>, ApiError>
where
  S: ContentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let comments = store
    .list_community_comments()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(comments))
}
