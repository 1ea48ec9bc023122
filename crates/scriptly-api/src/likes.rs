//! Handlers for article-level engagement endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/checkLike/:id` | `?userEmail=`; `{ isLiked }` |
//! | `GET`  | `/totalLikes/:id` | `{ totalLikes }` |
//! | `GET`  | `/mostLikedArticles` | Top 5 by like count, each with `totalLikes` |
//! | `POST` | `/addLike/:id` | Body: `{ userEmail, ... }`; no uniqueness guard |
//! | `DELETE` | `/deleteLike/:id` | Body: `{ userEmail }`; 404 when nothing matched |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use scriptly_core::{
  engagement::{NewLike, RankedArticle},
  store::{ContentStore, MOST_LIKED_CAP, parse_id},
};
use serde::{Deserialize, Serialize};

use crate::{InsertAck, error::ApiError};

// ─── Check ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CheckLikeParams {
  #[serde(rename = "userEmail")]
  pub user_email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CheckLikeResponse {
  #[serde(rename = "isLiked")]
  pub is_liked: bool,
}

/// `GET /checkLike/:id?userEmail=...`
pub async fn check<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  Query(params): Query<CheckLikeParams>,
) -> Result<Json<CheckLikeResponse>, ApiError>
where
  S: ContentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let article_id =
    parse_id(&id).map_err(|e| ApiError::BadRequest(e.to_string()))?;

  // No user identified, no like.
  let Some(email) = params.user_email else {
    return Ok(Json(CheckLikeResponse { is_liked: false }));
  };

  let is_liked = store
    .has_liked(article_id, &email)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(CheckLikeResponse { is_liked }))
}

// ─── Count ────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct TotalLikesResponse {
  #[serde(rename = "totalLikes")]
  pub total_likes: u64,
}

/// `GET /totalLikes/:id`
pub async fn total<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<TotalLikesResponse>, ApiError>
where
  S: ContentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let article_id =
    parse_id(&id).map_err(|e| ApiError::BadRequest(e.to_string()))?;
  let total_likes = store
    .count_likes(article_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(TotalLikesResponse { total_likes }))
}

// ─── Ranking ──────────────────────────────────────────────────────────────────

/// `GET /mostLikedArticles`
pub async fn most_liked<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<RankedArticle>>, ApiError>
where
  S: ContentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let ranked = store
    .most_liked(MOST_LIKED_CAP)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(ranked))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /addLike/:id` — body carries at least `userEmail`.
///
/// Clients are expected to have consulted `/checkLike/:id` first; this
/// endpoint does not re-check, so two racing adds can both land.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  Json(body): Json<NewLike>,
) -> Result<Json<InsertAck>, ApiError>
where
  S: ContentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let article_id =
    parse_id(&id).map_err(|e| ApiError::BadRequest(e.to_string()))?;
  let like = store
    .add_like(article_id, body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(InsertAck::new(like.like_id)))
}

// ─── Remove ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RemoveLikeBody {
  #[serde(rename = "userEmail")]
  pub user_email: String,
}

/// `DELETE /deleteLike/:id` — body: `{ "userEmail": ... }`.
///
/// A miss is 404, never conflated with success.
pub async fn remove<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  Json(body): Json<RemoveLikeBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ContentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let article_id =
    parse_id(&id).map_err(|e| ApiError::BadRequest(e.to_string()))?;
  let removed = store
    .remove_like(article_id, &body.user_email)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  if removed {
    Ok((StatusCode::OK, "Like deleted successfully"))
  } else {
    Err(ApiError::NotFound("Like not found".to_string()))
  }
}
