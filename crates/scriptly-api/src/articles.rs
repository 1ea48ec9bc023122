//! Handlers for the article feed endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/totalPages` | Optional `?search=`; pages of 5 |
//! | `GET`  | `/allArticle` | `?page=`, `?limit=`, `?search=`; malformed paging coerces |
//! | `GET`  | `/latestArticles` | Newest 3, no paging |
//! | `POST` | `/addArticle` | Body: article fields; returns insert ack |
//! | `POST` | `/addComment/:id` | Body: comment fields |
//! | `GET`  | `/allCommentsForAnArticle/:id` | Newest first |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use scriptly_core::{
  article::{Article, Comment, NewArticle, NewComment},
  store::{self, ContentStore, FeedQuery, parse_id},
};
use serde::{Deserialize, Serialize};

use crate::{InsertAck, error::ApiError};

// ─── Total pages ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TotalPagesParams {
  pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TotalPagesResponse {
  #[serde(rename = "totalPages")]
  pub total_pages: u64,
}

/// `GET /totalPages[?search=...]`
pub async fn total_pages<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<TotalPagesParams>,
) -> Result<Json<TotalPagesResponse>, ApiError>
where
  S: ContentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  // An empty search string is the same as no search.
  let search = params.search.as_deref().filter(|s| !s.is_empty());
  let count = store
    .count_articles(search)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(TotalPagesResponse { total_pages: store::total_pages(count) }))
}

// ─── Feed listing ─────────────────────────────────────────────────────────────

/// Raw pagination inputs, taken as strings so malformed values can coerce to
/// the defaults instead of failing extraction.
#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub page:   Option<String>,
  pub limit:  Option<String>,
  pub search: Option<String>,
}

/// `GET /allArticle[?page=...][&limit=...][&search=...]`
pub async fn list_all<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Article>>, ApiError>
where
  S: ContentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let query = FeedQuery::from_raw(
    params.page.as_deref(),
    params.limit.as_deref(),
    params.search,
  );
  let articles = store
    .list_articles(&query)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(articles))
}

/// `GET /latestArticles`
pub async fn latest<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Article>>, ApiError>
where
  S: ContentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let articles = store
    .latest_articles()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(articles))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /addArticle` — body: article fields, at least `title`.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewArticle>,
) -> Result<Json<InsertAck>, ApiError>
where
  S: ContentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let article = store
    .add_article(body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(InsertAck::new(article.article_id)))
}

// ─── Comments ─────────────────────────────────────────────────────────────────

/// `POST /addComment/:id`
pub async fn create_comment<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  Json(body): Json<NewComment>,
) -> Result<Json<InsertAck>, ApiError>
where
  S: ContentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let article_id =
    parse_id(&id).map_err(|e| ApiError::BadRequest(e.to_string()))?;
  let comment = store
    .add_comment(article_id, body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(InsertAck::new(comment.comment_id)))
}

/// `GET /allCommentsForAnArticle/:id`
pub async fn comments_for_article<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Vec<Comment>>, ApiError>
where
  S: ContentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let article_id =
    parse_id(&id).map_err(|e| ApiError::BadRequest(e.to_string()))?;
  let comments = store
    .comments_for_article(article_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(comments))
}
