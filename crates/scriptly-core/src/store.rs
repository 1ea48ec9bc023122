//! The `ContentStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `scriptly-store-sqlite`). The API layer depends on this abstraction, not
//! on any concrete backend, so handlers can be tested against an in-memory
//! store.

use std::future::Future;

use uuid::Uuid;

use crate::{
  article::{Article, Comment, NewArticle, NewComment},
  community::{
    CommunityComment, CommunityPost, NewCommunityComment, NewCommunityPost,
  },
  engagement::{Like, NewLike, RankedArticle},
  error::{Error, Result},
  user::{NewUser, User, UserPatch},
};

// ─── Policy constants ────────────────────────────────────────────────────────

/// Articles per feed page. Fixed for client compatibility, not configurable.
pub const PAGE_SIZE: u32 = 5;

/// Cap on the latest-articles strip.
pub const LATEST_CAP: usize = 3;

/// Cap on the most-liked ranking.
pub const MOST_LIKED_CAP: usize = 5;

// ─── Identity ────────────────────────────────────────────────────────────────

/// Parse an opaque wire identifier into the store's native id type.
///
/// An unconvertible id is a request error, never a crash.
pub fn parse_id(raw: &str) -> Result<Uuid> {
  Uuid::parse_str(raw).map_err(|_| Error::InvalidId(raw.to_owned()))
}

// ─── Feed query ──────────────────────────────────────────────────────────────

/// Parameters for [`ContentStore::list_articles`].
#[derive(Debug, Clone)]
pub struct FeedQuery {
  /// 1-based page number.
  pub page:   u32,
  /// Maximum articles returned.
  pub limit:  u32,
  /// Case-insensitive substring filter on the article title.
  pub search: Option<String>,
}

impl Default for FeedQuery {
  fn default() -> Self {
    Self { page: 1, limit: PAGE_SIZE, search: None }
  }
}

impl FeedQuery {
  /// Build a query from raw, untrusted pagination inputs.
  ///
  /// Non-numeric or non-positive `page`/`limit` values fall back to page 1
  /// and the fixed page size — malformed input coerces, it never errors.
  /// An empty search string means no filter.
  pub fn from_raw(
    page:   Option<&str>,
    limit:  Option<&str>,
    search: Option<String>,
  ) -> Self {
    Self {
      page: coerce_positive(page, 1),
      limit: coerce_positive(limit, PAGE_SIZE),
      search: search.filter(|s| !s.is_empty()),
    }
  }

  /// Records to skip before the first returned article.
  pub fn offset(&self) -> u32 {
    self.page.saturating_sub(1).saturating_mul(self.limit)
  }
}

fn coerce_positive(raw: Option<&str>, default: u32) -> u32 {
  raw
    .and_then(|s| s.trim().parse::<u32>().ok())
    .filter(|n| *n >= 1)
    .unwrap_or(default)
}

/// Number of pages needed to show `count` articles at the fixed page size.
/// Zero articles means zero pages.
pub fn total_pages(count: u64) -> u64 {
  count.div_ceil(u64::from(PAGE_SIZE))
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Scriptly content store backend.
///
/// Every method is one store round-trip and one suspension point; no method
/// takes an in-process lock. Compound operations (the post-like toggle) are
/// read-then-write across two round-trips — the race window between them is
/// part of the contract, not an accident. See the backend crate for the
/// atomicity each write does guarantee.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ContentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Articles ──────────────────────────────────────────────────────────

  /// Persist a new article. Identity and timestamp are assigned here.
  fn add_article(
    &self,
    input: NewArticle,
  ) -> impl Future<Output = Result<Article, Self::Error>> + Send + '_;

  /// Count articles whose title contains `search` (case-insensitive).
  /// `None` counts everything.
  fn count_articles<'a>(
    &'a self,
    search: Option<&'a str>,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;

  /// Paginated, optionally filtered article feed, newest first.
  fn list_articles<'a>(
    &'a self,
    query: &'a FeedQuery,
  ) -> impl Future<Output = Result<Vec<Article>, Self::Error>> + Send + 'a;

  /// The newest articles, capped at [`LATEST_CAP`]. No search, no paging.
  fn latest_articles(
    &self,
  ) -> impl Future<Output = Result<Vec<Article>, Self::Error>> + Send + '_;

  // ── Comments ──────────────────────────────────────────────────────────

  /// Persist a comment against `article_id`. The reference is advisory —
  /// the article is not required to exist.
  fn add_comment(
    &self,
    article_id: Uuid,
    input: NewComment,
  ) -> impl Future<Output = Result<Comment, Self::Error>> + Send + '_;

  /// All comments for an article, newest first.
  fn comments_for_article(
    &self,
    article_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Comment>, Self::Error>> + Send + '_;

  // ── Engagement ledger ─────────────────────────────────────────────────

  /// Existence check on the (article, user) like key.
  fn has_liked<'a>(
    &'a self,
    article_id: Uuid,
    user_email: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Count of like records for an article.
  fn count_likes(
    &self,
    article_id: Uuid,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Record a like. Merges the article id and a server timestamp into the
  /// caller payload. Does NOT enforce the one-like-per-user invariant —
  /// callers are expected to check [`ContentStore::has_liked`] first, and
  /// the check-then-insert window is an accepted race.
  fn add_like(
    &self,
    article_id: Uuid,
    input: NewLike,
  ) -> impl Future<Output = Result<Like, Self::Error>> + Send + '_;

  /// Delete the like matching the (article, user) key. Removes at most one
  /// record. Returns `false` when nothing matched — callers must report
  /// that distinctly from success.
  fn remove_like<'a>(
    &'a self,
    article_id: Uuid,
    user_email: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// The `limit` most-liked articles, each carrying its aggregate count,
  /// ordered by count descending. An article id referenced by likes but
  /// missing from the article store is silently dropped.
  fn most_liked(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<RankedArticle>, Self::Error>> + Send + '_;

  // ── Community posts ───────────────────────────────────────────────────

  /// Persist a new community post with zeroed engagement state.
  fn add_post(
    &self,
    input: NewCommunityPost,
  ) -> impl Future<Output = Result<CommunityPost, Self::Error>> + Send + '_;

  /// All community posts, newest first.
  fn list_posts(
    &self,
  ) -> impl Future<Output = Result<Vec<CommunityPost>, Self::Error>> + Send + '_;

  /// Flip the (post, user) like state: a member is removed and the counter
  /// decremented, a non-member added and the counter incremented. Both
  /// fields change in one single-row update. A missing post is a no-op.
  fn toggle_post_like<'a>(
    &'a self,
    post_id: Uuid,
    user_email: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Whether `user_email` is in the post's `likedBy` set. A missing post
  /// reads as `false`, never as an error.
  fn post_liked_by<'a>(
    &'a self,
    post_id: Uuid,
    user_email: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  // ── Community comments ────────────────────────────────────────────────

  fn add_community_comment(
    &self,
    input: NewCommunityComment,
  ) -> impl Future<Output = Result<CommunityComment, Self::Error>> + Send + '_;

  /// All community comments, newest first.
  fn list_community_comments(
    &self,
  ) -> impl Future<Output = Result<Vec<CommunityComment>, Self::Error>> + Send + '_;

  // ── Users ─────────────────────────────────────────────────────────────

  fn list_users(
    &self,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  /// Look up an account by email. Returns `None` if not found.
  fn find_user_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// Persist a new account. Callers check [`ContentStore::find_user_by_email`]
  /// first to keep accounts unique per email.
  fn add_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Apply an allow-listed partial update. Returns `false` when no account
  /// matched `user_id`.
  fn patch_user(
    &self,
    user_id: Uuid,
    patch: UserPatch,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
