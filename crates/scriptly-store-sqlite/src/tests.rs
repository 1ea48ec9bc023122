//! Integration tests for `SqliteStore` against an in-memory database.

use scriptly_core::{
  article::{NewArticle, NewComment},
  community::NewCommunityPost,
  engagement::NewLike,
  store::{ContentStore, FeedQuery},
  user::{NewUser, UserPatch},
};
use serde_json::{Map, json};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn article(title: &str) -> NewArticle {
  let mut body = Map::new();
  body.insert("content".into(), json!("lorem"));
  NewArticle { title: title.into(), body }
}

fn like_payload(email: &str) -> NewLike {
  NewLike { user_email: email.into(), extra: Map::new() }
}

// ─── Feed ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_article_assigns_identity_and_timestamp() {
  let s = store().await;

  let a = s.add_article(article("First post")).await.unwrap();
  assert!(a.timestamp > 0);
  assert_eq!(a.title, "First post");

  let listed = s.list_articles(&FeedQuery::default()).await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].article_id, a.article_id);
  assert_eq!(listed[0].body.get("content"), Some(&json!("lorem")));
}

#[tokio::test]
async fn list_articles_returns_at_most_limit_newest_first() {
  let s = store().await;
  let mut ids = Vec::new();
  for i in 0..7 {
    ids.push(s.add_article(article(&format!("a{i}"))).await.unwrap().article_id);
  }

  let page = s.list_articles(&FeedQuery::default()).await.unwrap();
  assert_eq!(page.len(), 5);
  // Newest first: the last five inserted, in reverse insertion order.
  let got: Vec<_> = page.iter().map(|a| a.article_id).collect();
  let want: Vec<_> = ids.iter().rev().take(5).copied().collect();
  assert_eq!(got, want);
  assert!(page.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
}

#[tokio::test]
async fn second_page_returns_the_two_oldest_of_seven() {
  let s = store().await;
  let mut ids = Vec::new();
  for i in 0..7 {
    ids.push(s.add_article(article(&format!("a{i}"))).await.unwrap().article_id);
  }

  let query = FeedQuery { page: 2, limit: 5, search: None };
  let page = s.list_articles(&query).await.unwrap();
  let got: Vec<_> = page.iter().map(|a| a.article_id).collect();
  assert_eq!(got, vec![ids[1], ids[0]]);
}

#[tokio::test]
async fn search_matches_case_insensitive_substrings() {
  let s = store().await;
  s.add_article(article("Hello World")).await.unwrap();
  s.add_article(article("Unrelated")).await.unwrap();

  for needle in ["hello", "WORLD", "lo Wo"] {
    assert_eq!(s.count_articles(Some(needle)).await.unwrap(), 1, "{needle}");
    let query = FeedQuery { search: Some(needle.into()), ..Default::default() };
    let found = s.list_articles(&query).await.unwrap();
    assert_eq!(found.len(), 1, "{needle}");
    assert_eq!(found[0].title, "Hello World");
  }

  assert_eq!(s.count_articles(Some("xyz")).await.unwrap(), 0);
  assert_eq!(s.count_articles(None).await.unwrap(), 2);
}

#[tokio::test]
async fn empty_store_searched_counts_zero_and_lists_nothing() {
  let s = store().await;
  assert_eq!(s.count_articles(Some("x")).await.unwrap(), 0);
  assert_eq!(scriptly_core::store::total_pages(0), 0);

  let query = FeedQuery { search: Some("x".into()), ..Default::default() };
  assert!(s.list_articles(&query).await.unwrap().is_empty());
}

#[tokio::test]
async fn latest_articles_caps_at_three() {
  let s = store().await;
  let mut ids = Vec::new();
  for i in 0..5 {
    ids.push(s.add_article(article(&format!("a{i}"))).await.unwrap().article_id);
  }

  let latest = s.latest_articles().await.unwrap();
  let got: Vec<_> = latest.iter().map(|a| a.article_id).collect();
  let want: Vec<_> = ids.iter().rev().take(3).copied().collect();
  assert_eq!(got, want);
}

// ─── Comments ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn comments_list_per_article_newest_first() {
  let s = store().await;
  let a = s.add_article(article("a")).await.unwrap();
  let b = s.add_article(article("b")).await.unwrap();

  let first = s
    .add_comment(a.article_id, NewComment::default())
    .await
    .unwrap();
  let second = s
    .add_comment(a.article_id, NewComment::default())
    .await
    .unwrap();
  s.add_comment(b.article_id, NewComment::default()).await.unwrap();

  let comments = s.comments_for_article(a.article_id).await.unwrap();
  let got: Vec<_> = comments.iter().map(|c| c.comment_id).collect();
  assert_eq!(got, vec![second.comment_id, first.comment_id]);
}

// ─── Engagement ledger ───────────────────────────────────────────────────────

#[tokio::test]
async fn like_check_add_remove_roundtrip() {
  let s = store().await;
  let a = s.add_article(article("a")).await.unwrap();

  assert!(!s.has_liked(a.article_id, "a@x.com").await.unwrap());

  let like = s
    .add_like(a.article_id, like_payload("a@x.com"))
    .await
    .unwrap();
  assert_eq!(like.article_id, a.article_id);
  assert!(like.timestamp > 0);
  assert!(s.has_liked(a.article_id, "a@x.com").await.unwrap());
  assert_eq!(s.count_likes(a.article_id).await.unwrap(), 1);

  assert!(s.remove_like(a.article_id, "a@x.com").await.unwrap());
  assert!(!s.has_liked(a.article_id, "a@x.com").await.unwrap());
  assert_eq!(s.count_likes(a.article_id).await.unwrap(), 0);
}

#[tokio::test]
async fn remove_like_reports_not_found_for_missing_pair() {
  let s = store().await;
  let a = s.add_article(article("a")).await.unwrap();
  assert!(!s.remove_like(a.article_id, "nobody@x.com").await.unwrap());
}

#[tokio::test]
async fn remove_like_deletes_at_most_one_record() {
  let s = store().await;
  let a = s.add_article(article("a")).await.unwrap();

  // Two racing inserts can both land; the store does not enforce the
  // one-like-per-user invariant.
  s.add_like(a.article_id, like_payload("a@x.com")).await.unwrap();
  s.add_like(a.article_id, like_payload("a@x.com")).await.unwrap();
  assert_eq!(s.count_likes(a.article_id).await.unwrap(), 2);

  assert!(s.remove_like(a.article_id, "a@x.com").await.unwrap());
  assert_eq!(s.count_likes(a.article_id).await.unwrap(), 1);
  assert!(s.has_liked(a.article_id, "a@x.com").await.unwrap());
}

#[tokio::test]
async fn count_likes_is_per_article() {
  let s = store().await;
  let a = s.add_article(article("a")).await.unwrap();
  let b = s.add_article(article("b")).await.unwrap();

  s.add_like(a.article_id, like_payload("1@x.com")).await.unwrap();
  s.add_like(a.article_id, like_payload("2@x.com")).await.unwrap();
  s.add_like(b.article_id, like_payload("1@x.com")).await.unwrap();

  assert_eq!(s.count_likes(a.article_id).await.unwrap(), 2);
  assert_eq!(s.count_likes(b.article_id).await.unwrap(), 1);
}

// ─── Ranking ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn most_liked_ranks_by_count_descending() {
  let s = store().await;
  let a = s.add_article(article("a")).await.unwrap();
  let b = s.add_article(article("b")).await.unwrap();
  let c = s.add_article(article("c")).await.unwrap();

  for email in ["1@x.com", "2@x.com", "3@x.com"] {
    s.add_like(a.article_id, like_payload(email)).await.unwrap();
  }
  s.add_like(b.article_id, like_payload("1@x.com")).await.unwrap();
  s.add_like(c.article_id, like_payload("1@x.com")).await.unwrap();

  let ranked = s.most_liked(5).await.unwrap();
  assert_eq!(ranked.len(), 3);
  assert_eq!(ranked[0].article.article_id, a.article_id);
  assert_eq!(ranked[0].total_likes, 3);
  assert!(ranked.windows(2).all(|w| w[0].total_likes >= w[1].total_likes));
}

#[tokio::test]
async fn most_liked_drops_ids_with_no_article() {
  let s = store().await;
  let a = s.add_article(article("a")).await.unwrap();
  s.add_like(a.article_id, like_payload("1@x.com")).await.unwrap();

  // Likes pointing at an article that was never stored; referential
  // integrity is advisory.
  let ghost = Uuid::new_v4();
  s.add_like(ghost, like_payload("1@x.com")).await.unwrap();
  s.add_like(ghost, like_payload("2@x.com")).await.unwrap();

  let ranked = s.most_liked(5).await.unwrap();
  assert_eq!(ranked.len(), 1);
  assert_eq!(ranked[0].article.article_id, a.article_id);
}

#[tokio::test]
async fn most_liked_with_no_likes_is_empty() {
  let s = store().await;
  s.add_article(article("a")).await.unwrap();
  assert!(s.most_liked(5).await.unwrap().is_empty());
}

#[tokio::test]
async fn most_liked_respects_limit() {
  let s = store().await;
  for i in 0..3 {
    let a = s.add_article(article(&format!("a{i}"))).await.unwrap();
    s.add_like(a.article_id, like_payload("1@x.com")).await.unwrap();
  }
  assert_eq!(s.most_liked(2).await.unwrap().len(), 2);
}

// ─── Community posts ─────────────────────────────────────────────────────────

#[tokio::test]
async fn add_post_starts_with_zero_engagement() {
  let s = store().await;
  let post = s.add_post(NewCommunityPost::default()).await.unwrap();
  assert_eq!(post.likes, 0);
  assert!(post.liked_by.is_empty());

  let posts = s.list_posts().await.unwrap();
  assert_eq!(posts.len(), 1);
  assert_eq!(posts[0].post_id, post.post_id);
}

#[tokio::test]
async fn toggle_twice_restores_original_state() {
  let s = store().await;
  let post = s.add_post(NewCommunityPost::default()).await.unwrap();

  s.toggle_post_like(post.post_id, "a@x.com").await.unwrap();
  let after_like = s.list_posts().await.unwrap().remove(0);
  assert_eq!(after_like.likes, 1);
  assert_eq!(after_like.liked_by, vec!["a@x.com".to_string()]);
  assert!(s.post_liked_by(post.post_id, "a@x.com").await.unwrap());

  s.toggle_post_like(post.post_id, "a@x.com").await.unwrap();
  let after_unlike = s.list_posts().await.unwrap().remove(0);
  assert_eq!(after_unlike.likes, 0);
  assert!(after_unlike.liked_by.is_empty());
  assert!(!s.post_liked_by(post.post_id, "a@x.com").await.unwrap());
}

#[tokio::test]
async fn toggle_tracks_members_independently() {
  let s = store().await;
  let post = s.add_post(NewCommunityPost::default()).await.unwrap();

  s.toggle_post_like(post.post_id, "a@x.com").await.unwrap();
  s.toggle_post_like(post.post_id, "b@x.com").await.unwrap();
  s.toggle_post_like(post.post_id, "a@x.com").await.unwrap();

  let current = s.list_posts().await.unwrap().remove(0);
  assert_eq!(current.likes, 1);
  assert_eq!(current.liked_by, vec!["b@x.com".to_string()]);
}

#[tokio::test]
async fn toggle_missing_post_acks_without_effect() {
  let s = store().await;
  s.toggle_post_like(Uuid::new_v4(), "a@x.com").await.unwrap();
  assert!(s.list_posts().await.unwrap().is_empty());
}

#[tokio::test]
async fn post_liked_by_missing_post_is_false() {
  let s = store().await;
  assert!(!s.post_liked_by(Uuid::new_v4(), "a@x.com").await.unwrap());
}

#[tokio::test]
async fn toggle_normalises_a_duplicated_member() {
  let s = store().await;

  // A racing double-toggle can leave a duplicate entry behind; seed that
  // state directly.
  let post_id = Uuid::new_v4();
  let id_str = post_id.hyphenated().to_string();
  s.raw_conn()
    .call(move |conn| {
      conn.execute(
        "INSERT INTO community_posts (post_id, body_json, timestamp, likes, liked_by)
         VALUES (?1, '{}', 0, 2, '[\"a@x.com\",\"a@x.com\"]')",
        rusqlite::params![id_str],
      )?;
      Ok(())
    })
    .await
    .unwrap();

  // Unliking removes every copy and re-derives the counter.
  s.toggle_post_like(post_id, "a@x.com").await.unwrap();
  let current = s.list_posts().await.unwrap().remove(0);
  assert_eq!(current.likes, 0);
  assert!(current.liked_by.is_empty());
}

// ─── Community comments ──────────────────────────────────────────────────────

#[tokio::test]
async fn community_comments_list_newest_first() {
  let s = store().await;
  let first = s
    .add_community_comment(Default::default())
    .await
    .unwrap();
  let second = s
    .add_community_comment(Default::default())
    .await
    .unwrap();

  let comments = s.list_community_comments().await.unwrap();
  let got: Vec<_> = comments.iter().map(|c| c.comment_id).collect();
  assert_eq!(got, vec![second.comment_id, first.comment_id]);
}

// ─── Users ───────────────────────────────────────────────────────────────────

fn user(email: &str) -> NewUser {
  NewUser {
    email:     email.into(),
    name:      Some("Alice".into()),
    photo_url: None,
    extra:     Map::new(),
  }
}

#[tokio::test]
async fn add_and_find_user_by_email() {
  let s = store().await;
  let created = s.add_user(user("alice@x.com")).await.unwrap();

  let found = s.find_user_by_email("alice@x.com").await.unwrap().unwrap();
  assert_eq!(found.user_id, created.user_id);
  assert_eq!(found.name.as_deref(), Some("Alice"));

  assert!(s.find_user_by_email("bob@x.com").await.unwrap().is_none());
}

#[tokio::test]
async fn patch_user_updates_only_allowlisted_fields() {
  let s = store().await;
  let created = s.add_user(user("alice@x.com")).await.unwrap();

  let patch = UserPatch {
    name:      Some("Alice L".into()),
    photo_url: Some("https://cdn.example/alice.png".into()),
  };
  assert!(s.patch_user(created.user_id, patch).await.unwrap());

  let updated = s.find_user_by_email("alice@x.com").await.unwrap().unwrap();
  assert_eq!(updated.name.as_deref(), Some("Alice L"));
  assert_eq!(
    updated.photo_url.as_deref(),
    Some("https://cdn.example/alice.png")
  );
  assert_eq!(updated.email, "alice@x.com");
}

#[tokio::test]
async fn patch_user_keeps_unset_fields() {
  let s = store().await;
  let created = s.add_user(user("alice@x.com")).await.unwrap();

  let patch = UserPatch { name: Some("Alice L".into()), photo_url: None };
  assert!(s.patch_user(created.user_id, patch).await.unwrap());

  let updated = s.find_user_by_email("alice@x.com").await.unwrap().unwrap();
  assert_eq!(updated.name.as_deref(), Some("Alice L"));
  assert!(updated.photo_url.is_none());
}

#[tokio::test]
async fn patch_user_missing_returns_false() {
  let s = store().await;
  let patch = UserPatch { name: Some("x".into()), photo_url: None };
  assert!(!s.patch_user(Uuid::new_v4(), patch).await.unwrap());
}

#[tokio::test]
async fn empty_patch_reports_existence() {
  let s = store().await;
  let created = s.add_user(user("alice@x.com")).await.unwrap();

  assert!(s.patch_user(created.user_id, UserPatch::default()).await.unwrap());
  assert!(!s.patch_user(Uuid::new_v4(), UserPatch::default()).await.unwrap());
}
