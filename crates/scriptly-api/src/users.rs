//! Handlers for user account endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/v1/api/all-users` | Every account |
//! | `POST` | `/v1/api/post-user` | Create-if-absent, keyed by email |
//! | `PATCH` | `/v1/api/patch-user/:id` | Allow-listed partial update |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use scriptly_core::{
  store::{ContentStore, parse_id},
  user::{NewUser, User, UserPatch},
};
use serde::Serialize;
use uuid::Uuid;

use crate::{InsertAck, UpdateAck, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /v1/api/all-users`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<User>>, ApiError>
where
  S: ContentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let users = store
    .list_users()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(users))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CreateUserResponse {
  Created(InsertAck),
  AlreadyExists {
    message:     &'static str,
    #[serde(rename = "insertedId")]
    inserted_id: Option<Uuid>,
  },
}

/// `POST /v1/api/post-user` — creates the account unless one already exists
/// for the email.
///
/// The existence check and the insert are separate store operations, same as
/// every other create-if-absent in this API.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewUser>,
) -> Result<Json<CreateUserResponse>, ApiError>
where
  S: ContentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let existing = store
    .find_user_by_email(&body.email)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  if existing.is_some() {
    return Ok(Json(CreateUserResponse::AlreadyExists {
      message:     "User Already Exists",
      inserted_id: None,
    }));
  }

  let user = store
    .add_user(body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(CreateUserResponse::Created(InsertAck::new(user.user_id))))
}

// ─── Patch ────────────────────────────────────────────────────────────────────

/// `PATCH /v1/api/patch-user/:id` — body: [`UserPatch`]. Fields outside the
/// allow-list are ignored by deserialisation, never merged into the account.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  Json(body): Json<UserPatch>,
) -> Result<Json<UpdateAck>, ApiError>
where
  S: ContentStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let user_id =
    parse_id(&id).map_err(|e| ApiError::BadRequest(e.to_string()))?;
  let matched = store
    .patch_user(user_id, body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(UpdateAck {
    acknowledged:  true,
    matched_count: u64::from(matched),
  }))
}
