//! User account types.
//!
//! Accounts are created on first sign-in and identified by email. Profile
//! edits go through [`UserPatch`], a typed allow-list of mutable fields —
//! arbitrary caller-supplied keys are never merged into a stored user.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A stored user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  #[serde(rename = "_id")]
  pub user_id:   Uuid,
  pub email:     String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name:      Option<String>,
  #[serde(rename = "photoUrl", skip_serializing_if = "Option::is_none")]
  pub photo_url: Option<String>,
  #[serde(flatten)]
  pub extra:     Map<String, Value>,
}

/// Caller-supplied fields for a new account.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
  pub email:     String,
  pub name:      Option<String>,
  #[serde(rename = "photoUrl")]
  pub photo_url: Option<String>,
  #[serde(flatten)]
  pub extra:     Map<String, Value>,
}

/// Allow-listed partial update for a user profile. Fields left as `None`
/// keep their stored values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
  pub name:      Option<String>,
  #[serde(rename = "photoUrl")]
  pub photo_url: Option<String>,
}

impl UserPatch {
  /// True when the patch would change nothing.
  pub fn is_empty(&self) -> bool {
    self.name.is_none() && self.photo_url.is_none()
  }
}
