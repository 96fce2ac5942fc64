// sweetshop/server/src/models/user.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use sweetshop_core::{Principal, Role};
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id: Uuid,
  pub email: String,
  pub name: String,
  #[serde(skip_serializing)] // Never send password hash to client
  pub password_hash: String,
  pub role: Role,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl User {
  pub fn new(email: &str, name: &str, password_hash: String, role: Role) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      email: normalize_email(email),
      name: name.trim().to_string(),
      password_hash,
      role,
      created_at: now,
      updated_at: now,
    }
  }

  pub fn principal(&self) -> Principal {
    Principal::new(self.id.to_string(), self.role)
  }
}

/// Emails are compared and stored lower-cased.
pub fn normalize_email(email: &str) -> String {
  email.trim().to_lowercase()
}

/// Row shape of the `users` table; the role is stored as text.
#[derive(Debug, FromRow)]
pub struct UserRow {
  pub id: Uuid,
  pub email: String,
  pub name: String,
  pub password_hash: String,
  pub role: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
  type Error = AppError;

  fn try_from(row: UserRow) -> Result<Self, Self::Error> {
    let role = row
      .role
      .parse::<Role>()
      .map_err(|e| AppError::Internal(format!("Stored role for user {} is invalid: {}", row.id, e)))?;
    Ok(User {
      id: row.id,
      email: row.email,
      name: row.name,
      password_hash: row.password_hash,
      role,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}
