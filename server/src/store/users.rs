// sweetshop/server/src/store/users.rs

use async_trait::async_trait;
use parking_lot::RwLock;
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::{error, instrument};

use crate::errors::AppError;
use crate::models::user::{normalize_email, User, UserRow};

/// Account storage. Emails are unique after normalization.
#[async_trait]
pub trait UserStore: Send + Sync {
  async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

  /// Fails with `AppError::Conflict` if the email is already registered.
  async fn insert(&self, user: User) -> Result<(), AppError>;
}

#[derive(Debug, Default)]
pub struct InMemoryUserStore {
  by_email: RwLock<HashMap<String, User>>,
}

impl InMemoryUserStore {
  pub fn new() -> Self {
    Self::default()
  }
}

fn duplicate_email(email: &str) -> AppError {
  AppError::Conflict(format!("An account with email '{}' already exists.", email))
}

#[async_trait]
impl UserStore for InMemoryUserStore {
  async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
    Ok(self.by_email.read().get(&normalize_email(email)).cloned())
  }

  async fn insert(&self, user: User) -> Result<(), AppError> {
    let mut by_email = self.by_email.write();
    if by_email.contains_key(&user.email) {
      return Err(duplicate_email(&user.email));
    }
    by_email.insert(user.email.clone(), user);
    Ok(())
  }
}

#[derive(Debug, Clone)]
pub struct PgUserStore {
  pool: PgPool,
}

impl PgUserStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl UserStore for PgUserStore {
  #[instrument(name = "pg_users::find_by_email", skip(self))]
  async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
    let row: Option<UserRow> = sqlx::query_as(
      "SELECT id, email, name, password_hash, role, created_at, updated_at FROM users WHERE email = $1",
    )
    .bind(normalize_email(email))
    .fetch_optional(&self.pool)
    .await
    .map_err(|e| {
      error!("Failed to look up user by email: {}", e);
      AppError::Sqlx(e)
    })?;
    row.map(User::try_from).transpose()
  }

  #[instrument(name = "pg_users::insert", skip_all, fields(user_id = %user.id))]
  async fn insert(&self, user: User) -> Result<(), AppError> {
    let result = sqlx::query(
      "INSERT INTO users (id, email, name, password_hash, role, created_at, updated_at) \
       VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(user.id)
    .bind(&user.email)
    .bind(&user.name)
    .bind(&user.password_hash)
    .bind(user.role.as_str())
    .bind(user.created_at)
    .bind(user.updated_at)
    .execute(&self.pool)
    .await;

    match result {
      Ok(_) => Ok(()),
      Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(duplicate_email(&user.email)),
      Err(e) => {
        error!("Failed to insert user: {}", e);
        Err(AppError::Sqlx(e))
      }
    }
  }
}
