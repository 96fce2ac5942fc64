// sweetshop/server/src/services/auth_service.rs

//! Account registration, login and password hashing.

use actix_web::web;
use argon2::{
  password_hash::{
    rand_core::OsRng, // For generating random salts
    PasswordHash,
    PasswordHasher,
    PasswordVerifier,
    SaltString,
  },
  Argon2,
};
use serde::Serialize;
use sweetshop_core::Role;
use tracing::{debug, error, info, instrument, warn};

use crate::config::AdminBootstrap;
use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;

/// What register and login hand back to the client.
#[derive(Debug, Serialize)]
pub struct AuthSession {
  pub token: String,
  pub user: User,
}

/// Hashes a plain-text password using Argon2 with a fresh random salt.
#[instrument(name = "auth_service::hash_password", skip(password), err(Display))]
pub fn hash_password(password: &str) -> Result<String, AppError> {
  if password.is_empty() {
    return Err(AppError::invalid_field("password", "must not be empty"));
  }

  let salt = SaltString::generate(&mut OsRng);
  match Argon2::default().hash_password(password.as_bytes(), &salt) {
    Ok(password_hash_obj) => {
      debug!("Password hashed successfully.");
      Ok(password_hash_obj.to_string())
    }
    Err(argon_err) => {
      error!(error = %argon_err, "Argon2 password hashing failed.");
      Err(AppError::Internal(format!("Password hashing process failed: {}", argon_err)))
    }
  }
}

/// Verifies a plain-text password against a stored Argon2 hash.
///
/// `Ok(false)` means the password is wrong; `Err` means the stored hash itself is unusable.
#[instrument(name = "auth_service::verify_password", skip_all, err(Display))]
pub fn verify_password(hashed_password_str: &str, provided_password: &str) -> Result<bool, AppError> {
  let parsed_hash = PasswordHash::new(hashed_password_str).map_err(|parse_err| {
    error!(error = %parse_err, "Failed to parse stored password hash string.");
    AppError::Internal(format!("Invalid stored password hash format: {}", parse_err))
  })?;

  match Argon2::default().verify_password(provided_password.as_bytes(), &parsed_hash) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => Ok(false),
    Err(other_argon_err) => {
      error!(error = %other_argon_err, "Argon2 password verification process encountered an error.");
      Err(AppError::Internal(format!(
        "Password verification process failed: {}",
        other_argon_err
      )))
    }
  }
}

// Argon2 is deliberately slow; keep it off the async workers.
async fn hash_off_thread(password: String) -> Result<String, AppError> {
  web::block(move || hash_password(&password))
    .await
    .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
}

async fn verify_off_thread(hash: String, password: String) -> Result<bool, AppError> {
  web::block(move || verify_password(&hash, &password))
    .await
    .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))?
}

/// Creates a `USER` account and signs the caller in.
#[instrument(name = "auth_service::register", skip(state, password))]
pub async fn register(state: &AppState, email: &str, name: &str, password: String) -> Result<AuthSession, AppError> {
  if state.users.find_by_email(email).await?.is_some() {
    warn!("Registration rejected: email already in use.");
    return Err(AppError::Conflict(format!("An account with email '{}' already exists.", email)));
  }

  let password_hash = hash_off_thread(password).await?;
  let user = User::new(email, name, password_hash, Role::User);
  state.users.insert(user.clone()).await?;
  info!(user_id = %user.id, "User registered.");

  let token = state.tokens.issue(&user.principal())?;
  Ok(AuthSession { token, user })
}

/// Checks credentials and issues a fresh token.
#[instrument(name = "auth_service::login", skip(state, password))]
pub async fn login(state: &AppState, email: &str, password: String) -> Result<AuthSession, AppError> {
  let user = state.users.find_by_email(email).await?.ok_or_else(|| {
    warn!("Login rejected: unknown email.");
    AppError::NotFound("User not found".to_string())
  })?;

  if !verify_off_thread(user.password_hash.clone(), password).await? {
    warn!(user_id = %user.id, "Login rejected: wrong password.");
    return Err(AppError::Auth("Invalid password".to_string()));
  }

  info!(user_id = %user.id, "User logged in.");
  let token = state.tokens.issue(&user.principal())?;
  Ok(AuthSession { token, user })
}

/// Creates the configured admin account unless the email is already registered.
#[instrument(name = "auth_service::ensure_admin", skip_all, fields(email = %bootstrap.email))]
pub async fn ensure_admin(state: &AppState, bootstrap: &AdminBootstrap) -> Result<(), AppError> {
  if let Some(existing) = state.users.find_by_email(&bootstrap.email).await? {
    if existing.role != Role::Admin {
      warn!(user_id = %existing.id, "Bootstrap email belongs to a non-admin account; leaving it unchanged.");
    }
    return Ok(());
  }

  let password_hash = hash_off_thread(bootstrap.password.clone()).await?;
  let admin = User::new(&bootstrap.email, "Administrator", password_hash, Role::Admin);
  match state.users.insert(admin).await {
    Ok(()) => {
      info!("Admin account created.");
      Ok(())
    }
    // Another instance created it first.
    Err(AppError::Conflict(_)) => Ok(()),
    Err(e) => Err(e),
  }
}
