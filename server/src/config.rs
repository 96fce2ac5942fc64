// sweetshop/server/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;
use sweetshop_core::{LedgerConfig, RetryPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Text,
  Json,
}

/// Credentials for an admin account created at startup when it does not exist yet.
#[derive(Clone)]
pub struct AdminBootstrap {
  pub email: String,
  pub password: String,
}

impl std::fmt::Debug for AdminBootstrap {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("AdminBootstrap").field("email", &self.email).finish_non_exhaustive()
  }
}

#[derive(Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  /// `None` runs the service on in-memory stores.
  pub database_url: Option<String>,
  pub jwt_secret: String,
  pub token_ttl_hours: i64,
  pub storage_timeout: Duration,
  pub ledger_max_attempts: u32,
  pub seed_db: bool,
  pub admin: Option<AdminBootstrap>,
  pub log_format: LogFormat,
}

impl std::fmt::Debug for AppConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("AppConfig")
      .field("server_host", &self.server_host)
      .field("server_port", &self.server_port)
      .field("database_url", &self.database_url.as_ref().map(|_| "[REDACTED]"))
      .field("jwt_secret", &"[REDACTED]")
      .field("token_ttl_hours", &self.token_ttl_hours)
      .field("storage_timeout", &self.storage_timeout)
      .field("ledger_max_attempts", &self.ledger_max_attempts)
      .field("seed_db", &self.seed_db)
      .field("admin", &self.admin)
      .field("log_format", &self.log_format)
      .finish()
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
    let server_port = parse_or("SERVER_PORT", get_env("SERVER_PORT"), 8080u16)?;
    let database_url = get_env("DATABASE_URL");
    let jwt_secret = get_env("JWT_SECRET")
      .ok_or_else(|| AppError::Config("Missing environment variable 'JWT_SECRET'".to_string()))?;
    let token_ttl_hours = parse_or("TOKEN_TTL_HOURS", get_env("TOKEN_TTL_HOURS"), 8i64)?;
    if token_ttl_hours <= 0 {
      return Err(AppError::Config("TOKEN_TTL_HOURS must be positive".to_string()));
    }
    let storage_timeout_ms = parse_or("STORAGE_TIMEOUT_MS", get_env("STORAGE_TIMEOUT_MS"), 2000u64)?;
    let ledger_max_attempts = parse_or("LEDGER_MAX_ATTEMPTS", get_env("LEDGER_MAX_ATTEMPTS"), 8u32)?;
    let seed_db = parse_or("SEED_DB", get_env("SEED_DB"), false)?;

    let admin = match (get_env("ADMIN_EMAIL"), get_env("ADMIN_PASSWORD")) {
      (Some(email), Some(password)) => Some(AdminBootstrap { email, password }),
      (None, None) => None,
      _ => {
        return Err(AppError::Config(
          "ADMIN_EMAIL and ADMIN_PASSWORD must be set together".to_string(),
        ))
      }
    };

    let log_format = match get_env("LOG_FORMAT").as_deref().map(str::to_ascii_lowercase).as_deref() {
      None | Some("text") => LogFormat::Text,
      Some("json") => LogFormat::Json,
      Some(other) => return Err(AppError::Config(format!("Invalid LOG_FORMAT: {}", other))),
    };

    let config = Self {
      server_host,
      server_port,
      database_url,
      jwt_secret,
      token_ttl_hours,
      storage_timeout: Duration::from_millis(storage_timeout_ms),
      ledger_max_attempts,
      seed_db,
      admin,
      log_format,
    };
    Ok(config)
  }

  /// Logs the loaded configuration with secrets redacted. Call once a subscriber is installed.
  pub fn log_loaded(&self) {
    tracing::info!(config = ?self, "Application configuration loaded successfully.");
  }

  /// Configuration for running on in-memory stores with the given signing secret.
  pub fn in_memory(jwt_secret: impl Into<String>) -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 8080,
      database_url: None,
      jwt_secret: jwt_secret.into(),
      token_ttl_hours: 8,
      storage_timeout: Duration::from_secs(2),
      ledger_max_attempts: 8,
      seed_db: false,
      admin: None,
      log_format: LogFormat::Text,
    }
  }

  pub fn ledger_config(&self) -> LedgerConfig {
    LedgerConfig {
      retry: RetryPolicy::default().with_max_attempts(self.ledger_max_attempts),
      storage_timeout: self.storage_timeout,
    }
  }

  pub fn server_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}

fn parse_or<T>(var_name: &str, raw: Option<String>, default: T) -> Result<T>
where
  T: std::str::FromStr,
  T::Err: std::fmt::Display,
{
  match raw {
    None => Ok(default),
    Some(raw) => raw
      .parse::<T>()
      .map_err(|e| AppError::Config(format!("Invalid {} value '{}': {}", var_name, raw, e))),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_or_falls_back_to_default() {
    assert_eq!(parse_or("SERVER_PORT", None, 8080u16).unwrap(), 8080);
    assert_eq!(parse_or("SERVER_PORT", Some("9000".to_string()), 8080u16).unwrap(), 9000);
    assert!(parse_or("SERVER_PORT", Some("port".to_string()), 8080u16).is_err());
  }

  #[test]
  fn debug_output_redacts_secrets() {
    let mut config = AppConfig::in_memory("super-secret");
    config.database_url = Some("postgres://user:pw@localhost/sweets".to_string());
    let rendered = format!("{:?}", config);
    assert!(!rendered.contains("super-secret"));
    assert!(!rendered.contains("pw@localhost"));
  }

  #[derive(Clone, Default)]
  struct Captured(std::sync::Arc<parking_lot::Mutex<Vec<u8>>>);

  impl std::io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
      self.0.lock().extend_from_slice(buf);
      Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
      Ok(())
    }
  }

  #[test]
  fn loaded_config_is_logged_without_secrets() {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
      .with_writer(move || writer.clone())
      .with_ansi(false)
      .finish();

    let config = AppConfig::in_memory("super-secret");
    tracing::subscriber::with_default(subscriber, || config.log_loaded());

    let output = String::from_utf8(captured.0.lock().clone()).unwrap();
    assert!(output.contains("Application configuration loaded successfully."));
    assert!(output.contains("ledger_max_attempts"));
    assert!(!output.contains("super-secret"));
  }

  #[test]
  fn ledger_config_uses_configured_attempts() {
    let mut config = AppConfig::in_memory("s");
    config.ledger_max_attempts = 3;
    assert_eq!(config.ledger_config().retry.max_attempts, 3);
    assert_eq!(config.ledger_config().storage_timeout, Duration::from_secs(2));
  }
}
