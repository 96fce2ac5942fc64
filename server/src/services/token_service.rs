// sweetshop/server/src/services/token_service.rs

//! Issues and verifies the bearer tokens that identify callers.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sweetshop_core::{AccessError, IdentityProvider, Principal, Role};
use tracing::{debug, instrument};

use crate::errors::AppError;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
  sub: String,
  role: Role,
  iat: i64,
  exp: i64,
}

/// HS256 JWT issuer and verifier sharing one secret.
pub struct TokenService {
  encoding: EncodingKey,
  decoding: DecodingKey,
  validation: Validation,
  ttl: Duration,
}

impl std::fmt::Debug for TokenService {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("TokenService").field("ttl", &self.ttl).finish_non_exhaustive()
  }
}

impl TokenService {
  pub fn new(secret: &str, ttl: Duration) -> Self {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);
    Self {
      encoding: EncodingKey::from_secret(secret.as_bytes()),
      decoding: DecodingKey::from_secret(secret.as_bytes()),
      validation,
      ttl,
    }
  }

  #[instrument(name = "token_service::issue", skip_all, fields(principal_id = %principal.id))]
  pub fn issue(&self, principal: &Principal) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = Claims {
      sub: principal.id.clone(),
      role: principal.role,
      iat: now.timestamp(),
      exp: (now + self.ttl).timestamp(),
    };
    let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
      .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))?;
    debug!("Issued bearer token.");
    Ok(token)
  }
}

impl IdentityProvider for TokenService {
  fn authenticate(&self, credential: &str) -> Result<Principal, AccessError> {
    let data = decode::<Claims>(credential, &self.decoding, &self.validation).map_err(|e| {
      debug!(error = %e, "Bearer token rejected.");
      AccessError::Unauthenticated("Invalid or expired token".to_string())
    })?;
    Ok(Principal::new(data.claims.sub, data.claims.role))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn issued_tokens_authenticate_with_their_role() {
    let service = TokenService::new("test-secret", Duration::hours(8));
    let token = service.issue(&Principal::admin("42")).unwrap();

    let principal = service.authenticate(&token).unwrap();
    assert_eq!(principal, Principal::admin("42"));
  }

  #[test]
  fn tokens_signed_with_another_secret_are_rejected() {
    let issuer = TokenService::new("secret-a", Duration::hours(8));
    let verifier = TokenService::new("secret-b", Duration::hours(8));
    let token = issuer.issue(&Principal::user("7")).unwrap();

    assert!(matches!(verifier.authenticate(&token), Err(AccessError::Unauthenticated(_))));
    assert!(verifier.authenticate("not-a-jwt").is_err());
  }

  #[test]
  fn expired_tokens_are_rejected() {
    let service = TokenService::new("test-secret", Duration::hours(-1));
    let token = service.issue(&Principal::user("7")).unwrap();
    assert!(service.authenticate(&token).is_err());
  }
}
