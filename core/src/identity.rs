// sweetshop/core/src/identity.rs

//! Contract for the external identity provider. Verification itself is opaque to the core.

use crate::error::AccessError;
use crate::model::Principal;

/// Turns a presented credential into a `Principal`, or fails with `Unauthenticated`.
pub trait IdentityProvider: Send + Sync {
  fn authenticate(&self, credential: &str) -> Result<Principal, AccessError>;
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header_value: &str) -> Option<&str> {
  let (scheme, token) = header_value.trim().split_once(' ')?;
  if !scheme.eq_ignore_ascii_case("bearer") {
    return None;
  }
  let token = token.trim();
  if token.is_empty() {
    None
  } else {
    Some(token)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_bearer_header() {
    assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
    assert_eq!(bearer_token("bearer   tok "), Some("tok"));
    assert_eq!(bearer_token("Basic dXNlcg=="), None);
    assert_eq!(bearer_token("Bearer "), None);
    assert_eq!(bearer_token("token-only"), None);
  }
}
