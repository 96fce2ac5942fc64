// sweetshop/core/src/model/principal.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role carried by an authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
  User,
  Admin,
}

impl Role {
  pub const fn as_str(&self) -> &'static str {
    match self {
      Role::User => "USER",
      Role::Admin => "ADMIN",
    }
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Role {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_uppercase().as_str() {
      "USER" => Ok(Role::User),
      "ADMIN" => Ok(Role::Admin),
      other => Err(format!("Unknown role '{}'", other)),
    }
  }
}

/// An authenticated caller. Produced by an `IdentityProvider`, immutable for one request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Principal {
  pub id: String,
  pub role: Role,
}

impl Principal {
  pub fn new(id: impl Into<String>, role: Role) -> Self {
    Principal { id: id.into(), role }
  }

  pub fn user(id: impl Into<String>) -> Self {
    Self::new(id, Role::User)
  }

  pub fn admin(id: impl Into<String>) -> Self {
    Self::new(id, Role::Admin)
  }

  pub fn is_admin(&self) -> bool {
    self.role == Role::Admin
  }
}
