// sweetshop/core/src/policy.rs

//! The access policy gate: one table deciding which role may run which operation.

use std::fmt;
use tracing::{debug, warn};

use crate::error::AccessError;
use crate::model::{Principal, Role};

/// Kinds of operations an inbound request can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
  ReadCatalog,
  Purchase,
  CreateItem,
  UpdateItem,
  DeleteItem,
  Restock,
}

impl Operation {
  pub const ALL: [Operation; 6] = [
    Operation::ReadCatalog,
    Operation::Purchase,
    Operation::CreateItem,
    Operation::UpdateItem,
    Operation::DeleteItem,
    Operation::Restock,
  ];

  pub const fn as_str(&self) -> &'static str {
    match self {
      Operation::ReadCatalog => "read the catalog",
      Operation::Purchase => "purchase",
      Operation::CreateItem => "create items",
      Operation::UpdateItem => "update items",
      Operation::DeleteItem => "delete items",
      Operation::Restock => "restock",
    }
  }

  /// Whether the operation changes stored state.
  pub const fn is_mutating(&self) -> bool {
    !matches!(self, Operation::ReadCatalog)
  }
}

impl fmt::Display for Operation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
  Allow,
  Deny,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AccessPolicy;

impl AccessPolicy {
  pub const fn new() -> Self {
    AccessPolicy
  }

  /// The rule table. Users may read and purchase; everything else is admin-only.
  pub const fn decide(role: Role, operation: Operation) -> Decision {
    match (role, operation) {
      (Role::Admin, _) => Decision::Allow,
      (Role::User, Operation::ReadCatalog | Operation::Purchase) => Decision::Allow,
      (Role::User, _) => Decision::Deny,
    }
  }

  /// Authorizes `operation` for an optional principal.
  ///
  /// No principal at all is `Unauthenticated`; a principal whose role is denied is `Forbidden`.
  pub fn authorize<'p>(&self, principal: Option<&'p Principal>, operation: Operation) -> Result<&'p Principal, AccessError> {
    let principal = principal.ok_or_else(|| {
      debug!(%operation, "Rejected request without a principal.");
      AccessError::Unauthenticated("No valid credential was presented.".to_string())
    })?;
    self.check(principal, operation)?;
    Ok(principal)
  }

  pub fn check(&self, principal: &Principal, operation: Operation) -> Result<(), AccessError> {
    match Self::decide(principal.role, operation) {
      Decision::Allow => {
        debug!(
          principal_id = %principal.id,
          role = %principal.role,
          %operation,
          mutating = operation.is_mutating(),
          "Access granted."
        );
        Ok(())
      }
      Decision::Deny => {
        warn!(
          principal_id = %principal.id,
          role = %principal.role,
          %operation,
          mutating = operation.is_mutating(),
          "Access denied."
        );
        Err(AccessError::Forbidden {
          role: principal.role,
          operation,
        })
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rule_table_matches_roles() {
    for op in Operation::ALL {
      assert_eq!(AccessPolicy::decide(Role::Admin, op), Decision::Allow, "admin {op}");
    }
    assert_eq!(AccessPolicy::decide(Role::User, Operation::ReadCatalog), Decision::Allow);
    assert_eq!(AccessPolicy::decide(Role::User, Operation::Purchase), Decision::Allow);
    for op in [
      Operation::CreateItem,
      Operation::UpdateItem,
      Operation::DeleteItem,
      Operation::Restock,
    ] {
      assert_eq!(AccessPolicy::decide(Role::User, op), Decision::Deny, "user {op}");
    }
  }

  #[test]
  fn purchase_is_the_only_mutation_open_to_users() {
    for op in Operation::ALL {
      let user_allowed = AccessPolicy::decide(Role::User, op) == Decision::Allow;
      assert_eq!(user_allowed, !op.is_mutating() || op == Operation::Purchase, "user {op}");
    }
    assert!(!Operation::ReadCatalog.is_mutating());
    assert!(Operation::Purchase.is_mutating());
  }

  #[test]
  fn missing_principal_is_unauthenticated_not_forbidden() {
    let policy = AccessPolicy::new();
    let err = policy.authorize(None, Operation::ReadCatalog).unwrap_err();
    assert!(matches!(err, AccessError::Unauthenticated(_)));
  }

  #[test]
  fn denied_role_is_forbidden() {
    let policy = AccessPolicy::new();
    let user = Principal::user("u-1");
    let err = policy.authorize(Some(&user), Operation::Restock).unwrap_err();
    assert_eq!(
      err,
      AccessError::Forbidden {
        role: Role::User,
        operation: Operation::Restock
      }
    );
    assert_eq!(policy.authorize(Some(&user), Operation::Purchase).unwrap(), &user);
  }
}
