// sweetshop/server/src/web/dto.rs

//! Request payloads and their shape checks. Business rules stay in the core.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;
use sweetshop_core::{ItemDraft, ItemFilter, ItemId, PurchaseRequest};

use crate::errors::AppError;

/// Collects per-field problems and turns them into one validation error.
#[derive(Debug, Default)]
struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
  fn check(&mut self, ok: bool, field: &str, problem: &str) {
    if !ok {
      self.0.entry(field.to_string()).or_insert_with(|| problem.to_string());
    }
  }

  fn finish(self) -> Result<(), AppError> {
    if self.0.is_empty() {
      return Ok(());
    }
    Err(AppError::Validation {
      message: "Validation Failed".to_string(),
      errors: self.0,
    })
  }
}

fn looks_like_email(email: &str) -> bool {
  let email = email.trim();
  match email.split_once('@') {
    Some((local, domain)) => {
      !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
    }
    None => false,
  }
}

#[derive(Deserialize, Debug)]
pub struct RegisterPayload {
  pub email: String,
  pub password: String,
  pub name: String,
}

impl RegisterPayload {
  pub fn validate(&self) -> Result<(), AppError> {
    let mut errors = FieldErrors::default();
    errors.check(looks_like_email(&self.email), "email", "must be a valid email address");
    errors.check(!self.password.is_empty(), "password", "must not be empty");
    errors.check(!self.name.trim().is_empty(), "name", "must not be blank");
    errors.finish()
  }
}

#[derive(Deserialize, Debug)]
pub struct LoginPayload {
  pub email: String,
  pub password: String,
}

impl LoginPayload {
  pub fn validate(&self) -> Result<(), AppError> {
    let mut errors = FieldErrors::default();
    errors.check(looks_like_email(&self.email), "email", "must be a valid email address");
    errors.check(!self.password.is_empty(), "password", "must not be empty");
    errors.finish()
  }
}

/// Body of catalog create and update calls.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SweetPayload {
  pub name: String,
  pub price: Decimal,
  pub quantity: i32,
  pub category: String,
  #[serde(default)]
  pub image_url: String,
}

impl SweetPayload {
  pub fn into_draft(self) -> ItemDraft {
    ItemDraft::new(self.name, self.price, self.quantity, self.category).with_image_url(self.image_url)
  }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PurchasePayload {
  #[serde(alias = "sweetId")]
  pub item_id: ItemId,
  pub quantity: i32,
}

impl From<PurchasePayload> for PurchaseRequest {
  fn from(payload: PurchasePayload) -> Self {
    PurchaseRequest::new(payload.item_id, payload.quantity)
  }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RestockPayload {
  #[serde(alias = "sweetId")]
  pub item_id: ItemId,
  pub additional_quantity: i32,
}

#[derive(Deserialize, Debug)]
pub struct SetQuantityPayload {
  pub quantity: i32,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
  pub name: Option<String>,
  pub category: Option<String>,
  pub start_price: Option<Decimal>,
  pub end_price: Option<Decimal>,
}

impl From<SearchQuery> for ItemFilter {
  fn from(query: SearchQuery) -> Self {
    let mut filter = ItemFilter::default().price_between(query.start_price, query.end_price);
    if let Some(name) = query.name {
      filter = filter.name(name);
    }
    if let Some(category) = query.category {
      filter = filter.category(category);
    }
    filter
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn register_validation_reports_every_bad_field() {
    let payload = RegisterPayload {
      email: "not-an-email".into(),
      password: String::new(),
      name: "  ".into(),
    };
    match payload.validate() {
      Err(AppError::Validation { errors, .. }) => {
        assert_eq!(errors.keys().collect::<Vec<_>>(), vec!["email", "name", "password"]);
      }
      other => panic!("Expected validation error, got {:?}", other),
    }
  }

  #[test]
  fn email_shape_check() {
    assert!(looks_like_email("meera@example.com"));
    assert!(!looks_like_email("meera@localhost"));
    assert!(!looks_like_email("@example.com"));
    assert!(!looks_like_email("meera.example.com"));
  }

  #[test]
  fn purchase_payload_accepts_either_id_name() {
    let id = ItemId::new();
    let a: PurchasePayload = serde_json::from_value(serde_json::json!({"itemId": id, "quantity": 2})).unwrap();
    let b: PurchasePayload = serde_json::from_value(serde_json::json!({"sweetId": id, "quantity": 2})).unwrap();
    assert_eq!(a.item_id, b.item_id);
  }

  #[test]
  fn blank_search_terms_are_ignored() {
    let filter: ItemFilter = SearchQuery {
      name: Some("  ".into()),
      category: Some("Ladoo".into()),
      start_price: None,
      end_price: Some(Decimal::new(30, 0)),
    }
    .into();
    assert_eq!(filter.name, None);
    assert_eq!(filter.category.as_deref(), Some("Ladoo"));
    assert_eq!(filter.max_price, Some(Decimal::new(30, 0)));
  }
}
