// sweetshop/core/src/model/filter.rs

use rust_decimal::Decimal;

use super::Item;

/// Catalog search filter. Every `None` field means "no constraint on that field".
///
/// Name and category match by case-insensitive substring; the price range is inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
  pub name: Option<String>,
  pub category: Option<String>,
  pub min_price: Option<Decimal>,
  pub max_price: Option<Decimal>,
}

impl ItemFilter {
  pub fn new() -> Self {
    Self::default()
  }

  /// Blank or whitespace-only names are treated as absent.
  pub fn name(mut self, name: impl Into<String>) -> Self {
    self.name = non_blank(name.into());
    self
  }

  pub fn category(mut self, category: impl Into<String>) -> Self {
    self.category = non_blank(category.into());
    self
  }

  pub fn price_between(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
    self.min_price = min;
    self.max_price = max;
    self
  }

  pub fn is_unconstrained(&self) -> bool {
    self.name.is_none() && self.category.is_none() && self.min_price.is_none() && self.max_price.is_none()
  }

  pub fn matches(&self, item: &Item) -> bool {
    if let Some(name) = &self.name {
      if !contains_ignore_case(&item.name, name) {
        return false;
      }
    }
    if let Some(category) = &self.category {
      if !contains_ignore_case(&item.category, category) {
        return false;
      }
    }
    if let Some(min) = self.min_price {
      if item.price < min {
        return false;
      }
    }
    if let Some(max) = self.max_price {
      if item.price > max {
        return false;
      }
    }
    true
  }
}

fn non_blank(value: String) -> Option<String> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    None
  } else {
    Some(trimmed.to_string())
  }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
  haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::{ItemDraft, ItemId};
  use chrono::Utc;

  fn item(name: &str, category: &str, cents: i64) -> Item {
    Item::from_draft(ItemId::new(), ItemDraft::new(name, Decimal::new(cents, 2), 1, category), Utc::now())
  }

  #[test]
  fn empty_filter_matches_everything() {
    let f = ItemFilter::new().name("  ").category("");
    assert!(f.is_unconstrained());
    assert!(f.matches(&item("Ladoo", "Classic", 100)));
  }

  #[test]
  fn name_and_category_match_case_insensitive_substrings() {
    let ladoo = item("Motichoor Ladoo", "Classic Sweets", 250);
    assert!(ItemFilter::new().name("LADOO").matches(&ladoo));
    assert!(ItemFilter::new().category("classic").matches(&ladoo));
    assert!(!ItemFilter::new().name("barfi").matches(&ladoo));
    assert!(!ItemFilter::new().name("ladoo").category("syrup").matches(&ladoo));
  }

  #[test]
  fn price_bounds_are_inclusive() {
    let ladoo = item("Ladoo", "Classic", 250);
    let exact = Some(Decimal::new(250, 2));
    assert!(ItemFilter::new().price_between(exact, exact).matches(&ladoo));
    assert!(!ItemFilter::new().price_between(None, Some(Decimal::new(249, 2))).matches(&ladoo));
    assert!(!ItemFilter::new().price_between(Some(Decimal::new(251, 2)), None).matches(&ladoo));
  }

  #[test]
  fn inverted_range_matches_nothing() {
    let ladoo = item("Ladoo", "Classic", 250);
    let f = ItemFilter::new().price_between(Some(Decimal::new(500, 2)), Some(Decimal::new(100, 2)));
    assert!(!f.matches(&ladoo));
  }
}
