// sweetshop/server/src/store/postgres.rs

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder};
use sweetshop_core::{
  Item, ItemFilter, ItemId, QuantityTransition, QuantityUpdate, StockStore, StoreError, StoreResult,
};
use tracing::{debug, error, instrument};

use crate::models::sweet::SweetRow;

const SWEET_COLUMNS: &str = "id, name, price, quantity, category, image_url, created_at, updated_at";

/// `StockStore` over the `sweets` table.
///
/// Quantity transitions run in a transaction that holds the row lock from
/// `SELECT ... FOR UPDATE` until commit, so concurrent updates of one sweet
/// queue behind each other instead of failing. The table's `CHECK (quantity >= 0)`
/// backs the same invariant at the storage level.
#[derive(Debug, Clone)]
pub struct PgStockStore {
  pool: PgPool,
}

impl PgStockStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

fn unavailable(err: sqlx::Error) -> StoreError {
  error!(error = %err, "Stock store query failed.");
  StoreError::unavailable(err)
}

/// Serialization failure, deadlock and lock-not-available all roll the transaction back.
const CONTENTION_CODES: [&str; 3] = ["40001", "40P01", "55P03"];

fn is_contention(code: Option<&str>) -> bool {
  code.is_some_and(|code| CONTENTION_CODES.contains(&code))
}

/// For statements inside an uncommitted transaction: lock contention is retryable.
fn contended_or_unavailable(err: sqlx::Error) -> StoreError {
  if let sqlx::Error::Database(db_err) = &err {
    if is_contention(db_err.code().as_deref()) {
      debug!(error = %db_err, "Stock row busy.");
      return StoreError::Contention { attempts: 1 };
    }
  }
  unavailable(err)
}

/// Escapes `LIKE` wildcards so user input only ever matches literally.
fn like_pattern(needle: &str) -> String {
  let mut escaped = String::with_capacity(needle.len() + 2);
  escaped.push('%');
  for c in needle.chars() {
    if matches!(c, '%' | '_' | '\\') {
      escaped.push('\\');
    }
    escaped.push(c);
  }
  escaped.push('%');
  escaped
}

fn push_filter(query: &mut QueryBuilder<'_, Postgres>, filter: &ItemFilter) {
  if let Some(name) = &filter.name {
    query.push(" AND name ILIKE ").push_bind(like_pattern(name));
  }
  if let Some(category) = &filter.category {
    query.push(" AND category ILIKE ").push_bind(like_pattern(category));
  }
  if let Some(min) = filter.min_price {
    query.push(" AND price >= ").push_bind(min);
  }
  if let Some(max) = filter.max_price {
    query.push(" AND price <= ").push_bind(max);
  }
}

#[async_trait]
impl StockStore for PgStockStore {
  #[instrument(name = "pg_store::get", skip(self))]
  async fn get(&self, id: ItemId) -> StoreResult<Option<Item>> {
    let row: Option<SweetRow> = sqlx::query_as(&format!("SELECT {} FROM sweets WHERE id = $1", SWEET_COLUMNS))
      .bind(id.as_uuid())
      .fetch_optional(&self.pool)
      .await
      .map_err(unavailable)?;
    Ok(row.map(Item::from))
  }

  #[instrument(name = "pg_store::list", skip(self))]
  async fn list(&self, filter: &ItemFilter) -> StoreResult<Vec<Item>> {
    let mut query = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM sweets WHERE TRUE", SWEET_COLUMNS));
    push_filter(&mut query, filter);
    query.push(" ORDER BY name ASC, id ASC");

    let rows: Vec<SweetRow> = query
      .build_query_as()
      .fetch_all(&self.pool)
      .await
      .map_err(unavailable)?;
    debug!(count = rows.len(), "Fetched sweets.");
    Ok(rows.into_iter().map(Item::from).collect())
  }

  #[instrument(name = "pg_store::insert", skip_all, fields(item_id = %item.id))]
  async fn insert(&self, item: Item) -> StoreResult<()> {
    let result = sqlx::query(
      "INSERT INTO sweets (id, name, price, quantity, category, image_url, created_at, updated_at) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(item.id.as_uuid())
    .bind(&item.name)
    .bind(item.price)
    .bind(item.quantity)
    .bind(&item.category)
    .bind(&item.image_url)
    .bind(item.created_at)
    .bind(item.updated_at)
    .execute(&self.pool)
    .await;

    match result {
      Ok(_) => Ok(()),
      Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
        Err(StoreError::Duplicate { item_id: item.id })
      }
      Err(e) => Err(unavailable(e)),
    }
  }

  #[instrument(name = "pg_store::replace", skip_all, fields(item_id = %item.id))]
  async fn replace(&self, item: Item) -> StoreResult<bool> {
    let result = sqlx::query(
      "UPDATE sweets SET name = $2, price = $3, quantity = $4, category = $5, image_url = $6, updated_at = $7 \
       WHERE id = $1",
    )
    .bind(item.id.as_uuid())
    .bind(&item.name)
    .bind(item.price)
    .bind(item.quantity)
    .bind(&item.category)
    .bind(&item.image_url)
    .bind(item.updated_at)
    .execute(&self.pool)
    .await
    .map_err(unavailable)?;
    Ok(result.rows_affected() > 0)
  }

  #[instrument(name = "pg_store::delete", skip(self))]
  async fn delete(&self, id: ItemId) -> StoreResult<bool> {
    let result = sqlx::query("DELETE FROM sweets WHERE id = $1")
      .bind(id.as_uuid())
      .execute(&self.pool)
      .await
      .map_err(unavailable)?;
    Ok(result.rows_affected() > 0)
  }

  #[instrument(name = "pg_store::update_quantity", skip(self, transition))]
  async fn update_quantity(&self, id: ItemId, transition: QuantityTransition<'_>) -> StoreResult<QuantityUpdate> {
    // Dropping `tx` before commit rolls it back.
    let mut tx = self.pool.begin().await.map_err(unavailable)?;

    let current: Option<i32> = sqlx::query_scalar("SELECT quantity FROM sweets WHERE id = $1 FOR UPDATE")
      .bind(id.as_uuid())
      .fetch_optional(&mut *tx)
      .await
      .map_err(contended_or_unavailable)?;
    let Some(previous) = current else {
      return Ok(QuantityUpdate::Missing);
    };
    let Some(next) = transition(previous) else {
      return Ok(QuantityUpdate::Rejected { current: previous });
    };

    sqlx::query("UPDATE sweets SET quantity = $2, updated_at = $3 WHERE id = $1")
      .bind(id.as_uuid())
      .bind(next)
      .bind(Utc::now())
      .execute(&mut *tx)
      .await
      .map_err(contended_or_unavailable)?;
    tx.commit().await.map_err(unavailable)?;

    Ok(QuantityUpdate::Applied { previous, current: next })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal::Decimal;

  #[test]
  fn like_patterns_escape_wildcards() {
    assert_eq!(like_pattern("ladoo"), "%ladoo%");
    assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
  }

  #[test]
  fn filters_become_bound_predicates() {
    let filter = ItemFilter::default()
      .name("jamun")
      .category("syrup")
      .price_between(Some(Decimal::new(10, 0)), Some(Decimal::new(20, 0)));
    let mut query = QueryBuilder::<Postgres>::new("SELECT id FROM sweets WHERE TRUE");
    push_filter(&mut query, &filter);
    assert_eq!(
      query.sql(),
      "SELECT id FROM sweets WHERE TRUE AND name ILIKE $1 AND category ILIKE $2 AND price >= $3 AND price <= $4"
    );
  }

  #[test]
  fn only_lock_and_serialization_failures_count_as_contention() {
    assert!(is_contention(Some("40001")));
    assert!(is_contention(Some("40P01")));
    assert!(is_contention(Some("55P03")));
    assert!(!is_contention(Some("23505")));
    assert!(!is_contention(Some("22003")));
    assert!(!is_contention(None));
  }

  #[test]
  fn empty_filter_adds_no_predicates() {
    let mut query = QueryBuilder::<Postgres>::new("SELECT id FROM sweets WHERE TRUE");
    push_filter(&mut query, &ItemFilter::default());
    assert_eq!(query.sql(), "SELECT id FROM sweets WHERE TRUE");
  }
}
