//! # Discount Repository
//!
//! Database operations for discount rules.
//!
//! ## Eligibility Query
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  find_eligible(Item("cola-330"), qty = 6, now)                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQL:  item_id = 'cola-330' AND active = 1 AND min_quantity <= 6       │
//! │        ORDER BY priority DESC, value DESC                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Rust: row → DiscountCandidate (target invariant checked)              │
//! │        keep only valid_from <= now <= valid_to                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Vec<DiscountCandidate> ready for resolve_discount                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The validity window is checked in Rust rather than in SQL: timestamps are
//! stored as text and a string comparison across fractional-second formats is
//! not reliable.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use kardex_core::validation::validate_discount_candidate;
use kardex_core::{DiscountCandidate, DiscountKind, DiscountTarget, ValidationError};

const SELECT_COLUMNS: &str = r#"
    SELECT
        id,
        name,
        item_id,
        presentation_id,
        kind,
        value,
        min_quantity,
        priority,
        combinable,
        valid_from,
        valid_to,
        active
    FROM discounts
"#;

/// A `discounts` row as stored, before the target invariant is checked.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DiscountRow {
    pub id: String,
    pub name: String,
    pub item_id: Option<String>,
    pub presentation_id: Option<String>,
    pub kind: DiscountKind,
    pub value: i64,
    pub min_quantity: i64,
    pub priority: i64,
    pub combinable: bool,
    pub valid_from: DateTime<Utc>,
    pub valid_to: Option<DateTime<Utc>>,
    pub active: bool,
}

impl TryFrom<DiscountRow> for DiscountCandidate {
    type Error = ValidationError;

    fn try_from(row: DiscountRow) -> Result<Self, Self::Error> {
        let target = DiscountTarget::from_refs(row.item_id, row.presentation_id)?;

        Ok(DiscountCandidate {
            id: row.id,
            name: row.name,
            target,
            kind: row.kind,
            value: row.value,
            min_quantity: row.min_quantity,
            priority: row.priority,
            combinable: row.combinable,
            valid_from: row.valid_from,
            valid_to: row.valid_to,
            active: row.active,
        })
    }
}

/// Column holding the target id, chosen from a closed set.
fn target_column(target: &DiscountTarget) -> (&'static str, &str) {
    match target {
        DiscountTarget::Item(id) => ("item_id", id),
        DiscountTarget::Presentation(id) => ("presentation_id", id),
    }
}

fn into_candidates(rows: Vec<DiscountRow>) -> DbResult<Vec<DiscountCandidate>> {
    rows.into_iter()
        .map(|row| DiscountCandidate::try_from(row).map_err(DbError::from))
        .collect()
}

/// Repository for discount database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.discounts();
///
/// repo.insert(&candidate).await?;
/// let eligible = repo.find_eligible(&target, 6, Utc::now()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct DiscountRepository {
    pool: SqlitePool,
}

impl DiscountRepository {
    /// Creates a new DiscountRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DiscountRepository { pool }
    }

    /// Discounts attached to `target` that apply to a line of `quantity`
    /// units at `now`.
    ///
    /// Returned in storage order (priority DESC, value DESC); the resolver
    /// re-sorts with its full tie-break anyway.
    pub async fn find_eligible(
        &self,
        target: &DiscountTarget,
        quantity: i64,
        now: DateTime<Utc>,
    ) -> DbResult<Vec<DiscountCandidate>> {
        let (column, target_id) = target_column(target);

        debug!(column, target_id, quantity, "Finding eligible discounts");

        let sql = format!(
            "{SELECT_COLUMNS}
            WHERE {column} = ?1
            AND active = 1
            AND min_quantity <= ?2
            ORDER BY priority DESC, value DESC"
        );

        let rows = sqlx::query_as::<_, DiscountRow>(&sql)
            .bind(target_id)
            .bind(quantity)
            .fetch_all(&self.pool)
            .await?;

        let eligible: Vec<DiscountCandidate> = into_candidates(rows)?
            .into_iter()
            .filter(|c| c.is_eligible(quantity, now))
            .collect();

        debug!(count = eligible.len(), "Eligible discounts found");
        Ok(eligible)
    }

    /// Every discount attached to `target`, optionally including inactive ones.
    pub async fn list_for_target(
        &self,
        target: &DiscountTarget,
        include_inactive: bool,
    ) -> DbResult<Vec<DiscountCandidate>> {
        let (column, target_id) = target_column(target);

        let sql = format!(
            "{SELECT_COLUMNS}
            WHERE {column} = ?1
            AND (?2 OR active = 1)
            ORDER BY priority DESC, value DESC, id"
        );

        let rows = sqlx::query_as::<_, DiscountRow>(&sql)
            .bind(target_id)
            .bind(include_inactive)
            .fetch_all(&self.pool)
            .await?;

        into_candidates(rows)
    }

    /// Gets a discount by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(_))` - found
    /// * `Ok(None)` - no such id
    /// * `Err(DbError::Domain(_))` - the stored row breaks the target invariant
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<DiscountCandidate>> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = ?1");

        let row = sqlx::query_as::<_, DiscountRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(DiscountCandidate::try_from)
            .transpose()
            .map_err(DbError::from)
    }

    /// Inserts a new discount after validating its invariants.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - id already exists
    /// * `Err(DbError::Domain(_))` - invalid candidate
    pub async fn insert(&self, discount: &DiscountCandidate) -> DbResult<DiscountCandidate> {
        validate_discount_candidate(discount)?;

        debug!(id = %discount.id, name = %discount.name, "Inserting discount");

        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO discounts (
                id, name, item_id, presentation_id,
                kind, value, min_quantity, priority, combinable,
                valid_from, valid_to, active,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6, ?7, ?8, ?9,
                ?10, ?11, ?12,
                ?13, ?13
            )
            "#,
        )
        .bind(&discount.id)
        .bind(&discount.name)
        .bind(discount.target.item_id())
        .bind(discount.target.presentation_id())
        .bind(discount.kind)
        .bind(discount.value)
        .bind(discount.min_quantity)
        .bind(discount.priority)
        .bind(discount.combinable)
        .bind(discount.valid_from)
        .bind(discount.valid_to)
        .bind(discount.active)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &discount.id),
            other => other,
        })?;

        Ok(discount.clone())
    }

    /// Updates an existing discount (target may move between item and
    /// presentation).
    pub async fn update(&self, discount: &DiscountCandidate) -> DbResult<()> {
        validate_discount_candidate(discount)?;

        debug!(id = %discount.id, "Updating discount");

        let result = sqlx::query(
            r#"
            UPDATE discounts SET
                name = ?2,
                item_id = ?3,
                presentation_id = ?4,
                kind = ?5,
                value = ?6,
                min_quantity = ?7,
                priority = ?8,
                combinable = ?9,
                valid_from = ?10,
                valid_to = ?11,
                active = ?12,
                updated_at = ?13
            WHERE id = ?1
            "#,
        )
        .bind(&discount.id)
        .bind(&discount.name)
        .bind(discount.target.item_id())
        .bind(discount.target.presentation_id())
        .bind(discount.kind)
        .bind(discount.value)
        .bind(discount.min_quantity)
        .bind(discount.priority)
        .bind(discount.combinable)
        .bind(discount.valid_from)
        .bind(discount.valid_to)
        .bind(discount.active)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Discount", &discount.id));
        }

        Ok(())
    }

    /// Toggles the `active` flag (logical delete / restore).
    pub async fn set_active(&self, id: &str, active: bool) -> DbResult<()> {
        debug!(id = %id, active, "Setting discount active flag");

        let result = sqlx::query("UPDATE discounts SET active = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(active)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Discount", id));
        }

        Ok(())
    }

    /// Physically deletes a discount.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting discount");

        let result = sqlx::query("DELETE FROM discounts WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Discount", id));
        }

        Ok(())
    }

    /// Counts active discounts (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM discounts WHERE active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new discount ID.
pub fn generate_discount_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Duration;

    async fn repo() -> DiscountRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().discounts()
    }

    fn discount(target: DiscountTarget, bps: i64) -> DiscountCandidate {
        DiscountCandidate {
            id: generate_discount_id(),
            name: "Promo".to_string(),
            target,
            kind: DiscountKind::Percentage,
            value: bps,
            min_quantity: 1,
            priority: 0,
            combinable: false,
            valid_from: Utc::now() - Duration::days(1),
            valid_to: None,
            active: true,
        }
    }

    fn item(id: &str) -> DiscountTarget {
        DiscountTarget::Item(id.to_string())
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = repo().await;
        let d = discount(DiscountTarget::Presentation("box-12".into()), 1_250);

        repo.insert(&d).await.unwrap();
        let loaded = repo.get_by_id(&d.id).await.unwrap().unwrap();

        assert_eq!(loaded.target, d.target);
        assert_eq!(loaded.kind, DiscountKind::Percentage);
        assert_eq!(loaded.value, 1_250);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_insert_rejects_invalid() {
        let repo = repo().await;
        let d = discount(item("cola"), 12_000);

        let err = repo.insert(&d).await.unwrap_err();
        assert!(err.is_invalid_input());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_id() {
        let repo = repo().await;
        let d = discount(item("cola"), 500);

        repo.insert(&d).await.unwrap();
        let err = repo.insert(&d).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_find_eligible_filters() {
        let repo = repo().await;
        let now = Utc::now();

        let ok = discount(item("cola"), 500);

        let mut bulk = discount(item("cola"), 1_000);
        bulk.min_quantity = 12;

        let mut expired = discount(item("cola"), 700);
        expired.valid_to = Some(now - Duration::hours(1));

        let mut future = discount(item("cola"), 800);
        future.valid_from = now + Duration::days(3);

        let mut inactive = discount(item("cola"), 900);
        inactive.active = false;

        let other_item = discount(item("water"), 300);

        for d in [&ok, &bulk, &expired, &future, &inactive, &other_item] {
            repo.insert(d).await.unwrap();
        }

        let found = repo.find_eligible(&item("cola"), 6, now).await.unwrap();
        let ids: Vec<_> = found.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec![ok.id.as_str()]);

        let found = repo.find_eligible(&item("cola"), 12, now).await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, bulk.id);
    }

    #[tokio::test]
    async fn test_item_and_presentation_are_separate() {
        let repo = repo().await;
        repo.insert(&discount(item("sku-1"), 500)).await.unwrap();

        let presentation = DiscountTarget::Presentation("sku-1".into());
        let found = repo.find_eligible(&presentation, 1, Utc::now()).await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_set_active_and_list() {
        let repo = repo().await;
        let d = discount(item("cola"), 500);
        repo.insert(&d).await.unwrap();

        repo.set_active(&d.id, false).await.unwrap();

        assert!(repo.list_for_target(&item("cola"), false).await.unwrap().is_empty());
        assert_eq!(repo.list_for_target(&item("cola"), true).await.unwrap().len(), 1);
        assert!(repo.find_eligible(&item("cola"), 1, Utc::now()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_moves_target() {
        let repo = repo().await;
        let mut d = discount(item("cola"), 500);
        repo.insert(&d).await.unwrap();

        d.target = DiscountTarget::Presentation("cola-6pack".into());
        d.kind = DiscountKind::FixedAmount;
        d.value = 1_500;
        repo.update(&d).await.unwrap();

        let loaded = repo.get_by_id(&d.id).await.unwrap().unwrap();
        assert_eq!(loaded.target.presentation_id(), Some("cola-6pack"));
        assert_eq!(loaded.kind, DiscountKind::FixedAmount);
    }

    #[tokio::test]
    async fn test_missing_rows() {
        let repo = repo().await;
        let d = discount(item("cola"), 500);

        assert!(repo.get_by_id(&d.id).await.unwrap().is_none());
        assert!(matches!(repo.update(&d).await, Err(DbError::NotFound { .. })));
        assert!(matches!(repo.set_active(&d.id, true).await, Err(DbError::NotFound { .. })));
        assert!(matches!(repo.delete(&d.id).await, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = repo().await;
        let d = discount(item("cola"), 500);
        repo.insert(&d).await.unwrap();

        repo.delete(&d.id).await.unwrap();
        assert!(repo.get_by_id(&d.id).await.unwrap().is_none());
    }

    #[test]
    fn test_row_with_both_targets_is_rejected() {
        let row = DiscountRow {
            id: "x".to_string(),
            name: "Broken".to_string(),
            item_id: Some("i".to_string()),
            presentation_id: Some("p".to_string()),
            kind: DiscountKind::Percentage,
            value: 100,
            min_quantity: 1,
            priority: 0,
            combinable: false,
            valid_from: Utc::now(),
            valid_to: None,
            active: true,
        };
        assert!(DiscountCandidate::try_from(row).is_err());
    }
}
