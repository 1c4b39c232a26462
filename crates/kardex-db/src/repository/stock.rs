//! # Stock Repository
//!
//! On-hand quantities (`stock_levels`) and per-warehouse thresholds
//! (`stock_thresholds`), both keyed by `(item_id, warehouse_id)`.
//!
//! A pair with no `stock_levels` row has zero on hand. A pair with no
//! `stock_thresholds` row is unconfigured.
//!
//! ## Stock Report
//! ```text
//! stock_levels s ──LEFT JOIN── stock_thresholds t   (same item, warehouse)
//!        │
//!        ▼
//! classify_stock(s.quantity, t) ──► StockReportLine { snapshot, threshold, state }
//! ```

use chrono::Utc;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use kardex_core::validation::{validate_stock_quantity, validate_stock_threshold};
use kardex_core::{classify_stock, StockSnapshot, StockState, StockThreshold, ValidationError};

/// One row of the stock report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockReportLine {
    pub snapshot: StockSnapshot,
    /// `None` when the pair has never been configured.
    pub threshold: Option<StockThreshold>,
    pub state: StockState,
}

/// Joined `stock_levels` + `stock_thresholds` row.
#[derive(Debug, sqlx::FromRow)]
struct PositionRow {
    item_id: String,
    warehouse_id: String,
    quantity: i64,
    has_threshold: bool,
    min_stock: Option<i64>,
    max_stock: Option<i64>,
    reorder_point: Option<i64>,
    active_in_warehouse: Option<bool>,
}

impl PositionRow {
    fn into_parts(self) -> (StockSnapshot, Option<StockThreshold>) {
        let threshold = self.has_threshold.then(|| StockThreshold {
            item_id: self.item_id.clone(),
            warehouse_id: self.warehouse_id.clone(),
            min_stock: self.min_stock,
            max_stock: self.max_stock,
            reorder_point: self.reorder_point,
            active_in_warehouse: self.active_in_warehouse.unwrap_or(true),
        });

        let snapshot = StockSnapshot {
            item_id: self.item_id,
            warehouse_id: self.warehouse_id,
            quantity: self.quantity,
        };

        (snapshot, threshold)
    }
}

fn below_zero() -> DbError {
    ValidationError::MustNotBeNegative {
        field: "quantity".to_string(),
    }
    .into()
}

/// Repository for stock quantities and thresholds.
#[derive(Debug, Clone)]
pub struct StockRepository {
    pool: SqlitePool,
}

impl StockRepository {
    /// Creates a new StockRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StockRepository { pool }
    }

    // =========================================================================
    // Quantities
    // =========================================================================

    /// Current on-hand quantity. Missing rows read as zero.
    pub async fn get_quantity(&self, item_id: &str, warehouse_id: &str) -> DbResult<i64> {
        let quantity: Option<i64> = sqlx::query_scalar(
            "SELECT quantity FROM stock_levels WHERE item_id = ?1 AND warehouse_id = ?2",
        )
        .bind(item_id)
        .bind(warehouse_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(quantity.unwrap_or(0))
    }

    /// Overwrites the on-hand quantity (physical count).
    pub async fn set_quantity(&self, item_id: &str, warehouse_id: &str, quantity: i64) -> DbResult<()> {
        validate_stock_quantity(quantity)?;

        debug!(item_id, warehouse_id, quantity, "Setting stock quantity");

        sqlx::query(
            r#"
            INSERT INTO stock_levels (item_id, warehouse_id, quantity, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (item_id, warehouse_id) DO UPDATE SET
                quantity = excluded.quantity,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(item_id)
        .bind(warehouse_id)
        .bind(quantity)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Applies a movement to the on-hand quantity.
    ///
    /// ## Arguments
    /// * `delta` - Change in stock (negative for outbound, positive for inbound)
    ///
    /// ## Returns
    /// The new quantity. A movement that would leave the pair below zero is
    /// rejected and nothing is written.
    pub async fn adjust_quantity(&self, item_id: &str, warehouse_id: &str, delta: i64) -> DbResult<i64> {
        debug!(item_id, warehouse_id, delta, "Adjusting stock quantity");

        // Existing row: the CHECK (quantity >= 0) applies to the result.
        let updated: Result<Option<i64>, DbError> = sqlx::query_scalar(
            r#"
            UPDATE stock_levels SET
                quantity = quantity + ?3,
                updated_at = ?4
            WHERE item_id = ?1 AND warehouse_id = ?2
            RETURNING quantity
            "#,
        )
        .bind(item_id)
        .bind(warehouse_id)
        .bind(delta)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::from);

        match updated {
            Ok(Some(quantity)) => return Ok(quantity),
            Ok(None) => {}
            Err(DbError::ConstraintViolation { message }) => {
                warn!(item_id, warehouse_id, delta, %message, "Stock movement rejected");
                return Err(below_zero());
            }
            Err(e) => return Err(e),
        }

        // No row yet: the pair has zero on hand.
        if delta < 0 {
            warn!(item_id, warehouse_id, delta, "Stock movement rejected (nothing on hand)");
            return Err(below_zero());
        }

        let quantity: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO stock_levels (item_id, warehouse_id, quantity, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (item_id, warehouse_id) DO UPDATE SET
                quantity = quantity + excluded.quantity,
                updated_at = excluded.updated_at
            RETURNING quantity
            "#,
        )
        .bind(item_id)
        .bind(warehouse_id)
        .bind(delta)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(quantity)
    }

    /// Snapshots ordered by warehouse then item, optionally for one warehouse.
    pub async fn list_snapshots(&self, warehouse_id: Option<&str>) -> DbResult<Vec<StockSnapshot>> {
        let snapshots = sqlx::query_as::<_, StockSnapshot>(
            r#"
            SELECT item_id, warehouse_id, quantity
            FROM stock_levels
            WHERE ?1 IS NULL OR warehouse_id = ?1
            ORDER BY warehouse_id, item_id
            "#,
        )
        .bind(warehouse_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(snapshots)
    }

    /// Every stocked pair with its threshold and classified state.
    ///
    /// Ordered by item then warehouse.
    pub async fn stock_report(&self, warehouse_id: Option<&str>) -> DbResult<Vec<StockReportLine>> {
        let rows = sqlx::query_as::<_, PositionRow>(
            r#"
            SELECT
                s.item_id,
                s.warehouse_id,
                s.quantity,
                t.item_id IS NOT NULL AS has_threshold,
                t.min_stock,
                t.max_stock,
                t.reorder_point,
                t.active_in_warehouse
            FROM stock_levels s
            LEFT JOIN stock_thresholds t
                ON t.item_id = s.item_id AND t.warehouse_id = s.warehouse_id
            WHERE ?1 IS NULL OR s.warehouse_id = ?1
            ORDER BY s.item_id, s.warehouse_id
            "#,
        )
        .bind(warehouse_id)
        .fetch_all(&self.pool)
        .await?;

        let mut lines = Vec::with_capacity(rows.len());
        for row in rows {
            let (snapshot, threshold) = row.into_parts();
            let state = classify_stock(snapshot.quantity, threshold.as_ref())?;
            lines.push(StockReportLine {
                snapshot,
                threshold,
                state,
            });
        }

        debug!(warehouse_id, lines = lines.len(), "Stock report built");
        Ok(lines)
    }

    // =========================================================================
    // Thresholds
    // =========================================================================

    /// Threshold row for the pair, if configured.
    pub async fn get_threshold(&self, item_id: &str, warehouse_id: &str) -> DbResult<Option<StockThreshold>> {
        let threshold = sqlx::query_as::<_, StockThreshold>(
            r#"
            SELECT item_id, warehouse_id, min_stock, max_stock, reorder_point, active_in_warehouse
            FROM stock_thresholds
            WHERE item_id = ?1 AND warehouse_id = ?2
            "#,
        )
        .bind(item_id)
        .bind(warehouse_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(threshold)
    }

    /// Inserts or replaces the threshold for the pair.
    pub async fn upsert_threshold(&self, threshold: &StockThreshold) -> DbResult<()> {
        validate_stock_threshold(threshold)?;

        debug!(
            item_id = %threshold.item_id,
            warehouse_id = %threshold.warehouse_id,
            "Upserting stock threshold"
        );

        sqlx::query(
            r#"
            INSERT INTO stock_thresholds (
                item_id, warehouse_id, min_stock, max_stock, reorder_point,
                active_in_warehouse, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT (item_id, warehouse_id) DO UPDATE SET
                min_stock = excluded.min_stock,
                max_stock = excluded.max_stock,
                reorder_point = excluded.reorder_point,
                active_in_warehouse = excluded.active_in_warehouse,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&threshold.item_id)
        .bind(&threshold.warehouse_id)
        .bind(threshold.min_stock)
        .bind(threshold.max_stock)
        .bind(threshold.reorder_point)
        .bind(threshold.active_in_warehouse)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Removes the threshold, returning the pair to unconfigured.
    pub async fn delete_threshold(&self, item_id: &str, warehouse_id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM stock_thresholds WHERE item_id = ?1 AND warehouse_id = ?2")
            .bind(item_id)
            .bind(warehouse_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(
                "StockThreshold",
                format!("{item_id}@{warehouse_id}"),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
