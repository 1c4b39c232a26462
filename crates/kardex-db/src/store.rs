//! # Inventory Store
//!
//! The read boundary the pricing and classification flows depend on.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    InventoryStore (async trait)                         │
//! │                                                                         │
//! │   find_eligible_discounts(target, qty, now) → Vec<DiscountCandidate>    │
//! │   find_stock_threshold(item, warehouse)     → Option<StockThreshold>    │
//! │   find_current_quantity(item, warehouse)    → i64 (missing → 0)         │
//! │                                                                         │
//! │   ┌──────────────────────────┐     ┌──────────────────────────┐         │
//! │   │  SqliteInventoryStore    │     │  MemoryInventoryStore    │         │
//! │   │  Database (sqlx pool)    │     │  RwLock<HashMap<..>>     │         │
//! │   └──────────────────────────┘     └──────────────────────────┘         │
//! │                                                                         │
//! │   open_store(&StoreConfig) picks one from StoreBackend                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both backends apply the same eligibility filter: matching target, active,
//! inside the validity window, and `min_quantity <= quantity`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::config::{StoreBackend, StoreConfig};
use crate::error::DbResult;
use crate::pool::Database;
use kardex_core::validation::{
    validate_discount_candidate, validate_stock_quantity, validate_stock_threshold,
};
use kardex_core::{DiscountCandidate, DiscountTarget, StockThreshold};

/// Key for per-warehouse rows: `(item_id, warehouse_id)`.
type PairKey = (String, String);

fn pair_key(item_id: &str, warehouse_id: &str) -> PairKey {
    (item_id.to_string(), warehouse_id.to_string())
}

/// Read access to discounts, thresholds and on-hand quantities.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Discounts for `target` that apply to `quantity` units at `now`.
    async fn find_eligible_discounts(
        &self,
        target: &DiscountTarget,
        quantity: i64,
        now: DateTime<Utc>,
    ) -> DbResult<Vec<DiscountCandidate>>;

    /// The threshold row, `None` when the pair was never configured.
    async fn find_stock_threshold(
        &self,
        item_id: &str,
        warehouse_id: &str,
    ) -> DbResult<Option<StockThreshold>>;

    /// On-hand units; a pair with no stock row has zero.
    async fn find_current_quantity(&self, item_id: &str, warehouse_id: &str) -> DbResult<i64>;
}

#[async_trait]
impl<T: InventoryStore + ?Sized> InventoryStore for Arc<T> {
    async fn find_eligible_discounts(
        &self,
        target: &DiscountTarget,
        quantity: i64,
        now: DateTime<Utc>,
    ) -> DbResult<Vec<DiscountCandidate>> {
        (**self).find_eligible_discounts(target, quantity, now).await
    }

    async fn find_stock_threshold(
        &self,
        item_id: &str,
        warehouse_id: &str,
    ) -> DbResult<Option<StockThreshold>> {
        (**self).find_stock_threshold(item_id, warehouse_id).await
    }

    async fn find_current_quantity(&self, item_id: &str, warehouse_id: &str) -> DbResult<i64> {
        (**self).find_current_quantity(item_id, warehouse_id).await
    }
}

// =============================================================================
// SQLite
// =============================================================================

/// [`InventoryStore`] over the SQLite repositories.
#[derive(Debug, Clone)]
pub struct SqliteInventoryStore {
    db: Database,
}

impl SqliteInventoryStore {
    pub fn new(db: Database) -> Self {
        SqliteInventoryStore { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl InventoryStore for SqliteInventoryStore {
    async fn find_eligible_discounts(
        &self,
        target: &DiscountTarget,
        quantity: i64,
        now: DateTime<Utc>,
    ) -> DbResult<Vec<DiscountCandidate>> {
        self.db.discounts().find_eligible(target, quantity, now).await
    }

    async fn find_stock_threshold(
        &self,
        item_id: &str,
        warehouse_id: &str,
    ) -> DbResult<Option<StockThreshold>> {
        self.db.stock().get_threshold(item_id, warehouse_id).await
    }

    async fn find_current_quantity(&self, item_id: &str, warehouse_id: &str) -> DbResult<i64> {
        self.db.stock().get_quantity(item_id, warehouse_id).await
    }
}

// =============================================================================
// In-memory
// =============================================================================

/// Process-local [`InventoryStore`] for tests and demos.
///
/// Writes go through the same validators as the SQLite repositories.
#[derive(Debug, Default)]
pub struct MemoryInventoryStore {
    discounts: RwLock<HashMap<String, DiscountCandidate>>,
    thresholds: RwLock<HashMap<PairKey, StockThreshold>>,
    quantities: RwLock<HashMap<PairKey, i64>>,
}

impl MemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a discount by id.
    pub async fn put_discount(&self, discount: DiscountCandidate) -> DbResult<()> {
        validate_discount_candidate(&discount)?;
        self.discounts
            .write()
            .await
            .insert(discount.id.clone(), discount);
        Ok(())
    }

    pub async fn put_threshold(&self, threshold: StockThreshold) -> DbResult<()> {
        validate_stock_threshold(&threshold)?;
        let key = pair_key(&threshold.item_id, &threshold.warehouse_id);
        self.thresholds.write().await.insert(key, threshold);
        Ok(())
    }

    pub async fn set_quantity(&self, item_id: &str, warehouse_id: &str, quantity: i64) -> DbResult<()> {
        validate_stock_quantity(quantity)?;
        self.quantities
            .write()
            .await
            .insert(pair_key(item_id, warehouse_id), quantity);
        Ok(())
    }
}

#[async_trait]
impl InventoryStore for MemoryInventoryStore {
    async fn find_eligible_discounts(
        &self,
        target: &DiscountTarget,
        quantity: i64,
        now: DateTime<Utc>,
    ) -> DbResult<Vec<DiscountCandidate>> {
        let discounts = self.discounts.read().await;

        let mut eligible: Vec<DiscountCandidate> = discounts
            .values()
            .filter(|d| &d.target == target && d.is_eligible(quantity, now))
            .cloned()
            .collect();

        // Same order the SQLite query returns.
        eligible.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then(b.value.cmp(&a.value))
                .then(a.id.cmp(&b.id))
        });

        debug!(count = eligible.len(), quantity, "Eligible discounts found (memory)");
        Ok(eligible)
    }

    async fn find_stock_threshold(
        &self,
        item_id: &str,
        warehouse_id: &str,
    ) -> DbResult<Option<StockThreshold>> {
        let thresholds = self.thresholds.read().await;
        Ok(thresholds.get(&pair_key(item_id, warehouse_id)).cloned())
    }

    async fn find_current_quantity(&self, item_id: &str, warehouse_id: &str) -> DbResult<i64> {
        let quantities = self.quantities.read().await;
        Ok(quantities
            .get(&pair_key(item_id, warehouse_id))
            .copied()
            .unwrap_or(0))
    }
}

// =============================================================================
// Selection
// =============================================================================

/// Opens the store named by `config.backend`.
///
/// The SQLite backend connects (and migrates, if enabled) before returning.
pub async fn open_store(config: &StoreConfig) -> DbResult<Arc<dyn InventoryStore>> {
    info!(backend = ?config.backend, "Opening inventory store");

    let store: Arc<dyn InventoryStore> = match config.backend {
        StoreBackend::Sqlite => {
            let db = Database::new(config.db.clone()).await?;
            Arc::new(db.store())
        }
        StoreBackend::Memory => Arc::new(MemoryInventoryStore::new()),
    };

    Ok(store)
}

// =============================================================================
// Unit Tests
// =============================================================================
