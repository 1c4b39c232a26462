//! # Inventory Service
//!
//! Wires [`InventoryStore`] reads into the pure core functions.
//!
//! ```text
//! quote(target, qty, base, now)
//!     ├── validate qty >= 1, base > 0
//!     ├── store.find_eligible_discounts(target, qty, now)
//!     └── resolve_discount(candidates, base)
//!
//! stock_state(item, warehouse)
//!     ├── store.find_current_quantity(item, warehouse)
//!     ├── store.find_stock_threshold(item, warehouse)
//!     └── classify_stock(quantity, threshold)
//! ```

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::DbResult;
use crate::store::InventoryStore;
use kardex_core::validation::{validate_base_price, validate_line_quantity};
use kardex_core::{
    classify_stock, resolve_discount, DiscountResolution, DiscountTarget, Money, StockSnapshot,
    StockState,
};

/// Pricing and stock classification on top of any [`InventoryStore`].
#[derive(Debug, Clone)]
pub struct InventoryService<S> {
    store: S,
}

impl<S: InventoryStore> InventoryService<S> {
    pub fn new(store: S) -> Self {
        InventoryService { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Prices one sale line.
    ///
    /// ## Errors
    /// `DbError::Domain` when `quantity < 1` or `base_price <= 0`; storage
    /// errors otherwise.
    pub async fn quote(
        &self,
        target: &DiscountTarget,
        quantity: i64,
        base_price: Money,
        now: DateTime<Utc>,
    ) -> DbResult<DiscountResolution> {
        validate_line_quantity(quantity)?;
        validate_base_price(base_price)?;

        let candidates = self
            .store
            .find_eligible_discounts(target, quantity, now)
            .await?;

        let resolution = resolve_discount(candidates, base_price)?;

        info!(
            discount_target = ?target,
            quantity,
            base = %resolution.base_price,
            discount = %resolution.discount_applied,
            final_price = %resolution.final_price,
            "Line quoted"
        );

        Ok(resolution)
    }

    /// Current state of an item in a warehouse.
    pub async fn stock_state(&self, item_id: &str, warehouse_id: &str) -> DbResult<StockState> {
        let quantity = self
            .store
            .find_current_quantity(item_id, warehouse_id)
            .await?;

        self.evaluate_snapshot(&StockSnapshot {
            item_id: item_id.to_string(),
            warehouse_id: warehouse_id.to_string(),
            quantity,
        })
        .await
    }

    /// Classifies an already loaded quantity against the stored threshold.
    pub async fn evaluate_snapshot(&self, snapshot: &StockSnapshot) -> DbResult<StockState> {
        let threshold = self
            .store
            .find_stock_threshold(&snapshot.item_id, &snapshot.warehouse_id)
            .await?;

        let state = classify_stock(snapshot.quantity, threshold.as_ref())?;

        debug!(
            item_id = %snapshot.item_id,
            warehouse_id = %snapshot.warehouse_id,
            quantity = snapshot.quantity,
            configured = threshold.is_some(),
            state = %state,
            "Stock classified"
        );

        Ok(state)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use crate::store::MemoryInventoryStore;
    use chrono::Duration;
    use kardex_core::{DiscountCandidate, DiscountKind, StockThreshold};

    fn item(id: &str) -> DiscountTarget {
        DiscountTarget::Item(id.to_string())
    }

    fn percent(id: &str, bps: i64, priority: i64, combinable: bool) -> DiscountCandidate {
        DiscountCandidate {
            id: id.to_string(),
            name: format!("Promo {id}"),
            target: item("cola"),
            kind: DiscountKind::Percentage,
            value: bps,
            min_quantity: 1,
            priority,
            combinable,
            valid_from: Utc::now() - Duration::days(1),
            valid_to: None,
            active: true,
        }
    }

    fn memory_service() -> InventoryService<MemoryInventoryStore> {
        InventoryService::new(MemoryInventoryStore::new())
    }

    #[tokio::test]
    async fn test_quote_without_discounts() {
        let service = memory_service();
        let base = Money::from_cents(2_500);

        let quote = service.quote(&item("cola"), 1, base, Utc::now()).await.unwrap();
        assert_eq!(quote.discount_applied, Money::zero());
        assert_eq!(quote.final_price, base);
        assert!(quote.principal.is_none());
    }

    #[tokio::test]
    async fn test_quote_stacks_combinable() {
        let service = memory_service();
        service.store().put_discount(percent("a", 1_000, 1, true)).await.unwrap();
        service.store().put_discount(percent("b", 2_000, 1, true)).await.unwrap();

        let quote = service
            .quote(&item("cola"), 1, Money::from_cents(10_000), Utc::now())
            .await
            .unwrap();

        assert_eq!(quote.discount_applied, Money::from_cents(3_000));
        assert_eq!(quote.final_price, Money::from_cents(7_000));
        assert_eq!(quote.applied.len(), 2);
    }

    #[tokio::test]
    async fn test_quote_respects_min_quantity() {
        let service = memory_service();
        let mut bulk = percent("bulk", 1_500, 0, false);
        bulk.min_quantity = 10;
        service.store().put_discount(bulk).await.unwrap();

        let base = Money::from_cents(1_000);
        let small = service.quote(&item("cola"), 9, base, Utc::now()).await.unwrap();
        assert!(!small.has_discount());

        let large = service.quote(&item("cola"), 10, base, Utc::now()).await.unwrap();
        assert_eq!(large.discount_applied, Money::from_cents(150));
    }

    #[tokio::test]
    async fn test_quote_rejects_bad_input() {
        let service = memory_service();

        let err = service
            .quote(&item("cola"), 0, Money::from_cents(100), Utc::now())
            .await
            .unwrap_err();
        assert!(err.is_invalid_input());

        let err = service
            .quote(&item("cola"), 1, Money::zero(), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Domain(_)));
    }

    #[tokio::test]
    async fn test_stock_state_memory() {
        let service = memory_service();
        let store = service.store();

        assert_eq!(
            service.stock_state("cola", "main").await.unwrap(),
            StockState::OutOfStock
        );

        store.set_quantity("cola", "main", 5).await.unwrap();
        assert_eq!(
            service.stock_state("cola", "main").await.unwrap(),
            StockState::LowStockPendingConfig
        );

        store
            .put_threshold(StockThreshold::unconfigured("cola", "main").with_min_stock(10))
            .await
            .unwrap();
        assert_eq!(
            service.stock_state("cola", "main").await.unwrap(),
            StockState::LowStock
        );
    }

    #[tokio::test]
    async fn test_evaluate_snapshot_uses_stored_threshold() {
        let service = memory_service();
        service
            .store()
            .put_threshold(StockThreshold::unconfigured("soap", "main").with_max_stock(200))
            .await
            .unwrap();

        let snapshot = StockSnapshot {
            item_id: "soap".to_string(),
            warehouse_id: "main".to_string(),
            quantity: 150,
        };
        assert_eq!(service.evaluate_snapshot(&snapshot).await.unwrap(), StockState::Normal);

        let elsewhere = StockSnapshot {
            warehouse_id: "annex".to_string(),
            ..snapshot
        };
        assert_eq!(
            service.evaluate_snapshot(&elsewhere).await.unwrap(),
            StockState::OverStockPendingConfig
        );
    }

    #[tokio::test]
    async fn test_sqlite_service_end_to_end() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.discounts().insert(&percent("p2", 300, 2, false)).await.unwrap();
        db.discounts().insert(&percent("p1", 500, 1, false)).await.unwrap();
        db.stock().set_quantity("cola", "main", 10).await.unwrap();
        db.stock()
            .upsert_threshold(
                &StockThreshold::unconfigured("cola", "main")
                    .with_min_stock(10)
                    .with_reorder_point(12),
            )
            .await
            .unwrap();

        let service = InventoryService::new(db.store());

        let quote = service
            .quote(&item("cola"), 1, Money::from_cents(10_000), Utc::now())
            .await
            .unwrap();
        assert_eq!(quote.principal.map(|p| p.id), Some("p2".to_string()));
        assert_eq!(quote.discount_applied, Money::from_cents(300));

        assert_eq!(
            service.stock_state("cola", "main").await.unwrap(),
            StockState::ReorderPoint
        );
    }
}
