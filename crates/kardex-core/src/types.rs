//! # Domain Types
//!
//! Data shapes the decision logic works on. Rows are fetched by kardex-db and
//! handed here already materialized.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐   ┌─────────────────────┐                     │
//! │  │ DiscountCandidate   │   │  StockThreshold     │                     │
//! │  │ ─────────────────── │   │ ─────────────────── │                     │
//! │  │ id (UUID)           │   │ item_id             │                     │
//! │  │ target ─────────────┼─┐ │ warehouse_id        │                     │
//! │  │ kind, value         │ │ │ min_stock?          │                     │
//! │  │ min_quantity        │ │ │ max_stock?          │                     │
//! │  │ priority            │ │ │ reorder_point?      │                     │
//! │  │ combinable          │ │ └─────────────────────┘                     │
//! │  │ valid_from/valid_to │ │                                              │
//! │  └─────────────────────┘ │ ┌─────────────────────┐                     │
//! │                          │ │  StockSnapshot      │                     │
//! │  DiscountTarget ◄────────┘ │ item_id             │                     │
//! │  ├── Item(id)              │ warehouse_id        │                     │
//! │  └── Presentation(id)      │ quantity            │                     │
//! │                            └─────────────────────┘                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Discount Kind
// =============================================================================

/// How a discount's `value` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    /// `value` is in basis points of the base price (1000 = 10%).
    Percentage,
    /// `value` is a flat amount in cents.
    FixedAmount,
}

// =============================================================================
// Discount Target
// =============================================================================

/// What a discount is attached to: one item or one presentation, never both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum DiscountTarget {
    Item(String),
    Presentation(String),
}

impl DiscountTarget {
    /// Builds a target from the two nullable storage columns.
    ///
    /// Blank strings count as unset.
    ///
    /// ## Example
    /// ```rust
    /// use kardex_core::DiscountTarget;
    ///
    /// let target = DiscountTarget::from_refs(Some("item-1".into()), None).unwrap();
    /// assert_eq!(target, DiscountTarget::Item("item-1".into()));
    ///
    /// assert!(DiscountTarget::from_refs(None, None).is_err());
    /// assert!(DiscountTarget::from_refs(Some("a".into()), Some("b".into())).is_err());
    /// ```
    pub fn from_refs(
        item_id: Option<String>,
        presentation_id: Option<String>,
    ) -> Result<Self, ValidationError> {
        let item_id = item_id.filter(|id| !id.trim().is_empty());
        let presentation_id = presentation_id.filter(|id| !id.trim().is_empty());

        match (item_id, presentation_id) {
            (Some(item), None) => Ok(DiscountTarget::Item(item)),
            (None, Some(presentation)) => Ok(DiscountTarget::Presentation(presentation)),
            (Some(_), Some(_)) => Err(ValidationError::conflict(
                "item_id/presentation_id",
                "a discount targets an item or a presentation, not both",
            )),
            (None, None) => Err(ValidationError::Required {
                field: "item_id or presentation_id".to_string(),
            }),
        }
    }

    /// Item id when the target is an item.
    pub fn item_id(&self) -> Option<&str> {
        match self {
            DiscountTarget::Item(id) => Some(id),
            DiscountTarget::Presentation(_) => None,
        }
    }

    /// Presentation id when the target is a presentation.
    pub fn presentation_id(&self) -> Option<&str> {
        match self {
            DiscountTarget::Item(_) => None,
            DiscountTarget::Presentation(id) => Some(id),
        }
    }
}

// =============================================================================
// Discount Candidate
// =============================================================================

/// A discount rule that may apply to a sale line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountCandidate {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name for the admin UI.
    pub name: String,

    pub target: DiscountTarget,

    pub kind: DiscountKind,

    /// Basis points for `Percentage` (0 < v <= 10000), cents for `FixedAmount`.
    pub value: i64,

    /// Minimum units on the line for the discount to apply.
    pub min_quantity: i64,

    /// Higher wins.
    pub priority: i64,

    /// May stack on a combinable principal.
    pub combinable: bool,

    #[ts(as = "String")]
    pub valid_from: DateTime<Utc>,

    /// `None` = open-ended.
    #[ts(as = "Option<String>")]
    pub valid_to: Option<DateTime<Utc>>,

    /// Logical delete flag.
    pub active: bool,
}

impl DiscountCandidate {
    /// Discount this candidate yields on `base`, on its own.
    ///
    /// A fixed amount larger than the base is capped at the base.
    ///
    /// ## Example
    /// ```rust,ignore
    /// // 15% of 20.00
    /// assert_eq!(pct_15.amount_on(Money::from_cents(2000)).cents(), 300);
    /// // 50.00 flat on a 20.00 base
    /// assert_eq!(flat_50.amount_on(Money::from_cents(2000)).cents(), 2000);
    /// ```
    pub fn amount_on(&self, base: Money) -> Money {
        match self.kind {
            DiscountKind::Percentage => base.percentage(self.value),
            DiscountKind::FixedAmount => Money::from_cents(self.value).min(base),
        }
    }

    /// Whether `now` falls inside `[valid_from, valid_to]`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        if now < self.valid_from {
            return false;
        }
        match self.valid_to {
            Some(valid_to) => now <= valid_to,
            None => true,
        }
    }

    /// Upstream eligibility filter: active, inside its window, and the line
    /// quantity reaches `min_quantity`.
    pub fn is_eligible(&self, quantity: i64, now: DateTime<Utc>) -> bool {
        self.active && self.is_valid_at(now) && self.min_quantity <= quantity
    }
}

// =============================================================================
// Stock Threshold
// =============================================================================

/// Alarm thresholds for one item in one warehouse.
///
/// `None` means "not configured", which makes the classifier fall back to its
/// pending-configuration heuristics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct StockThreshold {
    pub item_id: String,
    pub warehouse_id: String,
    pub min_stock: Option<i64>,
    pub max_stock: Option<i64>,
    pub reorder_point: Option<i64>,
    pub active_in_warehouse: bool,
}

impl StockThreshold {
    /// A threshold row with nothing configured.
    pub fn unconfigured(item_id: impl Into<String>, warehouse_id: impl Into<String>) -> Self {
        StockThreshold {
            item_id: item_id.into(),
            warehouse_id: warehouse_id.into(),
            min_stock: None,
            max_stock: None,
            reorder_point: None,
            active_in_warehouse: true,
        }
    }

    pub fn with_min_stock(mut self, min: i64) -> Self {
        self.min_stock = Some(min);
        self
    }

    pub fn with_max_stock(mut self, max: i64) -> Self {
        self.max_stock = Some(max);
        self
    }

    pub fn with_reorder_point(mut self, point: i64) -> Self {
        self.reorder_point = Some(point);
        self
    }

    /// True when none of min/max/reorder is set.
    pub fn is_unconfigured(&self) -> bool {
        self.min_stock.is_none() && self.max_stock.is_none() && self.reorder_point.is_none()
    }
}

// =============================================================================
// Stock Snapshot
// =============================================================================

/// Quantity on hand for one item in one warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct StockSnapshot {
    pub item_id: String,
    pub warehouse_id: String,
    pub quantity: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn candidate(kind: DiscountKind, value: i64) -> DiscountCandidate {
        DiscountCandidate {
            id: "d-1".to_string(),
            name: "Promo".to_string(),
            target: DiscountTarget::Item("item-1".to_string()),
            kind,
            value,
            min_quantity: 1,
            priority: 0,
            combinable: false,
            valid_from: Utc::now() - Duration::days(1),
            valid_to: None,
            active: true,
        }
    }

    #[test]
    fn test_target_from_refs() {
        assert_eq!(
            DiscountTarget::from_refs(None, Some("p-1".to_string())).unwrap(),
            DiscountTarget::Presentation("p-1".to_string())
        );

        let both = DiscountTarget::from_refs(Some("i".into()), Some("p".into()));
        assert!(matches!(both, Err(ValidationError::Conflict { .. })));

        let neither = DiscountTarget::from_refs(Some("  ".into()), None);
        assert!(matches!(neither, Err(ValidationError::Required { .. })));
    }

    #[test]
    fn test_target_accessors() {
        let item = DiscountTarget::Item("i-9".to_string());
        assert_eq!(item.item_id(), Some("i-9"));
        assert_eq!(item.presentation_id(), None);
    }

    #[test]
    fn test_target_serializes_tagged() {
        let json = serde_json::to_string(&DiscountTarget::Presentation("p-2".into())).unwrap();
        assert_eq!(json, r#"{"type":"presentation","id":"p-2"}"#);
    }

    #[test]
    fn test_amount_on() {
        let base = Money::from_cents(2000);
        assert_eq!(candidate(DiscountKind::Percentage, 1500).amount_on(base).cents(), 300);
        assert_eq!(candidate(DiscountKind::FixedAmount, 450).amount_on(base).cents(), 450);
        assert_eq!(candidate(DiscountKind::FixedAmount, 5000).amount_on(base).cents(), 2000);
    }

    #[test]
    fn test_validity_window() {
        let now = Utc::now();
        let mut c = candidate(DiscountKind::Percentage, 1000);
        c.valid_from = now;
        c.valid_to = Some(now + Duration::hours(1));

        assert!(c.is_valid_at(now));
        assert!(c.is_valid_at(now + Duration::hours(1)));
        assert!(!c.is_valid_at(now - Duration::seconds(1)));
        assert!(!c.is_valid_at(now + Duration::hours(2)));
    }

    #[test]
    fn test_eligibility() {
        let now = Utc::now();
        let mut c = candidate(DiscountKind::Percentage, 1000);
        c.min_quantity = 3;

        assert!(!c.is_eligible(2, now));
        assert!(c.is_eligible(3, now));

        c.active = false;
        assert!(!c.is_eligible(10, now));
    }

    #[test]
    fn test_threshold_builders() {
        let t = StockThreshold::unconfigured("i", "w");
        assert!(t.is_unconfigured());

        let t = t.with_min_stock(5).with_max_stock(50).with_reorder_point(8);
        assert_eq!(t.min_stock, Some(5));
        assert_eq!(t.max_stock, Some(50));
        assert_eq!(t.reorder_point, Some(8));
        assert!(!t.is_unconfigured());
    }
}
