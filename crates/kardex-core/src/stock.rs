//! # Stock State Classification
//!
//! Turns a quantity on hand plus the item/warehouse thresholds into one state.
//!
//! ## Evaluation Order (first match wins)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. quantity == 0                          → OutOfStock                 │
//! │  2. min set     && quantity <  min         → LowStock                   │
//! │  3. max set     && quantity >  max         → OverStock                  │
//! │  4. reorder set && quantity <= reorder     → ReorderPoint               │
//! │  5. min unset   && quantity <= 10          → LowStockPendingConfig      │
//! │  6. max unset   && quantity >  100         → OverStockPendingConfig     │
//! │  7. otherwise                              → Normal                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Low-stock comparison
//! The minimum is compared strictly (`quantity < min_stock`) everywhere,
//! stock report included. Sitting exactly on the minimum is not an alarm.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::CoreResult;
use crate::types::StockThreshold;
use crate::validation::validate_stock_quantity;
use crate::{PENDING_LOW_STOCK_LIMIT, PENDING_OVER_STOCK_LIMIT};

// =============================================================================
// Stock State
// =============================================================================

/// Categorical stock level for one item in one warehouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockState {
    OutOfStock,
    LowStock,
    OverStock,
    ReorderPoint,
    /// No minimum configured and the quantity looks low.
    LowStockPendingConfig,
    /// No maximum configured and the quantity looks high.
    OverStockPendingConfig,
    Normal,
}

impl StockState {
    /// Every state, in evaluation order.
    pub const ALL: [StockState; 7] = [
        StockState::OutOfStock,
        StockState::LowStock,
        StockState::OverStock,
        StockState::ReorderPoint,
        StockState::LowStockPendingConfig,
        StockState::OverStockPendingConfig,
        StockState::Normal,
    ];

    /// Stable snake_case tag (matches the serde representation).
    pub const fn as_str(&self) -> &'static str {
        match self {
            StockState::OutOfStock => "out_of_stock",
            StockState::LowStock => "low_stock",
            StockState::OverStock => "over_stock",
            StockState::ReorderPoint => "reorder_point",
            StockState::LowStockPendingConfig => "low_stock_pending_config",
            StockState::OverStockPendingConfig => "over_stock_pending_config",
            StockState::Normal => "normal",
        }
    }

    /// Anything but `Normal` deserves attention in the UI.
    pub const fn is_alert(&self) -> bool {
        !matches!(self, StockState::Normal)
    }

    /// The state came from the fallback heuristics, not from configured thresholds.
    pub const fn is_pending_config(&self) -> bool {
        matches!(
            self,
            StockState::LowStockPendingConfig | StockState::OverStockPendingConfig
        )
    }
}

impl fmt::Display for StockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Classifier
// =============================================================================

/// Classifies a quantity against an optional threshold row.
///
/// A missing row behaves exactly like a row with nothing configured.
///
/// ## Errors
/// `CoreError::InvalidInput` for a negative quantity.
///
/// ## Example
/// ```rust
/// use kardex_core::stock::{classify_stock, StockState};
/// use kardex_core::StockThreshold;
///
/// let t = StockThreshold::unconfigured("item", "main").with_min_stock(10);
/// assert_eq!(classify_stock(5, Some(&t)).unwrap(), StockState::LowStock);
/// assert_eq!(classify_stock(5, None).unwrap(), StockState::LowStockPendingConfig);
/// assert_eq!(classify_stock(0, Some(&t)).unwrap(), StockState::OutOfStock);
/// ```
pub fn classify_stock(quantity: i64, threshold: Option<&StockThreshold>) -> CoreResult<StockState> {
    validate_stock_quantity(quantity)?;

    let (min_stock, max_stock, reorder_point) = match threshold {
        Some(t) => (t.min_stock, t.max_stock, t.reorder_point),
        None => (None, None, None),
    };

    if quantity == 0 {
        return Ok(StockState::OutOfStock);
    }
    if min_stock.is_some_and(|min| quantity < min) {
        return Ok(StockState::LowStock);
    }
    if max_stock.is_some_and(|max| quantity > max) {
        return Ok(StockState::OverStock);
    }
    if reorder_point.is_some_and(|point| quantity <= point) {
        return Ok(StockState::ReorderPoint);
    }
    if min_stock.is_none() && quantity <= PENDING_LOW_STOCK_LIMIT {
        return Ok(StockState::LowStockPendingConfig);
    }
    if max_stock.is_none() && quantity > PENDING_OVER_STOCK_LIMIT {
        return Ok(StockState::OverStockPendingConfig);
    }

    Ok(StockState::Normal)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn threshold() -> StockThreshold {
        StockThreshold::unconfigured("item-1", "wh-1")
    }

    fn classify(quantity: i64, t: &StockThreshold) -> StockState {
        classify_stock(quantity, Some(t)).unwrap()
    }

    #[test]
    fn test_zero_is_always_out_of_stock() {
        let configured = threshold()
            .with_min_stock(0)
            .with_max_stock(0)
            .with_reorder_point(5);

        assert_eq!(classify_stock(0, None).unwrap(), StockState::OutOfStock);
        assert_eq!(classify(0, &threshold()), StockState::OutOfStock);
        assert_eq!(classify(0, &configured), StockState::OutOfStock);
    }

    #[test]
    fn test_low_stock() {
        assert_eq!(classify(5, &threshold().with_min_stock(10)), StockState::LowStock);
    }

    #[test]
    fn test_low_stock_is_strict_at_minimum() {
        let t = threshold().with_min_stock(10);
        assert_eq!(classify(9, &t), StockState::LowStock);
        assert_eq!(classify(10, &t), StockState::Normal);

        // Sitting on the minimum can still hit the reorder point.
        let t = t.with_reorder_point(12);
        assert_eq!(classify(10, &t), StockState::ReorderPoint);
    }

    #[test]
    fn test_over_stock() {
        let t = threshold().with_min_stock(5).with_max_stock(200);
        assert_eq!(classify(201, &t), StockState::OverStock);
        assert_eq!(classify(200, &t), StockState::Normal);
    }

    #[test]
    fn test_reorder_point_is_inclusive() {
        let t = threshold().with_min_stock(5).with_max_stock(100).with_reorder_point(20);
        assert_eq!(classify(20, &t), StockState::ReorderPoint);
        assert_eq!(classify(21, &t), StockState::Normal);
        assert_eq!(classify(4, &t), StockState::LowStock);
    }

    #[test]
    fn test_pending_config_fallbacks() {
        assert_eq!(classify_stock(5, None).unwrap(), StockState::LowStockPendingConfig);
        assert_eq!(classify_stock(10, None).unwrap(), StockState::LowStockPendingConfig);
        assert_eq!(classify_stock(11, None).unwrap(), StockState::Normal);
        assert_eq!(classify_stock(100, None).unwrap(), StockState::Normal);
        assert_eq!(classify_stock(150, None).unwrap(), StockState::OverStockPendingConfig);
    }

    #[test]
    fn test_absent_row_matches_empty_row() {
        for quantity in [0, 1, 10, 11, 100, 101, 5_000] {
            assert_eq!(
                classify_stock(quantity, None).unwrap(),
                classify(quantity, &threshold())
            );
        }
    }

    #[test]
    fn test_configured_max_disables_over_fallback() {
        assert_eq!(classify(150, &threshold().with_max_stock(200)), StockState::Normal);
    }

    #[test]
    fn test_configured_min_disables_low_fallback() {
        assert_eq!(classify(5, &threshold().with_min_stock(3)), StockState::Normal);
    }

    #[test]
    fn test_partial_config_keeps_other_fallback() {
        // Only max configured: low fallback still applies.
        assert_eq!(
            classify(7, &threshold().with_max_stock(500)),
            StockState::LowStockPendingConfig
        );
        // Only min configured: over fallback still applies.
        assert_eq!(
            classify(300, &threshold().with_min_stock(20)),
            StockState::OverStockPendingConfig
        );
    }

    #[test]
    fn test_reorder_precedes_pending_fallback() {
        assert_eq!(classify(8, &threshold().with_reorder_point(8)), StockState::ReorderPoint);
    }

    #[test]
    fn test_negative_quantity_is_invalid() {
        let err = classify_stock(-3, None).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_state_flags_and_tags() {
        assert!(!StockState::Normal.is_alert());
        assert!(StockState::ReorderPoint.is_alert());
        assert!(StockState::LowStockPendingConfig.is_pending_config());
        assert!(!StockState::LowStock.is_pending_config());

        for state in StockState::ALL {
            let json = serde_json::to_string(&state).unwrap();
            assert_eq!(json, format!("\"{}\"", state.as_str()));
        }
    }
}
