//! # Validation Module
//!
//! Input validation for the decision logic and for rows before they are
//! written.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Admin UI / API                                               │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Discount invariants (target, value range, window)                 │
//! │  ├── Threshold invariants (max >= min)                                 │
//! │  └── Caller contracts (base price > 0, quantity >= 0)                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK constraints                                                 │
//! │  └── UNIQUE (item_id, warehouse_id)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kardex_core::money::Money;
//! use kardex_core::validation::{validate_base_price, validate_stock_quantity};
//!
//! assert!(validate_base_price(Money::from_cents(1000)).is_ok());
//! assert!(validate_base_price(Money::zero()).is_err());
//! assert!(validate_stock_quantity(-1).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::{Money, BPS_PER_UNIT};
use crate::types::{DiscountCandidate, DiscountKind, StockThreshold};
use crate::MAX_NAME_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Caller Contracts
// =============================================================================

/// Validates the base price handed to the discount resolver.
///
/// ## Rules
/// - Must be strictly positive
pub fn validate_base_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::must_be_positive("base_price"));
    }
    Ok(())
}

/// Validates a stock quantity on hand.
///
/// ## Rules
/// - Zero is allowed (out of stock)
/// - Negative is rejected
pub fn validate_stock_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity < 0 {
        return Err(ValidationError::must_not_be_negative("quantity"));
    }
    Ok(())
}

/// Validates the units on a sale line being priced.
///
/// ## Rules
/// - Must be at least 1
pub fn validate_line_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity < 1 {
        return Err(ValidationError::must_be_positive("quantity"));
    }
    Ok(())
}

// =============================================================================
// Discount Candidates
// =============================================================================

/// Validates a discount candidate's invariants.
///
/// ## Rules
/// - `id` and `name` present, `name` at most [`MAX_NAME_LEN`] characters
/// - `Percentage`: 0 < value <= 10000 bps
/// - `FixedAmount`: value > 0 cents
/// - `min_quantity` >= 1
/// - `valid_to`, when set, is not before `valid_from`
///
/// The single-target invariant is enforced by [`DiscountTarget`](crate::DiscountTarget)
/// itself; see [`DiscountTarget::from_refs`](crate::DiscountTarget::from_refs).
///
/// ## Example
/// ```rust,ignore
/// let mut c = percent_discount(1000);
/// assert!(validate_discount_candidate(&c).is_ok());
///
/// c.value = 10_001; // 100.01%
/// assert!(validate_discount_candidate(&c).is_err());
/// ```
pub fn validate_discount_candidate(candidate: &DiscountCandidate) -> ValidationResult<()> {
    if candidate.id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    validate_discount_name(&candidate.name)?;

    match candidate.kind {
        DiscountKind::Percentage => {
            if candidate.value <= 0 || candidate.value > BPS_PER_UNIT {
                return Err(ValidationError::OutOfRange {
                    field: "percentage value (bps)".to_string(),
                    min: 1,
                    max: BPS_PER_UNIT,
                });
            }
        }
        DiscountKind::FixedAmount => {
            if candidate.value <= 0 {
                return Err(ValidationError::must_be_positive("fixed amount value"));
            }
        }
    }

    if candidate.min_quantity < 1 {
        return Err(ValidationError::must_be_positive("min_quantity"));
    }

    if let Some(valid_to) = candidate.valid_to {
        if valid_to < candidate.valid_from {
            return Err(ValidationError::conflict(
                "valid_from/valid_to",
                "validity window ends before it starts",
            ));
        }
    }

    Ok(())
}

/// Validates a discount display name.
pub fn validate_discount_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Stock Thresholds
// =============================================================================

/// Validates a stock threshold before upsert.
///
/// ## Rules
/// - `item_id`, `warehouse_id` present
/// - `min_stock`, `reorder_point` non-negative when set
/// - `max_stock` >= `min_stock` when both set (and >= 0 when set alone)
pub fn validate_stock_threshold(threshold: &StockThreshold) -> ValidationResult<()> {
    if threshold.item_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "item_id".to_string(),
        });
    }
    if threshold.warehouse_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "warehouse_id".to_string(),
        });
    }

    if threshold.min_stock.is_some_and(|min| min < 0) {
        return Err(ValidationError::must_not_be_negative("min_stock"));
    }
    if threshold.max_stock.is_some_and(|max| max < 0) {
        return Err(ValidationError::must_not_be_negative("max_stock"));
    }
    if threshold.reorder_point.is_some_and(|point| point < 0) {
        return Err(ValidationError::must_not_be_negative("reorder_point"));
    }

    if let (Some(min), Some(max)) = (threshold.min_stock, threshold.max_stock) {
        if max < min {
            return Err(ValidationError::conflict(
                "min_stock/max_stock",
                "max_stock must be greater than or equal to min_stock",
            ));
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
