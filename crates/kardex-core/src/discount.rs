//! # Discount Resolution
//!
//! Picks the principal discount for a sale line and stacks combinable ones.
//!
//! ## Resolution Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  eligible candidates (from storage)          base price                │
//! │       │                                          │                      │
//! │       ▼                                          │                      │
//! │  sort: priority DESC, value DESC, id ASC                               │
//! │       │                                          │                      │
//! │       ▼                                          ▼                      │
//! │  principal = first ──► amount_on(base) ─────────►┐                      │
//! │       │                                          │                      │
//! │       ├── principal.combinable?                  │                      │
//! │       │     yes: + amount_on(base) of every      │                      │
//! │       │          other combinable candidate ────►┤                      │
//! │       │     no:  nothing else contributes        │                      │
//! │       ▼                                          ▼                      │
//! │  discount_applied = min(sum, base)   final_price = base - discount     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every add-on is computed against the base price, never against the running
//! discounted price, so stacking is additive and order-independent:
//! 10% + 20% on 100.00 is 30.00 off, not 28.00.

use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::money::Money;
use crate::types::DiscountCandidate;
use crate::validation::{validate_base_price, validate_discount_candidate};

// =============================================================================
// Resolution Output
// =============================================================================

/// One candidate's contribution, before the total is clamped to the base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AppliedDiscount {
    pub discount_id: String,
    pub amount: Money,
}

/// Result of [`resolve_discount`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountResolution {
    pub base_price: Money,

    /// Total discount, never above `base_price`.
    pub discount_applied: Money,

    /// `base_price - discount_applied`, never negative.
    pub final_price: Money,

    /// Every candidate, in resolution order, for display.
    pub candidates: Vec<DiscountCandidate>,

    /// The candidate treated as principal. `None` when nothing was eligible.
    pub principal: Option<DiscountCandidate>,

    /// Principal first, then stacked add-ons.
    pub applied: Vec<AppliedDiscount>,
}

impl DiscountResolution {
    /// Resolution when no discount applies.
    pub fn none(base_price: Money) -> Self {
        DiscountResolution {
            base_price,
            discount_applied: Money::zero(),
            final_price: base_price,
            candidates: Vec::new(),
            principal: None,
            applied: Vec::new(),
        }
    }

    /// Whether any discount reduced the price.
    pub fn has_discount(&self) -> bool {
        self.discount_applied.is_positive()
    }
}

// =============================================================================
// Resolver
// =============================================================================

/// Resolves the discount for one sale line.
///
/// `candidates` are expected to be already eligible (target match, active,
/// inside the validity window, `min_quantity` reached). Input order does not
/// matter; they are sorted here.
///
/// ## Errors
/// `CoreError::InvalidInput` when `base_price <= 0` or a candidate breaks its
/// invariants.
///
/// ## Example
/// ```rust,ignore
/// let resolution = resolve_discount(vec![ten_pct_combinable, twenty_pct_combinable],
///                                   Money::from_cents(10_000))?;
/// assert_eq!(resolution.discount_applied.cents(), 3_000);
/// assert_eq!(resolution.final_price.cents(), 7_000);
/// ```
pub fn resolve_discount(
    candidates: Vec<DiscountCandidate>,
    base_price: Money,
) -> CoreResult<DiscountResolution> {
    validate_base_price(base_price)?;
    for candidate in &candidates {
        validate_discount_candidate(candidate)?;
    }

    if candidates.is_empty() {
        return Ok(DiscountResolution::none(base_price));
    }

    let candidates = sort_candidates(candidates);
    let principal = candidates[0].clone();

    let mut applied = vec![AppliedDiscount {
        discount_id: principal.id.clone(),
        amount: principal.amount_on(base_price),
    }];

    if principal.combinable {
        applied.extend(
            candidates[1..]
                .iter()
                .filter(|c| c.combinable)
                .map(|c| AppliedDiscount {
                    discount_id: c.id.clone(),
                    amount: c.amount_on(base_price),
                }),
        );
    }

    // Saturating sum: huge bases cannot wrap before the clamp.
    let sum: Money = applied.iter().map(|a| a.amount).sum();
    let discount_applied = sum.min(base_price);
    let final_price = base_price.saturating_sub(discount_applied);

    Ok(DiscountResolution {
        base_price,
        discount_applied,
        final_price,
        candidates,
        principal: Some(principal),
        applied,
    })
}

/// Orders candidates the way the resolver consumes them.
///
/// Priority DESC, then value DESC, then id ASC so the outcome never depends
/// on input order. Percentages (bps) and fixed amounts (cents) are compared
/// on their raw value; both are the decimal figure scaled by 100.
pub fn sort_candidates(mut candidates: Vec<DiscountCandidate>) -> Vec<DiscountCandidate> {
    candidates.sort_by(compare_candidates);
    candidates
}

fn compare_candidates(a: &DiscountCandidate, b: &DiscountCandidate) -> Ordering {
    let key = |c: &DiscountCandidate| (Reverse(c.priority), Reverse(c.value));
    key(a).cmp(&key(b)).then_with(|| a.id.cmp(&b.id))
}

// =============================================================================
// Unit Tests
// =============================================================================
