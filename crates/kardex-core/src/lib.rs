//! # kardex-core: Pure Decision Logic for KardexPlus
//!
//! The two parts of the inventory back office that actually decide something:
//! which discount applies to a sale line, and what state an item's stock is in.
//! Everything here is a pure function over data already fetched from storage.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       KardexPlus Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            Admin UI (React) ──► REST API (external)             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        kardex-db: InventoryStore + InventoryService             │   │
//! │  │        (fetch eligible discounts / stock rows)                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kardex-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ discount  │  │   stock   │  │   money   │  │ validation│  │   │
//! │  │   │ resolver  │  │ classifier│  │   Money   │  │   rules   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Discount candidates, stock thresholds, stock snapshots
//! - [`discount`] - Principal selection and combinable stacking
//! - [`stock`] - Stock state classification with pending-config fallbacks
//! - [`money`] - Integer-cent money type
//! - [`error`] - Domain error types
//! - [`validation`] - Invariant and caller-contract checks
//!
//! ## Example Usage
//!
//! ```rust
//! use kardex_core::money::Money;
//! use kardex_core::{classify_stock, resolve_discount, StockState};
//!
//! let r = resolve_discount(vec![], Money::from_cents(1_500)).unwrap();
//! assert_eq!(r.final_price.cents(), 1_500);
//!
//! assert_eq!(classify_stock(0, None).unwrap(), StockState::OutOfStock);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod discount;
pub mod error;
pub mod money;
pub mod stock;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use discount::{resolve_discount, AppliedDiscount, DiscountResolution};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use stock::{classify_stock, StockState};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Without a configured minimum, quantities up to this are flagged
/// `LowStockPendingConfig`.
pub const PENDING_LOW_STOCK_LIMIT: i64 = 10;

/// Without a configured maximum, quantities above this are flagged
/// `OverStockPendingConfig`.
pub const PENDING_OVER_STOCK_LIMIT: i64 = 100;

/// Maximum length of a discount display name.
pub const MAX_NAME_LEN: usize = 120;
