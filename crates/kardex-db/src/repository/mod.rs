//! # Repository Module
//!
//! SQLite repositories for KardexPlus.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Admin tools / seed / stock-report                                     │
//! │       │                                                                 │
//! │       │  db.discounts().insert(&candidate)                             │
//! │       │  db.stock().stock_report(Some("main"))                         │
//! │       ▼                                                                 │
//! │  DiscountRepository              StockRepository                       │
//! │  ├── insert / update             ├── set_quantity / adjust_quantity    │
//! │  ├── get_by_id / list_for_target ├── upsert_threshold / get_threshold  │
//! │  ├── find_eligible               ├── list_snapshots                    │
//! │  └── set_active / delete         └── stock_report                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite (discounts, stock_levels, stock_thresholds)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pricing and classification callers should go through
//! [`InventoryStore`](crate::store::InventoryStore) instead, so the backend
//! stays swappable.

pub mod discount;
pub mod stock;

pub use discount::{generate_discount_id, DiscountRepository};
pub use stock::{StockReportLine, StockRepository};
