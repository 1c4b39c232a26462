//! # kardex-db: Storage Layer for KardexPlus
//!
//! SQLite storage (sqlx), the [`InventoryStore`] boundary and the
//! [`InventoryService`] that feeds it into `kardex-core`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        KardexPlus Data Flow                             │
//! │                                                                         │
//! │  POS line / back-office report                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     kardex-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   InventoryService<S: InventoryStore>                          │   │
//! │  │        │                                                        │   │
//! │  │        ├──► SqliteInventoryStore ──► Database (pool.rs)        │   │
//! │  │        │         DiscountRepository / StockRepository           │   │
//! │  │        │                                                        │   │
//! │  │        └──► MemoryInventoryStore (tests, demos)                 │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  kardex-core: resolve_discount / classify_stock                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Backend selection (`KARDEX_STORE`)
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Storage error types
//! - [`repository`] - Discount and stock repositories
//! - [`store`] - `InventoryStore` trait and backends
//! - [`service`] - Quote and stock classification
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kardex_db::{open_store, InventoryService, StoreConfig};
//!
//! let store = open_store(&StoreConfig::from_env()?).await?;
//! let service = InventoryService::new(store);
//!
//! let quote = service.quote(&target, 6, Money::from_cents(2_000), Utc::now()).await?;
//! let state = service.stock_state("cola-330", "main").await?;
//! ```

use tracing_subscriber::EnvFilter;

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod service;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ConfigError, StoreBackend, StoreConfig};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use service::InventoryService;
pub use store::{open_store, InventoryStore, MemoryInventoryStore, SqliteInventoryStore};

// Repository re-exports for convenience
pub use repository::discount::DiscountRepository;
pub use repository::stock::{StockReportLine, StockRepository};

/// Installs the `tracing` subscriber for the binaries.
///
/// `RUST_LOG` wins when set, e.g.:
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=kardex_db=trace` - Trace the storage layer only
/// - Default: `info,kardex=debug,sqlx=warn`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kardex=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
