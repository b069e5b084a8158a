//! # pocket-db: Durable Client Storage for the Pocket POS Client Core
//!
//! This crate provides the durable storage backing the offline sale queue
//! and the offline reference snapshots. It uses SQLite for local storage
//! with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Pocket POS Storage Flow                            │
//! │                                                                         │
//! │  OfflineQueue (pocket-sync)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     pocket-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐   ┌───────────┐ │   │
//! │  │   │   Database    │    │   Repositories     │   │Migrations │ │   │
//! │  │   │   (pool.rs)   │◄───│ OfflineSaleRepo    │   │(embedded) │ │   │
//! │  │   │   SqlitePool  │    │ SnapshotRepo       │   │ 001_*.sql │ │   │
//! │  │   └───────────────┘    └────────────────────┘   └───────────┘ │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file in the client's data directory                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Storage error types
//! - [`repository`] - Repository implementations (offline sales, snapshots)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pocket_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/pocket.db")).await?;
//! let pending = db.offline_sales().get_unsynced().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::offline_sale::OfflineSaleRepository;
pub use repository::snapshot::SnapshotRepository;
