//! # pocket-sync: Offline Sale Queue & Sync Engine
//!
//! Guarantees that a point-of-sale transaction captured while disconnected
//! is never lost, and that it eventually reaches the REST backend.
//!
//! ## Component Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      pocket-sync Components                             │
//! │                                                                         │
//! │  Host environment                                                      │
//! │       │ set_online(bool)                                               │
//! │       ▼                                                                 │
//! │  ┌──────────────────┐   subscribe   ┌───────────────────────────────┐  │
//! │  │ Connectivity     │──────────────►│ SyncAgent (background task)   │  │
//! │  │ Monitor          │               │  offline→online: drain once   │  │
//! │  └──────────────────┘               └──────────────┬────────────────┘  │
//! │       ▲ is_online()                                │                   │
//! │       │                                            ▼                   │
//! │  ┌────┴─────────────────────────────────────────────────────────────┐  │
//! │  │ OfflineQueue                                                     │  │
//! │  │  save_offline_sale / get_* / mark_synced / remove_synced         │  │
//! │  │  sync_offline_sales → {success_count, failed_count}              │  │
//! │  │  retention sweep │ reference snapshots for offline selling       │  │
//! │  └────┬─────────────────────────────────────────────────────────────┘  │
//! │       │ SaleCreatePayload (protocol.rs)                               │
//! │       ▼                                                                 │
//! │  SaleBackend trait ──► HttpSaleBackend (reqwest) ──► REST API          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pocket_db::{Database, DbConfig};
//! use pocket_sync::{
//!     ConnectivityMonitor, HttpSaleBackend, OfflineQueue, SyncAgent, SyncConfig,
//! };
//!
//! let config = Arc::new(SyncConfig::load()?);
//! let db = Database::new(DbConfig::new("pocket.db")).await?;
//!
//! let base_url = config.backend.base_url.as_deref().expect("backend url");
//! let backend = Arc::new(HttpSaleBackend::new(base_url, config.request_timeout())?);
//!
//! let connectivity = ConnectivityMonitor::new(true);
//! let queue = Arc::new(OfflineQueue::new(db, backend, connectivity.clone(), config));
//! let agent = SyncAgent::new(queue.clone(), connectivity.clone()).spawn();
//!
//! // Host wiring: feed reachability changes into the monitor
//! connectivity.set_online(false);
//! queue.save_offline_sale(draft).await?;   // captured locally
//! connectivity.set_online(true);           // agent drains automatically
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod agent;
pub mod backend;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod protocol;
pub mod queue;

// =============================================================================
// Re-exports
// =============================================================================

pub use agent::{NoOpEmitter, SyncAgent, SyncAgentHandle, SyncEventEmitter, SyncStatus};
pub use backend::{HttpSaleBackend, SaleBackend};
pub use config::{BackendConfig, DeviceConfig, SyncConfig, SyncSettings};
pub use connectivity::ConnectivityMonitor;
pub use error::{SyncError, SyncResult};
pub use protocol::{SaleCreatePayload, SaleItemPayload};
pub use queue::{OfflineQueue, SyncOutcome, OFFLINE_INVENTORY_KEY, OFFLINE_PRODUCTS_KEY};
