//! # Offline Sale Queue
//!
//! Guarantees that a point-of-sale transaction is never lost to a
//! connectivity drop, and that it reaches the backend exactly once in the
//! success case.
//!
//! ## Drain Pass
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    sync_offline_sales()                                 │
//! │                                                                         │
//! │  offline? ──► return {0, 0} immediately, touch nothing                 │
//! │      │                                                                  │
//! │      ▼ online                                                           │
//! │  load pending sales (insertion order)                                  │
//! │      │                                                                  │
//! │      ▼  for each sale, sequentially:                                    │
//! │  translate ──► POST ──► ok?  ──► mark_synced, success_count += 1       │
//! │                          │                                              │
//! │                          └err─► failed_count += 1, record stays        │
//! │                                 pending, loop CONTINUES                │
//! │      │                                                                  │
//! │      ▼ after the pass                                                   │
//! │  retention sweep: drop synced rows older than the window               │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  return {success_count, failed_count}                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! One bad record never blocks the rest of the batch, and a failed replay
//! leaves the record pending for the next connectivity-restoration event or
//! manual call. Retries are unbounded; the retention sweep (synced rows
//! only) bounds storage, not attempt count.

use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use pocket_core::{OfflineSale, SaleDraft, OFFLINE_ID_PREFIX};
use pocket_db::Database;

use crate::backend::SaleBackend;
use crate::config::SyncConfig;
use crate::connectivity::ConnectivityMonitor;
use crate::error::SyncResult;
use crate::protocol::SaleCreatePayload;

// =============================================================================
// Storage Keys
// =============================================================================

/// Snapshot key for the product list kept for offline selling.
pub const OFFLINE_PRODUCTS_KEY: &str = "offline_products";

/// Snapshot key for the inventory levels kept for offline selling.
pub const OFFLINE_INVENTORY_KEY: &str = "offline_inventory";

// =============================================================================
// Drain Outcome
// =============================================================================

/// Aggregate result of one drain pass, for UI reporting
/// ("3 sales synced, 1 failed").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Sales confirmed by the backend and marked synced.
    pub success_count: u32,

    /// Sales whose replay failed; they remain pending.
    pub failed_count: u32,
}

// =============================================================================
// Offline Queue
// =============================================================================

/// The offline sale queue: sole writer of the persisted sale collection.
///
/// Explicitly constructed by the application root and injected into callers;
/// single-instance-per-process by convention, not via globals.
pub struct OfflineQueue {
    /// Durable client storage.
    db: Database,

    /// Replay destination.
    backend: Arc<dyn SaleBackend>,

    /// The host's online/offline signal.
    connectivity: ConnectivityMonitor,

    /// Engine configuration (retention window).
    config: Arc<SyncConfig>,
}

impl OfflineQueue {
    /// Creates a queue over the given storage, backend and connectivity
    /// signal.
    pub fn new(
        db: Database,
        backend: Arc<dyn SaleBackend>,
        connectivity: ConnectivityMonitor,
        config: Arc<SyncConfig>,
    ) -> Self {
        OfflineQueue {
            db,
            backend,
            connectivity,
            config,
        }
    }

    /// Current network-reachability flag, as reported by the host.
    pub fn is_online(&self) -> bool {
        self.connectivity.is_online()
    }

    /// Whether the agent should drain automatically on reconnect.
    pub fn auto_sync_enabled(&self) -> bool {
        self.config.sync.auto_sync
    }

    // -------------------------------------------------------------------------
    // Capture
    // -------------------------------------------------------------------------

    /// Persists a sale captured while disconnected and returns its id.
    ///
    /// No network is involved and no validation beyond shape-coercion is
    /// performed (missing line totals are derived, enumerated strings get
    /// their defaults). Always succeeds short of a storage failure.
    pub async fn save_offline_sale(&self, draft: SaleDraft) -> SyncResult<String> {
        let id = format!("{}{}", OFFLINE_ID_PREFIX, Uuid::new_v4());
        let sale = OfflineSale::from_draft(draft, id.clone(), Utc::now());

        self.db.offline_sales().insert(&sale).await?;

        info!(id = %id, session_id = sale.session_id, total = %sale.total, "Saved offline sale");
        Ok(id)
    }

    // -------------------------------------------------------------------------
    // Inspection
    // -------------------------------------------------------------------------

    /// Every persisted sale, in insertion order.
    pub async fn get_offline_sales(&self) -> SyncResult<Vec<OfflineSale>> {
        Ok(self.db.offline_sales().get_all().await?)
    }

    /// Pending sales only, in insertion order.
    pub async fn get_unsynced_sales(&self) -> SyncResult<Vec<OfflineSale>> {
        Ok(self.db.offline_sales().get_unsynced().await?)
    }

    /// Number of pending sales.
    pub async fn pending_count(&self) -> SyncResult<i64> {
        Ok(self.db.offline_sales().count_unsynced().await?)
    }

    // -------------------------------------------------------------------------
    // State Transitions
    // -------------------------------------------------------------------------

    /// Marks a sale as synced. Idempotent; unknown ids are a no-op.
    pub async fn mark_synced(&self, id: &str) -> SyncResult<()> {
        Ok(self.db.offline_sales().mark_synced(id).await?)
    }

    /// Removes a sale only if it has already been synced.
    ///
    /// A pending record is deliberately left in place.
    pub async fn remove_synced(&self, id: &str) -> SyncResult<()> {
        Ok(self.db.offline_sales().remove_synced(id).await?)
    }

    // -------------------------------------------------------------------------
    // Drain
    // -------------------------------------------------------------------------

    /// Replays every pending sale against the backend.
    ///
    /// See the module docs for the pass structure. Network failures are
    /// caught per item and reported in the outcome, never raised; storage
    /// failures do propagate.
    ///
    /// While offline the pass is a no-op returning `{0, 0}`.
    pub async fn sync_offline_sales(&self) -> SyncResult<SyncOutcome> {
        if !self.is_online() {
            debug!("Offline, skipping drain pass");
            return Ok(SyncOutcome::default());
        }

        let repo = self.db.offline_sales();
        let pending = repo.get_unsynced().await?;

        let mut outcome = SyncOutcome::default();

        if !pending.is_empty() {
            info!(count = pending.len(), "Draining offline sales");
        }

        // Sequential, insertion order: replay preserves the causal order of
        // sales within a session.
        for sale in &pending {
            let payload = SaleCreatePayload::from(sale);

            match self.backend.create_sale(&payload).await {
                Ok(()) => {
                    repo.mark_synced(&sale.id).await?;
                    outcome.success_count += 1;
                    debug!(id = %sale.id, "Sale replayed");
                }
                Err(e) => {
                    outcome.failed_count += 1;
                    warn!(id = %sale.id, error = %e, "Replay failed, sale stays pending");
                }
            }
        }

        // Retention sweep closes every pass.
        let cutoff = Utc::now() - self.config.retention_window();
        repo.sweep_synced_before(cutoff).await?;

        if outcome.success_count > 0 || outcome.failed_count > 0 {
            info!(
                success = outcome.success_count,
                failed = outcome.failed_count,
                "Drain pass complete"
            );
        }

        Ok(outcome)
    }

    // -------------------------------------------------------------------------
    // Offline Reference Snapshots
    // -------------------------------------------------------------------------

    /// Stores the product list for offline selling (wholesale overwrite).
    pub async fn cache_products<T: Serialize>(&self, products: &T) -> SyncResult<()> {
        Ok(self.db.snapshots().put(OFFLINE_PRODUCTS_KEY, products).await?)
    }

    /// Loads the cached product list; empty when absent or unreadable.
    pub async fn cached_products<T: DeserializeOwned>(&self) -> SyncResult<Vec<T>> {
        Ok(self
            .db
            .snapshots()
            .get(OFFLINE_PRODUCTS_KEY)
            .await?
            .unwrap_or_default())
    }

    /// Stores inventory levels for offline selling (wholesale overwrite).
    pub async fn cache_inventory<T: Serialize>(&self, inventory: &T) -> SyncResult<()> {
        Ok(self.db.snapshots().put(OFFLINE_INVENTORY_KEY, inventory).await?)
    }

    /// Loads the cached inventory levels; empty when absent or unreadable.
    pub async fn cached_inventory<T: DeserializeOwned>(&self) -> SyncResult<Vec<T>> {
        Ok(self
            .db
            .snapshots()
            .get(OFFLINE_INVENTORY_KEY)
            .await?
            .unwrap_or_default())
    }

    /// True when any reference snapshot is available for offline use.
    pub async fn has_cached_data(&self) -> SyncResult<bool> {
        Ok(self.db.snapshots().has_any().await?)
    }

    /// Drops every reference snapshot.
    ///
    /// Pending sales are NOT touched: the no-data-loss guarantee outranks a
    /// cache wipe.
    pub async fn clear_offline_data(&self) -> SyncResult<()> {
        Ok(self.db.snapshots().clear().await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Duration;
    use pocket_core::sale::DraftItem;
    use pocket_core::Money;
    use pocket_db::DbConfig;
    use std::sync::Mutex;

    use crate::error::SyncError;

    /// Backend that records calls and fails for configured customers.
    struct ScriptedBackend {
        calls: Mutex<Vec<String>>,
        fail_for: Vec<String>,
    }

    impl ScriptedBackend {
        fn accepting() -> Self {
            ScriptedBackend {
                calls: Mutex::new(Vec::new()),
                fail_for: Vec::new(),
            }
        }

        fn failing_for(customers: &[&str]) -> Self {
            ScriptedBackend {
                calls: Mutex::new(Vec::new()),
                fail_for: customers.iter().map(|s| s.to_string()).collect(),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SaleBackend for ScriptedBackend {
        async fn create_sale(&self, sale: &SaleCreatePayload) -> SyncResult<()> {
            self.calls.lock().unwrap().push(sale.customer_name.clone());

            if self.fail_for.contains(&sale.customer_name) {
                return Err(SyncError::backend("simulated outage"));
            }
            Ok(())
        }
    }

    fn draft(customer: &str) -> SaleDraft {
        SaleDraft {
            session: 1,
            customer_name: customer.to_string(),
            customer_contact: None,
            items: vec![DraftItem {
                product: 1,
                product_name: Some("Test Product".to_string()),
                quantity: 1,
                unit_price: Money::from_cents(10000),
                subtotal: None,
            }],
            subtotal: Money::from_cents(10000),
            discount: Money::zero(),
            tax: Money::from_cents(1800),
            total: Money::from_cents(11800),
            payment_method: "cash".to_string(),
            payment_status: "paid".to_string(),
            status: "completed".to_string(),
        }
    }

    async fn queue_with(backend: Arc<ScriptedBackend>, online: bool) -> OfflineQueue {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        OfflineQueue::new(
            db,
            backend,
            ConnectivityMonitor::new(online),
            Arc::new(SyncConfig::default()),
        )
    }

    #[tokio::test]
    async fn test_save_round_trip() {
        let queue = queue_with(Arc::new(ScriptedBackend::accepting()), true).await;

        let id = queue.save_offline_sale(draft("Test Customer")).await.unwrap();
        assert!(id.starts_with(OFFLINE_ID_PREFIX));

        let sales = queue.get_offline_sales().await.unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].id, id);
        assert_eq!(sales[0].customer_name, "Test Customer");
        assert!(!sales[0].synced);
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let queue = queue_with(Arc::new(ScriptedBackend::accepting()), true).await;

        let a = queue.save_offline_sale(draft("A")).await.unwrap();
        let b = queue.save_offline_sale(draft("B")).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_mark_synced_updates_views() {
        let queue = queue_with(Arc::new(ScriptedBackend::accepting()), true).await;

        let id = queue.save_offline_sale(draft("Test Customer")).await.unwrap();
        queue.mark_synced(&id).await.unwrap();

        let all = queue.get_offline_sales().await.unwrap();
        assert!(all.iter().find(|s| s.id == id).unwrap().synced);
        assert!(queue.get_unsynced_sales().await.unwrap().is_empty());
        assert_eq!(queue.pending_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_sync_is_noop_when_offline() {
        let backend = Arc::new(ScriptedBackend::accepting());
        let queue = queue_with(backend.clone(), false).await;

        queue.save_offline_sale(draft("Test Customer")).await.unwrap();

        let outcome = queue.sync_offline_sales().await.unwrap();
        assert_eq!(outcome, SyncOutcome::default());

        // No network call was attempted, record untouched
        assert!(backend.calls().is_empty());
        assert_eq!(queue.pending_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_partial_failure_batch() {
        let backend = Arc::new(ScriptedBackend::failing_for(&["Customer B"]));
        let queue = queue_with(backend.clone(), true).await;

        queue.save_offline_sale(draft("Customer A")).await.unwrap();
        queue.save_offline_sale(draft("Customer B")).await.unwrap();
        queue.save_offline_sale(draft("Customer C")).await.unwrap();

        let outcome = queue.sync_offline_sales().await.unwrap();
        assert_eq!(outcome.success_count, 2);
        assert_eq!(outcome.failed_count, 1);

        // All three were attempted, in insertion order
        assert_eq!(backend.calls(), vec!["Customer A", "Customer B", "Customer C"]);

        // Exactly the failed one stays pending
        let pending = queue.get_unsynced_sales().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].customer_name, "Customer B");
    }

    #[tokio::test]
    async fn test_drain_marks_everything_on_success() {
        let backend = Arc::new(ScriptedBackend::accepting());
        let queue = queue_with(backend.clone(), true).await;

        queue.save_offline_sale(draft("Customer A")).await.unwrap();
        queue.save_offline_sale(draft("Customer B")).await.unwrap();

        let outcome = queue.sync_offline_sales().await.unwrap();
        assert_eq!(outcome.success_count, 2);
        assert_eq!(outcome.failed_count, 0);
        assert_eq!(queue.pending_count().await.unwrap(), 0);

        // A second pass has nothing to do
        let outcome = queue.sync_offline_sales().await.unwrap();
        assert_eq!(outcome, SyncOutcome::default());
        assert_eq!(backend.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_retention_sweep_after_pass() {
        // The backend keeps rejecting the old pending sale, so it stays
        // unsynced through the pass
        let backend = Arc::new(ScriptedBackend::failing_for(&["Old Pending"]));
        let queue = queue_with(backend.clone(), true).await;

        // Plant an old synced record and an equally old pending one
        let now = Utc::now();
        let old = OfflineSale::from_draft(
            draft("Old Synced"),
            "offline_old_synced".to_string(),
            now - Duration::days(8),
        );
        let stuck = OfflineSale::from_draft(
            draft("Old Pending"),
            "offline_old_pending".to_string(),
            now - Duration::days(8),
        );
        queue.db.offline_sales().insert(&old).await.unwrap();
        queue.db.offline_sales().insert(&stuck).await.unwrap();
        queue.mark_synced("offline_old_synced").await.unwrap();

        let outcome = queue.sync_offline_sales().await.unwrap();
        assert_eq!(outcome.failed_count, 1);

        let remaining: Vec<String> = queue
            .get_offline_sales()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();

        // Synced and past the window: swept. Pending: retained at any age.
        assert!(!remaining.contains(&"offline_old_synced".to_string()));
        assert!(remaining.contains(&"offline_old_pending".to_string()));
    }

    #[tokio::test]
    async fn test_remove_synced_guard() {
        let queue = queue_with(Arc::new(ScriptedBackend::accepting()), true).await;

        let id = queue.save_offline_sale(draft("Test Customer")).await.unwrap();

        queue.remove_synced(&id).await.unwrap();
        assert_eq!(queue.get_offline_sales().await.unwrap().len(), 1);

        queue.mark_synced(&id).await.unwrap();
        queue.remove_synced(&id).await.unwrap();
        assert!(queue.get_offline_sales().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reference_snapshots() {
        let queue = queue_with(Arc::new(ScriptedBackend::accepting()), true).await;

        assert!(!queue.has_cached_data().await.unwrap());
        let none: Vec<serde_json::Value> = queue.cached_products().await.unwrap();
        assert!(none.is_empty());

        let products = serde_json::json!([
            {"id": 1, "name": "Product 1"},
            {"id": 2, "name": "Product 2"}
        ]);
        queue.cache_products(&products).await.unwrap();

        let inventory = serde_json::json!([{"id": 1, "product": 1, "quantity": 100}]);
        queue.cache_inventory(&inventory).await.unwrap();

        assert!(queue.has_cached_data().await.unwrap());

        let cached: Vec<serde_json::Value> = queue.cached_products().await.unwrap();
        assert_eq!(cached.len(), 2);
        assert_eq!(cached[0]["name"], "Product 1");

        let cached: Vec<serde_json::Value> = queue.cached_inventory().await.unwrap();
        assert_eq!(cached[0]["quantity"], 100);

        // Wipe drops snapshots but never queued sales
        let id = queue.save_offline_sale(draft("Kept")).await.unwrap();
        queue.clear_offline_data().await.unwrap();
        assert!(!queue.has_cached_data().await.unwrap());
        assert!(queue.get_offline_sales().await.unwrap().iter().any(|s| s.id == id));
    }
}
