//! # Sync Agent
//!
//! Background orchestrator that reacts to connectivity transitions.
//!
//! ## Agent Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        SyncAgent Loop                                   │
//! │                                                                         │
//! │  ConnectivityMonitor (watch channel)                                   │
//! │       │                                                                 │
//! │       ▼ transition observed                                            │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  offline ──► online : run ONE sync_offline_sales() pass          │  │
//! │  │  online ──► offline : update the flag, take no other action      │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SyncEventEmitter: online_changed / drain_completed / drain_failed     │
//! │                                                                         │
//! │  SHUTDOWN: handle.shutdown().await stops the loop gracefully           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The agent owns no retry schedule. A failed drain leaves records pending
//! until the next connectivity-restoration event or a manual
//! `sync_offline_sales` call.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch, RwLock};
use tracing::{debug, error, info};

use crate::connectivity::ConnectivityMonitor;
use crate::queue::{OfflineQueue, SyncOutcome};

// =============================================================================
// Sync Status
// =============================================================================

/// Current sync state for external queries (badge rendering, diagnostics).
#[derive(Debug, Clone, Default)]
pub struct SyncStatus {
    /// Whether the host currently reports connectivity.
    pub online: bool,

    /// Number of pending offline sales after the last drain.
    pub pending_count: i64,

    /// When the last drain pass finished.
    pub last_sync_at: Option<DateTime<Utc>>,

    /// Outcome of the last drain pass.
    pub last_outcome: Option<SyncOutcome>,
}

// =============================================================================
// Event Emitter Trait
// =============================================================================

/// Trait for notifying the host of sync lifecycle events (implemented by
/// the embedding application; e.g. toast notifications, status badges).
///
/// Callbacks fire once per observed transition, in order.
pub trait SyncEventEmitter: Send + Sync {
    /// The online/offline flag changed.
    fn online_changed(&self, online: bool);

    /// A drain pass finished; `outcome` carries the counts for UI copy
    /// like "3 sales synced, 1 failed".
    fn drain_completed(&self, outcome: &SyncOutcome);

    /// A drain pass aborted on a storage failure.
    fn drain_failed(&self, message: &str);
}

/// No-op event emitter for tests and headless use.
pub struct NoOpEmitter;

impl SyncEventEmitter for NoOpEmitter {
    fn online_changed(&self, _online: bool) {}
    fn drain_completed(&self, _outcome: &SyncOutcome) {}
    fn drain_failed(&self, _message: &str) {}
}

// =============================================================================
// Sync Agent
// =============================================================================

/// Watches connectivity and drains the offline queue on reconnect.
pub struct SyncAgent {
    /// The queue to drain.
    queue: Arc<OfflineQueue>,

    /// Connectivity signal source.
    connectivity: ConnectivityMonitor,

    /// Event emitter for host notifications.
    emitter: Arc<dyn SyncEventEmitter>,
}

impl SyncAgent {
    /// Creates an agent with no host notifications.
    pub fn new(queue: Arc<OfflineQueue>, connectivity: ConnectivityMonitor) -> Self {
        Self::with_emitter(queue, connectivity, Arc::new(NoOpEmitter))
    }

    /// Creates an agent with a custom event emitter.
    pub fn with_emitter(
        queue: Arc<OfflineQueue>,
        connectivity: ConnectivityMonitor,
        emitter: Arc<dyn SyncEventEmitter>,
    ) -> Self {
        SyncAgent {
            queue,
            connectivity,
            emitter,
        }
    }

    /// Spawns the agent loop and returns a handle for status and shutdown.
    ///
    /// The subscription is taken before the task is spawned, so a
    /// transition fed right after `spawn` returns is never missed.
    pub fn spawn(self) -> SyncAgentHandle {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let online = self.connectivity.is_online();
        let status = Arc::new(RwLock::new(SyncStatus {
            online,
            ..SyncStatus::default()
        }));

        let online_rx = self.connectivity.subscribe();

        tokio::spawn(Self::run(
            self.queue,
            self.emitter,
            status.clone(),
            online_rx,
            shutdown_rx,
        ));

        info!(online, "Sync agent started");

        SyncAgentHandle {
            shutdown_tx,
            status,
        }
    }

    /// The agent loop body.
    async fn run(
        queue: Arc<OfflineQueue>,
        emitter: Arc<dyn SyncEventEmitter>,
        status: Arc<RwLock<SyncStatus>>,
        mut online_rx: watch::Receiver<bool>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        let mut was_online = *online_rx.borrow();

        loop {
            tokio::select! {
                changed = online_rx.changed() => {
                    if changed.is_err() {
                        info!("Connectivity monitor dropped, stopping sync agent");
                        break;
                    }

                    let online = *online_rx.borrow_and_update();
                    if online == was_online {
                        continue;
                    }
                    was_online = online;

                    emitter.online_changed(online);
                    {
                        let mut s = status.write().await;
                        s.online = online;
                    }

                    if !online {
                        // Going offline only flips the flag
                        debug!("Connectivity lost");
                        continue;
                    }

                    if !queue.auto_sync_enabled() {
                        debug!("Auto-sync disabled, not draining on reconnect");
                        continue;
                    }

                    info!("Connectivity restored, draining offline sales");
                    match queue.sync_offline_sales().await {
                        Ok(outcome) => {
                            emitter.drain_completed(&outcome);

                            let pending = queue.pending_count().await.unwrap_or(0);
                            let mut s = status.write().await;
                            s.pending_count = pending;
                            s.last_sync_at = Some(Utc::now());
                            s.last_outcome = Some(outcome);
                        }
                        Err(e) => {
                            error!(error = %e, "Drain pass failed");
                            emitter.drain_failed(&e.to_string());
                        }
                    }
                }

                _ = shutdown_rx.recv() => {
                    info!("Sync agent shutting down");
                    break;
                }
            }
        }

        info!("Sync agent stopped");
    }
}

// =============================================================================
// Agent Handle (for external control)
// =============================================================================

/// Handle for controlling a running [`SyncAgent`] from outside.
#[derive(Clone)]
pub struct SyncAgentHandle {
    /// Shutdown sender.
    shutdown_tx: mpsc::Sender<()>,

    /// Status accessor.
    status: Arc<RwLock<SyncStatus>>,
}

impl SyncAgentHandle {
    /// Gets the current sync status.
    pub async fn status(&self) -> SyncStatus {
        self.status.read().await.clone()
    }

    /// Signals the agent to shut down gracefully.
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use pocket_core::sale::{DraftItem, SaleDraft};
    use pocket_core::Money;
    use pocket_db::{Database, DbConfig};

    use crate::backend::SaleBackend;
    use crate::config::SyncConfig;
    use crate::error::SyncResult;
    use crate::protocol::SaleCreatePayload;

    struct CountingBackend {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SaleBackend for CountingBackend {
        async fn create_sale(&self, _sale: &SaleCreatePayload) -> SyncResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct RecordingEmitter {
        events: Mutex<Vec<String>>,
    }

    impl SyncEventEmitter for RecordingEmitter {
        fn online_changed(&self, online: bool) {
            self.events.lock().unwrap().push(format!("online:{online}"));
        }

        fn drain_completed(&self, outcome: &SyncOutcome) {
            self.events
                .lock()
                .unwrap()
                .push(format!("drained:{}/{}", outcome.success_count, outcome.failed_count));
        }

        fn drain_failed(&self, _message: &str) {
            self.events.lock().unwrap().push("drain_failed".to_string());
        }
    }

    fn draft() -> SaleDraft {
        SaleDraft {
            session: 1,
            customer_name: "Test Customer".to_string(),
            customer_contact: None,
            items: vec![DraftItem {
                product: 1,
                product_name: Some("Test Product".to_string()),
                quantity: 1,
                unit_price: Money::from_cents(100),
                subtotal: None,
            }],
            subtotal: Money::from_cents(100),
            discount: Money::zero(),
            tax: Money::zero(),
            total: Money::from_cents(100),
            payment_method: "cash".to_string(),
            payment_status: "paid".to_string(),
            status: "completed".to_string(),
        }
    }

    async fn wait_until_drained(queue: &OfflineQueue) {
        for _ in 0..100 {
            if queue.pending_count().await.unwrap() == 0 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("queue never drained");
    }

    #[tokio::test]
    async fn test_reconnect_triggers_drain() {
        let backend = Arc::new(CountingBackend {
            calls: AtomicUsize::new(0),
        });
        let connectivity = ConnectivityMonitor::new(false);
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let queue = Arc::new(OfflineQueue::new(
            db,
            backend.clone(),
            connectivity.clone(),
            Arc::new(SyncConfig::default()),
        ));

        let emitter = Arc::new(RecordingEmitter {
            events: Mutex::new(Vec::new()),
        });
        let handle =
            SyncAgent::with_emitter(queue.clone(), connectivity.clone(), emitter.clone()).spawn();

        // Captured offline, no replay attempted
        queue.save_offline_sale(draft()).await.unwrap();
        queue.save_offline_sale(draft()).await.unwrap();
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);

        // Reconnect: the agent drains without caller intervention
        connectivity.set_online(true);
        wait_until_drained(&queue).await;
        assert_eq!(backend.calls.load(Ordering::SeqCst), 2);

        // Status and emitter updates land after the pass returns
        tokio::time::sleep(Duration::from_millis(50)).await;

        let status = handle.status().await;
        assert!(status.online);
        assert_eq!(status.pending_count, 0);
        assert_eq!(
            status.last_outcome,
            Some(SyncOutcome {
                success_count: 2,
                failed_count: 0
            })
        );

        let events = emitter.events.lock().unwrap().clone();
        assert_eq!(events, vec!["online:true", "drained:2/0"]);

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_going_offline_takes_no_action() {
        let backend = Arc::new(CountingBackend {
            calls: AtomicUsize::new(0),
        });
        let connectivity = ConnectivityMonitor::new(true);
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let queue = Arc::new(OfflineQueue::new(
            db,
            backend.clone(),
            connectivity.clone(),
            Arc::new(SyncConfig::default()),
        ));

        let emitter = Arc::new(RecordingEmitter {
            events: Mutex::new(Vec::new()),
        });
        let handle =
            SyncAgent::with_emitter(queue.clone(), connectivity.clone(), emitter.clone()).spawn();

        connectivity.set_online(false);

        // Give the loop a moment to observe the transition
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
        let status = handle.status().await;
        assert!(!status.online);
        assert!(status.last_outcome.is_none());

        let events = emitter.events.lock().unwrap().clone();
        assert_eq!(events, vec!["online:false"]);

        handle.shutdown().await;
    }
}
