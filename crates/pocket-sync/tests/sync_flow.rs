//! End-to-end offline-first scenario:
//! capture while disconnected, reconnect, automatic drain.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use pocket_core::sale::{DraftItem, SaleDraft};
use pocket_core::Money;
use pocket_db::{Database, DbConfig};
use pocket_sync::{
    ConnectivityMonitor, OfflineQueue, SaleBackend, SaleCreatePayload, SyncAgent, SyncConfig,
    SyncResult,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Backend that accepts everything and records the replayed payloads.
struct AcceptingBackend {
    calls: AtomicUsize,
    replayed: Mutex<Vec<SaleCreatePayload>>,
}

impl AcceptingBackend {
    fn new() -> Self {
        AcceptingBackend {
            calls: AtomicUsize::new(0),
            replayed: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SaleBackend for AcceptingBackend {
    async fn create_sale(&self, sale: &SaleCreatePayload) -> SyncResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.replayed.lock().unwrap().push(sale.clone());
        Ok(())
    }
}

fn draft(customer: &str, total_cents: i64) -> SaleDraft {
    SaleDraft {
        session: 5,
        customer_name: customer.to_string(),
        customer_contact: None,
        items: vec![DraftItem {
            product: 11,
            product_name: Some("Espresso".to_string()),
            quantity: 1,
            unit_price: Money::from_cents(total_cents),
            subtotal: None,
        }],
        subtotal: Money::from_cents(total_cents),
        discount: Money::zero(),
        tax: Money::zero(),
        total: Money::from_cents(total_cents),
        payment_method: "cash".to_string(),
        payment_status: "paid".to_string(),
        status: "completed".to_string(),
    }
}

#[tokio::test]
async fn offline_capture_then_reconnect_drains_in_order() {
    init_tracing();

    let backend = Arc::new(AcceptingBackend::new());
    let connectivity = ConnectivityMonitor::new(false);
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let queue = Arc::new(OfflineQueue::new(
        db,
        backend.clone(),
        connectivity.clone(),
        Arc::new(SyncConfig::default()),
    ));

    let handle = SyncAgent::new(queue.clone(), connectivity.clone()).spawn();

    // Capture three sales while disconnected: all succeed locally, nothing
    // touches the network.
    assert!(!queue.is_online());
    queue.save_offline_sale(draft("First", 100)).await.unwrap();
    queue.save_offline_sale(draft("Second", 200)).await.unwrap();
    queue.save_offline_sale(draft("Third", 300)).await.unwrap();

    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    assert_eq!(queue.pending_count().await.unwrap(), 3);

    // A manual sync attempt while offline is a no-op
    let outcome = queue.sync_offline_sales().await.unwrap();
    assert_eq!((outcome.success_count, outcome.failed_count), (0, 0));
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);

    // Connectivity returns: the agent drains without caller intervention
    connectivity.set_online(true);

    let mut drained = false;
    for _ in 0..200 {
        if queue.pending_count().await.unwrap() == 0 {
            drained = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(drained, "agent never drained the queue");

    // Replay preserved capture order
    let replayed = backend.replayed.lock().unwrap().clone();
    let customers: Vec<&str> = replayed.iter().map(|p| p.customer_name.as_str()).collect();
    assert_eq!(customers, vec!["First", "Second", "Third"]);

    // Records are marked synced, not deleted
    let all = queue.get_offline_sales().await.unwrap();
    assert_eq!(all.len(), 3);
    assert!(all.iter().all(|s| s.synced));

    // Status updates land after the pass returns
    tokio::time::sleep(Duration::from_millis(50)).await;

    let status = handle.status().await;
    assert!(status.online);
    assert_eq!(status.pending_count, 0);

    handle.shutdown().await;
}
