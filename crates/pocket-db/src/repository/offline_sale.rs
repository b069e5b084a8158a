//! # Offline Sale Repository
//!
//! Persistence for the offline sale queue.
//!
//! ## The Queue on Disk
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      offline_sales Table                                │
//! │                                                                         │
//! │  id          | items (JSON) | ... | created_at | synced | synced_at    │
//! │  ────────────┼──────────────┼─────┼────────────┼────────┼───────────   │
//! │  offline_a1  │ [{...}]      │     │ 09:14:02   │ 1      │ 09:20:11     │
//! │  offline_b2  │ [{...}]      │     │ 09:31:45   │ 0      │ NULL         │
//! │  offline_c3  │ [{...}]      │     │ 09:32:10   │ 0      │ NULL         │
//! │                                                                         │
//! │  • Drain replays synced = 0 rows in (created_at, rowid) order          │
//! │  • mark_synced flips the flag after a confirmed backend write          │
//! │  • The retention sweep deletes only synced rows past the cutoff        │
//! │  • A row whose items column won't parse is skipped on read, not        │
//! │    surfaced as an error                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::DbResult;
use pocket_core::{Money, OfflineSale, OfflineSaleItem};

// =============================================================================
// Row Mapping
// =============================================================================

/// Raw database row for an offline sale.
#[derive(Debug, sqlx::FromRow)]
struct OfflineSaleRow {
    id: String,
    session_id: i64,
    customer_name: String,
    customer_contact: Option<String>,
    items: String,
    subtotal_cents: i64,
    discount_cents: i64,
    tax_cents: i64,
    total_cents: i64,
    payment_method: String,
    payment_status: String,
    status: String,
    created_at: DateTime<Utc>,
    synced: bool,
}

impl OfflineSaleRow {
    /// Converts a row into the domain type.
    ///
    /// Returns `None` when the items column is unreadable; the caller treats
    /// the row as absent (availability over strictness at the read boundary).
    fn into_domain(self) -> Option<OfflineSale> {
        let items: Vec<OfflineSaleItem> = match serde_json::from_str(&self.items) {
            Ok(items) => items,
            Err(e) => {
                warn!(
                    id = %self.id,
                    error = %e,
                    "Skipping offline sale with unreadable items payload"
                );
                return None;
            }
        };

        Some(OfflineSale {
            id: self.id,
            session_id: self.session_id,
            customer_name: self.customer_name,
            customer_contact: self.customer_contact,
            items,
            subtotal: Money::from_cents(self.subtotal_cents),
            discount: Money::from_cents(self.discount_cents),
            tax: Money::from_cents(self.tax_cents),
            total: Money::from_cents(self.total_cents),
            payment_method: self.payment_method,
            payment_status: self.payment_status,
            status: self.status,
            created_at: self.created_at,
            synced: self.synced,
        })
    }
}

/// Columns selected by every read query, in `OfflineSaleRow` order.
const SELECT_COLUMNS: &str = "\
    id, session_id, customer_name, customer_contact, items, \
    subtotal_cents, discount_cents, tax_cents, total_cents, \
    payment_method, payment_status, status, created_at, synced";

// =============================================================================
// Repository
// =============================================================================

/// Repository for the persisted offline sale queue.
#[derive(Debug, Clone)]
pub struct OfflineSaleRepository {
    pool: SqlitePool,
}

impl OfflineSaleRepository {
    /// Creates a new OfflineSaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OfflineSaleRepository { pool }
    }

    /// Appends a sale to the persisted queue.
    pub async fn insert(&self, sale: &OfflineSale) -> DbResult<()> {
        let items = serde_json::to_string(&sale.items)?;

        debug!(id = %sale.id, session_id = sale.session_id, "Persisting offline sale");

        sqlx::query(
            r#"
            INSERT INTO offline_sales (
                id, session_id, customer_name, customer_contact, items,
                subtotal_cents, discount_cents, tax_cents, total_cents,
                payment_method, payment_status, status,
                created_at, synced, synced_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, NULL)
            "#,
        )
        .bind(&sale.id)
        .bind(sale.session_id)
        .bind(&sale.customer_name)
        .bind(&sale.customer_contact)
        .bind(&items)
        .bind(sale.subtotal.cents())
        .bind(sale.discount.cents())
        .bind(sale.tax.cents())
        .bind(sale.total.cents())
        .bind(&sale.payment_method)
        .bind(&sale.payment_status)
        .bind(&sale.status)
        .bind(sale.created_at)
        .bind(sale.synced)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Returns every persisted sale in insertion order.
    ///
    /// `rowid` breaks ties between sales captured within the same timestamp
    /// tick, so replay order always matches capture order.
    pub async fn get_all(&self) -> DbResult<Vec<OfflineSale>> {
        let rows: Vec<OfflineSaleRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM offline_sales ORDER BY created_at ASC, rowid ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().filter_map(OfflineSaleRow::into_domain).collect())
    }

    /// Returns pending sales (`synced = 0`) in insertion order.
    pub async fn get_unsynced(&self) -> DbResult<Vec<OfflineSale>> {
        let rows: Vec<OfflineSaleRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM offline_sales \
             WHERE synced = 0 ORDER BY created_at ASC, rowid ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().filter_map(OfflineSaleRow::into_domain).collect())
    }

    /// Looks up a single sale by id.
    pub async fn get(&self, id: &str) -> DbResult<Option<OfflineSale>> {
        let row: Option<OfflineSaleRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM offline_sales WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.and_then(OfflineSaleRow::into_domain))
    }

    /// Marks a sale as successfully replayed.
    ///
    /// Idempotent; an unknown id is a no-op.
    pub async fn mark_synced(&self, id: &str) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE offline_sales SET synced = 1, synced_at = ?2 WHERE id = ?1",
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            debug!(id, "mark_synced on unknown id ignored");
        }

        Ok(())
    }

    /// Deletes a sale only if it has been synced.
    ///
    /// Guard against deleting unflushed data: a pending record is left
    /// untouched.
    pub async fn remove_synced(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM offline_sales WHERE id = ?1 AND synced = 1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        debug!(id, removed = result.rows_affected(), "remove_synced");
        Ok(())
    }

    /// Retention sweep: removes synced sales created before `cutoff`.
    ///
    /// Pending sales are never swept regardless of age.
    ///
    /// ## Returns
    /// Number of deleted rows.
    pub async fn sweep_synced_before(&self, cutoff: DateTime<Utc>) -> DbResult<u64> {
        let result =
            sqlx::query("DELETE FROM offline_sales WHERE synced = 1 AND created_at < ?1")
                .bind(cutoff)
                .execute(&self.pool)
                .await?;

        let removed = result.rows_affected();
        if removed > 0 {
            debug!(removed, %cutoff, "Swept old synced sales");
        }

        Ok(removed)
    }

    /// Counts pending sales.
    pub async fn count_unsynced(&self) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM offline_sales WHERE synced = 0")
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Duration;
    use pocket_core::sale::{DraftItem, SaleDraft};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn sale(id: &str, created_at: DateTime<Utc>) -> OfflineSale {
        let draft = SaleDraft {
            session: 1,
            customer_name: "Test Customer".to_string(),
            customer_contact: Some("555-0100".to_string()),
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
        };
        OfflineSale::from_draft(draft, id.to_string(), created_at)
    }

    #[tokio::test]
    async fn test_insert_then_get_round_trip() {
        let db = test_db().await;
        let repo = db.offline_sales();

        let original = sale("offline_rt", Utc::now());
        repo.insert(&original).await.unwrap();

        let fetched = repo.get("offline_rt").await.unwrap().unwrap();
        assert_eq!(fetched.customer_name, original.customer_name);
        assert_eq!(fetched.items, original.items);
        assert_eq!(fetched.total, original.total);
        assert!(!fetched.synced);

        assert!(repo.get("offline_missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unsynced_filter() {
        let db = test_db().await;
        let repo = db.offline_sales();

        repo.insert(&sale("offline_a", Utc::now())).await.unwrap();
        repo.insert(&sale("offline_b", Utc::now())).await.unwrap();
        repo.mark_synced("offline_a").await.unwrap();

        let unsynced = repo.get_unsynced().await.unwrap();
        assert_eq!(unsynced.len(), 1);
        assert_eq!(unsynced[0].id, "offline_b");

        assert_eq!(repo.count_unsynced().await.unwrap(), 1);
        assert_eq!(repo.get_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_mark_synced_is_idempotent() {
        let db = test_db().await;
        let repo = db.offline_sales();

        repo.insert(&sale("offline_x", Utc::now())).await.unwrap();
        repo.mark_synced("offline_x").await.unwrap();
        repo.mark_synced("offline_x").await.unwrap();
        // Unknown id is a silent no-op
        repo.mark_synced("offline_nope").await.unwrap();

        let fetched = repo.get("offline_x").await.unwrap().unwrap();
        assert!(fetched.synced);
    }

    #[tokio::test]
    async fn test_remove_synced_guards_pending_rows() {
        let db = test_db().await;
        let repo = db.offline_sales();

        repo.insert(&sale("offline_pending", Utc::now())).await.unwrap();
        repo.remove_synced("offline_pending").await.unwrap();

        // Still there: the record was never flushed
        assert!(repo.get("offline_pending").await.unwrap().is_some());

        repo.mark_synced("offline_pending").await.unwrap();
        repo.remove_synced("offline_pending").await.unwrap();
        assert!(repo.get("offline_pending").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sweep_removes_only_old_synced_rows() {
        let db = test_db().await;
        let repo = db.offline_sales();

        let now = Utc::now();
        let eight_days_ago = now - Duration::days(8);

        repo.insert(&sale("offline_old_synced", eight_days_ago)).await.unwrap();
        repo.insert(&sale("offline_old_pending", eight_days_ago)).await.unwrap();
        repo.insert(&sale("offline_new_synced", now)).await.unwrap();
        repo.mark_synced("offline_old_synced").await.unwrap();
        repo.mark_synced("offline_new_synced").await.unwrap();

        let cutoff = now - Duration::days(7);
        let removed = repo.sweep_synced_before(cutoff).await.unwrap();
        assert_eq!(removed, 1);

        // Old pending record survives regardless of age
        assert!(repo.get("offline_old_pending").await.unwrap().is_some());
        // Recent synced record survives the cutoff
        assert!(repo.get("offline_new_synced").await.unwrap().is_some());
        assert!(repo.get("offline_old_synced").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_all_preserves_insertion_order() {
        let db = test_db().await;
        let repo = db.offline_sales();

        let now = Utc::now();
        // Inserted out of chronological order on purpose
        repo.insert(&sale("offline_2", now - Duration::seconds(1))).await.unwrap();
        repo.insert(&sale("offline_3", now)).await.unwrap();
        repo.insert(&sale("offline_1", now - Duration::seconds(2))).await.unwrap();

        let ids: Vec<String> = repo
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["offline_1", "offline_2", "offline_3"]);
    }

    #[tokio::test]
    async fn test_corrupted_items_row_is_skipped() {
        let db = test_db().await;
        let repo = db.offline_sales();

        repo.insert(&sale("offline_good", Utc::now())).await.unwrap();

        // Sneak in a row with an unparseable items payload
        sqlx::query(
            r#"
            INSERT INTO offline_sales (
                id, session_id, customer_name, customer_contact, items,
                subtotal_cents, discount_cents, tax_cents, total_cents,
                payment_method, payment_status, status, created_at, synced, synced_at
            ) VALUES ('offline_bad', 1, 'X', NULL, 'not-json',
                      0, 0, 0, 0, 'cash', 'paid', 'completed', ?1, 0, NULL)
            "#,
        )
        .bind(Utc::now())
        .execute(db.pool())
        .await
        .unwrap();

        let all = repo.get_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, "offline_good");
    }
}
