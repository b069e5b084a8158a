//! # Offline Sale Domain Types
//!
//! Types for point-of-sale transactions captured while disconnected.
//!
//! ## Record Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     OfflineSale Lifecycle                               │
//! │                                                                         │
//! │  SaleDraft (caller input)                                              │
//! │       │                                                                 │
//! │       ▼  OfflineSale::from_draft(draft, id, now)                       │
//! │  pending (synced = false) ──── replay succeeds ────► synced = true     │
//! │       │        ▲                                          │            │
//! │       │        └── replay fails (stays pending) ──┘       │            │
//! │       │                                                   ▼            │
//! │       │  never swept, any age              swept once older than the   │
//! │       └──────────────────────────          retention window            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The draft-to-sale conversion is a pure function: the id and timestamp are
//! injected by the caller, so the same inputs always produce the same record.
//!
//! `payment_method`, `payment_status` and `status` are enumerated strings
//! owned by the backend schema. They pass through this core unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Serde Defaults
// =============================================================================
// Mirror the backend's defaults so a minimal draft coerces to a valid sale.

fn default_payment_method() -> String {
    "cash".to_string()
}

fn default_payment_status() -> String {
    "paid".to_string()
}

fn default_status() -> String {
    "completed".to_string()
}

/// Display name used when the caller omitted a product name.
const UNKNOWN_PRODUCT_NAME: &str = "Product";

// =============================================================================
// Offline Sale Item
// =============================================================================

/// A line item of an offline sale.
///
/// Prices are frozen at capture time; `line_total` is derived from
/// `unit_price × quantity` when the draft didn't carry it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OfflineSaleItem {
    /// Server-side product id.
    pub product_id: i64,

    /// Product name at time of sale (frozen for receipts).
    pub product_name: String,

    /// Quantity sold (positive by construction).
    pub quantity: i64,

    /// Unit price in cents at time of sale.
    pub unit_price: Money,

    /// Line total in cents (`unit_price × quantity`).
    pub line_total: Money,
}

// =============================================================================
// Offline Sale
// =============================================================================

/// A point-of-sale transaction captured while disconnected.
///
/// Owned exclusively by the offline queue, which is the sole writer of the
/// persisted collection. `total == subtotal - discount + tax` by
/// construction; the invariant is not re-validated downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OfflineSale {
    /// Client-generated id, `offline_` prefixed.
    ///
    /// Distinguishable from server-assigned ids by the prefix; unique across
    /// concurrent creations on the same client (UUID-backed).
    pub id: String,

    /// The sale session this transaction belongs to.
    pub session_id: i64,

    /// Customer display name.
    pub customer_name: String,

    /// Optional customer phone/email.
    pub customer_contact: Option<String>,

    /// Line items in capture order.
    pub items: Vec<OfflineSaleItem>,

    /// Sum of line totals, in cents.
    pub subtotal: Money,

    /// Sale-level discount, in cents.
    pub discount: Money,

    /// Tax amount, in cents.
    pub tax: Money,

    /// Grand total, in cents (`subtotal - discount + tax`).
    pub total: Money,

    /// Payment method string, passed through to the backend unchanged.
    pub payment_method: String,

    /// Payment status string, passed through to the backend unchanged.
    pub payment_status: String,

    /// Sale status string, passed through to the backend unchanged.
    pub status: String,

    /// Client timestamp of enqueue.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// False at creation; true only after a confirmed successful replay.
    pub synced: bool,
}

impl OfflineSale {
    /// Builds an offline sale from a draft, coercing shape where needed.
    ///
    /// Coercions (nothing else is validated):
    /// - missing line totals are derived as `unit_price × quantity`
    /// - missing product names fall back to a placeholder
    /// - enumerated strings fall back to the backend defaults via serde
    ///
    /// The `id` and `created_at` are injected so this stays a pure function.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::Utc;
    /// use pocket_core::sale::{DraftItem, OfflineSale, SaleDraft};
    /// use pocket_core::Money;
    ///
    /// let draft = SaleDraft {
    ///     session: 1,
    ///     customer_name: "Walk-in".into(),
    ///     customer_contact: None,
    ///     items: vec![DraftItem {
    ///         product: 7,
    ///         product_name: Some("Coffee".into()),
    ///         quantity: 2,
    ///         unit_price: Money::from_cents(350),
    ///         subtotal: None,
    ///     }],
    ///     subtotal: Money::from_cents(700),
    ///     discount: Money::zero(),
    ///     tax: Money::from_cents(63),
    ///     total: Money::from_cents(763),
    ///     payment_method: "cash".into(),
    ///     payment_status: "paid".into(),
    ///     status: "completed".into(),
    /// };
    ///
    /// let sale = OfflineSale::from_draft(draft, "offline_abc".into(), Utc::now());
    /// assert_eq!(sale.items[0].line_total, Money::from_cents(700));
    /// assert!(!sale.synced);
    /// ```
    pub fn from_draft(draft: SaleDraft, id: String, created_at: DateTime<Utc>) -> Self {
        let items = draft
            .items
            .into_iter()
            .map(|item| OfflineSaleItem {
                product_id: item.product,
                product_name: item
                    .product_name
                    .unwrap_or_else(|| UNKNOWN_PRODUCT_NAME.to_string()),
                quantity: item.quantity,
                line_total: item
                    .subtotal
                    .unwrap_or_else(|| item.unit_price.multiply_quantity(item.quantity)),
                unit_price: item.unit_price,
            })
            .collect();

        OfflineSale {
            id,
            session_id: draft.session,
            customer_name: draft.customer_name,
            customer_contact: draft.customer_contact,
            items,
            subtotal: draft.subtotal,
            discount: draft.discount,
            tax: draft.tax,
            total: draft.total,
            payment_method: draft.payment_method,
            payment_status: draft.payment_status,
            status: draft.status,
            created_at,
            synced: false,
        }
    }

    /// Whether the retention sweep may remove this record.
    ///
    /// Only synced records age out; a pending record is retained forever.
    pub fn eligible_for_sweep(&self, cutoff: DateTime<Utc>) -> bool {
        self.synced && self.created_at < cutoff
    }
}

// =============================================================================
// Sale Draft (caller input)
// =============================================================================

/// Caller-facing input for capturing a sale.
///
/// Field names match the backend's sale-creation schema so a draft can be
/// deserialized straight from the point-of-sale form payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleDraft {
    /// The open sale session id.
    pub session: i64,

    /// Customer display name.
    pub customer_name: String,

    /// Optional customer phone/email.
    #[serde(default)]
    pub customer_contact: Option<String>,

    /// Line items.
    pub items: Vec<DraftItem>,

    /// Sum of line totals, in cents.
    pub subtotal: Money,

    /// Sale-level discount, in cents.
    #[serde(default)]
    pub discount: Money,

    /// Tax amount, in cents.
    #[serde(default)]
    pub tax: Money,

    /// Grand total, in cents.
    pub total: Money,

    /// Payment method; defaults to `"cash"`.
    #[serde(default = "default_payment_method")]
    pub payment_method: String,

    /// Payment status; defaults to `"paid"`.
    #[serde(default = "default_payment_status")]
    pub payment_status: String,

    /// Sale status; defaults to `"completed"`.
    #[serde(default = "default_status")]
    pub status: String,
}

/// A draft line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DraftItem {
    /// Server-side product id.
    pub product: i64,

    /// Product name for receipts; a placeholder is substituted when absent.
    #[serde(default)]
    pub product_name: Option<String>,

    /// Quantity sold.
    pub quantity: i64,

    /// Unit price in cents.
    pub unit_price: Money,

    /// Precomputed line total in cents; derived when absent.
    #[serde(default)]
    pub subtotal: Option<Money>,
}

// =============================================================================
// Unit Tests
// =============================================================================
