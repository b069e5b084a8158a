//! # Sale Wire Schema
//!
//! Translation from the locally persisted [`OfflineSale`] into the backend's
//! sale-creation schema.
//!
//! ## Field Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │               OfflineSale ──► SaleCreatePayload                         │
//! │                                                                         │
//! │  session_id            ──►  session                                    │
//! │  customer_name         ──►  customer_name                              │
//! │  customer_contact      ──►  customer_contact   (omitted when absent)   │
//! │  items[].product_id    ──►  items[].product                            │
//! │  items[].quantity      ──►  items[].quantity                           │
//! │  items[].unit_price    ──►  items[].unit_price                         │
//! │  (none)                ──►  items[].discount   (always zero)           │
//! │  items[].line_total    ──►  items[].subtotal                           │
//! │  subtotal/discount/tax/total ──► unchanged                             │
//! │  payment_method/payment_status/status ──► unchanged                    │
//! │                                                                         │
//! │  NOT SENT: id (client-side only), created_at, synced                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The client-generated `offline_` id never crosses the wire; the backend
//! assigns its own id on creation.

use serde::{Deserialize, Serialize};

use pocket_core::{Money, OfflineSale};

// =============================================================================
// Payload Types
// =============================================================================

/// A line item in the backend's sale-creation schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleItemPayload {
    /// Server-side product id.
    pub product: i64,

    /// Quantity sold.
    pub quantity: i64,

    /// Unit price in cents.
    pub unit_price: Money,

    /// Per-line discount in cents. Offline capture doesn't support line
    /// discounts, so replay always sends zero.
    pub discount: Money,

    /// Line total in cents.
    pub subtotal: Money,
}

/// The backend's sale-creation schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleCreatePayload {
    /// The sale session id.
    pub session: i64,

    /// Customer display name.
    pub customer_name: String,

    /// Optional customer contact; omitted from the JSON when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_contact: Option<String>,

    /// Line items.
    pub items: Vec<SaleItemPayload>,

    /// Sum of line totals, in cents.
    pub subtotal: Money,

    /// Sale-level discount, in cents.
    pub discount: Money,

    /// Tax amount, in cents.
    pub tax: Money,

    /// Grand total, in cents.
    pub total: Money,

    /// Payment method string, passed through unchanged.
    pub payment_method: String,

    /// Payment status string, passed through unchanged.
    pub payment_status: String,

    /// Sale status string, passed through unchanged.
    pub status: String,
}

impl From<&OfflineSale> for SaleCreatePayload {
    fn from(sale: &OfflineSale) -> Self {
        SaleCreatePayload {
            session: sale.session_id,
            customer_name: sale.customer_name.clone(),
            customer_contact: sale.customer_contact.clone(),
            items: sale
                .items
                .iter()
                .map(|item| SaleItemPayload {
                    product: item.product_id,
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    discount: Money::zero(),
                    subtotal: item.line_total,
                })
                .collect(),
            subtotal: sale.subtotal,
            discount: sale.discount,
            tax: sale.tax,
            total: sale.total,
            payment_method: sale.payment_method.clone(),
            payment_status: sale.payment_status.clone(),
            status: sale.status.clone(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
