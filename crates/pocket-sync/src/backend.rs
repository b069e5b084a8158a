//! # Sale Backend
//!
//! The seam between the offline queue and the REST backend. Replay code
//! talks to the [`SaleBackend`] trait; production wires in the
//! [`HttpSaleBackend`], tests wire in scripted mocks.
//!
//! Transport-level policy (timeouts, TLS) lives in the HTTP client; this
//! layer only translates outcomes into [`SyncError::Backend`] values for the
//! drain loop to count.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::error::{SyncError, SyncResult};
use crate::protocol::SaleCreatePayload;

// =============================================================================
// Backend Trait
// =============================================================================

/// A destination that accepts sale-creation writes.
#[async_trait]
pub trait SaleBackend: Send + Sync {
    /// Creates a sale on the backend.
    ///
    /// An `Ok` return means the backend confirmed the write; the caller may
    /// mark the corresponding offline record as synced.
    async fn create_sale(&self, sale: &SaleCreatePayload) -> SyncResult<()>;
}

// =============================================================================
// HTTP Implementation
// =============================================================================

/// [`SaleBackend`] over the REST API.
///
/// Posts each sale to `{base_url}/sales/`, the backend's sale-creation
/// endpoint.
#[derive(Debug, Clone)]
pub struct HttpSaleBackend {
    client: reqwest::Client,
    sales_url: String,
}

impl HttpSaleBackend {
    /// Creates an HTTP backend for the given API base URL.
    pub fn new(base_url: &str, timeout: Duration) -> SyncResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SyncError::backend(format!("failed to build HTTP client: {e}")))?;

        let sales_url = format!("{}/sales/", base_url.trim_end_matches('/'));

        Ok(HttpSaleBackend { client, sales_url })
    }
}

#[async_trait]
impl SaleBackend for HttpSaleBackend {
    async fn create_sale(&self, sale: &SaleCreatePayload) -> SyncResult<()> {
        debug!(url = %self.sales_url, session = sale.session, "Replaying sale");

        let response = self
            .client
            .post(&self.sales_url)
            .json(sale)
            .send()
            .await
            .map_err(|e| SyncError::Backend {
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::Backend {
                status: Some(status.as_u16()),
                message: if body.is_empty() {
                    status.to_string()
                } else {
                    body
                },
            });
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
