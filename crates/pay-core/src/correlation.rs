//! # Redirect Correlation
//!
//! Holds continuation data between the payment request that triggered an
//! off-site redirect and the request that brings the shopper back.
//!
//! ```text
//!  POST /api/initiatePayment ──store(ref, paymentData)──┐
//!                                                       ▼
//!                                            ┌─────────────────────┐
//!                                            │  ContinuationStore  │
//!                                            └─────────────────────┘
//!                                                       │
//!  GET|POST /api/handleShopperRedirect?orderRef=ref ◄───┘ evict(ref)
//! ```
//!
//! The store is injected into the server state; lifetime and locking are the
//! implementation's business, not a module-level map's.

use crate::error::PaymentResult;
use crate::payment::{ContinuationData, OrderRef};
use async_trait::async_trait;

/// Keyed storage for continuation data, one record per order reference.
#[async_trait]
pub trait ContinuationStore: Send + Sync {
    /// Insert or overwrite the record for `order_ref`.
    async fn store(&self, order_ref: &OrderRef, data: ContinuationData) -> PaymentResult<()>;

    /// Look up the record without consuming it. Missing keys are `None`, not errors.
    async fn fetch(&self, order_ref: &OrderRef) -> PaymentResult<Option<ContinuationData>>;

    /// Remove the record and return what was stored.
    async fn evict(&self, order_ref: &OrderRef) -> PaymentResult<Option<ContinuationData>>;

    /// Number of live records.
    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(feature = "memory-store")]
pub use memory::InMemoryContinuationStore;

#[cfg(feature = "memory-store")]
mod memory {
    use super::*;
    use chrono::{DateTime, Duration, Utc};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    #[derive(Debug, Clone)]
    struct ContinuationRecord {
        data: ContinuationData,
        stored_at: DateTime<Utc>,
    }

    /// Process-local store backed by `Arc<RwLock<HashMap<..>>>`.
    ///
    /// With a TTL, records older than the TTL are invisible to `fetch`/`evict`
    /// and are dropped by [`purge_expired`](Self::purge_expired).
    #[derive(Debug, Default, Clone)]
    pub struct InMemoryContinuationStore {
        records: Arc<RwLock<HashMap<OrderRef, ContinuationRecord>>>,
        ttl: Option<Duration>,
    }

    impl InMemoryContinuationStore {
        /// Store without expiry; records live until consumed.
        pub fn new() -> Self {
            Self::default()
        }

        /// Store whose records expire after `ttl`.
        pub fn with_ttl(ttl: Duration) -> Self {
            Self {
                records: Arc::default(),
                ttl: Some(ttl),
            }
        }

        fn is_live(&self, record: &ContinuationRecord, now: DateTime<Utc>) -> bool {
            match self.ttl {
                Some(ttl) => now - record.stored_at < ttl,
                None => true,
            }
        }

        /// Drop expired records, returning how many were removed.
        pub async fn purge_expired(&self) -> usize {
            let now = Utc::now();
            let mut records = self.records.write().await;
            let before = records.len();
            records.retain(|_, record| self.is_live(record, now));
            before - records.len()
        }

        #[cfg(test)]
        async fn backdate(&self, order_ref: &OrderRef, by: Duration) {
            if let Some(record) = self.records.write().await.get_mut(order_ref) {
                record.stored_at = record.stored_at - by;
            }
        }
    }

    #[async_trait]
    impl ContinuationStore for InMemoryContinuationStore {
        async fn store(&self, order_ref: &OrderRef, data: ContinuationData) -> PaymentResult<()> {
            let mut records = self.records.write().await;
            records.insert(
                order_ref.clone(),
                ContinuationRecord {
                    data,
                    stored_at: Utc::now(),
                },
            );
            Ok(())
        }

        async fn fetch(&self, order_ref: &OrderRef) -> PaymentResult<Option<ContinuationData>> {
            let records = self.records.read().await;
            let now = Utc::now();
            Ok(records
                .get(order_ref)
                .filter(|record| self.is_live(record, now))
                .map(|record| record.data.clone()))
        }

        async fn evict(&self, order_ref: &OrderRef) -> PaymentResult<Option<ContinuationData>> {
            let mut records = self.records.write().await;
            let now = Utc::now();
            Ok(records
                .remove(order_ref)
                .filter(|record| self.is_live(record, now))
                .map(|record| record.data))
        }

        async fn len(&self) -> usize {
            self.records.read().await.len()
        }
    }

}
