use async_trait::async_trait;
use thiserror::Error;

use crate::domain::record::{CustomerProfile, OrderRecord};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SinkError {
    #[error("persistence failure: {0}")]
    Persistence(String),
}

/// Write-only destination for finalized orders and customer profile
/// updates. Fire-and-forget from the engine's perspective: a failure here
/// never blocks the user-facing confirmation, it is logged for follow-up.
#[async_trait]
pub trait OrderSink: Send + Sync {
    async fn save_order(&self, record: &OrderRecord) -> Result<(), SinkError>;

    /// Upserts the customer profile keyed by phone number.
    async fn upsert_customer(&self, profile: &CustomerProfile) -> Result<(), SinkError>;
}
