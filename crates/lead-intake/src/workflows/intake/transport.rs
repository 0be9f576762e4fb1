use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::record::ExternalRecord;

/// Identifier the record store assigns to a created lead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub String);

/// Outbound delivery of finalized lead records. Only success or failure is observed by
/// the wizard; timeouts and retries belong to the implementation.
#[async_trait]
pub trait RecordTransport: Send + Sync {
    async fn send(&self, record: &ExternalRecord) -> Result<RecordId, TransportError>;
}

/// Delivery failure. The wizard shows the message inline and lets the user retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("record store is not configured: {0}")]
    Configuration(String),
    #[error("record store rejected the lead ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}
