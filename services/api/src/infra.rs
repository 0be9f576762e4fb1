use async_trait::async_trait;
use lead_intake::workflows::intake::{
    ExternalRecord, NotionTransport, RecordId, RecordTransport, TransportError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Keeps every payload in memory instead of writing to the lead database.
#[derive(Default)]
pub(crate) struct DryRunTransport {
    records: Mutex<Vec<ExternalRecord>>,
}

impl DryRunTransport {
    pub(crate) fn records(&self) -> Vec<ExternalRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl RecordTransport for DryRunTransport {
    async fn send(&self, record: &ExternalRecord) -> Result<RecordId, TransportError> {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        records.push(record.clone());
        let record_id = RecordId(format!("dry-run-{}", records.len()));
        info!(record_id = %record_id.0, properties = record.len(), "lead captured without delivery");
        Ok(record_id)
    }
}

/// Transport selected at startup.
pub(crate) enum LeadTransport {
    Notion(NotionTransport),
    DryRun(DryRunTransport),
}

#[async_trait]
impl RecordTransport for LeadTransport {
    async fn send(&self, record: &ExternalRecord) -> Result<RecordId, TransportError> {
        match self {
            LeadTransport::Notion(transport) => transport.send(record).await,
            LeadTransport::DryRun(transport) => transport.send(record).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lead_intake::workflows::intake::{properties, PropertyValue};

    #[tokio::test]
    async fn dry_run_numbers_captured_records() {
        let transport = LeadTransport::DryRun(DryRunTransport::default());
        let mut record = ExternalRecord::new();
        record.insert(properties::NAME, PropertyValue::title("Dana Reyes"));

        let first = transport.send(&record).await.expect("captured");
        let second = transport.send(&record).await.expect("captured");

        assert_eq!(first, RecordId("dry-run-1".to_string()));
        assert_eq!(second, RecordId("dry-run-2".to_string()));
        let LeadTransport::DryRun(inner) = &transport else {
            panic!("dry run transport expected");
        };
        assert_eq!(inner.records().len(), 2);
    }
}
