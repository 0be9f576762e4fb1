use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;
use tokio::sync::Notify;

use crate::workflows::intake::answers::{AnswerSet, Field};
use crate::workflows::intake::record::ExternalRecord;
use crate::workflows::intake::service::IntakeService;
use crate::workflows::intake::transport::{RecordId, RecordTransport, TransportError};
use crate::workflows::intake::wizard::LeadWizard;

pub(super) fn answers(entries: &[(Field, &str)]) -> AnswerSet {
    let mut answers = AnswerSet::new();
    for (field, value) in entries {
        answers.set(*field, *value);
    }
    answers
}

pub(super) const IDENTITY: &[(Field, &str)] = &[
    (Field::FirstName, "Dana"),
    (Field::LastName, "Reyes"),
    (Field::PhoneNumber, "(702) 555-0147"),
    (Field::Email, "dana.reyes@example.com"),
];

pub(super) fn classification(property_type: &'static str, action: &'static str) -> Vec<(Field, &'static str)> {
    vec![
        (Field::PropertyType, property_type),
        (Field::Purpose, "Investment"),
        (Field::Action, action),
    ]
}

pub(super) const SALE_DETAILS: &[(Field, &str)] = &[
    (Field::StreetAddress, "1452 Desert Bloom Ave"),
    (Field::ReasonForSelling, "Relocating to another city"),
    (Field::TimelineToSell, "Within 1-2 months"),
];

pub(super) const SEARCH_DETAILS: &[(Field, &str)] = &[
    (Field::Area, "Henderson"),
    (Field::PriceRange, "$450k - $525k"),
    (Field::Bedrooms, "3"),
    (Field::Bathrooms, "2"),
    (Field::SquareFeet, "1850"),
    (Field::Stories, "2"),
    (Field::Garages, "2"),
];

pub(super) const COMMERCIAL_DETAILS: &[(Field, &str)] = &[
    (Field::TypeOfBusiness, "Restaurant"),
    (Field::PropertyGoals, "Lease"),
    (Field::PriceRange, "$8k/month"),
    (Field::SquareFeet, "3200"),
    (Field::Location, "Summerlin"),
];

/// Complete answers for one branch.
pub(super) fn complete_answers(property_type: &'static str, action: &'static str) -> AnswerSet {
    let details = match (property_type, action) {
        ("Commercial", _) => COMMERCIAL_DETAILS,
        (_, "Sell") => SALE_DETAILS,
        _ => SEARCH_DETAILS,
    };
    let mut entries: Vec<(Field, &str)> = IDENTITY.to_vec();
    entries.extend(classification(property_type, action));
    entries.extend_from_slice(details);
    answers(&entries)
}

/// Walk a wizard through the identity and classification steps onto the details step.
pub(super) fn wizard_on_details(property_type: &'static str, action: &'static str) -> LeadWizard {
    let mut wizard = LeadWizard::with_answers(complete_answers(property_type, action));
    assert!(wizard.on_next(), "identity step should be complete");
    assert!(wizard.on_next(), "classification step should be complete");
    assert!(wizard.is_current_step_valid(), "details step should be complete");
    wizard
}

/// Transport that records every payload and replays scripted outcomes.
#[derive(Default)]
pub(super) struct RecordingTransport {
    sent: Mutex<Vec<ExternalRecord>>,
    outcomes: Mutex<VecDeque<Result<RecordId, TransportError>>>,
}

impl RecordingTransport {
    pub(super) fn scripted(outcomes: Vec<Result<RecordId, TransportError>>) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            outcomes: Mutex::new(outcomes.into()),
        }
    }

    pub(super) fn sent(&self) -> Vec<ExternalRecord> {
        self.sent.lock().expect("sent mutex poisoned").clone()
    }
}

#[async_trait]
impl RecordTransport for RecordingTransport {
    async fn send(&self, record: &ExternalRecord) -> Result<RecordId, TransportError> {
        let attempt = {
            let mut sent = self.sent.lock().expect("sent mutex poisoned");
            sent.push(record.clone());
            sent.len()
        };
        self.outcomes
            .lock()
            .expect("outcome mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| Ok(RecordId(format!("page-{attempt}"))))
    }
}

/// Transport that holds every send until released, to observe the in-flight window.
#[derive(Default)]
pub(super) struct GatedTransport {
    calls: AtomicUsize,
    entered: Notify,
    release: Notify,
}

impl GatedTransport {
    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(super) async fn wait_until_entered(&self) {
        self.entered.notified().await;
    }

    pub(super) fn release(&self) {
        self.release.notify_one();
    }
}

#[async_trait]
impl RecordTransport for GatedTransport {
    async fn send(&self, _record: &ExternalRecord) -> Result<RecordId, TransportError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.entered.notify_one();
        self.release.notified().await;
        Ok(RecordId(format!("gated-{call}")))
    }
}

pub(super) fn recording_service() -> (Arc<IntakeService<RecordingTransport>>, Arc<RecordingTransport>) {
    let transport = Arc::new(RecordingTransport::default());
    let service = Arc::new(IntakeService::new(transport.clone()));
    (service, transport)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
