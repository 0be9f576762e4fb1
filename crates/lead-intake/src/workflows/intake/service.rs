use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::answers::{AnswerSet, Field, UnknownField};
use super::catalog::{field_spec, FieldSpec};
use super::domain::Branch;
use super::mapper::{map_record, MappingError};
use super::record::ExternalRecord;
use super::steps::{step_gaps, GapKind, StepKind, ValidationGap, STEPS, STEP_COUNT};
use super::transport::{RecordId, RecordTransport, TransportError};
use super::wizard::{LeadWizard, SubmissionStatus, SubmitRejected};

/// Identifier handed to the presentation layer for one wizard session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hosts in-memory wizard sessions and delivers finished leads through the transport.
pub struct IntakeService<T> {
    transport: Arc<T>,
    sessions: Mutex<HashMap<SessionId, LeadWizard>>,
    sequence: AtomicU64,
}

impl<T> IntakeService<T>
where
    T: RecordTransport + 'static,
{
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            transport,
            sessions: Mutex::new(HashMap::new()),
            sequence: AtomicU64::new(1),
        }
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    pub fn open_session(&self) -> SessionView {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        let session_id = SessionId(format!("lead-{id:06}"));
        let wizard = LeadWizard::new();
        let view = SessionView::from_wizard(&session_id, &wizard);
        self.sessions().insert(session_id.clone(), wizard);
        info!(session_id = %session_id, "intake session opened");
        view
    }

    pub fn view(&self, session_id: &SessionId) -> Result<SessionView, IntakeServiceError> {
        self.with_session(session_id, |_| Ok(()))
    }

    pub fn change_field(
        &self,
        session_id: &SessionId,
        field: &str,
        value: String,
    ) -> Result<SessionView, IntakeServiceError> {
        self.with_session(session_id, |wizard| {
            wizard.on_field_change(field, value)?;
            Ok(())
        })
    }

    pub fn next(&self, session_id: &SessionId) -> Result<SessionView, IntakeServiceError> {
        self.with_session(session_id, |wizard| {
            wizard.on_next();
            Ok(())
        })
    }

    pub fn back(&self, session_id: &SessionId) -> Result<SessionView, IntakeServiceError> {
        self.with_session(session_id, |wizard| {
            wizard.on_back();
            Ok(())
        })
    }

    pub fn dismiss_error(&self, session_id: &SessionId) -> Result<SessionView, IntakeServiceError> {
        self.with_session(session_id, |wizard| {
            wizard.dismiss_error();
            Ok(())
        })
    }

    /// Submit the session's answers. The session lock is released while the transport
    /// runs, so a concurrent submit sees the submitting status and is turned away.
    pub async fn submit(&self, session_id: &SessionId) -> Result<SessionView, IntakeServiceError> {
        let started = {
            let mut sessions = self.sessions();
            let wizard = sessions
                .get_mut(session_id)
                .ok_or_else(|| IntakeServiceError::SessionNotFound(session_id.clone()))?;
            match wizard.begin_submission() {
                Ok(record) => Some(record),
                Err(SubmitRejected::Mapping(_)) => None,
                Err(other) => return Err(other.into()),
            }
        };

        if let Some(record) = started {
            let outcome = self.transport.send(&record).await;
            let mut sessions = self.sessions();
            let wizard = sessions
                .get_mut(session_id)
                .ok_or_else(|| IntakeServiceError::SessionNotFound(session_id.clone()))?;
            wizard.complete_submission(outcome);
        }

        self.view(session_id)
    }

    pub fn close(&self, session_id: &SessionId) -> Result<(), IntakeServiceError> {
        match self.sessions().remove(session_id) {
            Some(_) => {
                info!(session_id = %session_id, "intake session closed");
                Ok(())
            }
            None => Err(IntakeServiceError::SessionNotFound(session_id.clone())),
        }
    }

    /// One-shot submission of a complete flat form, bypassing the session flow.
    pub async fn submit_form(
        &self,
        form: BTreeMap<String, Option<FormValue>>,
    ) -> Result<RecordId, IntakeServiceError> {
        let (branch, record) = self.preview_form(form)?;
        let record_id = self.transport.send(&record).await?;
        info!(record_id = %record_id.0, branch = %branch.label(), "form submission delivered");
        Ok(record_id)
    }

    /// Validate a flat form against every non-terminal step and build its payload.
    pub fn preview_form(
        &self,
        form: BTreeMap<String, Option<FormValue>>,
    ) -> Result<(Branch, ExternalRecord), IntakeServiceError> {
        let answers = AnswerSet::from_form(
            form.into_iter()
                .filter_map(|(name, value)| value.map(|value| (name, value.into_text()))),
        )?;

        let branch = Branch::resolve(&answers);
        let gaps: Vec<ValidationGap> = STEPS
            .iter()
            .filter(|step| !step.terminal)
            .flat_map(|step| step_gaps(step.kind, &answers, branch))
            .collect();
        let branch = match branch {
            Some(branch) if gaps.is_empty() => branch,
            _ => return Err(IntakeServiceError::Incomplete { gaps }),
        };

        let record = map_record(&answers, branch)?;
        Ok((branch, record))
    }

    fn with_session<F>(&self, session_id: &SessionId, apply: F) -> Result<SessionView, IntakeServiceError>
    where
        F: FnOnce(&mut LeadWizard) -> Result<(), IntakeServiceError>,
    {
        let mut sessions = self.sessions();
        let wizard = sessions
            .get_mut(session_id)
            .ok_or_else(|| IntakeServiceError::SessionNotFound(session_id.clone()))?;
        apply(wizard)?;
        Ok(SessionView::from_wizard(session_id, wizard))
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<SessionId, LeadWizard>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Scalar accepted in a one-shot form body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Text(String),
    Number(serde_json::Number),
}

impl FormValue {
    fn into_text(self) -> String {
        match self {
            FormValue::Text(text) => text,
            FormValue::Number(number) => number.to_string(),
        }
    }
}

/// Error raised by the intake service.
#[derive(Debug, thiserror::Error)]
pub enum IntakeServiceError {
    #[error("intake session {0} not found")]
    SessionNotFound(SessionId),
    #[error(transparent)]
    UnknownField(#[from] UnknownField),
    #[error(transparent)]
    Submit(#[from] SubmitRejected),
    #[error("form is incomplete ({} field(s) need attention)", .gaps.len())]
    Incomplete { gaps: Vec<ValidationGap> },
    #[error(transparent)]
    Mapping(#[from] MappingError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Validation gap with a display hint for the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GapView {
    pub field: Field,
    pub kind: GapKind,
    pub hint: String,
}

impl From<&ValidationGap> for GapView {
    fn from(gap: &ValidationGap) -> Self {
        Self {
            field: gap.field,
            kind: gap.kind,
            hint: gap.hint(),
        }
    }
}

/// Everything the presentation layer needs to render the current step.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub step_index: usize,
    pub step: StepKind,
    pub step_label: &'static str,
    pub step_count: usize,
    pub is_step_valid: bool,
    pub gaps: Vec<GapView>,
    pub fields: Vec<FieldSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<Branch>,
    pub submission_status: SubmissionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<RecordId>,
    pub answers: BTreeMap<&'static str, String>,
}

impl SessionView {
    pub fn from_wizard(session_id: &SessionId, wizard: &LeadWizard) -> Self {
        let step = wizard.current_step();
        Self {
            session_id: session_id.clone(),
            step_index: step.index,
            step: step.kind,
            step_label: step.kind.label(),
            step_count: STEP_COUNT,
            is_step_valid: wizard.is_current_step_valid(),
            gaps: wizard.current_gaps().iter().map(GapView::from).collect(),
            fields: wizard.current_fields().into_iter().map(field_spec).collect(),
            branch: wizard.branch(),
            submission_status: wizard.submission_status(),
            error_message: wizard.error_message().map(str::to_string),
            record_id: wizard.state().record_id.clone(),
            answers: wizard
                .answers()
                .iter()
                .map(|(field, value)| (field.wire_name(), value.to_string()))
                .collect(),
        }
    }
}
