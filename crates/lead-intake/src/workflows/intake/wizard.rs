use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::answers::{AnswerSet, Field, UnknownField};
use super::domain::Branch;
use super::mapper::{map_record, MappingError};
use super::record::ExternalRecord;
use super::steps::{
    is_step_valid, step_gaps, StepDefinition, ValidationGap, STEPS, STEP_COUNT,
    SUBMIT_STEP_INDEX,
};
use super::transport::{RecordId, RecordTransport, TransportError};

/// Lifecycle of the single outbound write a session may have in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Idle,
    Submitting,
    Success,
    Error,
}

impl SubmissionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            SubmissionStatus::Idle => "idle",
            SubmissionStatus::Submitting => "submitting",
            SubmissionStatus::Success => "success",
            SubmissionStatus::Error => "error",
        }
    }
}

/// Why a submit request was not started. These are gates, not user-facing failures,
/// except `Mapping`, which also moves the wizard into the error state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRejected {
    #[error("a submission is already in flight")]
    AlreadySubmitting,
    #[error("this lead has already been submitted")]
    AlreadySubmitted,
    #[error("submission is only available from the details step (current step {step_index})")]
    NotSubmitStep { step_index: usize },
    #[error("the details step is incomplete")]
    StepIncomplete,
    #[error(transparent)]
    Mapping(#[from] MappingError),
}

/// Position, per-step validity and submission status for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WizardState {
    pub current_step_index: usize,
    pub step_validity: [bool; STEP_COUNT],
    pub submission_status: SubmissionStatus,
    pub last_error_message: Option<String>,
    pub record_id: Option<RecordId>,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            current_step_index: 0,
            step_validity: [false; STEP_COUNT],
            submission_status: SubmissionStatus::Idle,
            last_error_message: None,
            record_id: None,
            submitted_at: None,
        }
    }
}

/// Owns the answers and the wizard state for one lead session.
#[derive(Debug, Clone)]
pub struct LeadWizard {
    answers: AnswerSet,
    state: WizardState,
}

impl Default for LeadWizard {
    fn default() -> Self {
        Self::with_answers(AnswerSet::new())
    }
}

impl LeadWizard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session with answers already filled in. Every step flag reflects the answers.
    pub fn with_answers(answers: AnswerSet) -> Self {
        let mut wizard = Self {
            answers,
            state: WizardState::default(),
        };
        wizard.refresh_validity();
        wizard
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn current_step_index(&self) -> usize {
        self.state.current_step_index
    }

    pub fn current_step(&self) -> StepDefinition {
        STEPS[self.state.current_step_index]
    }

    pub fn is_current_step_valid(&self) -> bool {
        self.state.step_validity[self.state.current_step_index]
    }

    pub fn submission_status(&self) -> SubmissionStatus {
        self.state.submission_status
    }

    pub fn error_message(&self) -> Option<&str> {
        self.state.last_error_message.as_deref()
    }

    pub fn branch(&self) -> Option<Branch> {
        Branch::resolve(&self.answers)
    }

    pub fn current_gaps(&self) -> Vec<ValidationGap> {
        step_gaps(self.current_step().kind, &self.answers, self.branch())
    }

    /// Fields the presentation layer should render on the current step.
    pub fn current_fields(&self) -> Vec<Field> {
        self.current_step().required_fields(self.branch())
    }

    pub fn on_field_change(&mut self, name: &str, value: impl Into<String>) -> Result<Field, UnknownField> {
        let field = self.answers.set_raw(name, value)?;
        self.refresh_validity();
        Ok(field)
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.answers.set(field, value);
        self.refresh_validity();
    }

    /// Move forward one step. Returns whether the step index changed.
    ///
    /// The details step only leaves through a successful submission.
    pub fn on_next(&mut self) -> bool {
        let index = self.state.current_step_index;
        if self.state.submission_status == SubmissionStatus::Submitting
            || index >= SUBMIT_STEP_INDEX
            || !self.is_current_step_valid()
        {
            return false;
        }

        self.state.current_step_index = index + 1;
        self.refresh_validity();
        debug!(step = self.state.current_step_index, "wizard advanced");
        true
    }

    /// Move back one step, floored at the first. Blocked while submitting.
    pub fn on_back(&mut self) -> bool {
        let index = self.state.current_step_index;
        if self.state.submission_status == SubmissionStatus::Submitting || index == 0 {
            return false;
        }

        self.state.current_step_index = index - 1;
        self.refresh_validity();
        debug!(step = self.state.current_step_index, "wizard retreated");
        true
    }

    /// Enter the submitting state and build the payload for the transport.
    pub fn begin_submission(&mut self) -> Result<ExternalRecord, SubmitRejected> {
        match self.state.submission_status {
            SubmissionStatus::Submitting => return Err(SubmitRejected::AlreadySubmitting),
            SubmissionStatus::Success => return Err(SubmitRejected::AlreadySubmitted),
            SubmissionStatus::Idle | SubmissionStatus::Error => {}
        }
        if self.state.current_step_index != SUBMIT_STEP_INDEX {
            return Err(SubmitRejected::NotSubmitStep {
                step_index: self.state.current_step_index,
            });
        }
        let branch = match self.branch() {
            Some(branch) if self.is_current_step_valid() => branch,
            _ => return Err(SubmitRejected::StepIncomplete),
        };

        match map_record(&self.answers, branch) {
            Ok(record) => {
                self.state.submission_status = SubmissionStatus::Submitting;
                self.state.last_error_message = None;
                info!(branch = %branch.label(), properties = record.len(), "lead submission started");
                Ok(record)
            }
            Err(err) => {
                warn!(error = %err, "lead record could not be built");
                self.state.submission_status = SubmissionStatus::Error;
                self.state.last_error_message = Some(err.to_string());
                Err(SubmitRejected::Mapping(err))
            }
        }
    }

    /// Apply the transport result of the submission started by `begin_submission`.
    pub fn complete_submission(&mut self, outcome: Result<RecordId, TransportError>) {
        if self.state.submission_status != SubmissionStatus::Submitting {
            warn!("submission result received with no submission in flight");
            return;
        }

        match outcome {
            Ok(record_id) => {
                info!(record_id = %record_id.0, "lead submission succeeded");
                self.state.submission_status = SubmissionStatus::Success;
                self.state.last_error_message = None;
                self.state.record_id = Some(record_id);
                self.state.submitted_at = Some(Utc::now());
                self.state.current_step_index = STEP_COUNT - 1;
                self.refresh_validity();
            }
            Err(err) => {
                warn!(error = %err, "lead submission failed");
                self.state.submission_status = SubmissionStatus::Error;
                self.state.last_error_message = Some(err.to_string());
            }
        }
    }

    /// Submit through the given transport and return the resulting status.
    pub async fn on_submit<T>(&mut self, transport: &T) -> Result<SubmissionStatus, SubmitRejected>
    where
        T: RecordTransport + ?Sized,
    {
        let record = self.begin_submission()?;
        let outcome = transport.send(&record).await;
        self.complete_submission(outcome);
        Ok(self.state.submission_status)
    }

    /// Clear an inline failure message. The status returns to idle.
    pub fn dismiss_error(&mut self) {
        if self.state.submission_status == SubmissionStatus::Error {
            self.state.submission_status = SubmissionStatus::Idle;
            self.state.last_error_message = None;
        }
    }

    fn refresh_validity(&mut self) {
        let branch = self.branch();
        for step in STEPS {
            self.state.step_validity[step.index] = is_step_valid(step.kind, &self.answers, branch);
        }
    }
}
