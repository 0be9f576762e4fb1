//! Guided lead intake: the answer model, the step wizard, and the mapping of a finished
//! questionnaire onto the lead database schema.

pub mod answers;
pub mod catalog;
pub mod domain;
pub mod mapper;
pub mod notion;
pub mod record;
pub mod router;
pub mod service;
pub mod steps;
pub mod transport;
pub mod wizard;

#[cfg(test)]
mod tests;

pub use answers::{AnswerSet, Field, UnknownField};
pub use catalog::{field_spec, FieldSpec, InputKind};
pub use domain::{Action, Branch, PropertyType, Purpose};
pub use mapper::{map_record, LeadDetails, LeadRecord, MappingError};
pub use notion::NotionTransport;
pub use record::{properties, ExternalRecord, PropertyValue};
pub use router::intake_router;
pub use service::{FormValue, IntakeService, IntakeServiceError, SessionId, SessionView};
pub use steps::{
    is_step_valid, step_gaps, GapKind, StepDefinition, StepKind, ValidationGap, STEPS,
};
pub use transport::{RecordId, RecordTransport, TransportError};
pub use wizard::{LeadWizard, SubmissionStatus, SubmitRejected, WizardState};
