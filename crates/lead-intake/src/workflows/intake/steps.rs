use serde::{Deserialize, Serialize};

use super::answers::{AnswerSet, Field};
use super::domain::{Action, Branch, PropertyType, Purpose};

/// The questionnaire pages, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Identity,
    Classification,
    Detail,
    Confirmation,
}

impl StepKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Identity => "Personal Information",
            Self::Classification => "Property Type",
            Self::Detail => "Property Details",
            Self::Confirmation => "Thank You",
        }
    }
}

/// Static description of one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDefinition {
    pub index: usize,
    pub kind: StepKind,
    pub terminal: bool,
}

pub const STEPS: [StepDefinition; 4] = [
    StepDefinition {
        index: 0,
        kind: StepKind::Identity,
        terminal: false,
    },
    StepDefinition {
        index: 1,
        kind: StepKind::Classification,
        terminal: false,
    },
    StepDefinition {
        index: 2,
        kind: StepKind::Detail,
        terminal: false,
    },
    StepDefinition {
        index: 3,
        kind: StepKind::Confirmation,
        terminal: true,
    },
];

pub const STEP_COUNT: usize = STEPS.len();

/// Index of the step that triggers submission.
pub const SUBMIT_STEP_INDEX: usize = STEP_COUNT - 2;

impl StepDefinition {
    /// Fields that must be filled on this step for the given branch.
    pub fn required_fields(&self, branch: Option<Branch>) -> Vec<Field> {
        required_fields(self.kind, branch)
    }
}

const IDENTITY_FIELDS: &[Field] = &[
    Field::FirstName,
    Field::LastName,
    Field::PhoneNumber,
    Field::Email,
];

const CLASSIFICATION_FIELDS: &[Field] = &[Field::PropertyType, Field::Purpose, Field::Action];

const RESIDENTIAL_SALE_FIELDS: &[Field] = &[
    Field::StreetAddress,
    Field::ReasonForSelling,
    Field::TimelineToSell,
];

const RESIDENTIAL_SEARCH_FIELDS: &[Field] = &[
    Field::Area,
    Field::PriceRange,
    Field::Bedrooms,
    Field::Bathrooms,
    Field::SquareFeet,
    Field::Stories,
    Field::Garages,
];

const COMMERCIAL_FIELDS: &[Field] = &[
    Field::TypeOfBusiness,
    Field::PropertyGoals,
    Field::Purpose,
    Field::PriceRange,
    Field::SquareFeet,
    Field::Location,
];

pub fn required_fields(kind: StepKind, branch: Option<Branch>) -> Vec<Field> {
    match kind {
        StepKind::Identity => IDENTITY_FIELDS.to_vec(),
        StepKind::Classification => CLASSIFICATION_FIELDS.to_vec(),
        StepKind::Detail => match branch {
            Some(branch) => detail_fields(branch).to_vec(),
            None => Vec::new(),
        },
        StepKind::Confirmation => Vec::new(),
    }
}

fn detail_fields(branch: Branch) -> &'static [Field] {
    match branch {
        Branch::Residential(Action::Sell) => RESIDENTIAL_SALE_FIELDS,
        Branch::Residential(Action::Buy | Action::Rent) => RESIDENTIAL_SEARCH_FIELDS,
        Branch::Commercial => COMMERCIAL_FIELDS,
    }
}

/// Why a field holds the step back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GapKind {
    Missing,
    Malformed,
    Unrecognized,
    BranchUnresolved,
}

/// A single reason the current step cannot advance. Never raised as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidationGap {
    pub field: Field,
    pub kind: GapKind,
}

impl ValidationGap {
    const fn new(field: Field, kind: GapKind) -> Self {
        Self { field, kind }
    }

    pub fn hint(&self) -> String {
        let name = self.field.wire_name();
        match self.kind {
            GapKind::Missing => format!("{name} is required"),
            GapKind::Malformed => match self.field {
                Field::Email => "Invalid email address".to_string(),
                Field::PhoneNumber => "Phone number must be at least 10 digits".to_string(),
                _ => format!("{name} is not in the expected format"),
            },
            GapKind::Unrecognized => format!("{name} is not one of the offered options"),
            GapKind::BranchUnresolved => {
                "choose a property type and action before entering details".to_string()
            }
        }
    }
}

const MIN_PHONE_DIGITS: usize = 10;

/// List every gap on a step. Pure: the same answers and branch always give the same gaps.
pub fn step_gaps(kind: StepKind, answers: &AnswerSet, branch: Option<Branch>) -> Vec<ValidationGap> {
    let mut gaps: Vec<ValidationGap> = required_fields(kind, branch)
        .into_iter()
        .filter(|field| !answers.is_filled(*field))
        .map(|field| ValidationGap::new(field, GapKind::Missing))
        .collect();

    match kind {
        StepKind::Identity => {
            if let Some(email) = answers.filled(Field::Email) {
                if !looks_like_email(email) {
                    gaps.push(ValidationGap::new(Field::Email, GapKind::Malformed));
                }
            }
            if let Some(phone) = answers.filled(Field::PhoneNumber) {
                if phone_digits(phone) < MIN_PHONE_DIGITS {
                    gaps.push(ValidationGap::new(Field::PhoneNumber, GapKind::Malformed));
                }
            }
        }
        StepKind::Classification => {
            let checks: [(Field, fn(&str) -> bool); 3] = [
                (Field::PropertyType, |raw| PropertyType::parse(raw).is_some()),
                (Field::Purpose, |raw| Purpose::parse(raw).is_some()),
                (Field::Action, |raw| Action::parse(raw).is_some()),
            ];
            for (field, recognised) in checks {
                if let Some(raw) = answers.filled(field) {
                    if !recognised(raw) {
                        gaps.push(ValidationGap::new(field, GapKind::Unrecognized));
                    }
                }
            }
        }
        StepKind::Detail => {
            if branch.is_none() {
                gaps.push(ValidationGap::new(
                    Field::PropertyType,
                    GapKind::BranchUnresolved,
                ));
            }
        }
        StepKind::Confirmation => {}
    }

    gaps
}

pub fn is_step_valid(kind: StepKind, answers: &AnswerSet, branch: Option<Branch>) -> bool {
    step_gaps(kind, answers, branch).is_empty()
}

fn looks_like_email(raw: &str) -> bool {
    if raw.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = raw.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

fn phone_digits(raw: &str) -> usize {
    raw.chars().filter(char::is_ascii_digit).count()
}
