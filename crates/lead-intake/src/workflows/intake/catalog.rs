use serde::Serialize;

use super::answers::Field;
use super::domain::{Action, PropertyType, Purpose};

/// How the presentation layer should render a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Text,
    Phone,
    Email,
    Number,
    Choice,
}

/// Presentation metadata for one questionnaire field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub field: Field,
    pub name: &'static str,
    pub label: &'static str,
    pub input: InputKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<&'static str>,
}

const RESIDENTIAL_AREAS: &[&str] = &[
    "Henderson",
    "Summerlin",
    "West",
    "Southwest",
    "South",
    "North",
    "Northwest",
    "North East",
    "Other",
];

const COMMERCIAL_LOCATIONS: &[&str] = &[
    "Summerlin",
    "Henderson",
    "North",
    "West",
    "South",
    "East",
    "Southwest",
    "Northwest",
];

const BUSINESS_TYPES: &[&str] = &[
    "Shopping Center",
    "Retail",
    "Restaurant",
    "Multifamily",
    "Office",
    "Warehouse",
    "Other",
];

const PROPERTY_GOALS: &[&str] = &["Buy", "Sell", "Lease"];

const REASONS_FOR_SELLING: &[&str] = &[
    "Buying Another home",
    "Relocating to another city",
    "Selling to get out of the market",
    "Selling to upgrade investment",
];

const TIMELINES_TO_SELL: &[&str] = &[
    "ASAP",
    "Within 1-2 months",
    "3-4 months",
    "5-6 months",
    "Long-Term Plan",
];

const LEVEL_COUNTS: &[&str] = &["1", "2", "3"];

/// Describe a field for rendering. Detail-field choices are what the form offers; the
/// detail step itself only checks that a value is present.
pub fn field_spec(field: Field) -> FieldSpec {
    let (label, input, choices): (&'static str, InputKind, Vec<&'static str>) = match field {
        Field::FirstName => ("First Name", InputKind::Text, Vec::new()),
        Field::LastName => ("Last Name", InputKind::Text, Vec::new()),
        Field::PhoneNumber => ("Phone Number", InputKind::Phone, Vec::new()),
        Field::Email => ("Email", InputKind::Email, Vec::new()),
        Field::PropertyType => (
            "Property Type",
            InputKind::Choice,
            PropertyType::ordered().iter().map(|value| value.label()).collect(),
        ),
        Field::Purpose => (
            "Purpose",
            InputKind::Choice,
            Purpose::ordered().iter().map(|value| value.label()).collect(),
        ),
        Field::Action => (
            "Action",
            InputKind::Choice,
            Action::ordered().iter().map(|value| value.label()).collect(),
        ),
        Field::Area => ("Area", InputKind::Choice, RESIDENTIAL_AREAS.to_vec()),
        Field::PriceRange => ("Price Range", InputKind::Text, Vec::new()),
        Field::Bedrooms => ("Bedrooms", InputKind::Number, Vec::new()),
        Field::Bathrooms => ("Bathrooms", InputKind::Number, Vec::new()),
        Field::SquareFeet => ("Square Feet", InputKind::Number, Vec::new()),
        Field::Stories => ("Stories", InputKind::Choice, LEVEL_COUNTS.to_vec()),
        Field::Garages => ("Garages", InputKind::Choice, LEVEL_COUNTS.to_vec()),
        Field::StreetAddress => ("Street Address", InputKind::Text, Vec::new()),
        Field::ReasonForSelling => (
            "Reason for Selling",
            InputKind::Choice,
            REASONS_FOR_SELLING.to_vec(),
        ),
        Field::TimelineToSell => (
            "Timeline to Sell",
            InputKind::Choice,
            TIMELINES_TO_SELL.to_vec(),
        ),
        Field::TypeOfBusiness => ("Type of Business", InputKind::Choice, BUSINESS_TYPES.to_vec()),
        Field::PropertyGoals => ("Property Goals", InputKind::Choice, PROPERTY_GOALS.to_vec()),
        Field::Location => ("Location", InputKind::Choice, COMMERCIAL_LOCATIONS.to_vec()),
    };

    FieldSpec {
        field,
        name: field.wire_name(),
        label,
        input,
        choices,
    }
}
