//! Conversion from raw answers to the typed lead record and then to the external payload.

use serde::Serialize;

use super::answers::{AnswerSet, Field};
use super::domain::{Action, Branch, PropertyType, Purpose};
use super::record::{properties, ExternalRecord, PropertyValue};

/// Raised when an answer cannot be expressed in the record schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    #[error("{} must be a number (found '{value}')", field.wire_name())]
    InvalidNumber { field: Field, value: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactDetails {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

impl ContactDetails {
    /// First and last name joined by a space, skipping whichever is absent.
    pub fn display_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// Seller leads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SaleDetails {
    pub street_address: Option<String>,
    pub reason_for_selling: Option<String>,
    pub timeline_to_sell: Option<String>,
}

/// Buyer and renter leads describe the home they are looking for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchCriteria {
    pub area: Option<String>,
    pub price_range: Option<String>,
    pub square_feet: Option<u32>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub stories: Option<u32>,
    pub garages: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommercialDetails {
    pub business_type: Option<String>,
    pub property_goals: Option<String>,
    pub price_range: Option<String>,
    pub square_feet: Option<u32>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LeadDetails {
    ResidentialSale(SaleDetails),
    ResidentialSearch {
        action: Action,
        criteria: SearchCriteria,
    },
    Commercial(CommercialDetails),
}

/// Strongly typed lead built from the answers relevant to one branch. Stale answers from
/// other branches are not carried over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadRecord {
    pub contact: ContactDetails,
    pub property_type: Option<PropertyType>,
    pub purpose: Option<String>,
    /// Categorical action as recorded: the branch action for residential leads, the
    /// property goals (falling back to the raw action) for commercial ones.
    pub action: Option<String>,
    pub details: LeadDetails,
}

impl LeadRecord {
    pub fn from_answers(answers: &AnswerSet, branch: Branch) -> Result<Self, MappingError> {
        let text = |field: Field| answers.filled(field).map(str::to_string);

        let details = match branch {
            Branch::Residential(Action::Sell) => LeadDetails::ResidentialSale(SaleDetails {
                street_address: text(Field::StreetAddress),
                reason_for_selling: text(Field::ReasonForSelling),
                timeline_to_sell: text(Field::TimelineToSell),
            }),
            Branch::Residential(action @ (Action::Buy | Action::Rent)) => {
                LeadDetails::ResidentialSearch {
                    action,
                    criteria: SearchCriteria {
                        area: text(Field::Area),
                        price_range: text(Field::PriceRange),
                        square_feet: whole_number(answers, Field::SquareFeet)?,
                        bedrooms: whole_number(answers, Field::Bedrooms)?,
                        bathrooms: whole_number(answers, Field::Bathrooms)?,
                        stories: whole_number(answers, Field::Stories)?,
                        garages: whole_number(answers, Field::Garages)?,
                    },
                }
            }
            Branch::Commercial => LeadDetails::Commercial(CommercialDetails {
                business_type: text(Field::TypeOfBusiness),
                property_goals: text(Field::PropertyGoals),
                price_range: text(Field::PriceRange),
                square_feet: whole_number(answers, Field::SquareFeet)?,
                location: text(Field::Location),
            }),
        };

        // Commercial leads have no buy/sell/rent of their own; goals stand in.
        let action = match branch {
            Branch::Residential(action) => answers
                .is_filled(Field::Action)
                .then(|| action.label().to_string()),
            Branch::Commercial => text(Field::PropertyGoals).or_else(|| text(Field::Action)),
        };

        Ok(Self {
            contact: ContactDetails {
                first_name: text(Field::FirstName),
                last_name: text(Field::LastName),
                phone_number: text(Field::PhoneNumber),
                email: text(Field::Email),
            },
            property_type: answers
                .is_filled(Field::PropertyType)
                .then(|| branch.property_type()),
            purpose: text(Field::Purpose).map(|raw| match Purpose::parse(&raw) {
                Some(purpose) => purpose.label().to_string(),
                None => raw,
            }),
            action,
            details,
        })
    }

    /// Render the record in the external schema, omitting every absent value.
    pub fn to_external(&self) -> ExternalRecord {
        let mut record = ExternalRecord::new();

        if let Some(name) = self.contact.display_name() {
            record.insert(properties::NAME, PropertyValue::title(name));
        }
        if let Some(phone) = &self.contact.phone_number {
            record.insert(properties::PHONE_NUMBER, PropertyValue::PhoneNumber(phone.clone()));
        }
        if let Some(email) = &self.contact.email {
            record.insert(properties::EMAIL, PropertyValue::Email(email.clone()));
        }

        if let Some(property_type) = self.property_type {
            record.insert(
                properties::PROPERTY_TYPE,
                PropertyValue::select(property_type.label()),
            );
        }
        insert_select(&mut record, properties::PURPOSE, &self.purpose);
        insert_select(&mut record, properties::ACTION, &self.action);

        match &self.details {
            LeadDetails::ResidentialSale(sale) => {
                insert_rich_text(&mut record, properties::STREET_ADDRESS, &sale.street_address);
                insert_select(&mut record, properties::REASON_FOR_SELLING, &sale.reason_for_selling);
                insert_select(&mut record, properties::TIMELINE_TO_SELL, &sale.timeline_to_sell);
            }
            LeadDetails::ResidentialSearch { action, criteria } => {
                // Rentals record the budget as a monthly rent.
                let price_property = match action {
                    Action::Rent => properties::MONTHLY_RENT,
                    Action::Buy | Action::Sell => properties::PRICE_RANGE,
                };
                insert_rich_text(&mut record, price_property, &criteria.price_range);
                insert_number(&mut record, properties::SQUARE_FEET, criteria.square_feet);
                insert_select(&mut record, properties::AREA, &criteria.area);
                insert_number(&mut record, properties::BEDROOMS, criteria.bedrooms);
                insert_number(&mut record, properties::BATHROOMS, criteria.bathrooms);
                insert_number(&mut record, properties::STORIES, criteria.stories);
                insert_number(&mut record, properties::GARAGES, criteria.garages);
            }
            LeadDetails::Commercial(commercial) => {
                insert_select(&mut record, properties::TYPE_OF_BUSINESS, &commercial.business_type);
                insert_select(&mut record, properties::PROPERTY_GOALS, &commercial.property_goals);
                insert_rich_text(&mut record, properties::PRICE_RANGE, &commercial.price_range);
                insert_number(&mut record, properties::SQUARE_FEET, commercial.square_feet);
                insert_select(&mut record, properties::LOCATION, &commercial.location);
            }
        }

        record
    }
}

/// Map answers for a branch straight to the external payload.
pub fn map_record(answers: &AnswerSet, branch: Branch) -> Result<ExternalRecord, MappingError> {
    LeadRecord::from_answers(answers, branch).map(|lead| lead.to_external())
}

/// Numeric answers are stored as whole numbers; decimals such as `2.5` are truncated.
fn whole_number(answers: &AnswerSet, field: Field) -> Result<Option<u32>, MappingError> {
    answers
        .filled(field)
        .map(|raw| {
            parse_whole_number(raw).ok_or_else(|| MappingError::InvalidNumber {
                field,
                value: raw.to_string(),
            })
        })
        .transpose()
}

fn parse_whole_number(raw: &str) -> Option<u32> {
    if let Ok(value) = raw.parse::<u32>() {
        return Some(value);
    }
    let value = raw.parse::<f64>().ok()?;
    if value.is_finite() && value >= 0.0 && value < f64::from(u32::MAX) {
        Some(value.trunc() as u32)
    } else {
        None
    }
}

fn insert_select(record: &mut ExternalRecord, name: &str, value: &Option<String>) {
    if let Some(value) = value {
        record.insert(name, PropertyValue::select(value.as_str()));
    }
}

fn insert_rich_text(record: &mut ExternalRecord, name: &str, value: &Option<String>) {
    if let Some(value) = value {
        record.insert(name, PropertyValue::rich_text(value.as_str()));
    }
}

fn insert_number(record: &mut ExternalRecord, name: &str, value: Option<u32>) {
    if let Some(value) = value {
        record.insert(name, PropertyValue::Number(value));
    }
}
