use serde::{Deserialize, Serialize};

use super::answers::{AnswerSet, Field};

/// Top-level property classification chosen on the classification step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyType {
    Residential,
    Commercial,
}

impl PropertyType {
    pub const fn ordered() -> [Self; 2] {
        [Self::Residential, Self::Commercial]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Residential => "Residential",
            Self::Commercial => "Commercial",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|value| value.label().eq_ignore_ascii_case(raw.trim()))
    }
}

/// What the lead intends to do with the property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Buy,
    Sell,
    Rent,
}

impl Action {
    pub const fn ordered() -> [Self; 3] {
        [Self::Buy, Self::Sell, Self::Rent]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Buy => "Buy",
            Self::Sell => "Sell",
            Self::Rent => "Rent",
        }
    }

    /// Accepts the canonical labels plus the legacy `Rent/Lease` spelling.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("Rent/Lease") {
            return Some(Self::Rent);
        }
        Self::ordered()
            .into_iter()
            .find(|value| value.label().eq_ignore_ascii_case(raw))
    }
}

/// Why the lead is interested in the property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Purpose {
    Primary,
    Investment,
    VacationHome,
    FamilyHome,
    PersonalBusiness,
}

impl Purpose {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Primary,
            Self::Investment,
            Self::VacationHome,
            Self::FamilyHome,
            Self::PersonalBusiness,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Primary => "Primary",
            Self::Investment => "Investment",
            Self::VacationHome => "Vacation Home",
            Self::FamilyHome => "Family Home",
            Self::PersonalBusiness => "Personal Business",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|value| value.label().eq_ignore_ascii_case(raw.trim()))
    }
}

/// Resolved questionnaire branch. Selects the detail fields and the record overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "property_type", content = "action")]
pub enum Branch {
    Residential(Action),
    Commercial,
}

impl Branch {
    /// Derive the branch from the classification answers.
    ///
    /// Residential needs a recognised action. Commercial needs either an action or property
    /// goals, since goals take the place of the action on that branch.
    pub fn resolve(answers: &AnswerSet) -> Option<Self> {
        let property_type = answers.filled(Field::PropertyType).and_then(PropertyType::parse)?;

        match property_type {
            PropertyType::Residential => answers
                .filled(Field::Action)
                .and_then(Action::parse)
                .map(Branch::Residential),
            PropertyType::Commercial => {
                if answers.is_filled(Field::Action) || answers.is_filled(Field::PropertyGoals) {
                    Some(Branch::Commercial)
                } else {
                    None
                }
            }
        }
    }

    pub const fn property_type(self) -> PropertyType {
        match self {
            Branch::Residential(_) => PropertyType::Residential,
            Branch::Commercial => PropertyType::Commercial,
        }
    }

    pub fn label(self) -> String {
        match self {
            Branch::Residential(action) => format!("Residential / {}", action.label()),
            Branch::Commercial => "Commercial".to_string(),
        }
    }
}
