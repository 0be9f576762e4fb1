use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Fixed vocabulary of questionnaire fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    FirstName,
    LastName,
    PhoneNumber,
    Email,
    PropertyType,
    Purpose,
    Action,
    Area,
    PriceRange,
    Bedrooms,
    Bathrooms,
    #[serde(rename = "sqft")]
    SquareFeet,
    Stories,
    Garages,
    StreetAddress,
    ReasonForSelling,
    TimelineToSell,
    #[serde(alias = "commercialType")]
    TypeOfBusiness,
    PropertyGoals,
    Location,
}

impl Field {
    pub const fn all() -> [Self; 20] {
        [
            Self::FirstName,
            Self::LastName,
            Self::PhoneNumber,
            Self::Email,
            Self::PropertyType,
            Self::Purpose,
            Self::Action,
            Self::Area,
            Self::PriceRange,
            Self::Bedrooms,
            Self::Bathrooms,
            Self::SquareFeet,
            Self::Stories,
            Self::Garages,
            Self::StreetAddress,
            Self::ReasonForSelling,
            Self::TimelineToSell,
            Self::TypeOfBusiness,
            Self::PropertyGoals,
            Self::Location,
        ]
    }

    /// Key used by the form and the JSON API.
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::PhoneNumber => "phoneNumber",
            Self::Email => "email",
            Self::PropertyType => "propertyType",
            Self::Purpose => "purpose",
            Self::Action => "action",
            Self::Area => "area",
            Self::PriceRange => "priceRange",
            Self::Bedrooms => "bedrooms",
            Self::Bathrooms => "bathrooms",
            Self::SquareFeet => "sqft",
            Self::Stories => "stories",
            Self::Garages => "garages",
            Self::StreetAddress => "streetAddress",
            Self::ReasonForSelling => "reasonForSelling",
            Self::TimelineToSell => "timelineToSell",
            Self::TypeOfBusiness => "typeOfBusiness",
            Self::PropertyGoals => "propertyGoals",
            Self::Location => "location",
        }
    }

    /// Resolve a form key. The commercial form historically posted `commercialType`.
    pub fn from_wire(name: &str) -> Option<Self> {
        let name = name.trim();
        if name == "commercialType" {
            return Some(Self::TypeOfBusiness);
        }
        Self::all()
            .into_iter()
            .find(|field| field.wire_name() == name)
    }
}

/// Raised when the presentation layer reports a key outside the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown form field '{0}'")]
pub struct UnknownField(pub String);

/// Everything the user has typed so far. Values are stored verbatim; no validation here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSet {
    values: BTreeMap<Field, String>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite a single field. An empty value clears it.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            self.values.remove(&field);
        } else {
            self.values.insert(field, value);
        }
    }

    /// String-keyed entry point used at the presentation boundary.
    pub fn set_raw(&mut self, name: &str, value: impl Into<String>) -> Result<Field, UnknownField> {
        let field = Field::from_wire(name).ok_or_else(|| UnknownField(name.to_string()))?;
        self.set(field, value);
        Ok(field)
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    /// Trimmed value, treating whitespace-only input as absent.
    pub fn filled(&self, field: Field) -> Option<&str> {
        self.get(field)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub fn is_filled(&self, field: Field) -> bool {
        self.filled(field).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.values
            .iter()
            .map(|(field, value)| (*field, value.as_str()))
    }

    /// Build from a flat form object, rejecting keys outside the vocabulary.
    pub fn from_form<I, K, V>(entries: I) -> Result<Self, UnknownField>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut answers = Self::new();
        for (name, value) in entries {
            answers.set_raw(name.as_ref(), value)?;
        }
        Ok(answers)
    }
}
