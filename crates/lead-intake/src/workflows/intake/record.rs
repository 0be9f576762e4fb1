use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Property names in the lead database. These must match the Notion schema exactly.
pub mod properties {
    pub const NAME: &str = "Name";
    pub const PHONE_NUMBER: &str = "Phone Number";
    pub const EMAIL: &str = "Email";
    pub const PROPERTY_TYPE: &str = "Property Type";
    pub const PURPOSE: &str = "Purpose";
    pub const ACTION: &str = "Action";
    pub const PRICE_RANGE: &str = "Price Range";
    pub const SQUARE_FEET: &str = "Square Feet";
    pub const AREA: &str = "Area";
    pub const BEDROOMS: &str = "Bedrooms";
    pub const BATHROOMS: &str = "Bathrooms";
    pub const STORIES: &str = "Stories";
    pub const GARAGES: &str = "Garages";
    pub const STREET_ADDRESS: &str = "Street Address";
    pub const REASON_FOR_SELLING: &str = "Reason for Selling";
    pub const TIMELINE_TO_SELL: &str = "Timeline to Sell";
    pub const MONTHLY_RENT: &str = "Monthly Rent";
    pub const TYPE_OF_BUSINESS: &str = "Type of Business";
    pub const PROPERTY_GOALS: &str = "Property Goals";
    pub const LOCATION: &str = "Location";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContent {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSpan {
    pub text: TextContent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub name: String,
}

/// One property value, serialized in the record store's shape
/// (`{"select": {"name": ..}}`, `{"number": 3}`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyValue {
    Title(Vec<TextSpan>),
    RichText(Vec<TextSpan>),
    Select(SelectOption),
    Number(u32),
    PhoneNumber(String),
    Email(String),
}

impl PropertyValue {
    pub fn title(content: impl Into<String>) -> Self {
        Self::Title(vec![span(content)])
    }

    pub fn rich_text(content: impl Into<String>) -> Self {
        Self::RichText(vec![span(content)])
    }

    pub fn select(name: impl Into<String>) -> Self {
        Self::Select(SelectOption { name: name.into() })
    }

    /// Plain-text view used for logs and CLI output.
    pub fn display_value(&self) -> String {
        match self {
            Self::Title(spans) | Self::RichText(spans) => spans
                .iter()
                .map(|span| span.text.content.as_str())
                .collect::<Vec<_>>()
                .join(""),
            Self::Select(option) => option.name.clone(),
            Self::Number(value) => value.to_string(),
            Self::PhoneNumber(value) | Self::Email(value) => value.clone(),
        }
    }
}

fn span(content: impl Into<String>) -> TextSpan {
    TextSpan {
        text: TextContent {
            content: content.into(),
        },
    }
}

/// Payload handed to the transport: property name to typed value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExternalRecord {
    properties: BTreeMap<String, PropertyValue>,
}

impl ExternalRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: PropertyValue) {
        self.properties.insert(name.to_string(), value);
    }

    pub fn remove(&mut self, name: &str) -> Option<PropertyValue> {
        self.properties.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.properties
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn values_serialize_in_notion_shapes() {
        let mut record = ExternalRecord::new();
        record.insert(properties::NAME, PropertyValue::title("Dana Reyes"));
        record.insert(properties::PHONE_NUMBER, PropertyValue::PhoneNumber("7025550147".into()));
        record.insert(properties::EMAIL, PropertyValue::Email("dana@example.com".into()));
        record.insert(properties::AREA, PropertyValue::select("Henderson"));
        record.insert(properties::PRICE_RANGE, PropertyValue::rich_text("$400k-$500k"));
        record.insert(properties::BEDROOMS, PropertyValue::Number(3));

        let encoded = serde_json::to_value(&record).expect("record serializes");
        assert_eq!(
            encoded,
            json!({
                "Name": { "title": [{ "text": { "content": "Dana Reyes" } }] },
                "Phone Number": { "phone_number": "7025550147" },
                "Email": { "email": "dana@example.com" },
                "Area": { "select": { "name": "Henderson" } },
                "Price Range": { "rich_text": [{ "text": { "content": "$400k-$500k" } }] },
                "Bedrooms": { "number": 3 },
            })
        );
    }

    #[test]
    fn display_value_flattens_text() {
        assert_eq!(PropertyValue::title("Dana Reyes").display_value(), "Dana Reyes");
        assert_eq!(PropertyValue::Number(2).display_value(), "2");
    }
}
