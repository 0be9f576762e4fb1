use super::common::*;
use crate::workflows::intake::answers::Field;
use crate::workflows::intake::domain::{Action, Branch, PropertyType};
use crate::workflows::intake::mapper::{map_record, LeadDetails, LeadRecord, MappingError};
use crate::workflows::intake::record::{properties, PropertyValue};

fn select(name: &str) -> PropertyValue {
    PropertyValue::select(name)
}

#[test]
fn residential_sale_emits_sale_fields_only() {
    let answers = complete_answers("Residential", "Sell");
    let record = map_record(&answers, Branch::Residential(Action::Sell)).expect("maps");

    assert_eq!(
        record.get(properties::STREET_ADDRESS),
        Some(&PropertyValue::rich_text("1452 Desert Bloom Ave"))
    );
    assert_eq!(
        record.get(properties::REASON_FOR_SELLING),
        Some(&select("Relocating to another city"))
    );
    assert_eq!(
        record.get(properties::TIMELINE_TO_SELL),
        Some(&select("Within 1-2 months"))
    );
    for absent in [
        properties::AREA,
        properties::BEDROOMS,
        properties::BATHROOMS,
        properties::MONTHLY_RENT,
        properties::TYPE_OF_BUSINESS,
    ] {
        assert!(!record.contains(absent), "{absent} should not be emitted");
    }
    assert_eq!(record.get(properties::ACTION), Some(&select("Sell")));
    assert_eq!(record.get(properties::PROPERTY_TYPE), Some(&select("Residential")));
}

#[test]
fn commercial_action_comes_from_property_goals() {
    let answers = complete_answers("Commercial", "Buy");
    let record = map_record(&answers, Branch::Commercial).expect("maps");

    assert_eq!(record.get(properties::ACTION), Some(&select("Lease")));
    assert_eq!(record.get(properties::PROPERTY_GOALS), Some(&select("Lease")));
    assert_eq!(record.get(properties::TYPE_OF_BUSINESS), Some(&select("Restaurant")));
    assert_eq!(record.get(properties::LOCATION), Some(&select("Summerlin")));
    assert_eq!(record.get(properties::SQUARE_FEET), Some(&PropertyValue::Number(3200)));
    assert_eq!(
        record.get(properties::PRICE_RANGE),
        Some(&PropertyValue::rich_text("$8k/month"))
    );
    assert!(!record.contains(properties::BEDROOMS));
}

#[test]
fn commercial_action_falls_back_to_raw_action() {
    let mut answers = complete_answers("Commercial", "Buy");
    answers.set(Field::PropertyGoals, "");
    let record = map_record(&answers, Branch::Commercial).expect("maps");

    assert_eq!(record.get(properties::ACTION), Some(&select("Buy")));
    assert!(!record.contains(properties::PROPERTY_GOALS));
}

#[test]
fn rent_emits_monthly_rent_instead_of_price_range() {
    let answers = complete_answers("Residential", "Rent");
    let record = map_record(&answers, Branch::Residential(Action::Rent)).expect("maps");

    assert_eq!(
        record.get(properties::MONTHLY_RENT),
        Some(&PropertyValue::rich_text("$450k - $525k"))
    );
    assert!(!record.contains(properties::PRICE_RANGE));
}

#[test]
fn buy_emits_price_range_and_search_numbers() {
    let answers = complete_answers("Residential", "Buy");
    let record = map_record(&answers, Branch::Residential(Action::Buy)).expect("maps");

    assert!(record.contains(properties::PRICE_RANGE));
    assert!(!record.contains(properties::MONTHLY_RENT));
    assert_eq!(record.get(properties::AREA), Some(&select("Henderson")));
    assert_eq!(record.get(properties::BEDROOMS), Some(&PropertyValue::Number(3)));
    assert_eq!(record.get(properties::BATHROOMS), Some(&PropertyValue::Number(2)));
    assert_eq!(record.get(properties::STORIES), Some(&PropertyValue::Number(2)));
    assert_eq!(record.get(properties::GARAGES), Some(&PropertyValue::Number(2)));
    assert_eq!(record.get(properties::SQUARE_FEET), Some(&PropertyValue::Number(1850)));
}

#[test]
fn contact_properties_use_their_typed_shapes() {
    let answers = complete_answers("Residential", "Sell");
    let record = map_record(&answers, Branch::Residential(Action::Sell)).expect("maps");

    assert_eq!(record.get(properties::NAME), Some(&PropertyValue::title("Dana Reyes")));
    assert_eq!(
        record.get(properties::PHONE_NUMBER),
        Some(&PropertyValue::PhoneNumber("(702) 555-0147".to_string()))
    );
    assert_eq!(
        record.get(properties::EMAIL),
        Some(&PropertyValue::Email("dana.reyes@example.com".to_string()))
    );
    assert_eq!(record.get(properties::PURPOSE), Some(&select("Investment")));
}

#[test]
fn name_uses_whichever_part_is_present() {
    let only_last = answers(&[(Field::LastName, "Reyes")]);
    let record = map_record(&only_last, Branch::Commercial).expect("maps");
    assert_eq!(record.get(properties::NAME), Some(&PropertyValue::title("Reyes")));

    let none = answers(&[(Field::Email, "dana.reyes@example.com")]);
    let record = map_record(&none, Branch::Commercial).expect("maps");
    assert!(!record.contains(properties::NAME));
}

#[test]
fn absent_answers_produce_no_keys() {
    let sparse = answers(&[
        (Field::FirstName, "Dana"),
        (Field::Area, "   "),
        (Field::Bedrooms, ""),
    ]);
    let record = map_record(&sparse, Branch::Residential(Action::Buy)).expect("maps");

    assert_eq!(record.names().collect::<Vec<_>>(), vec![properties::NAME]);
}

#[test]
fn stale_answers_from_other_branches_are_dropped() {
    let mut answers = complete_answers("Residential", "Buy");
    for (field, value) in SALE_DETAILS {
        answers.set(*field, *value);
    }
    answers.set(Field::TypeOfBusiness, "Retail");

    let record = map_record(&answers, Branch::Residential(Action::Buy)).expect("maps");
    assert!(!record.contains(properties::STREET_ADDRESS));
    assert!(!record.contains(properties::REASON_FOR_SELLING));
    assert!(!record.contains(properties::TYPE_OF_BUSINESS));
    assert!(record.contains(properties::BEDROOMS));
}

#[test]
fn stale_numbers_outside_the_branch_do_not_block_a_sale() {
    let mut answers = complete_answers("Residential", "Sell");
    answers.set(Field::SquareFeet, "about 1800");
    answers.set(Field::Bedrooms, "three");
    answers.set(Field::PriceRange, "$450k - $525k");

    let record = map_record(&answers, Branch::Residential(Action::Sell)).expect("maps");
    assert!(!record.contains(properties::SQUARE_FEET));
    assert!(!record.contains(properties::BEDROOMS));
    assert!(!record.contains(properties::PRICE_RANGE));
    assert!(record.contains(properties::STREET_ADDRESS));
}

#[test]
fn decimal_numbers_are_truncated() {
    let mut answers = complete_answers("Residential", "Buy");
    answers.set(Field::Bathrooms, "2.5");
    answers.set(Field::SquareFeet, " 1850.75 ");

    let record = map_record(&answers, Branch::Residential(Action::Buy)).expect("maps");
    assert_eq!(record.get(properties::BATHROOMS), Some(&PropertyValue::Number(2)));
    assert_eq!(record.get(properties::SQUARE_FEET), Some(&PropertyValue::Number(1850)));
}

#[test]
fn negative_numbers_are_rejected() {
    let mut answers = complete_answers("Commercial", "Buy");
    answers.set(Field::SquareFeet, "-200");

    let err = map_record(&answers, Branch::Commercial).expect_err("fails");
    assert!(matches!(
        err,
        MappingError::InvalidNumber {
            field: Field::SquareFeet,
            ..
        }
    ));
}

#[test]
fn purpose_is_emitted_in_canonical_spelling() {
    let mut answers = complete_answers("Residential", "Sell");
    answers.set(Field::Purpose, "vacation home");
    let record = map_record(&answers, Branch::Residential(Action::Sell)).expect("maps");
    assert_eq!(record.get(properties::PURPOSE), Some(&select("Vacation Home")));
}

#[test]
fn unparseable_number_is_reported_with_its_field() {
    let mut answers = complete_answers("Residential", "Buy");
    answers.set(Field::Bedrooms, "three");

    let err = map_record(&answers, Branch::Residential(Action::Buy)).expect_err("fails");
    assert_eq!(
        err,
        MappingError::InvalidNumber {
            field: Field::Bedrooms,
            value: "three".to_string(),
        }
    );
}

#[test]
fn typed_record_carries_branch_details() {
    let answers = complete_answers("Residential", "Rent");
    let lead = LeadRecord::from_answers(&answers, Branch::Residential(Action::Rent)).expect("maps");

    assert_eq!(lead.property_type, Some(PropertyType::Residential));
    assert_eq!(lead.action.as_deref(), Some("Rent"));
    match lead.details {
        LeadDetails::ResidentialSearch { action, criteria } => {
            assert_eq!(action, Action::Rent);
            assert_eq!(criteria.bedrooms, Some(3));
            assert_eq!(criteria.area.as_deref(), Some("Henderson"));
        }
        other => panic!("unexpected details: {other:?}"),
    }
}
