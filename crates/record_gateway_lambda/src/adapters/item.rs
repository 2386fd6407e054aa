//! Typed codec between `UserRecord` and the DynamoDB attribute map.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use record_gateway_core::contract::UserRecord;

pub fn record_to_item(record: &UserRecord) -> HashMap<String, AttributeValue> {
    let mut item = HashMap::new();

    item.insert("id".to_string(), AttributeValue::S(record.id.clone()));
    item.insert("name".to_string(), AttributeValue::S(record.name.clone()));

    // Absent age is omitted entirely so `age >= :min_age` filters never match it.
    if let Some(age) = record.age {
        item.insert("age".to_string(), AttributeValue::N(age.to_string()));
    }

    item
}

pub fn record_from_item(item: &HashMap<String, AttributeValue>) -> Result<UserRecord, String> {
    let id = string_attribute(item, "id")?;
    let name = string_attribute(item, "name")?;

    let age = match item.get("age") {
        Some(AttributeValue::N(raw)) => Some(raw.parse::<u32>().map_err(|_| {
            format!("item attribute 'age' holds a non-integer value '{raw}'")
        })?),
        Some(_) => return Err("item attribute 'age' must be a number".to_string()),
        None => None,
    };

    Ok(UserRecord { id, name, age })
}

fn string_attribute(
    item: &HashMap<String, AttributeValue>,
    attribute: &str,
) -> Result<String, String> {
    match item.get(attribute) {
        Some(AttributeValue::S(value)) => Ok(value.clone()),
        Some(_) => Err(format!("item attribute '{attribute}' must be a string")),
        None => Err(format!("item is missing required attribute '{attribute}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> UserRecord {
        UserRecord {
            id: "4bf3b1a2-demo".to_string(),
            name: "Alice".to_string(),
            age: Some(25),
        }
    }

    #[test]
    fn record_with_age_maps_all_attributes() {
        let item = record_to_item(&sample_record());

        assert_eq!(
            item.get("id"),
            Some(&AttributeValue::S("4bf3b1a2-demo".to_string()))
        );
        assert_eq!(
            item.get("name"),
            Some(&AttributeValue::S("Alice".to_string()))
        );
        assert_eq!(item.get("age"), Some(&AttributeValue::N("25".to_string())));
    }

    #[test]
    fn record_without_age_omits_age_attribute() {
        let record = UserRecord {
            age: None,
            ..sample_record()
        };

        let item = record_to_item(&record);
        assert!(!item.contains_key("age"));
        assert_eq!(item.len(), 2);
    }

    #[test]
    fn item_round_trips_through_codec() {
        let record = sample_record();

        let decoded =
            record_from_item(&record_to_item(&record)).expect("item should decode");
        assert_eq!(decoded, record);
    }

    #[test]
    fn item_without_age_decodes_to_absent_age() {
        let record = UserRecord {
            age: None,
            ..sample_record()
        };

        let decoded =
            record_from_item(&record_to_item(&record)).expect("item should decode");
        assert_eq!(decoded.age, None);
    }

    #[test]
    fn item_missing_name_fails_to_decode() {
        let mut item = record_to_item(&sample_record());
        item.remove("name");

        let error = record_from_item(&item).expect_err("item should fail to decode");
        assert_eq!(error, "item is missing required attribute 'name'");
    }

    #[test]
    fn item_with_non_numeric_age_fails_to_decode() {
        let mut item = record_to_item(&sample_record());
        item.insert(
            "age".to_string(),
            AttributeValue::N("twenty-five".to_string()),
        );

        let error = record_from_item(&item).expect_err("item should fail to decode");
        assert_eq!(error, "item attribute 'age' holds a non-integer value 'twenty-five'");
    }

    #[test]
    fn item_with_wrongly_typed_id_fails_to_decode() {
        let mut item = record_to_item(&sample_record());
        item.insert("id".to_string(), AttributeValue::N("7".to_string()));

        let error = record_from_item(&item).expect_err("item should fail to decode");
        assert_eq!(error, "item attribute 'id' must be a string");
    }
}
