use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Age threshold applied by the gateway's filter scan.
pub const DEFAULT_MIN_AGE: u32 = 20;

/// Raw invocation payload before validation. Both fields are required by
/// `normalize_request`; they are optional here so a missing key decodes
/// instead of failing with a generic serde error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<Value>,
}

/// A validated request: present name, parsed age.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub age: u32,
}

/// A stored record. `age` is optional in the table; records without it are
/// excluded from age-filtered scans.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

pub fn normalize_request(request: CreateUserRequest) -> Result<NewUser, ValidationError> {
    let name = match request.name {
        Some(value) => value.trim().to_string(),
        None => return Err(ValidationError::new("name is required")),
    };
    if name.is_empty() {
        return Err(ValidationError::new("name cannot be empty"));
    }

    let age = match request.age {
        Some(value) => parse_age(&value)?,
        None => return Err(ValidationError::new("age is required")),
    };

    Ok(NewUser { name, age })
}

fn parse_age(value: &Value) -> Result<u32, ValidationError> {
    match value {
        Value::String(raw) => raw.trim().parse::<u32>().map_err(|_| {
            ValidationError::new(format!("age '{raw}' must be a non-negative integer"))
        }),
        Value::Number(number) => number
            .as_u64()
            .and_then(|age| u32::try_from(age).ok())
            .ok_or_else(|| {
                ValidationError::new(format!("age '{number}' must be a non-negative integer"))
            }),
        other => Err(ValidationError::new(format!(
            "age must be a string or an integer, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn request(name: Option<&str>, age: Option<Value>) -> CreateUserRequest {
        CreateUserRequest {
            name: name.map(str::to_string),
            age,
        }
    }

    #[test]
    fn normalize_request_accepts_string_age() {
        let new_user = normalize_request(request(Some("Alice"), Some(json!("25"))))
            .expect("request should validate");

        assert_eq!(
            new_user,
            NewUser {
                name: "Alice".to_string(),
                age: 25,
            }
        );
    }

    #[test]
    fn normalize_request_accepts_numeric_age() {
        let new_user = normalize_request(request(Some("Alice"), Some(json!(25))))
            .expect("request should validate");

        assert_eq!(new_user.age, 25);
    }

    #[test]
    fn normalize_request_trims_name() {
        let new_user = normalize_request(request(Some("  Alice "), Some(json!("25"))))
            .expect("request should validate");

        assert_eq!(new_user.name, "Alice");
    }

    #[test]
    fn normalize_request_rejects_missing_name() {
        let error = normalize_request(request(None, Some(json!("25"))))
            .expect_err("request should fail");

        assert_eq!(error.message(), "name is required");
    }

    #[test]
    fn normalize_request_rejects_blank_name() {
        let error = normalize_request(request(Some("   "), Some(json!("25"))))
            .expect_err("request should fail");

        assert_eq!(error.message(), "name cannot be empty");
    }

    #[test]
    fn normalize_request_rejects_missing_age() {
        let error =
            normalize_request(request(Some("Alice"), None)).expect_err("request should fail");

        assert_eq!(error.message(), "age is required");
    }

    #[test]
    fn normalize_request_rejects_non_numeric_age() {
        let error = normalize_request(request(Some("Alice"), Some(json!("twenty"))))
            .expect_err("request should fail");

        assert_eq!(error.message(), "age 'twenty' must be a non-negative integer");
    }

    #[test]
    fn normalize_request_rejects_fractional_age() {
        let error = normalize_request(request(Some("Alice"), Some(json!(25.5))))
            .expect_err("request should fail");

        assert!(error.message().contains("must be a non-negative integer"));
    }

    #[test]
    fn normalize_request_rejects_negative_age() {
        let error = normalize_request(request(Some("Alice"), Some(json!(-5))))
            .expect_err("request should fail");

        assert!(error.message().contains("must be a non-negative integer"));
    }

    #[test]
    fn record_without_age_serializes_without_age_key() {
        let record = UserRecord {
            id: "user-1".to_string(),
            name: "Bob".to_string(),
            age: None,
        };

        let value = serde_json::to_value(&record).expect("record should serialize");
        assert_eq!(value, json!({ "id": "user-1", "name": "Bob" }));
    }

    #[test]
    fn record_with_age_round_trips_through_json() {
        let record = UserRecord {
            id: "user-2".to_string(),
            name: "Alice".to_string(),
            age: Some(25),
        };

        let value = serde_json::to_value(&record).expect("record should serialize");
        let decoded: UserRecord =
            serde_json::from_value(value).expect("record should deserialize");
        assert_eq!(decoded, record);
    }
}
