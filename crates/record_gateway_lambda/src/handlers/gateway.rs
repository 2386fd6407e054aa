use chrono::Utc;
use record_gateway_core::contract::{normalize_request, CreateUserRequest, UserRecord};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::adapters::record_store::RecordStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub table_name: String,
    pub min_age: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayError {
    pub message: String,
}

/// Runs the full gateway sequence: validate, create, scan, key lookup,
/// age-filtered scan. Validation happens before any store call; the first
/// store failure aborts the remaining operations.
pub fn handle_record_event(
    event: Value,
    config: &GatewayConfig,
    store: &impl RecordStore,
) -> Result<UserRecord, GatewayError> {
    let request = match serde_json::from_value::<CreateUserRequest>(event) {
        Ok(value) => value,
        Err(error) => {
            let message = format!("Malformed request: {error}");
            log_gateway_error("request_rejected", json!({ "error": message.clone() }));
            return Err(GatewayError { message });
        }
    };

    let new_user = match normalize_request(request) {
        Ok(value) => value,
        Err(error) => {
            log_gateway_error("request_rejected", json!({ "error": error.message() }));
            return Err(GatewayError {
                message: error.message().to_string(),
            });
        }
    };

    let record = UserRecord {
        id: Uuid::new_v4().to_string(),
        name: new_user.name,
        age: Some(new_user.age),
    };

    store
        .put_record(&record)
        .map_err(|error| store_failure("put_record", &error))?;
    log_gateway_info(
        "record_created",
        json!({
            "table": config.table_name.clone(),
            "id": record.id.clone(),
            "name": record.name.clone(),
            "age": record.age,
        }),
    );

    let all_records = store
        .scan_all()
        .map_err(|error| store_failure("scan_all", &error))?;
    log_gateway_info(
        "scan_completed",
        json!({
            "table": config.table_name.clone(),
            "record_count": all_records.len(),
            "records": all_records,
        }),
    );

    let lookup = store
        .get_by_id(&record.id)
        .map_err(|error| store_failure("get_by_id", &error))?;
    log_gateway_info(
        "key_lookup_completed",
        json!({
            "id": record.id.clone(),
            "found": lookup.is_some(),
            "record": lookup,
        }),
    );

    let matching_records = store
        .scan_by_min_age(config.min_age)
        .map_err(|error| store_failure("scan_by_min_age", &error))?;
    log_gateway_info(
        "age_filter_completed",
        json!({
            "min_age": config.min_age,
            "record_count": matching_records.len(),
            "records": matching_records,
        }),
    );

    Ok(record)
}

fn store_failure(operation: &str, error: &str) -> GatewayError {
    log_gateway_error(
        "store_operation_failed",
        json!({ "operation": operation, "error": error }),
    );
    GatewayError {
        message: format!("Store operation {operation} failed: {error}"),
    }
}

fn log_gateway_info(event: &str, details: Value) {
    eprintln!(
        "{}",
        json!({
            "component": "record_gateway",
            "event": event,
            "timestamp": Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}

fn log_gateway_error(event: &str, details: Value) {
    eprintln!(
        "{}",
        json!({
            "component": "record_gateway",
            "level": "error",
            "event": event,
            "timestamp": Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}
