use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use record_gateway_core::contract::{UserRecord, DEFAULT_MIN_AGE};
use record_gateway_lambda::adapters::item::{record_from_item, record_to_item};
use record_gateway_lambda::adapters::record_store::RecordStore;
use record_gateway_lambda::handlers::gateway::{handle_record_event, GatewayConfig};
use serde_json::Value;

struct DynamoDbRecordStore {
    table_name: String,
    dynamodb_client: aws_sdk_dynamodb::Client,
}

impl RecordStore for DynamoDbRecordStore {
    fn put_record(&self, record: &UserRecord) -> Result<(), String> {
        let table_name = self.table_name.clone();
        let item = record_to_item(record);
        let client = self.dynamodb_client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .put_item()
                    .table_name(table_name)
                    .set_item(Some(item))
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| format!("failed to put record into dynamodb: {error}"))
            })
        })
    }

    fn scan_all(&self) -> Result<Vec<UserRecord>, String> {
        let table_name = self.table_name.clone();
        let client = self.dynamodb_client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let mut records = Vec::new();
                let mut exclusive_start_key: Option<HashMap<String, AttributeValue>> = None;

                // Follow LastEvaluatedKey so scans past the 1 MB page limit
                // still return the full table.
                loop {
                    let response = client
                        .scan()
                        .table_name(table_name.clone())
                        .set_exclusive_start_key(exclusive_start_key.take())
                        .send()
                        .await
                        .map_err(|error| format!("failed to scan dynamodb table: {error}"))?;

                    for item in response.items() {
                        records.push(record_from_item(item)?);
                    }

                    match response.last_evaluated_key() {
                        Some(key) if !key.is_empty() => {
                            exclusive_start_key = Some(key.clone());
                        }
                        _ => break,
                    }
                }

                Ok(records)
            })
        })
    }

    fn get_by_id(&self, id: &str) -> Result<Option<UserRecord>, String> {
        let table_name = self.table_name.clone();
        let record_id = id.to_string();
        let client = self.dynamodb_client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let response = client
                    .get_item()
                    .table_name(table_name)
                    .key("id", AttributeValue::S(record_id))
                    .send()
                    .await
                    .map_err(|error| format!("failed to get record from dynamodb: {error}"))?;

                response.item().map(record_from_item).transpose()
            })
        })
    }

    fn scan_by_min_age(&self, min_age: u32) -> Result<Vec<UserRecord>, String> {
        let table_name = self.table_name.clone();
        let client = self.dynamodb_client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let mut records = Vec::new();
                let mut exclusive_start_key: Option<HashMap<String, AttributeValue>> = None;

                loop {
                    let response = client
                        .scan()
                        .table_name(table_name.clone())
                        .filter_expression("age >= :min_age")
                        .expression_attribute_values(
                            ":min_age",
                            AttributeValue::N(min_age.to_string()),
                        )
                        .set_exclusive_start_key(exclusive_start_key.take())
                        .send()
                        .await
                        .map_err(|error| {
                            format!("failed to run filtered dynamodb scan: {error}")
                        })?;

                    for item in response.items() {
                        records.push(record_from_item(item)?);
                    }

                    match response.last_evaluated_key() {
                        Some(key) if !key.is_empty() => {
                            exclusive_start_key = Some(key.clone());
                        }
                        _ => break,
                    }
                }

                Ok(records)
            })
        })
    }
}

async fn handle_request(event: LambdaEvent<Value>) -> Result<UserRecord, Error> {
    let table_name = std::env::var("RECORDS_TABLE_NAME")
        .map_err(|_| Error::from("RECORDS_TABLE_NAME must be configured"))?;
    let region = std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string());

    let mut sdk_config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region));
    if let Ok(endpoint_url) = std::env::var("AWS_ENDPOINT_URL") {
        sdk_config_loader = sdk_config_loader.endpoint_url(endpoint_url);
    }
    let sdk_config = sdk_config_loader.load().await;

    let store = DynamoDbRecordStore {
        table_name: table_name.clone(),
        dynamodb_client: aws_sdk_dynamodb::Client::new(&sdk_config),
    };
    let config = GatewayConfig {
        table_name,
        min_age: DEFAULT_MIN_AGE,
    };

    handle_record_event(event.payload, &config, &store).map_err(|error| Error::from(error.message))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}
