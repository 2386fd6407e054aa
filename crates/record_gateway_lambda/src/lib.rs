//! AWS-oriented adapters and handlers for the record gateway.
//!
//! This crate owns runtime integration details (the Lambda handler, the
//! DynamoDB item codec, and the storage adapter seam) on top of the
//! contracts in `record_gateway_core`.

pub mod adapters;
pub mod handlers;
