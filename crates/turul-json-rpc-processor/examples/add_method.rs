//! Add Method JSON-RPC Example
//!
//! Registers an `add` method with a parameter schema, then pushes a few
//! requests through the processor with an in-process handler standing in
//! for the external flow.

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::info;
use tracing_subscriber::EnvFilter;
use turul_json_rpc_processor::prelude::*;

#[derive(thiserror::Error, Debug)]
enum AddError {
    #[error("Sum does not fit in an i64")]
    Overflow,
}

impl ToApplicationError for AddError {}

/// Adds the two validated operands
struct AddHandler;

#[async_trait]
impl ForwardHandler for AddHandler {
    type Error = AddError;

    async fn handle(&self, params: Value, context: &CorrelationContext) -> Result<Value, AddError> {
        info!("Handling {} for request {:?}", context.method(), context.id());
        let a = params["number1"].as_i64().unwrap_or_default();
        let b = params["number2"].as_i64().unwrap_or_default();
        a.checked_add(b).map(Value::from).ok_or(AddError::Overflow)
    }
}

#[tokio::main]
async fn main() -> Result<(), ProcessorError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut processor = JsonRpcProcessor::new(ProcessorConfig::default())?;
    let report = processor.register_methods(&json!({
        "add": {
            "request": {
                "title": "add",
                "type": "object",
                "properties": {
                    "number1": {"type": "integer", "minimum": 0},
                    "number2": {"type": "integer", "minimum": 0}
                },
                "required": ["number1", "number2"]
            }
        }
    }))?;
    info!("Registered methods: {:?}", report.registered);

    let requests = [
        json!({"jsonrpc": "2.0", "method": "add", "params": {"number1": 3, "number2": 4}, "id": 1}),
        json!({"jsonrpc": "2.0", "method": "add", "params": {"number1": -3, "number2": 5}, "id": 2}),
        json!({"jsonrpc": "2.0", "method": "multiply", "params": {"a": 2}, "id": 3}),
        json!({"jsonrpc": "3.0", "method": "add", "params": {}, "id": 4}),
        json!({"hello": "world"}),
    ];

    for request in &requests {
        let output = processor.process_with(request, false, &AddHandler).await;
        info!(
            "{:?} channel: {}",
            output.channel,
            serde_json::to_string(&output.payload)?
        );
    }

    Ok(())
}
