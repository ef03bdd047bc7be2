//! Boundary message shapes exchanged with the hosting flow runtime
//!
//! Inbound messages are plain JSON objects. The member that is present
//! decides what the message means:
//!
//! | Member                      | Meaning                          |
//! |-----------------------------|----------------------------------|
//! | `methods`                   | register a method catalog        |
//! | `error`                     | handler failure to assemble      |
//! | `payload` + `rpcMethod`     | handler result to assemble       |
//! | `payload`                   | JSON-RPC request to dispatch     |
//!
//! Correlation travels in `rpcData` (`{"id": ..., "method": ...}`) and the
//! presence of `req` marks a message that arrived over HTTP.

use std::str::FromStr;

use serde_json::{Map, Value};

use crate::assembler::{Completion, Failure};
use crate::dispatch::CorrelationContext;
use crate::error::ProcessorError;
use crate::types::RequestId;

/// Output channel of the processor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// `{ name: { "request": schema } }` mapping
    Register(Value),
    Request {
        payload: Value,
        transport_marker: bool,
    },
    Completion(Completion),
    Failure(Failure),
}

impl InboundMessage {
    pub fn from_value(value: Value) -> Result<Self, ProcessorError> {
        let Value::Object(mut message) = value else {
            return Err(ProcessorError::UnrecognizedMessage(
                "message is not a JSON object".to_string(),
            ));
        };
        let transport_marker = message.contains_key("req");

        if let Some(methods) = message.remove("methods") {
            return Ok(InboundMessage::Register(methods));
        }

        if let Some(error) = message.remove("error") {
            let (text, source) = match error {
                Value::Object(mut error) => (
                    error
                        .remove("message")
                        .map(|m| match m {
                            Value::String(s) => s,
                            other => other.to_string(),
                        })
                        .unwrap_or_default(),
                    error.remove("source"),
                ),
                Value::String(s) => (s, None),
                other => (other.to_string(), None),
            };
            let code = message
                .get("rpcErrorCode")
                .and_then(Value::as_i64)
                .filter(|code| *code != 0);
            return Ok(InboundMessage::Failure(Failure {
                message: text,
                source,
                code,
                context: correlation(&message),
                transport_marker,
            }));
        }

        let rpc_method = message
            .get("rpcMethod")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_string);

        match (message.remove("payload"), rpc_method) {
            (Some(result), Some(_)) => {
                let context = correlation(&message).ok_or(ProcessorError::MissingCorrelation)?;
                Ok(InboundMessage::Completion(Completion::new(result, context)))
            }
            (Some(payload), None) => Ok(InboundMessage::Request {
                payload,
                transport_marker,
            }),
            (None, _) => Err(ProcessorError::UnrecognizedMessage(
                "expected one of methods, error or payload".to_string(),
            )),
        }
    }
}

/// Decode boundary message text. Text that isn't JSON fails with
/// [`ProcessorError::Json`].
impl FromStr for InboundMessage {
    type Err = ProcessorError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_value(value)
    }
}

/// Read the echoed correlation context, taking the method from `rpcMethod`
/// when `rpcData` doesn't repeat it.
fn correlation(message: &Map<String, Value>) -> Option<CorrelationContext> {
    let data = message.get("rpcData")?.as_object()?;
    let method = data
        .get("method")
        .or_else(|| message.get("rpcMethod"))
        .and_then(Value::as_str)
        .unwrap_or_default();
    let id = data.get("id").and_then(RequestId::from_value);
    Some(CorrelationContext::new(id, method))
}

/// A message emitted on one of the two channels
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    pub channel: Channel,
    pub payload: Value,
    pub context: Option<CorrelationContext>,
    /// HTTP status for the transport collaborator, set on error output for
    /// requests that came over HTTP
    pub status_code: Option<u16>,
}

impl OutboundMessage {
    pub fn success(payload: Value, context: Option<CorrelationContext>) -> Self {
        Self {
            channel: Channel::Success,
            payload,
            context,
            status_code: None,
        }
    }

    pub fn error(payload: Value, context: Option<CorrelationContext>) -> Self {
        Self {
            channel: Channel::Error,
            payload,
            context,
            status_code: None,
        }
    }

    pub fn with_status_code(mut self, status: Option<u16>) -> Self {
        self.status_code = status;
        self
    }

    pub fn is_error(&self) -> bool {
        self.channel == Channel::Error
    }

    /// Render in the hosting runtime's message shape
    pub fn to_value(&self) -> Value {
        let mut message = Map::new();
        message.insert("payload".to_string(), self.payload.clone());
        if let Some(context) = &self.context {
            message.insert(
                "rpcMethod".to_string(),
                Value::String(context.method().to_string()),
            );
            message.insert(
                "rpcData".to_string(),
                serde_json::to_value(context).unwrap_or(Value::Null),
            );
        }
        if let Some(status) = self.status_code {
            message.insert("statusCode".to_string(), Value::from(status));
        }
        Value::Object(message)
    }
}
