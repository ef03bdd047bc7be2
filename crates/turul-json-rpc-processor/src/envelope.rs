//! Structural validation of inbound payloads against the fixed JSON-RPC 2.0
//! request schema.

use jsonschema::Validator;
use serde_json::{Value, json};
use tracing::error;

use crate::error::{JsonRpcError, JsonRpcErrorCode, ProcessorError};
use crate::schema::{self, SchemaCompiler, ValidationIssue};
use crate::types::RequestId;

/// The JSON-RPC 2.0 request schema compiled at startup
pub const ENVELOPE_SCHEMA: &str = include_str!("../schemas/json-rpc-2.0.json");

/// How a payload that failed envelope validation is classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeErrorKind {
    /// No `method` member: the payload isn't recognisable as a request at all
    ParseError,
    /// A `method` member exists but the envelope shape is wrong
    InvalidRequest,
}

impl EnvelopeErrorKind {
    pub fn error_code(&self) -> JsonRpcErrorCode {
        match self {
            EnvelopeErrorKind::ParseError => JsonRpcErrorCode::ParseError,
            EnvelopeErrorKind::InvalidRequest => JsonRpcErrorCode::InvalidRequest,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnvelopeOutcome {
    Valid,
    Invalid {
        kind: EnvelopeErrorKind,
        id: Option<RequestId>,
        issues: Vec<ValidationIssue>,
    },
}

impl EnvelopeOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, EnvelopeOutcome::Valid)
    }
}

#[derive(Debug)]
pub struct EnvelopeValidator {
    validator: Validator,
}

impl EnvelopeValidator {
    /// Compile the envelope schema. Failure here leaves nothing to validate
    /// requests with, so it is reported once and returned to the caller.
    pub fn new(compiler: &SchemaCompiler, schema: Option<&Value>) -> Result<Self, ProcessorError> {
        let embedded;
        let schema = match schema {
            Some(schema) => schema,
            None => {
                embedded = serde_json::from_str::<Value>(ENVELOPE_SCHEMA).map_err(|e| {
                    error!("json-rpc-processor error: Can't compile main JSON-RPC 2.0 schema: {}", e);
                    ProcessorError::EnvelopeSchema(e.to_string())
                })?;
                &embedded
            }
        };

        let validator = compiler.compile(schema).map_err(|diagnostic| {
            error!(
                "json-rpc-processor error: Can't compile main JSON-RPC 2.0 schema: {}",
                diagnostic
            );
            ProcessorError::EnvelopeSchema(diagnostic)
        })?;
        Ok(Self { validator })
    }

    pub fn validate(&self, payload: &Value) -> EnvelopeOutcome {
        match schema::validate(&self.validator, payload) {
            Ok(()) => EnvelopeOutcome::Valid,
            Err(issues) => {
                let has_method = matches!(payload.get("method"), Some(m) if is_truthy(m));
                let (kind, id) = if has_method {
                    (
                        EnvelopeErrorKind::InvalidRequest,
                        payload.get("id").and_then(RequestId::from_value),
                    )
                } else {
                    (EnvelopeErrorKind::ParseError, None)
                };
                EnvelopeOutcome::Invalid { kind, id, issues }
            }
        }
    }
}

/// `null`, `false`, `0` and `""` count as an absent `method`
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Build the error envelope for a payload that failed envelope validation.
///
/// `data` carries the validator issues followed by the offending payload.
pub fn envelope_error(
    kind: EnvelopeErrorKind,
    id: Option<RequestId>,
    issues: &[ValidationIssue],
    payload: &Value,
) -> JsonRpcError {
    let data = Some(json!([issues, payload]));
    match kind {
        EnvelopeErrorKind::ParseError => JsonRpcError::parse_error(data),
        EnvelopeErrorKind::InvalidRequest => JsonRpcError::invalid_request(id, data),
    }
}
