//! Reassembly of late-arriving handler results into response envelopes

use serde_json::Value;
use tracing::{debug, warn};

use crate::dispatch::CorrelationContext;
use crate::error::{JsonRpcError, JsonRpcErrorObject};
use crate::error_codes;
use crate::response::{JsonRpcMessage, JsonRpcResponse};

/// A bare result returned by the external handler
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub result: Value,
    pub context: CorrelationContext,
}

impl Completion {
    pub fn new(result: Value, context: CorrelationContext) -> Self {
        Self { result, context }
    }
}

/// An application error reported by the external handler
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub message: String,
    pub source: Option<Value>,
    /// `None` falls back to the configured default code
    pub code: Option<i64>,
    pub context: Option<CorrelationContext>,
    /// The originating message came in over HTTP
    pub transport_marker: bool,
}

impl Failure {
    pub fn new(message: impl Into<String>, context: CorrelationContext) -> Self {
        Self {
            message: message.into(),
            source: None,
            code: None,
            context: Some(context),
            transport_marker: false,
        }
    }

    pub fn with_source(mut self, source: Value) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_code(mut self, code: i64) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_transport_marker(mut self, marker: bool) -> Self {
        self.transport_marker = marker;
        self
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ResponseAssembler {
    default_error_code: i64,
}

impl ResponseAssembler {
    pub fn new(default_error_code: i64) -> Self {
        Self { default_error_code }
    }

    pub fn complete(&self, completion: Completion) -> JsonRpcMessage {
        debug!("Assembling result for method: {}", completion.context.method());
        JsonRpcResponse::new(completion.context.id().cloned(), completion.result).into()
    }

    pub fn fail(&self, failure: &Failure) -> JsonRpcMessage {
        let id = match &failure.context {
            Some(context) => context.id().cloned(),
            None => {
                warn!("Failure arrived without correlation data, responding with a null id");
                None
            }
        };
        let error = JsonRpcErrorObject::application(
            failure.code.unwrap_or(self.default_error_code),
            failure.message.clone(),
            failure.source.clone(),
        );
        JsonRpcError::new(id, error).into()
    }
}

impl Default for ResponseAssembler {
    fn default() -> Self {
        Self::new(error_codes::APPLICATION_ERROR)
    }
}
