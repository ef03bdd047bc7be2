//! Routing of validated requests to their method's parameter validator

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, error};

use crate::error::JsonRpcError;
use crate::registry::SchemaRegistry;
use crate::request::JsonRpcRequest;
use crate::schema::{ValidationIssue, errors_text};
use crate::types::RequestId;

/// Data threaded through the external handler so its result can be turned
/// back into a response envelope.
///
/// Handlers treat it as opaque and echo it back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<RequestId>,
    method: String,
}

impl CorrelationContext {
    pub fn new(id: Option<RequestId>, method: impl Into<String>) -> Self {
        Self {
            id,
            method: method.into(),
        }
    }

    pub fn id(&self) -> Option<&RequestId> {
        self.id.as_ref()
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    fn from_request(request: &JsonRpcRequest) -> Self {
        Self::new(request.id.clone(), request.method.clone())
    }
}

/// Result of routing a validated request
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// Params passed the method schema and become the outgoing payload
    Forward {
        params: Value,
        context: CorrelationContext,
    },
    MethodNotFound {
        context: CorrelationContext,
    },
    InvalidParams {
        context: CorrelationContext,
        issues: Vec<ValidationIssue>,
        /// The request as received, echoed in the error data
        request: Value,
    },
}

impl DispatchOutcome {
    pub fn context(&self) -> &CorrelationContext {
        match self {
            DispatchOutcome::Forward { context, .. }
            | DispatchOutcome::MethodNotFound { context }
            | DispatchOutcome::InvalidParams { context, .. } => context,
        }
    }

    pub fn is_forward(&self) -> bool {
        matches!(self, DispatchOutcome::Forward { .. })
    }

    /// The error envelope for a rejected request, `None` for a forward
    pub fn to_error(&self) -> Option<JsonRpcError> {
        self.clone().into_result().err().map(|(error, _)| error)
    }

    /// Split into the forwarded params or the error envelope, keeping the
    /// correlation context either way
    pub fn into_result(
        self,
    ) -> Result<(Value, CorrelationContext), (JsonRpcError, CorrelationContext)> {
        match self {
            DispatchOutcome::Forward { params, context } => Ok((params, context)),
            DispatchOutcome::MethodNotFound { context } => Err((
                JsonRpcError::method_not_found(context.id.clone(), &context.method),
                context,
            )),
            DispatchOutcome::InvalidParams {
                context,
                issues,
                request,
            } => Err((
                JsonRpcError::invalid_params(context.id.clone(), Some(json!([issues, request]))),
                context,
            )),
        }
    }
}

/// Routes requests to their method's parameter validator.
///
/// The dispatcher owns its registry outright; registration goes through
/// [`Dispatcher::registry_mut`] so reads and writes can never interleave.
#[derive(Debug, Default)]
pub struct Dispatcher {
    registry: SchemaRegistry,
}

impl Dispatcher {
    pub fn new(registry: SchemaRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut SchemaRegistry {
        &mut self.registry
    }

    /// Route `request`, decoded from `received`. A params failure echoes
    /// `received` verbatim in its error data.
    pub fn dispatch(&self, request: &JsonRpcRequest, received: &Value) -> DispatchOutcome {
        let context = CorrelationContext::from_request(request);

        let Some(descriptor) = self.registry.lookup(&request.method) else {
            error!("json-rpc-processor error: method {} not found", request.method);
            return DispatchOutcome::MethodNotFound { context };
        };

        let params = request.params_value();
        match descriptor.validate(&params) {
            Ok(()) => {
                debug!("Forwarding params for method: {}", request.method);
                DispatchOutcome::Forward { params, context }
            }
            Err(issues) => {
                error!(
                    "json-rpc-processor error: invalid parameters: {}",
                    errors_text(&issues)
                );
                DispatchOutcome::InvalidParams {
                    context,
                    issues,
                    request: received.clone(),
                }
            }
        }
    }
}
