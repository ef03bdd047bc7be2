//! The processor boundary layer
//!
//! Classifies inbound messages, drives the envelope validator, dispatcher
//! and response assembler, and maps every outcome onto a [`Channel`].

use serde_json::Value;
use tracing::{debug, error};

use crate::assembler::{Completion, Failure, ResponseAssembler};
use crate::config::ProcessorConfig;
use crate::dispatch::{CorrelationContext, DispatchOutcome, Dispatcher};
use crate::envelope::{EnvelopeErrorKind, EnvelopeOutcome, EnvelopeValidator, envelope_error};
use crate::error::{JsonRpcError, ProcessorError};
use crate::message::{InboundMessage, OutboundMessage};
use crate::registry::{RegistrationReport, SchemaRegistry};
use crate::request::JsonRpcRequest;
use crate::response::JsonRpcMessage;
use crate::schema::{SchemaCompiler, errors_text};
use crate::types::RequestId;

/// What a request turned into before it is put on a channel
#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome {
    /// Envelope was rejected before dispatch
    Rejected(JsonRpcError),
    Dispatched(DispatchOutcome),
}

#[derive(Debug)]
pub struct JsonRpcProcessor {
    envelope: EnvelopeValidator,
    dispatcher: Dispatcher,
    assembler: ResponseAssembler,
    transport_error_status: u16,
}

impl JsonRpcProcessor {
    /// Build a processor with an empty method catalog.
    ///
    /// Fails with [`ProcessorError::EnvelopeSchema`] when the envelope
    /// schema can't be compiled.
    pub fn new(config: ProcessorConfig) -> Result<Self, ProcessorError> {
        let compiler = SchemaCompiler::new(config.schema_draft);
        let envelope = EnvelopeValidator::new(&compiler, config.envelope_schema.as_ref())?;
        Ok(Self {
            envelope,
            dispatcher: Dispatcher::new(SchemaRegistry::new(compiler, config.recompile_policy)),
            assembler: ResponseAssembler::new(config.default_error_code),
            transport_error_status: config.transport_error_status,
        })
    }

    pub fn registry(&self) -> &SchemaRegistry {
        self.dispatcher.registry()
    }

    pub fn registry_mut(&mut self) -> &mut SchemaRegistry {
        self.dispatcher.registry_mut()
    }

    pub fn register_methods(&mut self, mapping: &Value) -> Result<RegistrationReport, ProcessorError> {
        let report = self.registry_mut().register_batch(mapping)?;
        debug!(
            "Registered {} method(s), {} rejected",
            report.registered.len(),
            report.failed.len()
        );
        Ok(report)
    }

    /// Validate the envelope and, if it holds, dispatch the request
    pub fn evaluate(&self, payload: &Value) -> RequestOutcome {
        if let EnvelopeOutcome::Invalid { kind, id, issues } = self.envelope.validate(payload) {
            let rejection = envelope_error(kind, id, &issues, payload);
            error!(
                "json-rpc-processor error: {}: {}",
                rejection.error.message,
                errors_text(&issues)
            );
            return RequestOutcome::Rejected(rejection);
        }

        match serde_json::from_value::<JsonRpcRequest>(payload.clone()) {
            Ok(request) => RequestOutcome::Dispatched(self.dispatcher.dispatch(&request, payload)),
            Err(e) => {
                // Only reachable with a replacement envelope schema looser than the request type
                error!("json-rpc-processor error: Invalid Request: {}", e);
                let id = payload.get("id").and_then(RequestId::from_value);
                RequestOutcome::Rejected(envelope_error(
                    EnvelopeErrorKind::InvalidRequest,
                    id,
                    &[],
                    payload,
                ))
            }
        }
    }

    /// Process one request payload into success or error output
    pub fn process_request(&self, payload: &Value, transport_marker: bool) -> OutboundMessage {
        match self.evaluate(payload) {
            RequestOutcome::Rejected(rejection) => self.error_output(
                JsonRpcMessage::Error(rejection),
                None,
                transport_marker,
            ),
            RequestOutcome::Dispatched(outcome) => match outcome.into_result() {
                Ok((params, context)) => OutboundMessage::success(params, Some(context)),
                Err((rejection, context)) => self.error_output(
                    JsonRpcMessage::Error(rejection),
                    Some(context),
                    transport_marker,
                ),
            },
        }
    }

    /// Process raw request text; undecodable JSON is a parse error with a null id
    pub fn process_str(&self, raw: &str, transport_marker: bool) -> OutboundMessage {
        match serde_json::from_str::<Value>(raw) {
            Ok(payload) => self.process_request(&payload, transport_marker),
            Err(e) => {
                error!("json-rpc-processor error: Parse error: {}", e);
                let rejection = JsonRpcError::parse_error(Some(Value::String(e.to_string())));
                self.error_output(JsonRpcMessage::Error(rejection), None, transport_marker)
            }
        }
    }

    pub fn complete(&self, completion: Completion) -> OutboundMessage {
        let context = completion.context.clone();
        OutboundMessage::success(self.assembler.complete(completion).to_value(), Some(context))
    }

    pub fn fail(&self, failure: &Failure) -> OutboundMessage {
        self.error_output(
            self.assembler.fail(failure),
            failure.context.clone(),
            failure.transport_marker,
        )
    }

    /// Handle one inbound boundary message.
    ///
    /// Registration produces no output; every other message produces exactly one.
    pub fn handle_message(&mut self, message: Value) -> Result<Option<OutboundMessage>, ProcessorError> {
        self.handle_inbound(InboundMessage::from_value(message)?)
    }

    /// Decode and handle one boundary message received as text
    pub fn handle_str(&mut self, raw: &str) -> Result<Option<OutboundMessage>, ProcessorError> {
        self.handle_inbound(raw.parse()?)
    }

    fn handle_inbound(
        &mut self,
        message: InboundMessage,
    ) -> Result<Option<OutboundMessage>, ProcessorError> {
        match message {
            InboundMessage::Register(mapping) => {
                // A wrong-shape batch has already been logged by the registry
                match self.register_methods(&mapping) {
                    Ok(_) | Err(ProcessorError::InvalidMethodsShape) => Ok(None),
                    Err(other) => Err(other),
                }
            }
            InboundMessage::Request {
                payload,
                transport_marker,
            } => Ok(Some(self.process_request(&payload, transport_marker))),
            InboundMessage::Completion(completion) => Ok(Some(self.complete(completion))),
            InboundMessage::Failure(failure) => Ok(Some(self.fail(&failure))),
        }
    }

    fn error_output(
        &self,
        payload: JsonRpcMessage,
        context: Option<CorrelationContext>,
        transport_marker: bool,
    ) -> OutboundMessage {
        let status = transport_marker.then_some(self.transport_error_status);
        OutboundMessage::error(payload.to_value(), context).with_status_code(status)
    }
}
