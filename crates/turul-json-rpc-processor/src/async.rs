//! In-process round trip through an async handler
//!
//! Normally forwarded params leave the processor and come back later as a
//! completion or failure message. A [`ForwardHandler`] lets the handler live
//! in the same process: [`JsonRpcProcessor::process_with`] forwards, awaits
//! it and assembles the response in one call.

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::Value;
use tracing::debug;

use crate::assembler::{Completion, Failure};
use crate::dispatch::CorrelationContext;
use crate::message::{Channel, OutboundMessage};
use crate::processor::JsonRpcProcessor;

/// Errors a handler can report, converted into application error envelopes.
///
/// The message comes from `Display`.
pub trait ToApplicationError: std::error::Error + Send + Sync + 'static {
    /// Error code; `None` uses the processor's default
    fn error_code(&self) -> Option<i64> {
        None
    }

    /// Value placed in the error's `data` member
    fn error_data(&self) -> Option<Value> {
        None
    }
}

/// Trait for handling forwarded params
#[async_trait]
pub trait ForwardHandler: Send + Sync {
    type Error: ToApplicationError;

    async fn handle(&self, params: Value, context: &CorrelationContext) -> Result<Value, Self::Error>;
}

/// A simple function-based handler
pub struct FunctionHandler<F, E>
where
    E: ToApplicationError,
    F: Fn(Value, CorrelationContext) -> BoxFuture<'static, Result<Value, E>> + Send + Sync,
{
    handler_fn: F,
}

impl<F, E> FunctionHandler<F, E>
where
    E: ToApplicationError,
    F: Fn(Value, CorrelationContext) -> BoxFuture<'static, Result<Value, E>> + Send + Sync,
{
    pub fn new(handler_fn: F) -> Self {
        Self { handler_fn }
    }
}

#[async_trait]
impl<F, E> ForwardHandler for FunctionHandler<F, E>
where
    E: ToApplicationError,
    F: Fn(Value, CorrelationContext) -> BoxFuture<'static, Result<Value, E>> + Send + Sync,
{
    type Error = E;

    async fn handle(&self, params: Value, context: &CorrelationContext) -> Result<Value, Self::Error> {
        (self.handler_fn)(params, context.clone()).await
    }
}

impl JsonRpcProcessor {
    /// Validate and dispatch `payload`, run `handler` on forwarded params and
    /// assemble its answer.
    ///
    /// Rejected requests never reach the handler.
    pub async fn process_with<H>(
        &self,
        payload: &Value,
        transport_marker: bool,
        handler: &H,
    ) -> OutboundMessage
    where
        H: ForwardHandler + ?Sized,
    {
        let forwarded = self.process_request(payload, transport_marker);
        let context = match (&forwarded.channel, &forwarded.context) {
            (Channel::Success, Some(context)) => context.clone(),
            _ => return forwarded,
        };

        debug!("Handing method {} to forward handler", context.method());
        match handler.handle(forwarded.payload, &context).await {
            Ok(result) => self.complete(Completion::new(result, context)),
            Err(error) => {
                let mut failure = Failure::new(error.to_string(), context)
                    .with_transport_marker(transport_marker);
                failure.code = error.error_code();
                failure.source = error.error_data();
                self.fail(&failure)
            }
        }
    }
}
