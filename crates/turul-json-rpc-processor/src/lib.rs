//! # JSON-RPC 2.0 Processor
//!
//! A transport-agnostic JSON-RPC 2.0 processor that validates requests
//! against a runtime-configurable catalog of per-method parameter schemas.
//!
//! Validated params are forwarded to an external handler together with a
//! [`CorrelationContext`]. When the handler's bare result or failure comes
//! back with that context, the processor reassembles it into a proper
//! response envelope.
//!
//! ## Features
//! - Method catalog registered at runtime from JSON Schema documents
//! - Per-method failure isolation when registering a batch
//! - Exact JSON-RPC 2.0 error codes for parse, envelope, method and params errors
//! - Two output channels (success / error) with an HTTP status marker
//! - Async in-process handlers with the `async` feature
//!
//! ```rust
//! use serde_json::json;
//! use turul_json_rpc_processor::{Channel, JsonRpcProcessor, ProcessorConfig};
//!
//! let mut processor = JsonRpcProcessor::new(ProcessorConfig::default()).unwrap();
//! processor
//!     .register_methods(&json!({
//!         "add": {"request": {"type": "object", "required": ["number1", "number2"]}}
//!     }))
//!     .unwrap();
//!
//! let output = processor.process_request(
//!     &json!({"jsonrpc": "2.0", "method": "add", "params": {"number1": 3, "number2": 4}, "id": "x"}),
//!     false,
//! );
//! assert_eq!(output.channel, Channel::Success);
//! assert_eq!(output.payload, json!({"number1": 3, "number2": 4}));
//! ```

pub mod assembler;
pub mod config;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod message;
pub mod prelude;
pub mod processor;
pub mod registry;
pub mod request;
pub mod response;
pub mod schema;
pub mod types;

#[cfg(feature = "async")]
pub mod r#async;

// Re-export main types
pub use assembler::{Completion, Failure, ResponseAssembler};
pub use config::{ProcessorConfig, RecompilePolicy, SchemaDraft};
pub use dispatch::{CorrelationContext, DispatchOutcome, Dispatcher};
pub use envelope::{EnvelopeErrorKind, EnvelopeOutcome, EnvelopeValidator};
pub use error::{JsonRpcError, JsonRpcErrorCode, JsonRpcErrorObject, ProcessorError};
pub use message::{Channel, InboundMessage, OutboundMessage};
pub use processor::{JsonRpcProcessor, RequestOutcome};
pub use registry::{MethodDescriptor, RegistrationFailure, RegistrationReport, SchemaRegistry};
pub use request::{JsonRpcRequest, RequestParams};
pub use response::{JsonRpcMessage, JsonRpcResponse};
pub use schema::ValidationIssue;
pub use types::{JsonRpcVersion, RequestId};

#[cfg(feature = "async")]
pub use r#async::{ForwardHandler, FunctionHandler, ToApplicationError};

/// JSON-RPC 2.0 version constant
pub const JSONRPC_VERSION: &str = "2.0";

/// Error codes used by the processor
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;

    /// Default for failures reported by the external handler
    pub const APPLICATION_ERROR: i64 = -31999;
}
