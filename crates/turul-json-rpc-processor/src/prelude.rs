//! # JSON-RPC Processor Prelude
//!
//! Convenient re-exports of the most commonly used types.
//!
//! ```rust
//! use turul_json_rpc_processor::prelude::*;
//! ```

pub use crate::assembler::{Completion, Failure};
pub use crate::config::{ProcessorConfig, RecompilePolicy, SchemaDraft};
pub use crate::dispatch::{CorrelationContext, DispatchOutcome};
pub use crate::error::{JsonRpcError, JsonRpcErrorObject, ProcessorError};
pub use crate::message::{Channel, InboundMessage, OutboundMessage};
pub use crate::processor::JsonRpcProcessor;
pub use crate::request::JsonRpcRequest;
pub use crate::response::JsonRpcMessage;
pub use crate::types::RequestId;

#[cfg(feature = "async")]
pub use crate::r#async::{ForwardHandler, FunctionHandler, ToApplicationError};

// Standard error codes
pub use crate::error_codes::*;
