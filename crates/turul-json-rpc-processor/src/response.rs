use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::JsonRpcError;
use crate::types::{JsonRpcVersion, RequestId};

/// A successful JSON-RPC response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(rename = "jsonrpc")]
    pub version: JsonRpcVersion,
    pub result: Value,
    pub id: Option<RequestId>,
}

impl JsonRpcResponse {
    pub fn new(id: Option<RequestId>, result: Value) -> Self {
        Self {
            version: JsonRpcVersion::V2_0,
            result,
            id,
        }
    }
}

/// Either a successful response or an error response.
///
/// Keeping the two apart guarantees exactly one of `result` / `error` is
/// present on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcMessage {
    /// Successful response with result field
    Response(JsonRpcResponse),
    /// Error response with error field
    Error(JsonRpcError),
}

impl JsonRpcMessage {
    pub fn success(id: Option<RequestId>, result: Value) -> Self {
        Self::Response(JsonRpcResponse::new(id, result))
    }

    pub fn error(error: JsonRpcError) -> Self {
        Self::Error(error)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, JsonRpcMessage::Error(_))
    }

    /// Get the request ID from either response or error
    pub fn id(&self) -> Option<&RequestId> {
        match self {
            JsonRpcMessage::Response(resp) => resp.id.as_ref(),
            JsonRpcMessage::Error(err) => err.id.as_ref(),
        }
    }

    pub fn to_value(&self) -> Value {
        // Every field is a plain JSON value or string, serialization cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl From<JsonRpcResponse> for JsonRpcMessage {
    fn from(response: JsonRpcResponse) -> Self {
        Self::Response(response)
    }
}

impl From<JsonRpcError> for JsonRpcMessage {
    fn from(error: JsonRpcError) -> Self {
        Self::Error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JsonRpcErrorObject;
    use serde_json::json;

    #[test]
    fn test_response_wire_format() {
        let response = JsonRpcMessage::success(Some(RequestId::from("x")), json!(7));
        assert_eq!(
            response.to_value(),
            json!({"jsonrpc": "2.0", "result": 7, "id": "x"})
        );
        assert!(!response.is_error());
    }

    #[test]
    fn test_missing_id_serializes_as_null() {
        let response = JsonRpcMessage::success(None, json!({"ok": true}));
        assert_eq!(response.to_value()["id"], Value::Null);
        assert_eq!(response.id(), None);
    }

    #[test]
    fn test_null_result_is_kept() {
        let response = JsonRpcMessage::success(Some(RequestId::from(1)), Value::Null);
        let value = response.to_value();
        assert!(value.as_object().unwrap().contains_key("result"));
        assert!(!value.as_object().unwrap().contains_key("error"));
    }

    #[test]
    fn test_error_message_has_no_result() {
        let error = JsonRpcMessage::error(JsonRpcError::new(
            Some(RequestId::from(1)),
            JsonRpcErrorObject::method_not_found("nope"),
        ));
        let value = error.to_value();
        assert!(error.is_error());
        assert!(!value.as_object().unwrap().contains_key("result"));
        assert_eq!(value["error"]["code"], json!(-32601));

        let parsed: JsonRpcMessage = serde_json::from_value(value).unwrap();
        assert!(parsed.is_error());
    }
}
