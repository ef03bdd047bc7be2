//! Processor configuration
//!
//! Loading configuration from files is left to the host; this module only
//! defines the shape and the defaults.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error_codes;

/// What happens to an already registered method when a new schema for the
/// same name fails to compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecompilePolicy {
    /// Drop the method entirely, including a previously valid validator
    #[default]
    DeleteOnFailure,
    /// Keep serving with the last schema that compiled
    RetainLastGood,
}

/// JSON Schema draft used for schemas that do not declare `$schema`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaDraft {
    Draft4,
    Draft6,
    Draft7,
    Draft201909,
    Draft202012,
}

impl From<SchemaDraft> for jsonschema::Draft {
    fn from(draft: SchemaDraft) -> Self {
        match draft {
            SchemaDraft::Draft4 => jsonschema::Draft::Draft4,
            SchemaDraft::Draft6 => jsonschema::Draft::Draft6,
            SchemaDraft::Draft7 => jsonschema::Draft::Draft7,
            SchemaDraft::Draft201909 => jsonschema::Draft::Draft201909,
            SchemaDraft::Draft202012 => jsonschema::Draft::Draft202012,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    pub recompile_policy: RecompilePolicy,
    /// `None` lets the compiler detect the draft from `$schema`
    pub schema_draft: Option<SchemaDraft>,
    /// Replacement for the embedded JSON-RPC 2.0 envelope schema
    pub envelope_schema: Option<Value>,
    /// Code used for application failures that don't choose one
    pub default_error_code: i64,
    /// Status attached to error output when the request came over HTTP
    pub transport_error_status: u16,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            recompile_policy: RecompilePolicy::default(),
            schema_draft: None,
            envelope_schema: None,
            default_error_code: error_codes::APPLICATION_ERROR,
            transport_error_status: 500,
        }
    }
}

impl ProcessorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_recompile_policy(mut self, policy: RecompilePolicy) -> Self {
        self.recompile_policy = policy;
        self
    }

    pub fn with_schema_draft(mut self, draft: SchemaDraft) -> Self {
        self.schema_draft = Some(draft);
        self
    }

    pub fn with_envelope_schema(mut self, schema: Value) -> Self {
        self.envelope_schema = Some(schema);
        self
    }

    pub fn with_default_error_code(mut self, code: i64) -> Self {
        self.default_error_code = code;
        self
    }

    pub fn with_transport_error_status(mut self, status: u16) -> Self {
        self.transport_error_status = status;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = ProcessorConfig::default();
        assert_eq!(config.recompile_policy, RecompilePolicy::DeleteOnFailure);
        assert_eq!(config.default_error_code, -31999);
        assert_eq!(config.transport_error_status, 500);
        assert!(config.schema_draft.is_none());
        assert!(config.envelope_schema.is_none());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: ProcessorConfig = serde_json::from_value(json!({
            "recompile_policy": "retain_last_good",
            "schema_draft": "draft4"
        }))
        .unwrap();

        assert_eq!(config.recompile_policy, RecompilePolicy::RetainLastGood);
        assert_eq!(config.schema_draft, Some(SchemaDraft::Draft4));
        assert_eq!(config.default_error_code, -31999);
    }
}
