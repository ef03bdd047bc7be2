//! JSON Schema compilation and validator diagnostics

use jsonschema::Validator;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::SchemaDraft;

/// One validator complaint about an instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    /// JSON pointer into the validated instance
    pub instance_path: String,
    /// JSON pointer into the schema keyword that failed
    pub schema_path: String,
    pub message: String,
}

/// Render issues as a single human-readable line for logs
pub fn errors_text(issues: &[ValidationIssue]) -> String {
    if issues.is_empty() {
        return "No errors".to_string();
    }
    issues
        .iter()
        .map(|issue| format!("data{} {}", issue.instance_path, issue.message))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Compiles schema documents with a fixed set of options
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaCompiler {
    draft: Option<SchemaDraft>,
}

impl SchemaCompiler {
    pub fn new(draft: Option<SchemaDraft>) -> Self {
        Self { draft }
    }

    /// Compile `schema`, returning the compiler diagnostic on failure.
    ///
    /// The schema is checked against its meta-schema first, so unknown
    /// `type` names and similar mistakes are rejected here.
    pub fn compile(&self, schema: &Value) -> Result<Validator, String> {
        let compiled = match self.draft {
            Some(draft) => jsonschema::options()
                .with_draft(draft.into())
                .build(schema),
            None => jsonschema::validator_for(schema),
        };
        compiled.map_err(|error| error.to_string())
    }
}

/// Validate `instance`, collecting every issue rather than stopping at the first
pub fn validate(validator: &Validator, instance: &Value) -> Result<(), Vec<ValidationIssue>> {
    let issues: Vec<ValidationIssue> = validator
        .iter_errors(instance)
        .map(|error| ValidationIssue {
            instance_path: error.instance_path.to_string(),
            schema_path: error.schema_path.to_string(),
            message: error.to_string(),
        })
        .collect();

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn add_schema() -> Value {
        json!({
            "title": "add",
            "type": "object",
            "properties": {
                "number1": {"type": "number", "minimum": 0},
                "number2": {"type": "number", "minimum": 0}
            },
            "required": ["number1", "number2"]
        })
    }

    #[test]
    fn test_compile_valid_schema() {
        let validator = SchemaCompiler::default().compile(&add_schema()).unwrap();
        assert!(validate(&validator, &json!({"number1": 3, "number2": 4})).is_ok());
    }

    #[test]
    fn test_compile_rejects_unknown_type() {
        let result = SchemaCompiler::default().compile(&json!({
            "type": "objecte",
            "properties": {"number1": {"type": "cat"}}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_compile_with_explicit_draft() {
        let compiler = SchemaCompiler::new(Some(SchemaDraft::Draft4));
        let validator = compiler.compile(&add_schema()).unwrap();
        assert!(validate(&validator, &json!({"number1": 1, "number2": 2})).is_ok());
    }

    #[test]
    fn test_all_issues_are_collected() {
        let validator = SchemaCompiler::default().compile(&add_schema()).unwrap();
        let issues = validate(&validator, &json!({"number1": -3, "number2": -5})).unwrap_err();

        assert_eq!(issues.len(), 2);
        assert!(issues.iter().any(|issue| issue.instance_path == "/number1"));
        assert!(issues.iter().any(|issue| issue.instance_path == "/number2"));
        assert!(errors_text(&issues).starts_with("data/number"));
    }

    #[test]
    fn test_errors_text_empty() {
        assert_eq!(errors_text(&[]), "No errors");
    }
}
