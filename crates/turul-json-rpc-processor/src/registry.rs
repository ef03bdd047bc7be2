//! Method catalog: method name → compiled parameter validator
//!
//! Registration is applied per method. One schema failing to compile never
//! prevents the others in the same batch from being registered.

use std::collections::HashMap;

use jsonschema::Validator;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::config::RecompilePolicy;
use crate::error::ProcessorError;
use crate::schema::{self, SchemaCompiler, ValidationIssue};

/// Registry record pairing a method's parameter schema with its validator
#[derive(Debug)]
pub struct MethodDescriptor {
    name: String,
    param_schema: Value,
    validator: Validator,
}

impl MethodDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn param_schema(&self) -> &Value {
        &self.param_schema
    }

    pub fn validate(&self, params: &Value) -> Result<(), Vec<ValidationIssue>> {
        schema::validate(&self.validator, params)
    }

    pub fn is_valid(&self, params: &Value) -> bool {
        self.validator.is_valid(params)
    }
}

/// A method whose schema was rejected during a batch registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationFailure {
    pub method: String,
    pub diagnostic: String,
}

/// Outcome of [`SchemaRegistry::register_batch`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationReport {
    pub registered: Vec<String>,
    pub failed: Vec<RegistrationFailure>,
}

impl RegistrationReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug)]
pub struct SchemaRegistry {
    methods: HashMap<String, MethodDescriptor>,
    compiler: SchemaCompiler,
    policy: RecompilePolicy,
}

impl SchemaRegistry {
    pub fn new(compiler: SchemaCompiler, policy: RecompilePolicy) -> Self {
        Self {
            methods: HashMap::new(),
            compiler,
            policy,
        }
    }

    /// Compile `param_schema` and store it under `method`.
    ///
    /// On failure the error is logged and returned; under
    /// [`RecompilePolicy::DeleteOnFailure`] any existing descriptor for the
    /// same name is removed as well.
    pub fn register(&mut self, method: &str, param_schema: Value) -> Result<(), ProcessorError> {
        match self.compiler.compile(&param_schema) {
            Ok(validator) => {
                debug!("Registered schema for method: {}", method);
                self.methods.insert(
                    method.to_string(),
                    MethodDescriptor {
                        name: method.to_string(),
                        param_schema,
                        validator,
                    },
                );
                Ok(())
            }
            Err(diagnostic) => Err(self.reject(method, diagnostic)),
        }
    }

    /// Register every entry of a `{ name: { "request": schema } }` mapping.
    ///
    /// A mapping that is not a JSON object is rejected as a whole and nothing
    /// is registered.
    pub fn register_batch(&mut self, mapping: &Value) -> Result<RegistrationReport, ProcessorError> {
        let Some(entries) = mapping.as_object() else {
            warn!("{}", ProcessorError::InvalidMethodsShape);
            return Err(ProcessorError::InvalidMethodsShape);
        };

        let mut report = RegistrationReport::default();
        for (method, entry) in entries {
            let outcome = match entry.get("request") {
                Some(param_schema) => self.register(method, param_schema.clone()),
                None => Err(self.reject(method, "descriptor has no request schema".to_string())),
            };
            match outcome {
                Ok(()) => report.registered.push(method.clone()),
                Err(ProcessorError::SchemaCompilation { method, diagnostic }) => {
                    report.failed.push(RegistrationFailure { method, diagnostic })
                }
                Err(other) => return Err(other),
            }
        }
        Ok(report)
    }

    fn reject(&mut self, method: &str, diagnostic: String) -> ProcessorError {
        error!(
            method = %method,
            diagnostic = %diagnostic,
            "json-rpc-processor error: Can't compile schema for method {}, ignoring this method",
            method
        );
        if self.policy == RecompilePolicy::DeleteOnFailure && self.methods.remove(method).is_some() {
            warn!("Removed previously registered method: {}", method);
        }
        ProcessorError::SchemaCompilation {
            method: method.to_string(),
            diagnostic,
        }
    }

    pub fn lookup(&self, method: &str) -> Option<&MethodDescriptor> {
        self.methods.get(method)
    }

    pub fn unregister(&mut self, method: &str) -> Option<MethodDescriptor> {
        self.methods.remove(method)
    }

    pub fn clear(&mut self) {
        self.methods.clear();
    }

    /// Get all registered methods
    pub fn registered_methods(&self) -> Vec<String> {
        let mut names: Vec<String> = self.methods.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    pub fn policy(&self) -> RecompilePolicy {
        self.policy
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new(SchemaCompiler::default(), RecompilePolicy::default())
    }
}
