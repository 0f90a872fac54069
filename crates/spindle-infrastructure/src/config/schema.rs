//! JSON-schema validation of merged trees
//!
//! [`SchemaValidator`] compiles a schema document once and validates trees
//! against it. All violations are collected, but the surfaced error is built
//! from the **last** collected violation only: a documented contract of
//! this validator, relied on by callers that want the deepest recorded
//! failure, not the first.

use jsonschema::JSONSchema;
use serde_json::{json, Value};
use spindle_domain::error::{Error, Result};
use std::path::Path;
use std::sync::Arc;

/// Compiled schema with Spindle's validation contract
#[derive(Clone)]
pub struct SchemaValidator {
    schema: Arc<JSONSchema>,
}

impl SchemaValidator {
    /// Compile a schema document
    pub fn compile(document: &Value) -> Result<Self> {
        let schema = JSONSchema::compile(document)
            .map_err(|error| Error::configuration(format!("invalid schema: {error}")))?;
        Ok(Self {
            schema: Arc::new(schema),
        })
    }

    /// Validator for the `imports` section
    pub fn for_imports() -> Result<Self> {
        Self::compile(&imports_schema())
    }

    /// Validator for a full configuration document
    /// (services / parameters / aliases / imports)
    pub fn for_services() -> Result<Self> {
        Self::compile(&services_schema())
    }

    /// Validate a tree
    ///
    /// # Returns
    /// * `Ok(())` - No violations
    /// * `Err(Error::Schema)` - Built from the last collected violation,
    ///   carrying the originating file and the violation's data path
    pub fn validate(&self, tree: &Value, file: Option<&Path>) -> Result<()> {
        let violations: Vec<(String, String)> = match self.schema.validate(tree) {
            Ok(()) => return Ok(()),
            Err(errors) => errors
                .map(|violation| (violation.instance_path.to_string(), violation.to_string()))
                .collect(),
        };

        let (data_path, message) = violations
            .into_iter()
            .last()
            .unwrap_or_else(|| (String::new(), "schema validation failed".to_string()));
        Err(Error::schema(
            file.map(Path::to_path_buf),
            if data_path.is_empty() { "/".to_string() } else { data_path },
            message,
        ))
    }
}

impl std::fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaValidator").finish_non_exhaustive()
    }
}

/// Schema for the `imports` array: bare path strings or
/// `{path, query?, merge?}` objects
pub fn imports_schema() -> Value {
    json!({
        "type": "array",
        "items": {
            "oneOf": [
                {"type": "string", "minLength": 1},
                {
                    "type": "object",
                    "properties": {
                        "path": {"type": "string", "minLength": 1},
                        "query": {},
                        "merge": {"enum": ["root", "filename"]}
                    },
                    "required": ["path"],
                    "additionalProperties": false
                }
            ]
        }
    })
}

/// Schema for a full configuration document
///
/// Top-level keys other than the reserved ones are allowed: consumers keep
/// their own sections next to the service definitions.
pub fn services_schema() -> Value {
    let service_method = json!({
        "type": "object",
        "properties": {
            "service": {"type": "string", "minLength": 1},
            "method": {"type": "string", "minLength": 1}
        },
        "required": ["service", "method"],
        "additionalProperties": false
    });

    json!({
        "type": "object",
        "properties": {
            "imports": imports_schema(),
            "services": {
                "type": "object",
                "additionalProperties": {
                    "type": "object",
                    "properties": {
                        "class": {"type": "string", "minLength": 1},
                        "factory": service_method.clone(),
                        "arguments": {"type": "array"},
                        "calls": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "method": {"type": "string", "minLength": 1},
                                    "arguments": {"type": "array"},
                                    "await": {"type": "boolean"}
                                },
                                "required": ["method"],
                                "additionalProperties": false
                            }
                        },
                        "configurator": service_method,
                        "tags": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {"name": {"type": "string", "minLength": 1}},
                                "required": ["name"]
                            }
                        },
                        "scope": {"enum": ["singleton", "transient"]},
                        "lazy": {"type": "boolean"}
                    },
                    "additionalProperties": false
                }
            },
            "parameters": {"type": "object"},
            "aliases": {
                "type": "object",
                "additionalProperties": {"type": "string", "minLength": 1}
            }
        }
    })
}
