//! Constructor and call argument shapes

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What an [`Argument`] refers to
///
/// Resolution semantics depend on the kind:
///
/// - `Service`: the value is a service id, resolved recursively
/// - `Parameter`: the value is a dotted parameter path
/// - `Services`: the value is a tag name, resolved to an ordered collection
/// - `Value`: the value is passed through as a literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgumentKind {
    /// Reference to another service by id
    Service,
    /// Reference to a parameter by dotted path
    Parameter,
    /// Reference to every service carrying a tag
    Services,
    /// Literal value passed through unchanged
    Value,
}

/// Options bag attached to an argument
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArgumentOptions {
    /// Whether a missing reference resolves to null instead of failing
    #[serde(default)]
    pub nullable: bool,
    /// Default used when a parameter path is absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

/// Value Object: Typed Constructor Argument
///
/// A typed reference (to a service, parameter, tag collection, or literal)
/// used when constructing a service or invoking a method on it.
///
/// ## Example
///
/// ```rust
/// use spindle_domain::{Argument, ArgumentKind};
/// use serde_json::json;
///
/// let arg = Argument::service("logger");
/// assert_eq!(arg.kind, ArgumentKind::Service);
/// assert_eq!(arg.value, json!("logger"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    /// What this argument refers to
    pub kind: ArgumentKind,
    /// Service id, parameter path, tag name, or literal value
    pub value: Value,
    /// Resolution options
    #[serde(default)]
    pub options: ArgumentOptions,
}

impl Argument {
    /// Create a service-reference argument
    pub fn service(id: impl Into<String>) -> Self {
        Self {
            kind: ArgumentKind::Service,
            value: Value::String(id.into()),
            options: ArgumentOptions::default(),
        }
    }

    /// Create a parameter-reference argument
    pub fn parameter(path: impl Into<String>) -> Self {
        Self {
            kind: ArgumentKind::Parameter,
            value: Value::String(path.into()),
            options: ArgumentOptions::default(),
        }
    }

    /// Create a tag-collection argument
    pub fn services(tag: impl Into<String>) -> Self {
        Self {
            kind: ArgumentKind::Services,
            value: Value::String(tag.into()),
            options: ArgumentOptions::default(),
        }
    }

    /// Create a literal argument
    pub fn value(literal: Value) -> Self {
        Self {
            kind: ArgumentKind::Value,
            value: literal,
            options: ArgumentOptions::default(),
        }
    }

    /// Attach a default for parameter resolution
    pub fn with_default(mut self, default: Value) -> Self {
        self.options.default = Some(default);
        self
    }

    /// Mark the argument nullable
    pub fn nullable(mut self) -> Self {
        self.options.nullable = true;
        self
    }

    /// The referenced name, for reference-kind arguments
    pub fn reference(&self) -> Option<&str> {
        match self.kind {
            ArgumentKind::Value => None,
            _ => self.value.as_str(),
        }
    }
}
