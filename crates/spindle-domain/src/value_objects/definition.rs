//! Service definition and its sub-objects

use super::argument::Argument;
use crate::constants::{DEFAULT_TAG_PRIORITY, TAG_PRIORITY_KEY};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Service lifecycle scope
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// One instance cached for the container's lifetime
    #[default]
    Singleton,
    /// A new instance on every request
    Transient,
}

/// Post-construction method invocation
///
/// Calls execute on the built instance in declaration order. An awaited call
/// completes before the next call starts; a non-awaited call is scheduled in
/// order but the build does not wait for it to finish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    /// Method name, resolved against the service's registered method table
    pub method: String,
    /// Arguments resolved and passed to the method
    #[serde(default)]
    pub arguments: Vec<Argument>,
    /// Whether the build awaits this call before the next one
    #[serde(default, rename = "await")]
    pub awaited: bool,
}

impl Call {
    /// Create an awaited call with no arguments
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            arguments: Vec::new(),
            awaited: true,
        }
    }
}

/// External finalizer invoked with the newly built instance
///
/// The configurator service's method receives the instance; a non-`None`
/// return value replaces the instance, otherwise it is kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configurator {
    /// Id of the configurator service
    pub service: String,
    /// Method invoked with the built instance
    pub method: String,
}

/// Alternate construction strategy via another service
///
/// Used in place of a constructor: the factory service's method is invoked
/// with the definition's resolved arguments and its return value becomes the
/// instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factory {
    /// Id of the factory service
    pub service: String,
    /// Method producing the instance
    pub method: String,
}

/// Named label attached to a definition enabling bulk lookup
///
/// Tag names are not unique; every service carrying a tag is visible through
/// tag lookup, ordered by ascending declared priority with declaration order
/// breaking ties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name shared by all members of the collection
    pub name: String,
    /// Opaque associative data carried alongside the membership
    #[serde(default)]
    pub data: Value,
}

impl Tag {
    /// Create a tag with no data
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: Value::Null,
        }
    }

    /// The ordering priority declared in the tag data (default 0)
    pub fn priority(&self) -> i64 {
        self.data
            .get(TAG_PRIORITY_KEY)
            .and_then(Value::as_i64)
            .unwrap_or(DEFAULT_TAG_PRIORITY)
    }
}

/// Maps one service id to another
///
/// Transparent at resolution time: resolving an alias resolves its target.
/// Targets are checked when resolved, not when loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    /// The alias id
    pub id: String,
    /// The id the alias forwards to
    pub target: String,
}

/// Value Object: Service Definition
///
/// Declarative description of how to build one service. Exactly one of
/// `class` and `factory` is set; the definition builder rejects anything
/// else at load time.
///
/// ## Example
///
/// ```rust
/// use spindle_domain::{Argument, ServiceDefinition};
///
/// let definition = ServiceDefinition::with_class("app", "App")
///     .argument(Argument::service("logger"));
/// assert_eq!(definition.id, "app");
/// assert_eq!(definition.class.as_deref(), Some("App"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDefinition {
    /// Unique service id within one container
    pub id: String,
    /// Registered constructor name for direct construction
    pub class: Option<String>,
    /// Factory construction strategy, exclusive with `class`
    pub factory: Option<Factory>,
    /// Ordered constructor arguments
    #[serde(default)]
    pub arguments: Vec<Argument>,
    /// Ordered post-construction calls
    #[serde(default)]
    pub calls: Vec<Call>,
    /// Optional external finalizer
    pub configurator: Option<Configurator>,
    /// Tags carried by this definition
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Lifecycle scope
    #[serde(default)]
    pub scope: Scope,
    /// Whether eager boot skips this definition
    #[serde(default)]
    pub lazy: bool,
    /// Position among declared services, used for deterministic ordering
    #[serde(default)]
    pub declaration_index: usize,
}

impl ServiceDefinition {
    /// Create a class-constructed definition
    pub fn with_class(id: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            class: Some(class.into()),
            factory: None,
            arguments: Vec::new(),
            calls: Vec::new(),
            configurator: None,
            tags: Vec::new(),
            scope: Scope::default(),
            lazy: false,
            declaration_index: 0,
        }
    }

    /// Create a factory-constructed definition
    pub fn with_factory(id: impl Into<String>, factory: Factory) -> Self {
        Self {
            id: id.into(),
            class: None,
            factory: Some(factory),
            arguments: Vec::new(),
            calls: Vec::new(),
            configurator: None,
            tags: Vec::new(),
            scope: Scope::default(),
            lazy: false,
            declaration_index: 0,
        }
    }

    /// Append a constructor argument
    pub fn argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Append a post-construction call
    pub fn call(mut self, call: Call) -> Self {
        self.calls.push(call);
        self
    }

    /// Attach a tag
    pub fn tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    /// Set the lifecycle scope
    pub fn scoped(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Whether this definition carries the named tag
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|tag| tag.name == name)
    }
}
