//! Path-addressable attribute store
//!
//! [`Context`] is the generic key/value state object used both during
//! resolution (holding process-wide configuration parameters) and by
//! consumers needing request-scoped state. Attributes are addressed by
//! dotted paths (`"framework.http.port"`); intermediate objects are created
//! on write as needed.
//!
//! Per-feature accessor behavior ("get current route", "get authenticated
//! user") belongs in capability objects composed *around* a `Context` at the
//! call site; `Context` itself exposes only the attribute-store contract.

use crate::constants::PATH_SEPARATOR;
use serde_json::{Map, Value};

/// Ordered, dotted-path-addressable attribute store
///
/// Attributes live in a JSON object tree and preserve insertion order.
/// The options snapshot passed at construction is immutable for the
/// context's lifetime.
///
/// ## Example
///
/// ```rust
/// use spindle_domain::Context;
/// use serde_json::json;
///
/// let mut ctx = Context::new(json!({"debug": true}));
/// ctx.set_attribute("http.port", json!(8080));
///
/// assert!(ctx.has_attribute("http.port"));
/// assert_eq!(ctx.get_attribute("http.port"), Some(&json!(8080)));
/// assert_eq!(ctx.options()["debug"], json!(true));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Attribute tree (always a JSON object at the root)
    attributes: Map<String, Value>,
    /// Options snapshot captured at construction
    options: Value,
}

impl Context {
    /// Create a context with the given immutable options snapshot
    pub fn new(options: Value) -> Self {
        Self {
            attributes: Map::new(),
            options,
        }
    }

    /// Create a context pre-populated from a JSON object of attributes
    ///
    /// Top-level keys containing the path separator are expanded into
    /// nested objects, so `{"a.b": 1}` becomes addressable as `"a.b"`.
    /// Non-object values make the context start empty.
    pub fn from_attributes(attributes: Value, options: Value) -> Self {
        let mut context = Self::new(options);
        if let Value::Object(map) = attributes {
            for (key, value) in map {
                context.set_attribute(&key, value);
            }
        }
        context
    }

    /// The immutable options snapshot captured at construction
    pub fn options(&self) -> &Value {
        &self.options
    }

    /// Whether an attribute exists at the given dotted path
    pub fn has_attribute(&self, path: &str) -> bool {
        self.get_attribute(path).is_some()
    }

    /// Get the attribute at the given dotted path
    pub fn get_attribute(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split(PATH_SEPARATOR);
        let first = segments.next()?;
        let mut current = self.attributes.get(first)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Get the attribute at the given path, or a default when absent
    pub fn get_attribute_or<'a>(&'a self, path: &str, default: &'a Value) -> &'a Value {
        self.get_attribute(path).unwrap_or(default)
    }

    /// Set the attribute at the given dotted path
    ///
    /// Intermediate objects are created as needed; a non-object value on the
    /// way is replaced by an object so the write always succeeds.
    pub fn set_attribute(&mut self, path: &str, value: Value) {
        let mut segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
        let last = match segments.pop() {
            Some(last) => last,
            None => return,
        };

        let mut current = &mut self.attributes;
        for segment in segments {
            let slot = current
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            current = slot.as_object_mut().expect("slot was just made an object");
        }
        current.insert(last.to_string(), value);
    }

    /// Iterate over the top-level attribute entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.attributes.iter()
    }

    /// Whether the context holds no attributes
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}
