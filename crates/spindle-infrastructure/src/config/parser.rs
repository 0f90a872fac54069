//! Format parsers and their registry
//!
//! Each parser decodes one configuration format into a `serde_json::Value`
//! tree. The registry scans its parsers in registration order and uses the
//! first whose `supports` predicate matches the file extension; registration
//! order is the tie-break.
//!
//! Parsers that execute code from the document (`executes_code() == true`)
//! are rejected at registration unless the registry was explicitly built
//! with [`allow_code_execution`](ParserRegistry::allow_code_execution).
//! That trust boundary is opt-in per deployment, never the default.

use serde_json::{Map, Value};
use spindle_domain::error::{Error, Result};
use spindle_domain::ports::ConfigParser;
use std::path::Path;
use std::sync::Arc;

/// YAML parser (`.yml`, `.yaml`)
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlParser;

impl ConfigParser for YamlParser {
    fn name(&self) -> &'static str {
        "yaml"
    }

    fn supports(&self, extension: &str) -> bool {
        matches!(extension, "yml" | "yaml")
    }

    fn parse(&self, content: &[u8]) -> Result<Value> {
        if is_blank(content) {
            return Ok(Value::Object(Map::new()));
        }
        serde_yaml::from_slice(content)
            .map_err(|source| Error::parse_with_source("<yaml>", "invalid YAML document", source))
    }
}

/// JSON parser (`.json`)
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl ConfigParser for JsonParser {
    fn name(&self) -> &'static str {
        "json"
    }

    fn supports(&self, extension: &str) -> bool {
        extension == "json"
    }

    fn parse(&self, content: &[u8]) -> Result<Value> {
        serde_json::from_slice(content)
            .map_err(|source| Error::parse_with_source("<json>", "invalid JSON document", source))
    }
}

/// TOML parser (`.toml`)
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlParser;

impl ConfigParser for TomlParser {
    fn name(&self) -> &'static str {
        "toml"
    }

    fn supports(&self, extension: &str) -> bool {
        extension == "toml"
    }

    fn parse(&self, content: &[u8]) -> Result<Value> {
        let text = std::str::from_utf8(content)
            .map_err(|source| Error::parse_with_source("<toml>", "document is not UTF-8", source))?;
        toml::from_str(text)
            .map_err(|source| Error::parse_with_source("<toml>", "invalid TOML document", source))
    }
}

fn is_blank(content: &[u8]) -> bool {
    content.iter().all(u8::is_ascii_whitespace)
}

/// Ordered, first-match parser registry
///
/// ## Example
///
/// ```ignore
/// let registry = ParserRegistry::default();          // YAML, JSON, TOML
/// let tree = registry.parse_file(&file_info, &content)?;
/// ```
#[derive(Clone)]
pub struct ParserRegistry {
    parsers: Vec<Arc<dyn ConfigParser>>,
    code_execution_allowed: bool,
}

impl ParserRegistry {
    /// Create an empty registry with code execution disallowed
    pub fn new() -> Self {
        Self {
            parsers: Vec::new(),
            code_execution_allowed: false,
        }
    }

    /// Opt in (or out) of code-executing parsers
    ///
    /// Only registrations made after the call see the new setting; built-in
    /// parsers are unaffected either way.
    pub fn allow_code_execution(mut self, allow: bool) -> Self {
        self.code_execution_allowed = allow;
        self
    }

    /// Register a parser at the end of the scan order
    ///
    /// # Returns
    /// * `Ok(())` - Parser registered
    /// * `Err(Error::Configuration)` - Parser executes code and the registry
    ///   was not built with the capability enabled
    pub fn register(&mut self, parser: Arc<dyn ConfigParser>) -> Result<()> {
        if parser.executes_code() && !self.code_execution_allowed {
            return Err(Error::configuration(format!(
                "parser '{}' executes configuration code; enable it explicitly with allow_code_execution(true)",
                parser.name()
            )));
        }
        self.parsers.push(parser);
        Ok(())
    }

    /// First registered parser supporting the extension (case-insensitive)
    pub fn find(&self, extension: &str) -> Option<&Arc<dyn ConfigParser>> {
        let extension = extension.to_ascii_lowercase();
        self.parsers.iter().find(|parser| parser.supports(&extension))
    }

    /// Parse raw content for a file, selecting the parser by extension
    pub fn parse(&self, path: &Path, extension: &str, content: &[u8]) -> Result<Value> {
        let parser = self.find(extension).ok_or_else(|| {
            Error::unsupported_format(extension, Some(path.to_path_buf()))
        })?;
        parser.parse(content).map_err(|error| match error {
            // Attribute parse failures to the real file
            Error::Parse { message, source, .. } => Error::Parse {
                file: path.display().to_string(),
                message,
                source,
            },
            other => other,
        })
    }

    /// Names of the registered parsers, in scan order
    pub fn names(&self) -> Vec<&'static str> {
        self.parsers.iter().map(|parser| parser.name()).collect()
    }
}

impl Default for ParserRegistry {
    /// Registry with the built-in YAML, JSON, and TOML parsers
    fn default() -> Self {
        let mut registry = Self::new();
        // Built-ins never execute code; registration cannot fail
        let _ = registry.register(Arc::new(YamlParser));
        let _ = registry.register(Arc::new(JsonParser));
        let _ = registry.register(Arc::new(TomlParser));
        registry
    }
}

impl std::fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserRegistry")
            .field("parsers", &self.names())
            .field("code_execution_allowed", &self.code_execution_allowed)
            .finish()
    }
}
