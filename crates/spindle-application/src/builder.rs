//! Validated tree to typed definitions
//!
//! [`DefinitionBuilder`] converts the merged, schema-validated configuration
//! tree into the immutable [`Definitions`] set the container resolves from.
//! Shape inference follows the reserved argument keys: `{service: id}`,
//! `{parameter: path}`, `{services: tag}`, anything else a literal. Unknown
//! or malformed shapes fail here, at load time, with the file and
//! configuration path of the faulty declaration.

use serde_json::{Map, Value};
use spindle_domain::constants::{
    ALIASES_KEY, CLASS_KEY, FACTORY_KEY, PARAMETERS_KEY, PARAMETER_REF_KEY, SERVICES_KEY,
    SERVICES_REF_KEY, SERVICE_REF_KEY,
};
use spindle_domain::error::{Error, Result};
use spindle_domain::{
    Argument, ArgumentKind, ArgumentOptions, Call, Configurator, Context, Factory, Scope,
    ServiceDefinition, Tag,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Keys accepted inside one service declaration
const SERVICE_KEYS: &[&str] = &[
    "class",
    "factory",
    "arguments",
    "calls",
    "configurator",
    "tags",
    "scope",
    "lazy",
];

/// Immutable definition set produced by the load phase
///
/// Holds every service definition in declaration order, the alias map, and
/// the parameter bag. Nothing here mutates after construction; the container
/// only reads.
#[derive(Debug, Clone, Default)]
pub struct Definitions {
    services: Vec<ServiceDefinition>,
    index: HashMap<String, usize>,
    aliases: HashMap<String, String>,
    parameters: Context,
}

impl Definitions {
    /// Look up a service definition by id
    pub fn service(&self, id: &str) -> Option<&ServiceDefinition> {
        self.index.get(id).map(|position| &self.services[*position])
    }

    /// Look up an alias target by alias id
    pub fn alias_target(&self, id: &str) -> Option<&str> {
        self.aliases.get(id).map(String::as_str)
    }

    /// Whether an id names a service or an alias
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id) || self.aliases.contains_key(id)
    }

    /// Iterate service definitions in declaration order
    pub fn services(&self) -> impl Iterator<Item = &ServiceDefinition> {
        self.services.iter()
    }

    /// The parameter bag
    pub fn parameters(&self) -> &Context {
        &self.parameters
    }

    /// Number of service definitions
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Whether no services are defined
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Number of aliases
    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }
}

/// Converts a validated configuration tree into [`Definitions`]
///
/// The builder is stateless apart from the source file recorded for error
/// reporting.
///
/// ## Example
///
/// ```ignore
/// let tree = loader.load(Path::new("app.yml")).await?;
/// let definitions = DefinitionBuilder::new().build(&tree)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct DefinitionBuilder {
    source_file: Option<PathBuf>,
}

impl DefinitionBuilder {
    /// Create a builder with no source file attribution
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the file errors should point at
    pub fn with_source_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.source_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Build the definition set from a merged configuration tree
    pub fn build(&self, tree: &Value) -> Result<Definitions> {
        let mut definitions = Definitions::default();

        if let Some(services) = tree.get(SERVICES_KEY) {
            let services = self.expect_object(services, SERVICES_KEY)?;
            for (declaration_index, (id, raw)) in services.iter().enumerate() {
                let definition = self.build_service(id, raw, declaration_index)?;
                if definitions.index.insert(id.clone(), definitions.services.len()).is_some() {
                    return Err(self.error(format!("duplicate service id '{id}'"), format!("services.{id}")));
                }
                definitions.services.push(definition);
            }
        }

        if let Some(aliases) = tree.get(ALIASES_KEY) {
            let aliases = self.expect_object(aliases, ALIASES_KEY)?;
            for (id, target) in aliases {
                let target = target.as_str().ok_or_else(|| {
                    self.error(
                        format!("alias '{id}' target must be a string"),
                        format!("aliases.{id}"),
                    )
                })?;
                if definitions.index.contains_key(id) || definitions.aliases.contains_key(id) {
                    return Err(self.error(format!("duplicate service id '{id}'"), format!("aliases.{id}")));
                }
                definitions.aliases.insert(id.clone(), target.to_string());
            }
        }

        if let Some(parameters) = tree.get(PARAMETERS_KEY) {
            self.expect_object(parameters, PARAMETERS_KEY)?;
            definitions.parameters = Context::from_attributes(parameters.clone(), Value::Null);
        }

        Ok(definitions)
    }

    /// Build one service definition
    fn build_service(
        &self,
        id: &str,
        raw: &Value,
        declaration_index: usize,
    ) -> Result<ServiceDefinition> {
        let path = format!("services.{id}");
        let raw = raw
            .as_object()
            .ok_or_else(|| self.error(format!("service '{id}' must be a mapping"), &path))?;

        for key in raw.keys() {
            if !SERVICE_KEYS.contains(&key.as_str()) {
                return Err(self.error(format!("unknown key '{key}'"), format!("{path}.{key}")));
            }
        }

        let class = match raw.get(CLASS_KEY) {
            Some(value) => Some(
                value
                    .as_str()
                    .ok_or_else(|| self.error("'class' must be a string", format!("{path}.class")))?
                    .to_string(),
            ),
            None => None,
        };
        let factory = match raw.get(FACTORY_KEY) {
            Some(value) => Some(self.build_service_method(value, &format!("{path}.factory"))?),
            None => None,
        };
        match (&class, &factory) {
            (Some(_), Some(_)) => {
                return Err(self.error("'class' and 'factory' are mutually exclusive", &path))
            }
            (None, None) => {
                return Err(self.error("one of 'class' or 'factory' is required", &path))
            }
            _ => {}
        }

        let mut definition = ServiceDefinition {
            id: id.to_string(),
            class,
            factory: factory.map(|method| Factory {
                service: method.0,
                method: method.1,
            }),
            arguments: Vec::new(),
            calls: Vec::new(),
            configurator: None,
            tags: Vec::new(),
            scope: Scope::default(),
            lazy: false,
            declaration_index,
        };

        if let Some(arguments) = raw.get("arguments") {
            let arguments = arguments.as_array().ok_or_else(|| {
                self.error("'arguments' must be an array", format!("{path}.arguments"))
            })?;
            for (position, raw_argument) in arguments.iter().enumerate() {
                definition.arguments.push(
                    self.build_argument(raw_argument, &format!("{path}.arguments[{position}]"))?,
                );
            }
        }

        if let Some(calls) = raw.get("calls") {
            let calls = calls
                .as_array()
                .ok_or_else(|| self.error("'calls' must be an array", format!("{path}.calls")))?;
            for (position, raw_call) in calls.iter().enumerate() {
                definition
                    .calls
                    .push(self.build_call(raw_call, &format!("{path}.calls[{position}]"))?);
            }
        }

        if let Some(configurator) = raw.get("configurator") {
            let (service, method) =
                self.build_service_method(configurator, &format!("{path}.configurator"))?;
            definition.configurator = Some(Configurator { service, method });
        }

        if let Some(tags) = raw.get("tags") {
            let tags = tags
                .as_array()
                .ok_or_else(|| self.error("'tags' must be an array", format!("{path}.tags")))?;
            for (position, raw_tag) in tags.iter().enumerate() {
                definition
                    .tags
                    .push(self.build_tag(raw_tag, &format!("{path}.tags[{position}]"))?);
            }
        }

        if let Some(scope) = raw.get("scope") {
            definition.scope = serde_json::from_value(scope.clone()).map_err(|_| {
                self.error(
                    "'scope' must be 'singleton' or 'transient'",
                    format!("{path}.scope"),
                )
            })?;
        }

        if let Some(lazy) = raw.get("lazy") {
            definition.lazy = lazy
                .as_bool()
                .ok_or_else(|| self.error("'lazy' must be a boolean", format!("{path}.lazy")))?;
        }

        Ok(definition)
    }

    /// Infer an argument from its raw shape
    fn build_argument(&self, raw: &Value, path: &str) -> Result<Argument> {
        let object = match raw.as_object() {
            Some(object) => object,
            None => return Ok(Argument::value(raw.clone())),
        };

        let reference = [
            (SERVICE_REF_KEY, ArgumentKind::Service),
            (PARAMETER_REF_KEY, ArgumentKind::Parameter),
            (SERVICES_REF_KEY, ArgumentKind::Services),
        ]
        .into_iter()
        .find(|(key, _)| object.contains_key(*key));

        let (key, kind) = match reference {
            Some(found) => found,
            // No reference key: the whole object is a literal
            None => return Ok(Argument::value(raw.clone())),
        };

        let value = object.get(key).and_then(Value::as_str).ok_or_else(|| {
            self.error(format!("'{key}' reference must be a string"), path)
        })?;
        let options = self.build_argument_options(object, key, path)?;

        Ok(Argument {
            kind,
            value: Value::String(value.to_string()),
            options,
        })
    }

    /// Collect the option keys attached to a reference argument
    fn build_argument_options(
        &self,
        object: &Map<String, Value>,
        reference_key: &str,
        path: &str,
    ) -> Result<ArgumentOptions> {
        let mut options = ArgumentOptions::default();
        for (key, value) in object {
            match key.as_str() {
                key if key == reference_key => {}
                "nullable" => {
                    options.nullable = value.as_bool().ok_or_else(|| {
                        self.error("'nullable' must be a boolean", path)
                    })?;
                }
                "default" => options.default = Some(value.clone()),
                other => {
                    return Err(self.error(
                        format!("unknown key '{other}' in '{reference_key}' reference"),
                        path,
                    ))
                }
            }
        }
        Ok(options)
    }

    /// Build a post-construction call
    fn build_call(&self, raw: &Value, path: &str) -> Result<Call> {
        let object = raw
            .as_object()
            .ok_or_else(|| self.error("call must be a mapping", path))?;
        let method = object
            .get("method")
            .and_then(Value::as_str)
            .ok_or_else(|| self.error("call requires a string 'method'", path))?;

        let mut arguments = Vec::new();
        if let Some(raw_arguments) = object.get("arguments") {
            let raw_arguments = raw_arguments
                .as_array()
                .ok_or_else(|| self.error("call 'arguments' must be an array", path))?;
            for (position, raw_argument) in raw_arguments.iter().enumerate() {
                arguments
                    .push(self.build_argument(raw_argument, &format!("{path}.arguments[{position}]"))?);
            }
        }

        let awaited = match object.get("await") {
            Some(value) => value
                .as_bool()
                .ok_or_else(|| self.error("call 'await' must be a boolean", path))?,
            None => false,
        };

        for key in object.keys() {
            if !matches!(key.as_str(), "method" | "arguments" | "await") {
                return Err(self.error(format!("unknown key '{key}' in call"), path));
            }
        }

        Ok(Call {
            method: method.to_string(),
            arguments,
            awaited,
        })
    }

    /// Build a `{service, method}` pair (factory or configurator)
    fn build_service_method(&self, raw: &Value, path: &str) -> Result<(String, String)> {
        let object = raw
            .as_object()
            .ok_or_else(|| self.error("expected a {service, method} mapping", path))?;
        let service = object
            .get("service")
            .and_then(Value::as_str)
            .ok_or_else(|| self.error("requires a string 'service'", path))?;
        let method = object
            .get("method")
            .and_then(Value::as_str)
            .ok_or_else(|| self.error("requires a string 'method'", path))?;
        for key in object.keys() {
            if !matches!(key.as_str(), "service" | "method") {
                return Err(self.error(format!("unknown key '{key}'"), path));
            }
        }
        Ok((service.to_string(), method.to_string()))
    }

    /// Build a tag; every key except `name` is carried as tag data
    fn build_tag(&self, raw: &Value, path: &str) -> Result<Tag> {
        let object = raw
            .as_object()
            .ok_or_else(|| self.error("tag must be a mapping", path))?;
        let name = object
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| self.error("tag requires a string 'name'", path))?;

        let mut data = Map::new();
        for (key, value) in object {
            if key != "name" {
                data.insert(key.clone(), value.clone());
            }
        }

        Ok(Tag {
            name: name.to_string(),
            data: if data.is_empty() {
                Value::Null
            } else {
                Value::Object(data)
            },
        })
    }

    fn expect_object<'tree>(
        &self,
        value: &'tree Value,
        key: &str,
    ) -> Result<&'tree Map<String, Value>> {
        value
            .as_object()
            .ok_or_else(|| self.error(format!("'{key}' must be a mapping"), key))
    }

    fn error<M: Into<String>, P: Into<String>>(&self, message: M, path: P) -> Error {
        Error::configuration_at(message, self.source_file.clone(), path)
    }
}
