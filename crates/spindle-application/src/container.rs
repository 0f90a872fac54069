//! Service resolution engine
//!
//! [`Container`] holds an immutable definition set and resolves live service
//! instances on demand. Singletons are cached per container; transient
//! definitions rebuild on every request. Concurrent `get` calls for one
//! unbuilt singleton collapse to a single construction, and a failed build
//! leaves the id unbuilt so a later call may retry.
//!
//! There is no ambient default container: every consumer receives the
//! container instance it should resolve from.

use crate::builder::Definitions;
use crate::registry::{
    ClassEntry, ConstructorRegistry, MethodFn, ResolvedArgument, ServiceInstance, TaggedService,
};
use dashmap::DashMap;
use futures::future::BoxFuture;
use serde_json::Value;
use spindle_domain::error::{Error, Result};
use spindle_domain::{Argument, ArgumentKind, Scope, ServiceDefinition};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

/// Configuration-driven dependency-injection container
///
/// ## Example
///
/// ```ignore
/// let container = Container::new(definitions, registry);
/// let app = container.get("app").await?;
/// let logger = app.downcast::<App>().unwrap().logger.clone();
/// ```
#[derive(Clone)]
pub struct Container {
    definitions: Arc<Definitions>,
    registry: Arc<ConstructorRegistry>,
    /// Singleton cells keyed by terminal service id; the cell collapses
    /// concurrent builds and stays empty when a build fails
    singletons: Arc<DashMap<String, Arc<OnceCell<ServiceInstance>>>>,
}

impl Container {
    /// Create a container over a definition set and a constructor registry
    pub fn new(definitions: Definitions, registry: ConstructorRegistry) -> Self {
        Self {
            definitions: Arc::new(definitions),
            registry: Arc::new(registry),
            singletons: Arc::new(DashMap::new()),
        }
    }

    /// Resolve a service instance, building it if not cached
    pub async fn get(&self, id: &str) -> Result<ServiceInstance> {
        self.get_traced(id, &[]).await
    }

    /// Resolve a service and downcast it to its concrete type
    pub async fn get_as<T: Send + Sync + 'static>(&self, id: &str) -> Result<Arc<T>> {
        self.get(id).await?.downcast::<T>().map_err(|_| {
            Error::internal(format!(
                "service '{id}' is not a {}",
                std::any::type_name::<T>()
            ))
        })
    }

    /// Resolve every service carrying a tag, as an ordered collection
    ///
    /// Members are ordered by ascending declared priority; services with
    /// equal priority keep declaration order. Each member is built (or
    /// reused) exactly as through [`get`](Self::get).
    pub async fn get_by_tag(&self, tag_name: &str) -> Result<Vec<TaggedService>> {
        self.get_by_tag_traced(tag_name, &[]).await
    }

    /// Eagerly build every non-lazy singleton, in declaration order
    pub async fn boot(&self) -> Result<()> {
        for definition in self.definitions.services() {
            if !definition.lazy && definition.scope == Scope::Singleton {
                self.get(&definition.id).await?;
            }
        }
        Ok(())
    }

    /// Whether an id names a known service or alias
    pub fn has(&self, id: &str) -> bool {
        self.definitions.contains(id)
    }

    /// Ids of all declared services, in declaration order
    pub fn ids(&self) -> Vec<&str> {
        self.definitions
            .services()
            .map(|definition| definition.id.as_str())
            .collect()
    }

    /// Look up a parameter by dotted path
    pub fn parameter(&self, path: &str) -> Option<&Value> {
        self.definitions.parameters().get_attribute(path)
    }

    /// The definition set this container resolves from
    pub fn definitions(&self) -> &Definitions {
        &self.definitions
    }

    /// Follow the alias chain to the terminal service definition
    ///
    /// An unresolved id anywhere in the chain fails with `ServiceNotFound`
    /// naming that id; an alias loop fails with `CircularDependency`.
    fn resolve_definition(&self, id: &str) -> Result<&ServiceDefinition> {
        let mut current = id;
        let mut trail: Vec<String> = Vec::new();
        loop {
            if let Some(definition) = self.definitions.service(current) {
                return Ok(definition);
            }
            match self.definitions.alias_target(current) {
                Some(target) => {
                    if trail.iter().any(|seen| seen.as_str() == current) {
                        trail.push(current.to_string());
                        return Err(Error::circular_dependency(trail));
                    }
                    trail.push(current.to_string());
                    current = target;
                }
                None => return Err(Error::service_not_found(current)),
            }
        }
    }

    /// Resolve with the dependency chain of the current build
    ///
    /// The chain carries every id currently under construction in this
    /// resolution; revisiting one is a circular dependency. The cycle check
    /// runs before the singleton cell is consulted, so a cycle inside one
    /// chain errors instead of awaiting its own in-flight build.
    fn get_traced<'fut>(
        &'fut self,
        id: &'fut str,
        chain: &'fut [String],
    ) -> BoxFuture<'fut, Result<ServiceInstance>> {
        Box::pin(async move {
            let definition = self.resolve_definition(id)?;
            let terminal = definition.id.as_str();

            if chain.iter().any(|entry| entry.as_str() == terminal) {
                let mut full_chain = chain.to_vec();
                full_chain.push(terminal.to_string());
                return Err(Error::circular_dependency(full_chain));
            }

            match definition.scope {
                Scope::Singleton => {
                    let cell = self
                        .singletons
                        .entry(terminal.to_string())
                        .or_insert_with(|| Arc::new(OnceCell::new()))
                        .clone();
                    let built = cell
                        .get_or_try_init(|| self.build(definition, chain))
                        .await?;
                    Ok(built.clone())
                }
                Scope::Transient => self.build(definition, chain).await,
            }
        })
    }

    fn get_by_tag_traced<'fut>(
        &'fut self,
        tag_name: &'fut str,
        chain: &'fut [String],
    ) -> BoxFuture<'fut, Result<Vec<TaggedService>>> {
        Box::pin(async move {
            let mut members: Vec<(&ServiceDefinition, &spindle_domain::Tag)> = self
                .definitions
                .services()
                .filter_map(|definition| {
                    definition
                        .tags
                        .iter()
                        .find(|tag| tag.name == tag_name)
                        .map(|tag| (definition, tag))
                })
                .collect();
            // Stable sort keeps declaration order among equal priorities
            members.sort_by_key(|(definition, tag)| (tag.priority(), definition.declaration_index));

            let mut collection = Vec::with_capacity(members.len());
            for (definition, tag) in members {
                let instance = self.get_traced(&definition.id, chain).await?;
                collection.push(TaggedService {
                    id: definition.id.clone(),
                    instance,
                    tag_data: tag.data.clone(),
                });
            }
            Ok(collection)
        })
    }

    /// Build one instance: arguments, construction, calls, configurator
    async fn build(
        &self,
        definition: &ServiceDefinition,
        chain: &[String],
    ) -> Result<ServiceInstance> {
        debug!(id = %definition.id, "building service");

        let mut chain = chain.to_vec();
        chain.push(definition.id.clone());

        let arguments = self.resolve_arguments(&definition.arguments, &chain).await?;

        let mut instance = match (&definition.class, &definition.factory) {
            (Some(class), None) => {
                let entry = self.registry.resolve(class)?;
                entry.construct(arguments).await?
            }
            (None, Some(factory)) => {
                let receiver = self.get_traced(&factory.service, &chain).await?;
                let method = self.method_of(&factory.service, &factory.method)?;
                (*method)(receiver, arguments).await?.ok_or_else(|| {
                    Error::invocation(
                        &factory.service,
                        &factory.method,
                        "factory method produced no instance",
                    )
                })?
            }
            _ => {
                return Err(Error::internal(format!(
                    "definition '{}' has no construction strategy",
                    definition.id
                )))
            }
        };

        for call in &definition.calls {
            let call_arguments = self.resolve_arguments(&call.arguments, &chain).await?;
            let method = self.own_method(definition, &call.method)?;
            if call.awaited {
                (*method)(instance.clone(), call_arguments).await?;
            } else {
                // Scheduled in declaration order; the build does not wait
                let id = definition.id.clone();
                let method_name = call.method.clone();
                let future = (*method)(instance.clone(), call_arguments);
                tokio::spawn(async move {
                    if let Err(error) = future.await {
                        warn!(id = %id, method = %method_name, %error, "service call failed");
                    }
                });
            }
        }

        if let Some(configurator) = &definition.configurator {
            let receiver = self.get_traced(&configurator.service, &chain).await?;
            let method = self.method_of(&configurator.service, &configurator.method)?;
            if let Some(replacement) = (*method)(
                receiver,
                vec![ResolvedArgument::Instance(instance.clone())],
            )
            .await?
            {
                instance = replacement;
            }
        }

        Ok(instance)
    }

    /// Resolve a list of declared arguments against this container
    async fn resolve_arguments(
        &self,
        arguments: &[Argument],
        chain: &[String],
    ) -> Result<Vec<ResolvedArgument>> {
        let mut resolved = Vec::with_capacity(arguments.len());
        for argument in arguments {
            resolved.push(self.resolve_argument(argument, chain).await?);
        }
        Ok(resolved)
    }

    async fn resolve_argument(
        &self,
        argument: &Argument,
        chain: &[String],
    ) -> Result<ResolvedArgument> {
        match argument.kind {
            ArgumentKind::Service => {
                let id = self.argument_reference(argument)?;
                if argument.options.nullable && !self.has(id) {
                    return Ok(ResolvedArgument::Literal(Value::Null));
                }
                Ok(ResolvedArgument::Instance(self.get_traced(id, chain).await?))
            }
            ArgumentKind::Parameter => {
                let path = self.argument_reference(argument)?;
                match self.definitions.parameters().get_attribute(path) {
                    Some(value) => Ok(ResolvedArgument::Literal(value.clone())),
                    None => match &argument.options.default {
                        Some(default) => Ok(ResolvedArgument::Literal(default.clone())),
                        None if argument.options.nullable => {
                            Ok(ResolvedArgument::Literal(Value::Null))
                        }
                        None => Err(Error::parameter_not_found(path)),
                    },
                }
            }
            ArgumentKind::Services => {
                let tag = self.argument_reference(argument)?;
                Ok(ResolvedArgument::Collection(
                    self.get_by_tag_traced(tag, chain).await?,
                ))
            }
            ArgumentKind::Value => Ok(ResolvedArgument::Literal(argument.value.clone())),
        }
    }

    fn argument_reference<'arg>(&self, argument: &'arg Argument) -> Result<&'arg str> {
        argument
            .reference()
            .ok_or_else(|| Error::internal("reference argument without a string value"))
    }

    /// Method table lookup on another service's class
    fn method_of(&self, id: &str, method: &str) -> Result<MethodFn> {
        let definition = self.resolve_definition(id)?;
        let entry = self.class_entry(definition)?;
        entry.method(method).ok_or_else(|| {
            Error::invocation(
                id,
                method,
                format!("class '{}' has no such method", entry.name),
            )
        })
    }

    /// Method table lookup on the definition's own class
    fn own_method(&self, definition: &ServiceDefinition, method: &str) -> Result<MethodFn> {
        let entry = self.class_entry(definition)?;
        entry.method(method).ok_or_else(|| {
            Error::invocation(
                &definition.id,
                method,
                format!("class '{}' has no such method", entry.name),
            )
        })
    }

    fn class_entry(&self, definition: &ServiceDefinition) -> Result<&ClassEntry> {
        match &definition.class {
            Some(class) => self.registry.resolve(class),
            // Factory-built instances carry no method table of their own;
            // the factory method is the place to finish initialization
            None => Err(Error::invocation(
                &definition.id,
                "<any>",
                "factory-built service has no class method table",
            )),
        }
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("services", &self.definitions.len())
            .field("aliases", &self.definitions.alias_count())
            .field("built_singletons", &self.singletons.len())
            .finish()
    }
}
