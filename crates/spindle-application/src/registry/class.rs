//! Class entries and the registry holding them

use futures::future::BoxFuture;
use serde_json::Value;
use spindle_domain::error::{Error, Result};
use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

/// A live service held by the container
///
/// Instances are type-erased; consumers downcast to the concrete type they
/// registered. Mutability past construction is the consumer's concern
/// (interior mutability in the registered type).
pub type ServiceInstance = Arc<dyn Any + Send + Sync>;

/// Wrap a concrete value into a [`ServiceInstance`]
pub fn instance<T: Send + Sync + 'static>(value: T) -> ServiceInstance {
    Arc::new(value)
}

/// One member of a tag collection
#[derive(Clone)]
pub struct TaggedService {
    /// Id of the member service
    pub id: String,
    /// The built (or cached) instance
    pub instance: ServiceInstance,
    /// The tag's associative data as declared
    pub tag_data: Value,
}

impl std::fmt::Debug for TaggedService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaggedService")
            .field("id", &self.id)
            .field("tag_data", &self.tag_data)
            .finish_non_exhaustive()
    }
}

/// A fully resolved constructor or method argument
///
/// Produced by the container according to the argument's declared kind;
/// constructors and methods receive these in declaration order.
#[derive(Clone)]
pub enum ResolvedArgument {
    /// A resolved service reference
    Instance(ServiceInstance),
    /// A literal or parameter value
    Literal(Value),
    /// An ordered tag collection
    Collection(Vec<TaggedService>),
}

impl ResolvedArgument {
    /// The instance, when this argument is a service reference
    pub fn as_instance(&self) -> Option<&ServiceInstance> {
        match self {
            Self::Instance(instance) => Some(instance),
            _ => None,
        }
    }

    /// Downcast a service-reference argument to its concrete type
    pub fn downcast<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.as_instance()
            .and_then(|instance| instance.clone().downcast::<T>().ok())
    }

    /// The value, when this argument is a literal
    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            Self::Literal(value) => Some(value),
            _ => None,
        }
    }

    /// The members, when this argument is a tag collection
    pub fn as_collection(&self) -> Option<&[TaggedService]> {
        match self {
            Self::Collection(members) => Some(members),
            _ => None,
        }
    }
}

impl std::fmt::Debug for ResolvedArgument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Instance(_) => f.write_str("Instance(..)"),
            Self::Literal(value) => write!(f, "Literal({value})"),
            Self::Collection(members) => write!(f, "Collection(len={})", members.len()),
        }
    }
}

/// Async constructor over resolved arguments
pub type ConstructorFn =
    Arc<dyn Fn(Vec<ResolvedArgument>) -> BoxFuture<'static, Result<ServiceInstance>> + Send + Sync>;

/// Async method over a receiver instance and resolved arguments
///
/// Used for post-construction calls, factory methods, and configurator
/// methods. A non-`None` return value replaces the instance where the
/// invocation site allows it (factory and configurator).
pub type MethodFn = Arc<
    dyn Fn(ServiceInstance, Vec<ResolvedArgument>) -> BoxFuture<'static, Result<Option<ServiceInstance>>>
        + Send
        + Sync,
>;

/// Registry entry for one constructible class
///
/// Carries the constructor and a method table. Methods are what `calls`,
/// `factory`, and `configurator` declarations dispatch to.
#[derive(Clone)]
pub struct ClassEntry {
    /// Unique class name referenced from configuration
    pub name: String,
    /// Human-readable description
    pub description: String,
    constructor: ConstructorFn,
    methods: HashMap<String, MethodFn>,
}

impl ClassEntry {
    /// Create an entry from a name, description, and async constructor
    pub fn new<N, D, F, Fut>(name: N, description: D, constructor: F) -> Self
    where
        N: Into<String>,
        D: Into<String>,
        F: Fn(Vec<ResolvedArgument>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ServiceInstance>> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            constructor: Arc::new(move |args| -> BoxFuture<'static, Result<ServiceInstance>> {
                Box::pin(constructor(args))
            }),
            methods: HashMap::new(),
        }
    }

    /// Attach a named async method
    pub fn with_method<N, F, Fut>(mut self, name: N, method: F) -> Self
    where
        N: Into<String>,
        F: Fn(ServiceInstance, Vec<ResolvedArgument>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<ServiceInstance>>> + Send + 'static,
    {
        self.methods.insert(
            name.into(),
            Arc::new(
                move |receiver, args| -> BoxFuture<'static, Result<Option<ServiceInstance>>> {
                    Box::pin(method(receiver, args))
                },
            ),
        );
        self
    }

    /// Run the constructor with resolved arguments
    pub fn construct(
        &self,
        args: Vec<ResolvedArgument>,
    ) -> BoxFuture<'static, Result<ServiceInstance>> {
        (*self.constructor)(args)
    }

    /// Look up a method by name
    pub fn method(&self, name: &str) -> Option<MethodFn> {
        self.methods.get(name).cloned()
    }
}

impl std::fmt::Debug for ClassEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassEntry")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// Ordered registry of constructible classes
///
/// Lookup scans entries in registration order and returns the first match,
/// so re-registering a name has no effect until the earlier entry is gone.
#[derive(Clone, Debug, Default)]
pub struct ConstructorRegistry {
    entries: Vec<ClassEntry>,
}

impl ConstructorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class entry
    pub fn register(&mut self, entry: ClassEntry) -> &mut Self {
        self.entries.push(entry);
        self
    }

    /// Resolve a class by name
    ///
    /// # Returns
    /// * `Ok(&ClassEntry)` - First entry registered under the name
    /// * `Err(Error::ModuleResolution)` - Name unknown; carries every name searched
    pub fn resolve(&self, name: &str) -> Result<&ClassEntry> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .ok_or_else(|| {
                Error::module_resolution(
                    name,
                    self.entries.iter().map(|entry| entry.name.clone()).collect(),
                )
            })
    }

    /// Whether a class name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.name == name)
    }

    /// List all registered classes as (name, description) pairs
    pub fn list(&self) -> Vec<(&str, &str)> {
        self.entries
            .iter()
            .map(|entry| (entry.name.as_str(), entry.description.as_str()))
            .collect()
    }
}
