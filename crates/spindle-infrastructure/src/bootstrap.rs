//! Container bootstrap wiring
//!
//! [`ContainerBuilder`] ties the load pipeline together: load and merge the
//! entry file, validate the merged tree, build the definition set, and hand
//! back a live [`Container`]. Load-phase failures abort before any container
//! exists; consumers never see a partially initialized one.

use crate::config::loader::ConfigLoader;
use crate::config::schema::SchemaValidator;
use crate::logging::log_container_booted;
use spindle_application::{ClassEntry, ConstructorRegistry, Container, DefinitionBuilder};
use spindle_domain::error::Result;
use std::path::Path;

/// Builder wiring a configuration entry file into a container
///
/// ## Example
///
/// ```ignore
/// let container = ContainerBuilder::new()
///     .register(ClassEntry::new("Logger", "structured logger", logger_ctor))
///     .build(Path::new("/etc/app/app.yml"))
///     .await?;
/// let app = container.get("app").await?;
/// ```
#[derive(Default)]
pub struct ContainerBuilder {
    loader: Option<ConfigLoader>,
    registry: ConstructorRegistry,
    eager_boot: bool,
}

impl std::fmt::Debug for ContainerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerBuilder")
            .field("classes", &self.registry.list().len())
            .field("eager_boot", &self.eager_boot)
            .finish_non_exhaustive()
    }
}

impl ContainerBuilder {
    /// Create a builder with the default loader and an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the configuration loader
    pub fn with_loader(mut self, loader: ConfigLoader) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Replace the constructor registry
    pub fn with_registry(mut self, registry: ConstructorRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Register one class entry
    pub fn register(mut self, entry: ClassEntry) -> Self {
        self.registry.register(entry);
        self
    }

    /// Build every non-lazy singleton before returning
    pub fn with_eager_boot(mut self, eager: bool) -> Self {
        self.eager_boot = eager;
        self
    }

    /// Load, validate, and wire the container
    pub async fn build(self, entry: &Path) -> Result<Container> {
        let loader = self.loader.unwrap_or_default();
        let tree = loader.load(entry).await?;

        SchemaValidator::for_services()?.validate(&tree, Some(entry))?;

        let definitions = DefinitionBuilder::new()
            .with_source_file(entry)
            .build(&tree)?;
        let container = Container::new(definitions, self.registry);

        if self.eager_boot {
            container.boot().await?;
            log_container_booted(container.ids().len());
        }

        Ok(container)
    }
}
