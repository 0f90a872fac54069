//! # Spindle
//!
//! A configuration-driven dependency-injection framework: service graphs are
//! declared in YAML/JSON/TOML documents, assembled through recursive imports,
//! validated against JSON schemas, and instantiated lazily by an async
//! container.
//!
//! ## Features
//!
//! - **Declarative wiring**: services, arguments, calls, factories,
//!   configurators, tags, and aliases described entirely in configuration
//! - **Recursive imports**: `root` and `filename` merge modes with
//!   deterministic, declaration-ordered override semantics
//! - **Cyclic-safe resolution**: dependency and import cycles fail with the
//!   full offending chain
//! - **Concurrent-safe singletons**: concurrent `get` calls collapse to a
//!   single construction per id
//!
//! ## Example
//!
//! ```ignore
//! use spindle::application::{instance, ClassEntry};
//! use spindle::infrastructure::bootstrap::ContainerBuilder;
//!
//! let container = ContainerBuilder::new()
//!     .register(ClassEntry::new("Logger", "structured logger", |_args| async {
//!         Ok(instance(Logger::new()))
//!     }))
//!     .build(std::path::Path::new("app.yml"))
//!     .await?;
//!
//! let logger = container.get("logger").await?;
//! ```
//!
//! ## Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - `domain` - Definition model, context, errors, and port traits
//! - `application` - Constructor registry, definition builder, container
//! - `infrastructure` - Filesystem resolution, parsers, loader, schema,
//!   logging

/// Domain layer - definition model, context, errors, and ports
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use spindle_domain::*;
}

/// Application layer - registry, builder, and container
///
/// Re-exports from the application crate for convenience
pub mod application {
    pub use spindle_application::*;
}

/// Infrastructure layer - loading, validation, and logging
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use spindle_infrastructure::*;
}

// Flat re-exports of the types nearly every consumer touches
pub use spindle_application::{instance, ClassEntry, ConstructorRegistry, Container};
pub use spindle_domain::{Context, Error, Result};
pub use spindle_infrastructure::{ConfigLoader, ContainerBuilder};
