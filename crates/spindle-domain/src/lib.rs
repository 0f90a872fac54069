//! Domain layer for Spindle
//!
//! Core types of the configuration-driven dependency-injection framework:
//! the definition model (services, arguments, calls, tags, aliases), the
//! path-addressable [`Context`] attribute store, the error taxonomy, and the
//! port traits implemented by the infrastructure layer.
//!
//! This crate is a pure library: no I/O, no runtime, no framework wiring.
//! Everything observable at a boundary is defined here and implemented
//! elsewhere.

/// Domain-wide constants (reserved configuration keys, defaults)
pub mod constants;
/// Path-addressable attribute store
pub mod context;
/// Error handling types
pub mod error;
/// Boundary contracts implemented by outer layers
pub mod ports;
/// Immutable definition value objects
pub mod value_objects;

// Re-export commonly used types
pub use context::Context;
pub use error::{Error, Result};
pub use value_objects::{
    Alias, Argument, ArgumentKind, ArgumentOptions, Call, Configurator, Factory, FileInfo, Scope,
    ServiceDefinition, Tag,
};
