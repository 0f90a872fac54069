//! Application layer for Spindle
//!
//! Orchestrates the definition lifecycle: a validated configuration tree is
//! turned into an immutable [`Definitions`] set by the [`DefinitionBuilder`],
//! class references are bound against an explicit [`ConstructorRegistry`],
//! and the [`Container`] resolves live service graphs on demand.
//!
//! ```text
//! merged tree ──▶ DefinitionBuilder ──▶ Definitions ──┐
//!                                                     ├──▶ Container::get(id)
//! ClassEntry registrations ──▶ ConstructorRegistry ───┘
//! ```

/// Validated tree to typed definitions
pub mod builder;
/// Service resolution engine
pub mod container;
/// Constructor and method registration
pub mod registry;

// Re-export commonly used types
pub use builder::{DefinitionBuilder, Definitions};
pub use container::Container;
pub use registry::{
    instance, ClassEntry, ConstructorRegistry, ResolvedArgument, ServiceInstance, TaggedService,
};
