//! Definition Value Objects
//!
//! Immutable value objects describing how services are built. Definitions are
//! created once during the load phase and never mutated afterwards; only the
//! container's instance cache changes at runtime.
//!
//! ## Value Objects
//!
//! | Value Object | Description |
//! |--------------|-------------|
//! | [`ServiceDefinition`] | Declarative description of how to build one service |
//! | [`Argument`] | Typed reference used when constructing or calling a service |
//! | [`Alias`] | Definition forwarding resolution to another definition |
//! | [`Tag`] | Named label enabling bulk lookup and ordering |
//! | [`Call`] | Post-construction method invocation |
//! | [`Configurator`] | External finalizer invoked with the built instance |
//! | [`Factory`] | Alternate construction strategy via another service |
//! | [`FileInfo`] | Resolved configuration import record |

/// Constructor and call argument shapes
pub mod argument;
/// Service definition and its sub-objects
pub mod definition;
/// Resolved import file records
pub mod file_info;

// Re-export commonly used value objects
pub use argument::{Argument, ArgumentKind, ArgumentOptions};
pub use definition::{Alias, Call, Configurator, Factory, Scope, ServiceDefinition, Tag};
pub use file_info::FileInfo;
