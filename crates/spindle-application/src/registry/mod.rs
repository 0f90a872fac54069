//! Constructor Registry System
//!
//! Binds the `class` strings found in service definitions to executable
//! constructors and method tables. Rust has no runtime class loading, so
//! every constructible type is registered explicitly before the container
//! is created; an unknown class name fails resolution with the list of
//! names that were searched.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                    Class Registration Flow                     │
//! ├────────────────────────────────────────────────────────────────┤
//! │                                                                │
//! │  1. Consumer registers:  ClassEntry::new("Logger", …, ctor)    │
//! │                              ↓                                 │
//! │  2. Registry stores:     ConstructorRegistry (ordered)         │
//! │                              ↓                                 │
//! │  3. Container queries:   registry.resolve("Logger")            │
//! │                              ↓                                 │
//! │  4. Definition selects:  class: Logger → constructor runs      │
//! │                                                                │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use spindle_application::{instance, ClassEntry, ConstructorRegistry};
//!
//! let mut registry = ConstructorRegistry::new();
//! registry.register(
//!     ClassEntry::new("Logger", "Structured logger", |_args| async {
//!         Ok(instance(Logger::new()))
//!     }),
//! );
//! ```

/// Class entries and the registry holding them
pub mod class;

// Re-export all registry types
pub use class::{
    instance, ClassEntry, ConstructorFn, ConstructorRegistry, MethodFn, ResolvedArgument,
    ServiceInstance, TaggedService,
};
