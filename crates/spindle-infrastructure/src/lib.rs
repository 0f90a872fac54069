//! Infrastructure layer for Spindle
//!
//! Implements the domain ports over real I/O: filesystem path resolution,
//! the format parser registry (YAML/JSON/TOML), the recursive import-aware
//! [`ConfigLoader`](config::ConfigLoader), JSON-schema validation of merged
//! trees, logging setup, and the [`bootstrap`] helper wiring a loaded tree
//! into a live container.

/// Container bootstrap wiring
pub mod bootstrap;
/// Configuration loading (resolver, parsers, loader, schema)
pub mod config;
/// Infrastructure constants
pub mod constants;
/// Structured logging with tracing
pub mod logging;

// Re-export commonly used types
pub use bootstrap::ContainerBuilder;
pub use config::{ConfigLoader, FsPathResolver, ParserRegistry, SchemaValidator};
