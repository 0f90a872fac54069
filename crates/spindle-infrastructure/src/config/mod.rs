//! Configuration loading
//!
//! The full load pipeline, leaves first:
//!
//! ```text
//! FsPathResolver ──▶ bytes            (resolve specifier, fetch content)
//! ParserRegistry ──▶ tree             (first parser whose supports() matches)
//! ConfigLoader   ──▶ merged tree      (recursive imports, root/filename merge)
//! SchemaValidator ──▶ validated tree  (fail-fast, last violation surfaced)
//! ```
//!
//! Everything downstream (definition building, container resolution) lives
//! in `spindle-application`.

/// Recursive import-aware loader
pub mod loader;
/// Format parsers and their registry
pub mod parser;
/// Filesystem path resolution
pub mod path_resolver;
/// JSON-schema validation of merged trees
pub mod schema;

// Re-export commonly used types
pub use loader::ConfigLoader;
pub use parser::{JsonParser, ParserRegistry, TomlParser, YamlParser};
pub use path_resolver::FsPathResolver;
pub use schema::SchemaValidator;
