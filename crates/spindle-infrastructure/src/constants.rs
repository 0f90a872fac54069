//! Infrastructure layer constants
//!
//! Constants tied to the infrastructure implementation. Reserved
//! configuration keys live in `spindle_domain::constants`.

// ============================================================================
// CONFIGURATION LOADING CONSTANTS
// ============================================================================

/// Environment variable consulted by the logging filter
pub const LOG_ENV_VAR: &str = "SPINDLE_LOG";

/// Default log level when none is configured
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Import entry key naming the target path
pub const IMPORT_PATH_KEY: &str = "path";

/// Import entry key carrying the opaque resolver query
pub const IMPORT_QUERY_KEY: &str = "query";

/// Import entry key selecting the merge mode
pub const IMPORT_MERGE_KEY: &str = "merge";

/// Characters marking an import specifier as a glob pattern
pub const GLOB_MARKERS: &[char] = &['*', '?', '[', '{'];
