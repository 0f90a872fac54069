//! Domain layer constants
//!
//! Reserved configuration keys and framework defaults. Infrastructure-specific
//! constants live in `spindle_infrastructure`.

// ============================================================================
// RESERVED TOP-LEVEL CONFIGURATION KEYS
// ============================================================================

/// Top-level key holding the list of configuration imports
pub const IMPORTS_KEY: &str = "imports";

/// Top-level key holding the service definition map
pub const SERVICES_KEY: &str = "services";

/// Top-level key holding the parameter map
pub const PARAMETERS_KEY: &str = "parameters";

/// Top-level key holding the alias map
pub const ALIASES_KEY: &str = "aliases";

// ============================================================================
// DEFINITION KEYS
// ============================================================================

/// Service definition key naming the registered constructor
pub const CLASS_KEY: &str = "class";

/// Service definition key selecting factory construction
pub const FACTORY_KEY: &str = "factory";

/// Argument shape key referencing another service
pub const SERVICE_REF_KEY: &str = "service";

/// Argument shape key referencing a parameter path
pub const PARAMETER_REF_KEY: &str = "parameter";

/// Argument shape key referencing a tag collection
pub const SERVICES_REF_KEY: &str = "services";

/// Tag data key carrying the ordering priority
pub const TAG_PRIORITY_KEY: &str = "priority";

// ============================================================================
// PATH AND MERGE SEMANTICS
// ============================================================================

/// Separator for dotted attribute and parameter paths
pub const PATH_SEPARATOR: char = '.';

/// Merge mode that folds an import into the importer's top level
pub const MERGE_ROOT: &str = "root";

/// Merge mode that nests an import under its stripped file name
pub const MERGE_FILENAME: &str = "filename";

/// Default tag priority when the tag data declares none
pub const DEFAULT_TAG_PRIORITY: i64 = 0;
