//! Error handling types

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Spindle framework
///
/// Load-phase errors (path resolution, parsing, import merge, schema
/// validation, definition building) abort the entire load: no partially
/// initialized container is ever exposed. Resolution-phase errors abort only
/// the offending `get`/`get_by_tag` call and leave the container usable for
/// unrelated ids.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A configuration document could not be parsed
    #[error("Parse error in {file}: {message}")]
    Parse {
        /// File that failed to parse
        file: String,
        /// Description of the parse failure
        message: String,
        /// Optional source error from the format parser
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration-related error (malformed entry, invalid shape)
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// File the faulty declaration lives in
        file: Option<PathBuf>,
        /// Configuration path of the faulty declaration (e.g. `services.app.arguments[0]`)
        path: Option<String>,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An imported configuration file could not be located
    #[error("Configuration file not found: {target}")]
    FileNotFound {
        /// The import specifier that failed to resolve
        target: String,
        /// The importing file, when the import was relative
        parent: Option<PathBuf>,
    },

    /// No registered parser supports the target file's extension
    #[error("Unsupported configuration format: .{extension}")]
    UnsupportedFormat {
        /// The unmatched file extension
        extension: String,
        /// File whose format was unsupported
        file: Option<PathBuf>,
    },

    /// An import chain revisited a file already being imported
    #[error("Circular configuration import: {}", .chain.join(" -> "))]
    CircularImport {
        /// The full import chain, ending with the revisited file
        chain: Vec<String>,
    },

    /// The merged configuration tree failed schema validation
    ///
    /// The message is derived from the last recorded violation only; this is
    /// a documented contract of the validator, not an omission.
    #[error("Schema violation at {data_path}: {message}")]
    Schema {
        /// File the violating document was loaded from
        file: Option<PathBuf>,
        /// Data path of the violation inside the document
        data_path: String,
        /// Description of the violation
        message: String,
    },

    /// A referenced class could not be located in the constructor registry
    #[error("Unknown class '{module}' (searched: {})", .searched.join(", "))]
    ModuleResolution {
        /// The class name that failed to resolve
        module: String,
        /// Names the registry was searched for
        searched: Vec<String>,
    },

    /// A service id (or alias target) does not exist among the definitions
    #[error("Service not found: '{id}'")]
    ServiceNotFound {
        /// The unresolved service id
        id: String,
    },

    /// A parameter path does not exist in the parameter bag
    #[error("Parameter not found: '{path}'")]
    ParameterNotFound {
        /// The unresolved dotted parameter path
        path: String,
    },

    /// Resolving a service revisited an id already under construction
    #[error("Circular service dependency: [{}]", .chain.join(", "))]
    CircularDependency {
        /// The full dependency chain, ending with the revisited id
        chain: Vec<String>,
    },

    /// A service method invocation failed
    #[error("Invocation of '{method}' on service '{id}' failed: {message}")]
    Invocation {
        /// Service the method was invoked on
        id: String,
        /// The invoked method name
        method: String,
        /// Description of the failure
        message: String,
    },

    /// Internal framework error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

// I/O and parse error creation methods
impl Error {
    /// Create an I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io {
            message: message.into(),
            source: None,
        }
    }

    /// Create an I/O error with source
    pub fn io_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a parse error with source
    pub fn parse_with_source<
        F: Into<String>,
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        file: F,
        message: S,
        source: E,
    ) -> Self {
        Self::Parse {
            file: file.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Configuration error creation methods
impl Error {
    /// Create a configuration error (message only)
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            file: None,
            path: None,
            source: None,
        }
    }

    /// Create a configuration error locating the faulty declaration
    pub fn configuration_at<S: Into<String>, P: Into<String>>(
        message: S,
        file: Option<PathBuf>,
        path: P,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            file,
            path: Some(path.into()),
            source: None,
        }
    }

    /// Create a file-not-found error
    pub fn file_not_found<S: Into<String>>(target: S, parent: Option<PathBuf>) -> Self {
        Self::FileNotFound {
            target: target.into(),
            parent,
        }
    }

    /// Create an unsupported-format error
    pub fn unsupported_format<S: Into<String>>(extension: S, file: Option<PathBuf>) -> Self {
        Self::UnsupportedFormat {
            extension: extension.into(),
            file,
        }
    }

    /// Create a circular-import error from the offending chain
    pub fn circular_import(chain: Vec<String>) -> Self {
        Self::CircularImport { chain }
    }

    /// Create a schema-violation error
    pub fn schema<P: Into<String>, S: Into<String>>(
        file: Option<PathBuf>,
        data_path: P,
        message: S,
    ) -> Self {
        Self::Schema {
            file,
            data_path: data_path.into(),
            message: message.into(),
        }
    }
}

// Resolution error creation methods
impl Error {
    /// Create a module-resolution error
    pub fn module_resolution<S: Into<String>>(module: S, searched: Vec<String>) -> Self {
        Self::ModuleResolution {
            module: module.into(),
            searched,
        }
    }

    /// Create a service-not-found error
    pub fn service_not_found<S: Into<String>>(id: S) -> Self {
        Self::ServiceNotFound { id: id.into() }
    }

    /// Create a parameter-not-found error
    pub fn parameter_not_found<S: Into<String>>(path: S) -> Self {
        Self::ParameterNotFound { path: path.into() }
    }

    /// Create a circular-dependency error from the offending chain
    pub fn circular_dependency(chain: Vec<String>) -> Self {
        Self::CircularDependency { chain }
    }

    /// Create an invocation error
    pub fn invocation<I: Into<String>, M: Into<String>, S: Into<String>>(
        id: I,
        method: M,
        message: S,
    ) -> Self {
        Self::Invocation {
            id: id.into(),
            method: method.into(),
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Internal {
            message: format!("JSON error: {source}"),
        }
    }
}
