//! Configuration Loading Ports
//!
//! Contracts for locating configuration content and decoding it into a tree.
//! Parsers are selected by a `supports` predicate over the file extension;
//! ties are broken by registration order in the registry that holds them.

use crate::error::Result;
use crate::value_objects::FileInfo;
use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;

/// Decodes raw configuration content into a structured tree
///
/// A parser may execute arbitrary code to produce its tree (a "code" format).
/// Such parsers must report it through [`executes_code`](Self::executes_code)
/// so registries can gate them behind an explicit capability flag; they are
/// never reachable by default.
pub trait ConfigParser: Send + Sync {
    /// Short format name, used in logs and error messages
    fn name(&self) -> &'static str;

    /// Whether this parser handles the given file extension
    ///
    /// Extensions are matched case-insensitively and carry no leading dot.
    fn supports(&self, extension: &str) -> bool;

    /// Decode raw content into a tree (map/array/scalar)
    fn parse(&self, content: &[u8]) -> Result<Value>;

    /// Whether parsing executes code from the configuration document
    fn executes_code(&self) -> bool {
        false
    }
}

/// Locates configuration content for import specifiers
///
/// Both operations are asynchronous I/O. Implementations resolve relative
/// targets against the importing file's directory.
#[async_trait]
pub trait PathResolver: Send + Sync {
    /// Fetch the raw content of a single target
    ///
    /// Fails with a file-not-found configuration error when the target
    /// cannot be located.
    async fn get_content(&self, target: &str, parent: Option<&Path>) -> Result<Vec<u8>>;

    /// Expand an import specifier (file, glob, or directory) into files
    ///
    /// Returns a lexicographically sorted list de-duplicated by canonical
    /// path. The opaque `query` value is passed through for resolvers that
    /// interpret it; the filesystem resolver does not.
    async fn resolve_import(
        &self,
        target: &str,
        query: Option<&Value>,
        parent: Option<&Path>,
    ) -> Result<Vec<FileInfo>>;
}
