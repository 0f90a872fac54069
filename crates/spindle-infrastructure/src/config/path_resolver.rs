//! Filesystem path resolution
//!
//! [`FsPathResolver`] implements the [`PathResolver`] port over the local
//! filesystem. Relative targets resolve against the importing file's
//! directory; glob patterns and directories expand into deterministic,
//! lexicographically sorted lists de-duplicated by canonical path.

use crate::constants::GLOB_MARKERS;
use async_trait::async_trait;
use globset::{Glob, GlobMatcher};
use serde_json::Value;
use spindle_domain::error::{Error, Result};
use spindle_domain::ports::PathResolver;
use spindle_domain::FileInfo;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Path resolver over the local filesystem
///
/// ## Example
///
/// ```ignore
/// let resolver = FsPathResolver::new().with_base_dir("/etc/app");
/// let files = resolver.resolve_import("conf/*.yml", None, None).await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct FsPathResolver {
    /// Base directory for relative targets with no importing file
    base_dir: Option<PathBuf>,
}

impl FsPathResolver {
    /// Create a resolver with no base directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the directory relative targets resolve against when the import
    /// has no parent file
    pub fn with_base_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.base_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Resolve a target against the importing file's directory
    fn resolve_target(&self, target: &str, parent: Option<&Path>) -> PathBuf {
        let path = Path::new(target);
        if path.is_absolute() {
            return path.to_path_buf();
        }
        if let Some(parent) = parent {
            let parent_dir = parent.parent().unwrap_or_else(|| Path::new("."));
            return parent_dir.join(path);
        }
        match &self.base_dir {
            Some(base) => base.join(path),
            None => path.to_path_buf(),
        }
    }

    /// Whether a specifier contains glob pattern characters
    fn is_glob(target: &str) -> bool {
        target.contains(GLOB_MARKERS)
    }

    /// Deepest ancestor of a pattern containing no glob characters
    fn static_prefix(pattern: &Path) -> PathBuf {
        let mut prefix = PathBuf::new();
        for component in pattern.components() {
            match component {
                Component::Normal(part) if Self::is_glob(&part.to_string_lossy()) => break,
                other => prefix.push(other.as_os_str()),
            }
        }
        if prefix.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            prefix
        }
    }

    /// Expand a glob pattern into matching file paths
    fn expand_glob(&self, pattern: &Path) -> Result<Vec<PathBuf>> {
        let matcher: GlobMatcher = Glob::new(&pattern.to_string_lossy())
            .map_err(|source| {
                Error::configuration(format!("invalid import pattern '{}': {source}", pattern.display()))
            })?
            .compile_matcher();

        let root = Self::static_prefix(pattern);
        let mut matches = Vec::new();
        for entry in WalkDir::new(&root).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                // Unreadable subtrees are skipped, not fatal: the pattern
                // decides what must exist
                Err(_) => continue,
            };
            if entry.file_type().is_file() && matcher.is_match(entry.path()) {
                matches.push(entry.path().to_path_buf());
            }
        }
        Ok(matches)
    }

    /// Expand a directory into every file it contains, recursively
    fn expand_dir(&self, dir: &Path) -> Vec<PathBuf> {
        WalkDir::new(dir)
            .follow_links(true)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.path().to_path_buf())
            .collect()
    }
}

#[async_trait]
impl PathResolver for FsPathResolver {
    async fn get_content(&self, target: &str, parent: Option<&Path>) -> Result<Vec<u8>> {
        let path = self.resolve_target(target, parent);
        match tokio::fs::read(&path).await {
            Ok(content) => Ok(content),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => Err(
                Error::file_not_found(target, parent.map(Path::to_path_buf)),
            ),
            Err(source) => Err(Error::io_with_source(
                format!("failed to read '{}'", path.display()),
                source,
            )),
        }
    }

    async fn resolve_import(
        &self,
        target: &str,
        _query: Option<&Value>,
        parent: Option<&Path>,
    ) -> Result<Vec<FileInfo>> {
        let resolved = self.resolve_target(target, parent);

        let candidates = if Self::is_glob(target) {
            self.expand_glob(&resolved)?
        } else {
            match tokio::fs::metadata(&resolved).await {
                Ok(metadata) if metadata.is_dir() => self.expand_dir(&resolved),
                Ok(_) => vec![resolved.clone()],
                Err(_) => {
                    return Err(Error::file_not_found(target, parent.map(Path::to_path_buf)))
                }
            }
        };

        // De-duplicate by canonical path, then sort for determinism
        let mut seen: HashSet<PathBuf> = HashSet::new();
        let mut files: Vec<PathBuf> = Vec::new();
        for candidate in candidates {
            let canonical = candidate.canonicalize().unwrap_or_else(|_| candidate.clone());
            if seen.insert(canonical) {
                files.push(candidate);
            }
        }
        files.sort();

        if files.is_empty() {
            return Err(Error::file_not_found(target, parent.map(Path::to_path_buf)));
        }

        debug!(target, files = files.len(), "import specifier expanded");
        Ok(files
            .into_iter()
            .map(|path| FileInfo::from_path(&path, parent))
            .collect())
    }
}
