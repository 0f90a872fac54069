//! Resolved import file records

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Value Object: Resolved Configuration Import
///
/// One concrete file produced by expanding an import specifier. Glob and
/// directory imports expand into many of these, sorted lexicographically by
/// path and de-duplicated by canonical path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Absolute path of the resolved file
    pub path: PathBuf,
    /// Directory containing the file
    pub dir: PathBuf,
    /// File name with extension
    pub name: String,
    /// File extension, without the leading dot
    pub ext: String,
    /// File name with the extension stripped; used by `merge: filename`
    pub name_stripped: String,
    /// Path of the importing file, when resolved relative to one
    pub parentpath: Option<PathBuf>,
    /// Path relative to the importing file's directory
    pub relpath: Option<PathBuf>,
    /// Directory portion of [`relpath`](Self::relpath)
    pub reldir: Option<PathBuf>,
}

impl FileInfo {
    /// Build a record for a resolved file, relative to an optional importer
    pub fn from_path(path: &Path, parent: Option<&Path>) -> Self {
        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name_stripped = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        let parent_dir = parent.and_then(Path::parent);
        let relpath = parent_dir.and_then(|base| path.strip_prefix(base).ok().map(Path::to_path_buf));
        let reldir = relpath
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf);

        Self {
            path: path.to_path_buf(),
            dir,
            name,
            ext,
            name_stripped,
            parentpath: parent.map(Path::to_path_buf),
            relpath,
            reldir,
        }
    }
}
