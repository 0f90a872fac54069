//! Recursive import-aware configuration loader
//!
//! Drives the load pipeline: fetch content through the [`PathResolver`]
//! port, decode it through the [`ParserRegistry`], resolve the `imports`
//! section recursively, and merge every imported sub-tree into its importer
//! in declared order.
//!
//! Sibling imports are fetched and parsed concurrently; merge application is
//! strictly declaration-ordered so override semantics stay deterministic.
//! A canonical-path chain travels down the recursion: revisiting a file
//! already on the chain is a circular import and aborts the whole load.

use crate::config::parser::ParserRegistry;
use crate::config::path_resolver::FsPathResolver;
use crate::config::schema::SchemaValidator;
use crate::constants::{IMPORT_MERGE_KEY, IMPORT_PATH_KEY, IMPORT_QUERY_KEY};
use crate::logging::log_config_loaded;
use futures::future::{try_join_all, BoxFuture};
use serde_json::{Map, Value};
use spindle_domain::constants::{IMPORTS_KEY, MERGE_FILENAME, MERGE_ROOT};
use spindle_domain::error::{Error, Result};
use spindle_domain::ports::PathResolver;
use spindle_domain::FileInfo;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// How an imported tree combines with its importer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MergeMode {
    /// Merge at the importer's top level; the importer's own keys win
    Root,
    /// Nest the whole tree under the imported file's stripped name
    Filename,
}

/// One validated entry of an `imports` section
#[derive(Debug, Clone)]
struct ImportEntry {
    path: String,
    query: Option<Value>,
    merge: MergeMode,
}

/// Recursive configuration loader
///
/// ## Example
///
/// ```ignore
/// let loader = ConfigLoader::new();
/// let tree = loader.load(Path::new("/etc/app/app.yml")).await?;
/// ```
#[derive(Clone)]
pub struct ConfigLoader {
    resolver: Arc<dyn PathResolver>,
    parsers: Arc<ParserRegistry>,
}

impl ConfigLoader {
    /// Create a loader with the filesystem resolver and built-in parsers
    pub fn new() -> Self {
        Self {
            resolver: Arc::new(FsPathResolver::new()),
            parsers: Arc::new(ParserRegistry::default()),
        }
    }

    /// Replace the path resolver
    pub fn with_resolver(mut self, resolver: Arc<dyn PathResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Replace the parser registry
    pub fn with_parsers(mut self, parsers: ParserRegistry) -> Self {
        self.parsers = Arc::new(parsers);
        self
    }

    /// Load an entry file and return the fully merged tree
    pub async fn load(&self, entry: &Path) -> Result<Value> {
        let file = FileInfo::from_path(entry, None);
        let imports_schema = SchemaValidator::for_imports()?;
        let tree = self.load_file(&file, &[], &imports_schema).await?;
        log_config_loaded(entry, true);
        Ok(tree)
    }

    /// Load one file and recursively apply its imports
    fn load_file<'fut>(
        &'fut self,
        file: &'fut FileInfo,
        chain: &'fut [PathBuf],
        imports_schema: &'fut SchemaValidator,
    ) -> BoxFuture<'fut, Result<Value>> {
        Box::pin(async move {
            let canonical = file
                .path
                .canonicalize()
                .unwrap_or_else(|_| file.path.clone());

            if chain.contains(&canonical) {
                let mut full_chain: Vec<String> = chain
                    .iter()
                    .map(|link| link.display().to_string())
                    .collect();
                full_chain.push(canonical.display().to_string());
                return Err(Error::circular_import(full_chain));
            }

            let target = file.path.display().to_string();
            let content = self
                .resolver
                .get_content(&target, file.parentpath.as_deref())
                .await?;
            let tree = self.parsers.parse(&file.path, &file.ext, &content)?;

            // Non-mapping trees carry no imports and merge as-is
            let mut own = match tree {
                Value::Object(own) => own,
                other => return Ok(other),
            };

            let raw_imports = match own.remove(IMPORTS_KEY) {
                Some(raw) => raw,
                None => return Ok(Value::Object(own)),
            };
            imports_schema.validate(&raw_imports, Some(&file.path))?;
            let entries = parse_import_entries(&raw_imports);

            let mut next_chain = chain.to_vec();
            next_chain.push(canonical);

            // Expand every entry first so merge order stays the declared one
            let mut expanded: Vec<(MergeMode, FileInfo)> = Vec::new();
            for entry in &entries {
                let files = self
                    .resolver
                    .resolve_import(&entry.path, entry.query.as_ref(), Some(&file.path))
                    .await?;
                for resolved in files {
                    expanded.push((entry.merge, resolved));
                }
            }

            // Fetch and parse siblings concurrently; try_join_all preserves
            // the declared order in its output
            let subtrees = try_join_all(expanded.iter().map(|(_, resolved)| {
                self.load_file(resolved, &next_chain, imports_schema)
            }))
            .await?;

            let mut imported = Map::new();
            for ((merge, resolved), subtree) in expanded.iter().zip(subtrees) {
                debug!(
                    import = %resolved.path.display(),
                    importer = %file.path.display(),
                    "configuration import merged"
                );
                match merge {
                    MergeMode::Root => merge_root(&mut imported, subtree, resolved)?,
                    MergeMode::Filename => {
                        imported.insert(resolved.name_stripped.clone(), subtree);
                    }
                }
            }

            // The importer's directly declared keys take precedence over
            // anything an import provides
            for (key, value) in imported {
                own.entry(key).or_insert(value);
            }

            Ok(Value::Object(own))
        })
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Fold a root-merged import into the accumulated import map
///
/// Later sibling imports override earlier ones here; the importer's own keys
/// are applied on top afterwards and always win.
fn merge_root(imported: &mut Map<String, Value>, subtree: Value, origin: &FileInfo) -> Result<()> {
    let subtree = match subtree {
        Value::Object(subtree) => subtree,
        _ => {
            return Err(Error::configuration_at(
                "root-merged import must be a mapping",
                Some(origin.path.clone()),
                IMPORTS_KEY,
            ))
        }
    };
    for (key, value) in subtree {
        imported.insert(key, value);
    }
    Ok(())
}

/// Turn a schema-validated imports array into typed entries
fn parse_import_entries(raw: &Value) -> Vec<ImportEntry> {
    let entries = match raw.as_array() {
        Some(entries) => entries,
        None => return Vec::new(),
    };
    entries
        .iter()
        .filter_map(|entry| match entry {
            Value::String(path) => Some(ImportEntry {
                path: path.clone(),
                query: None,
                merge: MergeMode::Root,
            }),
            Value::Object(object) => {
                let path = object.get(IMPORT_PATH_KEY)?.as_str()?.to_string();
                let merge = match object.get(IMPORT_MERGE_KEY).and_then(Value::as_str) {
                    Some(MERGE_FILENAME) => MergeMode::Filename,
                    Some(MERGE_ROOT) | None => MergeMode::Root,
                    // Unreachable past schema validation
                    Some(_) => MergeMode::Root,
                };
                Some(ImportEntry {
                    path,
                    query: object.get(IMPORT_QUERY_KEY).cloned(),
                    merge,
                })
            }
            _ => None,
        })
        .collect()
}
