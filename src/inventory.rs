//! Document inventory: every markdown file under the root, keyed by relative
//! path and by bare file name.

use std::path::{Component, Path};

use walkdir::WalkDir;

use crate::config::Config;
use crate::error::Error;
use crate::types::DocumentRegistry;

/// Suffix identifying content documents.
pub const CONTENT_SUFFIX: &str = ".md";

/// Walk `root` and register every `.md` file outside excluded directories.
/// Each file is inserted under its `/`-separated path relative to `root` and
/// under its bare file name.
///
/// # Errors
///
/// Returns `Error::RootNotFound` if `root` is not a directory, or
/// `Error::Walk` if any directory in the tree cannot be read. No partial
/// registry is returned.
pub fn build(root: &Path, config: &Config) -> Result<DocumentRegistry, Error> {
    if !root.is_dir() {
        return Err(Error::RootNotFound { path: root.to_path_buf() });
    }

    let mut registry = DocumentRegistry::default();
    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| return e.depth() == 0 || !is_excluded_dir(e, config));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if !name.ends_with(CONTENT_SUFFIX) {
            continue;
        }

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        registry.insert(to_registry_key(relative));
        registry.insert(name);
    }

    if registry.is_empty() {
        tracing::debug!(root = %root.display(), "no markdown documents found");
    } else {
        tracing::debug!(keys = registry.len(), root = %root.display(), "inventory built");
    }
    return Ok(registry);
}

/// Whether a walk entry is a directory the config tells us to skip.
fn is_excluded_dir(entry: &walkdir::DirEntry, config: &Config) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    return entry.file_name().to_str().is_some_and(|name| return config.is_excluded_dir(name));
}

/// Join the normal components of a relative path with `/`, whatever the platform.
fn to_registry_key(relative: &Path) -> String {
    return relative
        .components()
        .filter_map(|c| {
            return match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            };
        })
        .collect::<Vec<_>>()
        .join("/");
}
