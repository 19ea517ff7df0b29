use std::path::{Path, PathBuf};

use crate::inventory::CONTENT_SUFFIX;
use crate::types::{DocumentRegistry, LocatedReference, ResolutionFailure};

/// Existence check for link targets that are not in the registry,
/// such as images or documents outside the scanned tree.
pub trait FileProbe {
    /// Whether `candidate`, a `/`-separated path, exists.
    fn exists(&self, candidate: &str) -> bool;
}

/// Probes the real filesystem relative to the collection root.
#[derive(Debug, Clone)]
pub struct DiskProbe {
    /// Directory candidates are joined onto.
    root: PathBuf,
}

impl DiskProbe {
    /// Probe paths relative to `root`.
    pub fn new(root: &Path) -> Self {
        return Self { root: root.to_path_buf() };
    }
}

impl FileProbe for DiskProbe {
    fn exists(&self, candidate: &str) -> bool {
        return self.root.join(candidate).exists();
    }
}

/// Resolve one reference against the registry, falling back to the probe.
///
/// The target is made root-relative (a leading `/` is dropped; anything else
/// is joined onto the source document's directory), backslashes become `/`,
/// and four candidates are tried: the path, the path plus `.md`, its
/// basename, and the basename plus `.md`. A candidate is found if either the
/// registry or the probe knows it; both are equally authoritative.
///
/// # Errors
///
/// Returns a dangling-link `ResolutionFailure` carrying the raw target when
/// no candidate is found.
pub fn resolve(
    reference: &LocatedReference,
    registry: &DocumentRegistry,
    probe: &dyn FileProbe,
) -> Result<(), ResolutionFailure> {
    let target_path = match reference.target.strip_prefix('/') {
        Some(root_relative) => root_relative.to_string(),
        None => join(dirname(&reference.source), &reference.target),
    };
    let target_path = target_path.replace('\\', "/");
    let base = basename(&target_path);

    let candidates = [
        target_path.clone(),
        format!("{target_path}{CONTENT_SUFFIX}"),
        base.to_string(),
        format!("{base}{CONTENT_SUFFIX}"),
    ];

    for candidate in &candidates {
        if is_found(candidate, registry, probe) {
            tracing::trace!(link = %reference.target, %candidate, "resolved");
            return Ok(());
        }
    }

    return Err(ResolutionFailure::dangling(reference));
}

/// Registry membership or a successful probe. Empty candidates never match.
fn is_found(candidate: &str, registry: &DocumentRegistry, probe: &dyn FileProbe) -> bool {
    if candidate.is_empty() {
        return false;
    }
    return registry.contains(candidate) || probe.exists(candidate);
}

/// Directory part of a `/`-separated path; `.` when there is none.
fn dirname(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    return match trimmed.rfind('/') {
        Some(0) => "/",
        Some(idx) => trimmed.get(..idx).unwrap_or("."),
        None => ".",
    };
}

/// Final segment of a `/`-separated path, ignoring trailing separators.
fn basename(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    return trimmed.rsplit('/').next().unwrap_or(trimmed);
}

/// Join `dir` and `path` and normalize the result: `.` segments and repeated
/// separators vanish, `..` pops a preceding segment when there is one, a
/// trailing separator survives, and an empty result becomes `.`.
fn join(dir: &str, path: &str) -> String {
    let joined = format!("{dir}/{path}");
    let absolute = joined.starts_with('/');
    let trailing = joined.ends_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        push_normalized_segment(&mut segments, segment, absolute);
    }

    let mut out = segments.join("/");
    if absolute {
        out.insert(0, '/');
    }
    if out.is_empty() || out == "/" {
        return if absolute { "/".to_string() } else { ".".to_string() };
    }
    if trailing {
        out.push('/');
    }
    return out;
}

/// Handle a single segment during normalization.
/// `..` pops the last segment when possible; above an absolute root it is dropped.
fn push_normalized_segment<'a>(segments: &mut Vec<&'a str>, segment: &'a str, absolute: bool) {
    match segment {
        "" | "." => {},
        ".." => {
            let can_pop = segments.last().is_some_and(|last| return *last != "..");
            if can_pop {
                segments.pop();
            } else if !absolute {
                segments.push(segment);
            }
        },
        other => segments.push(other),
    }
    return;
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    /// Probe backed by an in-memory set of paths.
    struct FakeProbe(HashSet<&'static str>);

    impl FileProbe for FakeProbe {
        fn exists(&self, candidate: &str) -> bool {
            return self.0.contains(candidate);
        }
    }

    fn no_disk() -> FakeProbe {
        return FakeProbe(HashSet::new());
    }

    fn registry(keys: &[&str]) -> DocumentRegistry {
        return keys.iter().copied().collect();
    }

    fn reference(source: &str, target: &str) -> LocatedReference {
        return LocatedReference {
            column: 3,
            display_text: "text".to_string(),
            line: 7,
            source: source.to_string(),
            target: target.to_string(),
        };
    }

    #[test]
    fn sibling_document() {
        let reg = registry(&["docs/a.md", "a.md", "docs/b.md", "b.md"]);
        let result = resolve(&reference("docs/a.md", "b.md"), &reg, &no_disk());
        assert_eq!(result, Ok(()), "sibling resolves");
    }

    #[test]
    fn exact_relative_path_always_resolves() {
        let reg = registry(&["guide/deep/page.md", "page.md"]);
        let result = resolve(&reference("index.md", "guide/deep/page.md"), &reg, &no_disk());
        assert_eq!(result, Ok(()), "relative path from the root");
    }

    #[test]
    fn root_relative_target() {
        let reg = registry(&["root.md", "docs/b.md", "b.md"]);
        let result = resolve(&reference("root.md", "/docs/b.md"), &reg, &no_disk());
        assert_eq!(result, Ok(()), "leading slash means root-relative");
    }

    #[test]
    fn parent_directory_target() {
        let reg = registry(&["docs/sub/a.md", "README.md"]);
        let probe = no_disk();
        assert_eq!(resolve(&reference("docs/sub/a.md", "../../README.md"), &reg, &probe), Ok(()), "two levels up");
    }

    #[test]
    fn extension_may_be_omitted() {
        let reg = registry(&["docs/a.md", "docs/setup.md"]);
        let result = resolve(&reference("docs/a.md", "setup"), &reg, &no_disk());
        assert_eq!(result, Ok(()), "`.md` appended");
    }

    #[test]
    fn bare_name_resolves_from_any_depth() {
        let reg = registry(&["x/y/z/deep.md", "glossary/terms.md", "terms.md"]);
        let probe = no_disk();
        assert_eq!(resolve(&reference("x/y/z/deep.md", "terms.md"), &reg, &probe), Ok(()), "with extension");
        assert_eq!(resolve(&reference("x/y/z/deep.md", "terms"), &reg, &probe), Ok(()), "without extension");
        assert_eq!(
            resolve(&reference("x/y/z/deep.md", "wrong/dir/terms.md"), &reg, &probe),
            Ok(()),
            "basename fallback ignores the directory"
        );
    }

    #[test]
    fn probe_finds_non_content_files() {
        let reg = registry(&["docs/a.md"]);
        let probe = FakeProbe(HashSet::from(["docs/img/logo.png"]));
        let result = resolve(&reference("docs/a.md", "img/logo.png"), &reg, &probe);
        assert_eq!(result, Ok(()), "probe is an equal fallback");
    }

    #[test]
    fn missing_target_reports_raw_target() {
        let reg = registry(&["docs/a.md", "a.md"]);
        let Err(failure) = resolve(&reference("docs/a.md", "./missing.md"), &reg, &no_disk()) else {
            panic!("expected a dangling link");
        };
        assert_eq!(failure.message, "Dangling link: \"./missing.md\" -> target not found", "raw target kept");
        assert_eq!((failure.line, failure.column), (7, 3), "location copied");
        assert_eq!(failure.source, "docs/a.md", "source copied");
        assert_eq!(failure.display_text, "text", "display text copied");
    }

    #[test]
    fn fragments_are_not_stripped() {
        let reg = registry(&["docs/a.md", "docs/b.md", "b.md"]);
        let result = resolve(&reference("docs/a.md", "b.md#intro"), &reg, &no_disk());
        assert!(result.is_err(), "anchors are part of the raw target");
    }

    #[test]
    fn backslashes_are_normalized() {
        let reg = registry(&["docs/a.md", "docs/sub/c.md"]);
        let result = resolve(&reference("docs/a.md", "sub\\c.md"), &reg, &no_disk());
        assert_eq!(result, Ok(()), "windows separators accepted");
    }

    #[test]
    fn bare_slash_does_not_match_root() {
        let reg = registry(&["a.md"]);
        let probe = FakeProbe(HashSet::from([""]));
        let result = resolve(&reference("a.md", "/"), &reg, &probe);
        assert!(result.is_err(), "empty candidates never resolve");
    }

    #[test]
    fn join_normalizes_like_posix() {
        assert_eq!(join(".", "b.md"), "b.md", "root-level source");
        assert_eq!(join("docs", "./b.md"), "docs/b.md", "current dir");
        assert_eq!(join("docs", "../b.md"), "b.md", "parent dir");
        assert_eq!(join(".", "../b.md"), "../b.md", "leading .. kept");
        assert_eq!(join("docs", "a//b.md"), "docs/a/b.md", "repeated separators");
        assert_eq!(join("docs", "sub/"), "docs/sub/", "trailing separator kept");
        assert_eq!(join("docs", ".."), ".", "empty becomes dot");
    }

    #[test]
    fn dirname_and_basename() {
        assert_eq!(dirname("docs/a.md"), "docs", "nested");
        assert_eq!(dirname("a.md"), ".", "root level");
        assert_eq!(basename("docs/b"), "b", "last segment");
        assert_eq!(basename("docs/"), "docs", "trailing separator ignored");
    }
}
