/// Core domain types for doclinks: the document registry, extracted references,
/// and resolution failures.
use std::collections::BTreeSet;
use std::fmt;

/// Every known document identifier of one run: relative paths with `/`
/// separators plus bare file names. Built once by the inventory, read-only after.
///
/// Backed by a `BTreeSet` so iteration order is stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentRegistry {
    /// Registered identifiers.
    keys: BTreeSet<String>,
}

impl DocumentRegistry {
    /// Whether `key` is registered, either as a relative path or a bare name.
    pub fn contains(&self, key: &str) -> bool {
        return self.keys.contains(key);
    }

    /// Register one identifier. Duplicates collapse.
    pub fn insert(&mut self, key: impl Into<String>) {
        self.keys.insert(key.into());
        return;
    }

    /// Whether no document was registered.
    pub fn is_empty(&self) -> bool {
        return self.keys.is_empty();
    }

    /// Registered identifiers in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        return self.keys.iter().map(String::as_str);
    }

    /// Number of registered identifiers.
    pub fn len(&self) -> usize {
        return self.keys.len();
    }
}

impl<S: Into<String>> FromIterator<S> for DocumentRegistry {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut registry = Self::default();
        for key in iter {
            registry.insert(key);
        }
        return registry;
    }
}

/// A link found in a markdown document, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedReference {
    /// One-based character column of the opening `[` within its line.
    pub column: usize,
    /// Link text as written.
    pub display_text: String,
    /// One-based line number.
    pub line: usize,
    /// Registry key of the document containing the link.
    pub source: String,
    /// Raw link target, untrimmed and unresolved.
    pub target: String,
}

/// A reported problem at a location in a markdown document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionFailure {
    /// One-based column.
    pub column: usize,
    /// Link text of the offending reference, empty for read errors.
    pub display_text: String,
    /// One-based line number.
    pub line: usize,
    /// Human-readable reason.
    pub message: String,
    /// Registry key of the document the failure belongs to.
    pub source: String,
}

impl ResolutionFailure {
    /// The link target could not be found under any candidate path.
    pub fn dangling(reference: &LocatedReference) -> Self {
        return Self {
            column: reference.column,
            display_text: reference.display_text.clone(),
            line: reference.line,
            message: format!("Dangling link: \"{}\" -> target not found", reference.target),
            source: reference.source.clone(),
        };
    }

    /// The document itself could not be read. Always anchored at 1:1.
    pub fn unreadable(source: &str, err: &std::io::Error) -> Self {
        return Self {
            column: 1,
            display_text: String::new(),
            line: 1,
            message: format!("Error reading file: {err}"),
            source: source.to_string(),
        };
    }
}

impl fmt::Display for ResolutionFailure {
    /// `<file>:<line>:<column> - <message>`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "{}:{}:{} - {}", self.source, self.line, self.column, self.message);
    }
}
