//! Reference extraction from markdown text.
//!
//! Two syntaxes are scanned independently over the whole document:
//! inline links `[text](target)` first, then bracketed bare names `[name.md]`.
//! A span matching both yields two references.

use regex::Regex;

use crate::error::Error;
use crate::types::LocatedReference;

/// URL schemes that mark an inline link as external. Matched case-sensitively
/// at the start of the raw target and must be followed by `:`.
const EXTERNAL_SCHEMES: [&str; 4] = ["http", "https", "mailto", "ftp"];

/// Inline link: text without `]`, non-empty target without `)`.
const INLINE_LINK_PATTERN: &str = r"\[([^\]]*)\]\(([^)]+)\)";

/// Bracketed bare reference whose content ends in `.md`.
const BRACKET_REF_PATTERN: &str = r"\[([^\]]+\.md)\]";

/// A match within one line, before line/source information is attached.
#[derive(Debug, PartialEq, Eq)]
struct LineMatch {
    /// One-based character column of the opening `[`.
    column: usize,
    /// Link text.
    display_text: String,
    /// Raw link target.
    target: String,
}

/// Compiled reference patterns. Stateless across calls; one instance serves a whole run.
#[derive(Debug, Clone)]
pub struct Extractor {
    /// Matches `[name.md]`.
    bracket: Regex,
    /// Matches `[text](target)`.
    inline: Regex,
}

impl Extractor {
    /// Lazily yield every internal reference in `text`: all inline links,
    /// top to bottom, then all bracketed references, top to bottom. Lines are
    /// split on `\n` only.
    pub fn extract<'a>(
        &'a self,
        text: &'a str,
        source: &'a str,
    ) -> impl Iterator<Item = LocatedReference> + 'a {
        let inline = &self.inline;
        let bracket = &self.bracket;
        return scan_document(text, source, move |line| return inline_links(inline, line))
            .chain(scan_document(text, source, move |line| return bracket_refs(bracket, line)));
    }

    /// Compile the reference patterns.
    ///
    /// # Errors
    ///
    /// Returns `Error::Regex` if a built-in pattern fails to compile.
    pub fn new() -> Result<Self, Error> {
        return Ok(Self {
            bracket: Regex::new(BRACKET_REF_PATTERN)?,
            inline: Regex::new(INLINE_LINK_PATTERN)?,
        });
    }
}

/// Run one line scanner over every line of `text`, attaching line numbers.
fn scan_document<'a, F, I>(
    text: &'a str,
    source: &'a str,
    scan_line: F,
) -> impl Iterator<Item = LocatedReference> + 'a
where
    F: Fn(&'a str) -> I + 'a,
    I: Iterator<Item = LineMatch> + 'a,
{
    return text.split('\n').enumerate().flat_map(move |(index, line)| {
        let line_number = index.saturating_add(1);
        return scan_line(line).map(move |m| {
            return LocatedReference {
                column: m.column,
                display_text: m.display_text,
                line: line_number,
                source: source.to_string(),
                target: m.target,
            };
        });
    });
}

/// Inline `[text](target)` links on one line, external schemes dropped.
fn inline_links<'a>(pattern: &'a Regex, line: &'a str) -> impl Iterator<Item = LineMatch> + 'a {
    return pattern.captures_iter(line).filter_map(move |cap| {
        let whole = cap.get(0)?;
        let text = cap.get(1)?.as_str();
        let target = cap.get(2)?.as_str();
        if is_external(target) {
            return None;
        }
        return Some(LineMatch {
            column: char_column(line, whole.start()),
            display_text: text.to_string(),
            target: target.to_string(),
        });
    });
}

/// Bracketed `[name.md]` references on one line. Never filtered.
fn bracket_refs<'a>(pattern: &'a Regex, line: &'a str) -> impl Iterator<Item = LineMatch> + 'a {
    return pattern.captures_iter(line).filter_map(move |cap| {
        let whole = cap.get(0)?;
        let name = cap.get(1)?.as_str();
        return Some(LineMatch {
            column: char_column(line, whole.start()),
            display_text: name.to_string(),
            target: name.to_string(),
        });
    });
}

/// Whether a raw target starts with a known external scheme followed by `:`.
fn is_external(target: &str) -> bool {
    return EXTERNAL_SCHEMES.iter().any(|scheme| {
        return target.strip_prefix(scheme).is_some_and(|rest| return rest.starts_with(':'));
    });
}

/// Convert a byte offset within `line` into a one-based character column.
fn char_column(line: &str, byte_offset: usize) -> usize {
    let preceding = line.get(..byte_offset).map_or(0, |s| return s.chars().count());
    return preceding.saturating_add(1);
}
