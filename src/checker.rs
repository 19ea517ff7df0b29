//! Checker: build the inventory once, then extract and resolve the links of
//! every registered document, accumulating failures in encounter order.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::Error;
use crate::extractor::Extractor;
use crate::inventory;
use crate::resolver::{self, DiskProbe, FileProbe};
use crate::types::{DocumentRegistry, ResolutionFailure};

/// Outcome of one run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Report {
    /// Every failure, in the order it was found.
    pub failures: Vec<ResolutionFailure>,
}

impl Report {
    /// One `<file>:<line>:<column> - <message>` line per failure on stdout.
    /// Silent on success.
    pub fn print(&self) {
        for failure in &self.failures {
            println!("{failure}");
        }
        return;
    }

    /// True when no document produced a failure.
    pub fn success(&self) -> bool {
        return self.failures.is_empty();
    }
}

/// State of a single run. The registry is read-only once built; failures are
/// append-only.
pub struct Checker<'p> {
    /// Compiled reference patterns.
    extractor: Extractor,
    /// Accumulated failures.
    failures: Vec<ResolutionFailure>,
    /// Fallback existence check for link targets.
    probe: &'p dyn FileProbe,
    /// Known documents.
    registry: DocumentRegistry,
    /// Collection root; registry keys are relative to it.
    root: PathBuf,
}

impl<'p> Checker<'p> {
    /// Check every registered document and consume the checker into a report.
    /// Documents filtered out by the config are registered but not checked.
    pub fn check_all(mut self, config: &Config) -> Report {
        let keys: Vec<String> = self
            .registry
            .iter()
            .filter(|key| return config.should_check(key))
            .map(str::to_string)
            .collect();

        for key in &keys {
            let path = self.root.join(key);
            if !path.exists() {
                continue;
            }
            self.check_document(key, &path);
        }

        return Report { failures: self.failures };
    }

    /// Read one document and resolve each of its references.
    /// A read error becomes one synthetic failure at 1:1.
    fn check_document(&mut self, key: &str, path: &Path) {
        let content = match std::fs::read(path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(document = key, "vanished before check, skipping");
                return;
            },
            Err(e) => {
                tracing::debug!(document = key, error = %e, "unreadable document");
                self.failures.push(ResolutionFailure::unreadable(key, &e));
                return;
            },
        };

        tracing::debug!(document = key, "checking");
        for reference in self.extractor.extract(&content, key) {
            if let Err(failure) = resolver::resolve(&reference, &self.registry, self.probe) {
                tracing::debug!(document = key, text = %failure.display_text, link = %reference.target, "dangling");
                self.failures.push(failure);
            }
        }
        return;
    }

    /// Assemble a checker from an already built registry.
    ///
    /// # Errors
    ///
    /// Returns `Error::Regex` if the reference patterns fail to compile.
    pub fn new(root: &Path, registry: DocumentRegistry, probe: &'p dyn FileProbe) -> Result<Self, Error> {
        return Ok(Self {
            extractor: Extractor::new()?,
            failures: Vec::new(),
            probe,
            registry,
            root: root.to_path_buf(),
        });
    }
}

/// Load the config in `root`, inventory it, and check every document.
///
/// # Errors
///
/// Returns fatal errors only: a missing or unreadable root or subdirectory, a malformed
/// `.doclinks.toml`, or a pattern compile failure. Dangling links and
/// unreadable documents are reported inside the `Report`.
pub fn run(root: &Path) -> Result<Report, Error> {
    let config = Config::load(root)?;
    let registry = inventory::build(root, &config)?;
    let probe = DiskProbe::new(root);
    let checker = Checker::new(root, registry, &probe)?;
    return Ok(checker.check_all(&config));
}
