//! File watcher: runs a check on startup, then re-runs on changes under the root.

use std::path::{Component, Path};
use std::process::ExitCode;
use std::time::Duration;

use notify::{RecursiveMode, Watcher as _};

use crate::checker;
use crate::config;
use crate::diagnostics;
use crate::error;

/// Debounce delay between filesystem events and re-check.
const DEBOUNCE_MS: u64 = 100;

/// Create a filesystem watcher that signals on the given channel for every
/// create, modify, or remove outside excluded directories.
///
/// # Errors
///
/// Returns `Error::Watch` if the watcher cannot be created.
fn create_watcher(
    root: &Path,
    config: config::Config,
    tx: crossbeam_channel::Sender<()>,
) -> Result<notify::RecommendedWatcher, error::Error> {
    let root = root.to_path_buf();
    return notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
        if let Ok(event) = res
            && matches!(
                event.kind,
                notify::EventKind::Create(_)
                    | notify::EventKind::Modify(_)
                    | notify::EventKind::Remove(_)
            )
            && event.paths.iter().any(|p| return !is_in_excluded_dir(&root, p, &config))
        {
            let _ = tx.send(());
        }
    })
    .map_err(|e| {
        return error::Error::Watch { reason: format!("watcher setup failed: {e}") };
    });
}

/// Whether `path` lies under a directory the inventory skips.
fn is_in_excluded_dir(root: &Path, path: &Path, config: &config::Config) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let Some(parent) = relative.parent() else {
        return false;
    };
    return parent.components().any(|c| {
        return match c {
            Component::Normal(name) => name.to_str().is_some_and(|n| return config.is_excluded_dir(n)),
            _ => false,
        };
    });
}

/// Entry point for the watch command.
///
/// Runs an initial check, then watches the root recursively and re-checks
/// after each burst of changes. Every run rebuilds the inventory.
///
/// # Errors
///
/// Returns errors from config loading, root canonicalization, or watcher setup.
pub fn run(root: &Path) -> Result<ExitCode, error::Error> {
    eprintln!("watch: initial check");
    let mut last_code = run_check(root);

    let config = config::Config::load(root)?;
    // Events carry absolute paths.
    let absolute_root = root.canonicalize()?;
    let (tx, rx) = crossbeam_channel::unbounded();
    let mut watcher = create_watcher(&absolute_root, config, tx)?;
    watcher
        .watch(&absolute_root, RecursiveMode::Recursive)
        .map_err(|e| return error::Error::Watch { reason: format!("cannot watch {}: {e}", root.display()) })?;

    eprintln!("watch: monitoring {}, press Ctrl+C to stop", root.display());

    while rx.recv().is_ok() {
        let debounce = Duration::from_millis(DEBOUNCE_MS);
        while rx.recv_timeout(debounce).is_ok() {}
        eprintln!("watch: change detected, re-checking...");
        last_code = run_check(root);
    }

    return Ok(last_code);
}

/// Run one check and print its report. Fatal errors are rendered, not propagated,
/// so the watcher survives a transiently broken tree.
fn run_check(root: &Path) -> ExitCode {
    return match checker::run(root) {
        Ok(report) => {
            report.print();
            if report.success() {
                eprintln!("watch: no dangling links");
                ExitCode::SUCCESS
            } else {
                eprintln!("watch: {} dangling links", report.failures.len());
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::FAILURE
        },
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_in_excluded_dirs_are_ignored() {
        let config = config::Config::parse("exclude_dirs = [\"build\"]").unwrap();
        let root = Path::new("/repo");
        assert!(is_in_excluded_dir(root, Path::new("/repo/.git/index"), &config), ".git");
        assert!(is_in_excluded_dir(root, Path::new("/repo/a/node_modules/x.md"), &config), "nested");
        assert!(is_in_excluded_dir(root, Path::new("/repo/build/out.md"), &config), "configured");
        assert!(!is_in_excluded_dir(root, Path::new("/repo/docs/a.md"), &config), "content");
        assert!(!is_in_excluded_dir(root, Path::new("/repo/build"), &config), "the dir itself");
    }
}
