use crate::config::CONFIG_FILE_NAME;
use crate::error::Error;

/// ANSI bold, used for headings.
const BOLD: &str = "\x1b[1m";
/// ANSI reset.
const RESET: &str = "\x1b[0m";

/// Render a fatal error as markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
    return;
}

/// Render a fatal error as a structured markdown diagnostic:
/// what happened and, where there is one, how to fix it.
pub fn render_error(e: &Error) -> String {
    return match e {
        Error::RootNotFound { path } => format!("\
# Error: Root Not Found

`{}` does not exist or is not a directory.

## Fix

Run from the documentation root, or pass it explicitly:

    doclinks check --root path/to/docs
", path.display()),

        Error::Walk(err) => {
            let location = err.path().map_or_else(String::new, |p| return format!(" `{}`", p.display()));
            format!("\
# Error: Unreadable Directory

Could not list{location}: {err}

The inventory is incomplete, so no links were checked.

## Fix

Fix the permissions, or add the directory name to `exclude_dirs` in `{CONFIG_FILE_NAME}`.
")
        },

        Error::TomlDe(err) => format!("\
# Error: Invalid Config

`{CONFIG_FILE_NAME}` could not be parsed:

{err}

## Fix

Allowed keys are `exclude_dirs`, `include`, and `exclude`, each a list of strings.
"),

        Error::Watch { reason } => format!("\
# Error: Watch Failed

{reason}
"),

        Error::Io(err) => format!("\
# Error: I/O

{err}
"),

        Error::Regex(err) => format!("\
# Error: Invalid Pattern

{err}
"),
    };
}
