/// Crate-level error types for doclinks diagnostics.
use std::path::PathBuf;

/// Fatal errors only. Dangling links and unreadable documents are reported as
/// `ResolutionFailure` values and never surface here.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// A built-in reference pattern failed to compile.
    #[error("regex: {0}")]
    Regex(
        /// The wrapped regex construction error.
        #[from]
        regex::Error,
    ),

    /// The collection root does not exist or is not a directory.
    #[error("root not found: {}", path.display())]
    RootNotFound {
        /// The root directory that was requested.
        path: PathBuf,
    },

    /// TOML deserialization of `.doclinks.toml` failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// A directory inside the collection could not be listed.
    #[error("walk: {0}")]
    Walk(
        /// The wrapped directory traversal error.
        #[from]
        walkdir::Error,
    ),

    /// The filesystem watcher could not be set up.
    #[error("watch: {reason}")]
    Watch {
        /// Description of the watcher failure.
        reason: String,
    },
}
