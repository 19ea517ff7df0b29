use std::path::Path;

use crate::error::Error;

/// Directory names never descended into, regardless of configuration.
pub const BUILTIN_EXCLUDED_DIRS: [&str; 2] = ["node_modules", ".git"];

/// Name of the optional project config file, looked up in the root.
pub const CONFIG_FILE_NAME: &str = ".doclinks.toml";

/// Project configuration loaded from `.doclinks.toml`.
/// `exclude_dirs` extends the built-in directory exclusions of the inventory.
/// Include/exclude patterns are path prefixes applied to documents being checked.
#[derive(Debug, Default)]
pub struct Config {
    /// Relative-path prefixes removed from the check set.
    exclude: Vec<String>,
    /// Extra directory names skipped by the inventory.
    exclude_dirs: Vec<String>,
    /// Relative-path prefixes restricting the check set. Empty means all.
    include: Vec<String>,
}

/// Raw TOML structure for `.doclinks.toml`.
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct DoclinksTomlConfig {
    /// See `Config::exclude`.
    #[serde(default)]
    exclude: Vec<String>,
    /// See `Config::exclude_dirs`.
    #[serde(default)]
    exclude_dirs: Vec<String>,
    /// See `Config::include`.
    #[serde(default)]
    include: Vec<String>,
}

impl Config {
    /// Whether the inventory should skip a directory with this name.
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        return BUILTIN_EXCLUDED_DIRS.contains(&name)
            || self.exclude_dirs.iter().any(|d| return d == name);
    }

    /// Load config from `.doclinks.toml` in the given root directory.
    /// Returns defaults if the file doesn't exist, including when `root` itself
    /// is missing or not a directory. A file that exists but is
    /// malformed is an error; the user wrote it, so it is never ignored.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(CONFIG_FILE_NAME);
        let content = match std::fs::read_to_string(&path) {
            // A missing or non-directory root is reported by the inventory.
            Err(e) if matches!(e.kind(), std::io::ErrorKind::NotFound | std::io::ErrorKind::NotADirectory) => {
                return Ok(Self::default());
            },
            Err(e) => return Err(Error::Io(e)),
            Ok(c) => c,
        };

        return Self::parse(&content);
    }

    /// Parse config from TOML content.
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlDe` if the TOML is malformed or has unknown keys.
    pub fn parse(content: &str) -> Result<Self, Error> {
        let raw: DoclinksTomlConfig = toml::from_str(content)?;
        return Ok(Self {
            exclude: raw.exclude,
            exclude_dirs: raw.exclude_dirs,
            include: raw.include,
        });
    }

    /// Check whether a registered document should be checked.
    ///
    /// A key is included if no include patterns are set (check everything),
    /// or if it starts with at least one include pattern.
    /// An included key is then excluded if it starts with any exclude pattern.
    pub fn should_check(&self, key: &str) -> bool {
        let included = self.include.is_empty()
            || self.include.iter().any(|p| return key.starts_with(p.as_str()));

        if !included {
            return false;
        }

        return !self.exclude.iter().any(|p| return key.starts_with(p.as_str()));
    }
}
