//! Stub generation settings
//!
//! Settings come from three layers: built-in defaults, an optional TOML file,
//! and command-line overrides applied by the binary.
//!
//! ```toml
//! header_extension = "hpp"
//! source_extension = "cc"
//! directive = "#include <{header}>"
//! respect_ignore = true
//! exclude = ["third_party/**", "build"]
//! ```

use crate::error::{Result, StubError};
use glob::Pattern;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Root scanned when none is given on the command line
pub const DEFAULT_ROOT: &str = "glbox";

/// Placeholder replaced by the header's file name in the directive template
pub const HEADER_PLACEHOLDER: &str = "{header}";

pub const DEFAULT_HEADER_EXTENSION: &str = "h";
pub const DEFAULT_SOURCE_EXTENSION: &str = "cpp";
pub const DEFAULT_DIRECTIVE: &str = "#include \"{header}\"";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StubConfig {
    /// Extension identifying header files, without the leading dot
    pub header_extension: String,
    /// Extension given to generated source files, without the leading dot
    pub source_extension: String,
    /// Single-line template written into each stub
    pub directive: String,
    /// Honour `.gitignore`/`.ignore` files and skip hidden entries
    pub respect_ignore: bool,
    /// Glob patterns, relative to the root, to leave out of the walk
    pub exclude: Vec<String>,
    /// Report missing stubs without writing them
    #[serde(skip)]
    pub dry_run: bool,
    /// Record write failures and continue instead of aborting
    #[serde(skip)]
    pub keep_going: bool,
}

impl Default for StubConfig {
    fn default() -> Self {
        Self {
            header_extension: DEFAULT_HEADER_EXTENSION.to_string(),
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
            directive: DEFAULT_DIRECTIVE.to_string(),
            respect_ignore: false,
            exclude: Vec::new(),
            dry_run: false,
            keep_going: false,
        }
    }
}

impl StubConfig {
    /// Load settings from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| StubError::Config {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| StubError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Normalize extensions and reject settings that cannot produce a valid stub
    pub fn validate(mut self) -> Result<Self> {
        self.header_extension = normalize_extension(&self.header_extension, "header")?;
        self.source_extension = normalize_extension(&self.source_extension, "source")?;

        if self.header_extension == self.source_extension {
            return Err(StubError::InvalidConfig(format!(
                "header and source extensions are both `{}`",
                self.header_extension
            )));
        }

        if !self.directive.contains(HEADER_PLACEHOLDER) {
            return Err(StubError::InvalidConfig(format!(
                "directive `{}` does not contain {}",
                self.directive, HEADER_PLACEHOLDER
            )));
        }

        if self.directive.contains('\n') || self.directive.contains('\r') {
            return Err(StubError::InvalidConfig(
                "directive must be a single line".to_string(),
            ));
        }

        // Surface bad patterns here rather than halfway through a walk
        self.exclude_patterns()?;

        Ok(self)
    }

    pub fn exclude_patterns(&self) -> Result<Vec<Pattern>> {
        self.exclude
            .iter()
            .map(|p| Pattern::new(p).map_err(StubError::from))
            .collect()
    }
}

fn normalize_extension(raw: &str, kind: &str) -> Result<String> {
    let ext = raw.trim().trim_start_matches('.');

    if ext.is_empty() {
        return Err(StubError::InvalidConfig(format!("{} extension is empty", kind)));
    }
    if ext.contains(['/', '\\']) {
        return Err(StubError::InvalidConfig(format!(
            "{} extension `{}` contains a path separator",
            kind, raw
        )));
    }

    Ok(ext.to_string())
}
