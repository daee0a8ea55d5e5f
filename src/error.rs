//! Error types for stub generation

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StubError {
    #[error("root directory not found: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("root path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("failed to read root directory {}: {source}", path.display())]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("directory walk failed: {0}")]
    Walk(#[from] ignore::Error),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid exclude pattern: {0}")]
    InvalidPattern(#[from] glob::PatternError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to write report: {0}")]
    Report(#[source] io::Error),

    #[error("{failed} stub file(s) could not be written")]
    PartialFailure { failed: usize },
}

pub type Result<T> = std::result::Result<T, StubError>;
