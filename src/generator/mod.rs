//! Stub generation
//!
//! Walks a directory tree and gives every header without a matching source
//! file a one-line stub that includes it.

mod stub;

use stub::{candidate_path, header_base_name, render_directive};

use crate::config::StubConfig;
use crate::error::{Result, StubError};
use crate::reporter::ReportSink;
use glob::Pattern;
use ignore::WalkBuilder;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// What happened to a single header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StubStatus {
    Created,
    Exists,
    /// Dry run: the source would have been created
    Missing,
    /// Keep-going run: the source could not be written
    Failed { error: String },
}

impl StubStatus {
    /// Label used in text reports
    pub fn label(&self) -> &'static str {
        match self {
            StubStatus::Created => "created",
            StubStatus::Exists => "exist",
            StubStatus::Missing => "missing",
            StubStatus::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StubOutcome {
    pub header: PathBuf,
    pub source: PathBuf,
    #[serde(flatten)]
    pub status: StubStatus,
}

/// Per-status counts for a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub created: usize,
    pub existing: usize,
    pub missing: usize,
    pub failed: usize,
}

impl RunSummary {
    fn record(&mut self, status: &StubStatus) {
        match status {
            StubStatus::Created => self.created += 1,
            StubStatus::Exists => self.existing += 1,
            StubStatus::Missing => self.missing += 1,
            StubStatus::Failed { .. } => self.failed += 1,
        }
    }

    pub fn headers(&self) -> usize {
        self.created + self.existing + self.missing + self.failed
    }
}

/// Stub generator bound to one root directory
pub struct StubGenerator {
    root: PathBuf,
    config: StubConfig,
    excludes: Vec<Pattern>,
}

impl StubGenerator {
    /// Create a generator. The root must be an existing, readable directory.
    pub fn new(root: &Path, config: StubConfig) -> Result<Self> {
        check_root(root)?;
        let excludes = config.exclude_patterns()?;

        Ok(Self {
            root: root.to_path_buf(),
            config,
            excludes,
        })
    }

    /// Walk the tree, creating missing stubs and reporting each header to `sink`
    pub fn run(&self, sink: &mut dyn ReportSink) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        let walked = self.process_tree(sink, &mut summary);

        // Headers handled before an abort are still reported
        let finished = sink.finish(&summary).map_err(StubError::Report);
        walked?;
        finished?;

        if summary.failed > 0 {
            return Err(StubError::PartialFailure {
                failed: summary.failed,
            });
        }

        Ok(summary)
    }

    fn process_tree(&self, sink: &mut dyn ReportSink, summary: &mut RunSummary) -> Result<()> {
        for entry in self.walker() {
            let entry = entry?;
            let path = entry.path();

            // Symlinked directories are not followed but still show up as entries
            let is_dir = if entry.path_is_symlink() {
                path.is_dir()
            } else {
                entry.file_type().is_some_and(|ft| ft.is_dir())
            };
            if is_dir {
                continue;
            }

            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                debug!(path = %path.display(), "skipping non UTF-8 file name");
                continue;
            };

            let Some(base_name) = header_base_name(file_name, &self.config.header_extension)
            else {
                continue;
            };

            let source = candidate_path(path, base_name, &self.config.source_extension);
            let status = match self.process_header(file_name, &source) {
                Ok(status) => status,
                Err(err) if self.config.keep_going => {
                    warn!("{}", err);
                    StubStatus::Failed {
                        error: err.to_string(),
                    }
                }
                Err(err) => return Err(err),
            };

            summary.record(&status);
            let outcome = StubOutcome {
                header: path.to_path_buf(),
                source,
                status,
            };
            sink.record(&outcome).map_err(StubError::Report)?;
        }

        Ok(())
    }

    fn walker(&self) -> ignore::Walk {
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .standard_filters(self.config.respect_ignore)
            .require_git(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b));

        if !self.excludes.is_empty() {
            let root = self.root.clone();
            let excludes = self.excludes.clone();
            builder.filter_entry(move |entry| !is_excluded(&root, entry.path(), &excludes));
        }

        builder.build()
    }

    fn process_header(&self, header_name: &str, source: &Path) -> Result<StubStatus> {
        // symlink_metadata so a dangling link counts as present and is never written through
        if fs::symlink_metadata(source).is_ok() {
            return Ok(StubStatus::Exists);
        }

        if self.config.dry_run {
            return Ok(StubStatus::Missing);
        }

        let contents = render_directive(&self.config.directive, header_name);
        match write_stub(source, &contents) {
            Ok(()) => {
                debug!(source = %source.display(), "stub written");
                Ok(StubStatus::Created)
            }
            // Appeared between the check and the write
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => Ok(StubStatus::Exists),
            Err(source_err) => Err(StubError::Write {
                path: source.to_path_buf(),
                source: source_err,
            }),
        }
    }
}

/// Convenience wrapper: build a generator for `root` and run it once
pub fn generate(root: &Path, config: StubConfig, sink: &mut dyn ReportSink) -> Result<RunSummary> {
    StubGenerator::new(root, config)?.run(sink)
}

fn check_root(root: &Path) -> Result<()> {
    let metadata = fs::metadata(root).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => StubError::RootNotFound(root.to_path_buf()),
        _ => StubError::RootUnreadable {
            path: root.to_path_buf(),
            source,
        },
    })?;

    if !metadata.is_dir() {
        return Err(StubError::NotADirectory(root.to_path_buf()));
    }

    fs::read_dir(root).map_err(|source| StubError::RootUnreadable {
        path: root.to_path_buf(),
        source,
    })?;

    Ok(())
}

fn is_excluded(root: &Path, path: &Path, excludes: &[Pattern]) -> bool {
    match path.strip_prefix(root) {
        Ok(relative) if !relative.as_os_str().is_empty() => {
            excludes.iter().any(|p| p.matches_path(relative))
        }
        _ => false,
    }
}

fn write_stub(path: &Path, contents: &str) -> io::Result<()> {
    let file = OpenOptions::new().write(true).create_new(true).open(path)?;
    fill_or_remove(path, file, contents)
}

/// Write `contents` to the freshly created `path`, deleting it if the write fails.
/// A partial stub would otherwise be reported as existing on every later run.
fn fill_or_remove<W: Write>(path: &Path, mut out: W, contents: &str) -> io::Result<()> {
    let written = out
        .write_all(contents.as_bytes())
        .and_then(|()| out.flush());

    if written.is_err() {
        drop(out);
        let _ = fs::remove_file(path);
    }
    written
}
