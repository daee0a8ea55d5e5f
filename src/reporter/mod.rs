//! Report generation module
//!
//! Streams per-header outcomes to stdout as plain lines or collects them into
//! a JSON document.

mod json;
mod text;

pub use json::JsonReporter;
pub use text::TextReporter;

use crate::generator::{RunSummary, StubOutcome};
use std::io;

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One `created:`/`exist:` line per header
    #[default]
    Text,
    /// Pretty-printed JSON document
    Json,
}

/// Receives outcomes while the generator walks the tree
pub trait ReportSink {
    fn record(&mut self, outcome: &StubOutcome) -> io::Result<()>;

    fn finish(&mut self, summary: &RunSummary) -> io::Result<()>;
}
