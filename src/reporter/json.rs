//! JSON report generator

use crate::generator::{RunSummary, StubOutcome};
use crate::reporter::ReportSink;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    root: &'a PathBuf,
    generated_at: chrono::DateTime<chrono::Utc>,
    outcomes: &'a [StubOutcome],
    summary: &'a RunSummary,
}

/// Buffers outcomes and writes a single document once the walk finishes
pub struct JsonReporter<W: Write> {
    out: W,
    root: PathBuf,
    outcomes: Vec<StubOutcome>,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W, root: PathBuf) -> Self {
        Self {
            out,
            root,
            outcomes: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for JsonReporter<W> {
    fn record(&mut self, outcome: &StubOutcome) -> io::Result<()> {
        self.outcomes.push(outcome.clone());
        Ok(())
    }

    fn finish(&mut self, summary: &RunSummary) -> io::Result<()> {
        let report = JsonReport {
            root: &self.root,
            generated_at: chrono::Utc::now(),
            outcomes: &self.outcomes,
            summary,
        };
        serde_json::to_writer_pretty(&mut self.out, &report)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StubConfig;
    use crate::generator::generate;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_json_report_lists_every_header() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Material.h"), "").unwrap();
        fs::write(dir.path().join("Shader.h"), "").unwrap();
        fs::write(dir.path().join("Shader.cpp"), "// hand written\n").unwrap();

        let mut reporter = JsonReporter::new(Vec::new(), dir.path().to_path_buf());
        generate(dir.path(), StubConfig::default(), &mut reporter).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&reporter.into_inner()).unwrap();
        let outcomes = value["outcomes"].as_array().unwrap();
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0]["status"], "created");
        assert!(outcomes[0]["source"].as_str().unwrap().ends_with("Material.cpp"));
        assert_eq!(outcomes[1]["status"], "exists");
        assert_eq!(value["summary"]["created"], 1);
        assert_eq!(value["summary"]["existing"], 1);
        assert!(value["generated_at"].is_string());
    }

    #[test]
    fn test_nothing_written_until_finish() {
        let dir = TempDir::new().unwrap();
        let mut reporter = JsonReporter::new(Vec::new(), dir.path().to_path_buf());

        let outcome = StubOutcome {
            header: dir.path().join("foo.h"),
            source: dir.path().join("foo.cpp"),
            status: crate::generator::StubStatus::Missing,
        };
        reporter.record(&outcome).unwrap();
        assert!(reporter.out.is_empty());

        reporter.finish(&RunSummary::default()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&reporter.out).unwrap();
        assert_eq!(value["outcomes"][0]["status"], "missing");
    }

    #[test]
    fn test_aborted_run_still_reports_processed_headers() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.h"), "").unwrap();
        // `.cpp` form of this name exceeds NAME_MAX
        fs::write(dir.path().join(format!("{}.h", "z".repeat(252))), "").unwrap();

        let mut reporter = JsonReporter::new(Vec::new(), dir.path().to_path_buf());
        let result = generate(dir.path(), StubConfig::default(), &mut reporter);
        assert!(matches!(result, Err(crate::error::StubError::Write { .. })));
        assert!(dir.path().join("a.cpp").exists());

        let value: serde_json::Value = serde_json::from_slice(&reporter.into_inner()).unwrap();
        let outcomes = value["outcomes"].as_array().unwrap();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0]["status"], "created");
        assert!(outcomes[0]["source"].as_str().unwrap().ends_with("a.cpp"));
        assert_eq!(value["summary"]["created"], 1);
    }
}
