//! Plain text report

use crate::generator::{RunSummary, StubOutcome};
use crate::reporter::ReportSink;
use std::io::{self, Write};

pub struct TextReporter<W: Write> {
    out: W,
}

impl<W: Write> TextReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for TextReporter<W> {
    fn record(&mut self, outcome: &StubOutcome) -> io::Result<()> {
        writeln!(
            self.out,
            "{}: {}",
            outcome.status.label(),
            outcome.source.display()
        )?;
        // Lines must be visible even if a later header aborts the run
        self.out.flush()
    }

    fn finish(&mut self, _summary: &RunSummary) -> io::Result<()> {
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::StubStatus;
    use std::path::Path;

    fn outcome(source: &str, status: StubStatus) -> StubOutcome {
        StubOutcome {
            header: Path::new(source).with_extension("h"),
            source: Path::new(source).to_path_buf(),
            status,
        }
    }

    #[test]
    fn test_status_labels() {
        let mut reporter = TextReporter::new(Vec::new());
        reporter.record(&outcome("glbox/Shader.cpp", StubStatus::Created)).unwrap();
        reporter.record(&outcome("glbox/Texture.cpp", StubStatus::Exists)).unwrap();
        reporter.record(&outcome("glbox/Mesh.cpp", StubStatus::Missing)).unwrap();
        reporter
            .record(&outcome(
                "glbox/Sky.cpp",
                StubStatus::Failed {
                    error: "permission denied".to_string(),
                },
            ))
            .unwrap();
        reporter.finish(&RunSummary::default()).unwrap();

        let output = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(
            output,
            "created: glbox/Shader.cpp\n\
             exist: glbox/Texture.cpp\n\
             missing: glbox/Mesh.cpp\n\
             failed: glbox/Sky.cpp\n"
        );
    }
}
