//! Header-to-source name mapping and stub contents

use crate::config::HEADER_PLACEHOLDER;
use std::path::{Path, PathBuf};

/// Base name of a header, or `None` if `file_name` is not a header.
///
/// A name that is nothing but dots once the extension is removed (`.h`)
/// keeps its full name as the base, so `.h` maps to `.h.cpp`.
pub fn header_base_name<'a>(file_name: &'a str, header_extension: &str) -> Option<&'a str> {
    let stem = file_name
        .strip_suffix(header_extension)?
        .strip_suffix('.')?;

    if stem.trim_start_matches('.').is_empty() {
        Some(file_name)
    } else {
        Some(stem)
    }
}

/// Source path next to `header` with the same base name
pub fn candidate_path(header: &Path, base_name: &str, source_extension: &str) -> PathBuf {
    header.with_file_name(format!("{}.{}", base_name, source_extension))
}

/// Contents of a stub: the directive for `header_name` and a trailing newline
pub fn render_directive(template: &str, header_name: &str) -> String {
    let mut line = template.replace(HEADER_PLACEHOLDER, header_name);
    line.push('\n');
    line
}
