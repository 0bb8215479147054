//! Report naming and post-processing
//!
//! File names are deterministic functions of the analysis settings so a
//! re-run with the same settings replaces the earlier report instead of
//! piling up copies.

use serde::{Deserialize, Serialize};

use crate::utils::constants::DEFAULT_REPORT_TITLE;

/// Deterministic report file name for one settings combination.
///
/// `report-analysis-{model}.md`, with `-{language}` appended for any
/// non-English language and `-SuperPrompt` appended when the super prompt
/// was used.
pub fn report_file_name(model: &str, language: &str, super_prompt: bool) -> String {
    let mut name = format!("report-analysis-{}", model);
    if !language.eq_ignore_ascii_case("english") {
        name.push('-');
        name.push_str(language);
    }
    if super_prompt {
        name.push_str("-SuperPrompt");
    }
    name.push_str(".md");
    name
}

/// Ensure the report opens with a markdown H1.
///
/// Models mostly emit a title already; when no line is a top-level
/// `# ` heading the standard title is prepended.
pub fn normalize_report(analysis: &str) -> String {
    let has_heading = analysis.lines().any(|line| {
        let mut chars = line.chars();
        chars.next() == Some('#') && chars.next().map(|c| c.is_whitespace()).unwrap_or(false)
    });

    if has_heading {
        analysis.to_string()
    } else {
        format!("# {}\n\n{}", DEFAULT_REPORT_TITLE, analysis)
    }
}

/// One saved report
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEntry {
    pub path: String,
    pub content: String,
}

/// In-memory report collection. Saving to an existing path replaces the
/// older report, so the list never holds two entries for one path.
#[derive(Debug, Clone, Default)]
pub struct ReportList {
    entries: Vec<ReportEntry>,
}

impl ReportList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: String, content: String) {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.path == path) {
            existing.content = content;
        } else {
            self.entries.push(ReportEntry { path, content });
        }
    }

    pub fn remove(&mut self, path: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.path != path);
        self.entries.len() != before
    }

    pub fn files(&self) -> &[ReportEntry] {
        &self.entries
    }
}
