use std::path::{Path, PathBuf};

use crate::audit::{render_warning_block, Diagnostic};
use crate::error::ConvertError;
use crate::translate::TranslateOptions;

pub const DEFAULT_RUNTIME_MODULE: &str = "bgt_runtime";
pub const OUTPUT_EXTENSION: &str = "py";

/// Where output files land relative to `outdir`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OutputLayout {
    /// `outdir/<stem>.py` for every input.
    #[default]
    Flatten,
    /// `outdir/<path relative to root>.py`.
    Mirror { root: PathBuf },
}

/// Settings for one batch run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub outdir: PathBuf,
    pub layout: OutputLayout,
    /// Module named in the `from <module> import *` line.
    pub runtime_module: String,
    pub translate: TranslateOptions,
    /// Worker threads; 1 keeps everything on the calling thread.
    pub jobs: usize,
    /// Translate and audit without writing anything.
    pub dry_run: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            outdir: PathBuf::from("."),
            layout: OutputLayout::default(),
            runtime_module: DEFAULT_RUNTIME_MODULE.to_string(),
            translate: TranslateOptions::default(),
            jobs: 1,
            dry_run: false,
        }
    }
}

/// A translation input, read once and dropped after processing.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub text: String,
    /// Invalid UTF-8 was replaced while reading.
    pub lossy: bool,
}

/// Translated body plus the sorted, deduplicated diagnostics for a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    pub body: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl ConversionResult {
    /// Import line, warning block, blank line, body.
    pub fn render(&self, runtime_module: &str) -> String {
        format!(
            "from {runtime_module} import *\n{}\n{}",
            render_warning_block(&self.diagnostics),
            self.body
        )
    }
}

#[derive(Debug)]
pub enum FileStatus {
    Converted { output: PathBuf, diagnostics: usize },
    Failed(ConvertError),
    /// A literal input path that does not exist.
    Missing,
}

#[derive(Debug)]
pub struct FileReport {
    pub input: PathBuf,
    pub status: FileStatus,
}

/// Per-input outcomes in resolution order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
    pub dry_run: bool,
}

impl BatchReport {
    pub fn converted(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Converted { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Failed(_)))
    }

    pub fn missing(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Missing))
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0 || self.missing() > 0
    }

    pub fn get(&self, input: &Path) -> Option<&FileReport> {
        self.files.iter().find(|f| f.input == input)
    }

    fn count(&self, pred: impl Fn(&FileStatus) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.status)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_without_diagnostics_keeps_blank_separator() {
        let result = ConversionResult {
            body: "x = 1\n".to_string(),
            diagnostics: Vec::new(),
        };
        assert_eq!(result.render("bgt_runtime"), "from bgt_runtime import *\n\nx = 1\n");
    }

    #[test]
    fn render_places_warnings_between_import_and_body() {
        let result = ConversionResult {
            body: "play_sound(\"a\")\n".to_string(),
            diagnostics: vec![Diagnostic::new("audio", "play_sound")],
        };
        let rendered = result.render("rt");
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines[0], "from rt import *");
        assert_eq!(lines[1], crate::audit::WARNING_HEADER);
        assert_eq!(lines[2], "#   - audio.play_sound");
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "play_sound(\"a\")");
    }
}
