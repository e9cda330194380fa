/// One output line with the depth metadata assigned by the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    /// Rewritten text without indentation; empty for blank lines.
    pub text: String,
    /// Opening minus closing braces found on the source line.
    pub brace_delta: i32,
    /// Indent level the line is rendered at.
    pub indent: usize,
}

impl RenderedLine {
    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }

    /// Render with `width` spaces per indent level. Blank lines carry no indentation.
    pub fn render(&self, width: usize) -> String {
        if self.is_blank() {
            String::new()
        } else {
            format!("{}{}", " ".repeat(self.indent * width), self.text)
        }
    }
}

/// Knobs for a single translation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslateOptions {
    /// Spaces per indent level.
    pub indent_width: usize,
    pub delimiters: super::DelimiterMode,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            indent_width: 4,
            delimiters: super::DelimiterMode::Flat,
        }
    }
}
