mod depth;
mod normalizer;
mod rewriter;
mod scan;
mod types;

pub use depth::{annotate_depth, take_braces, BraceScan, IndentState};
pub use normalizer::{normalize, strip_block_comments, substitute_literals, translate_line_comment};
pub use rewriter::{collapse_else_if, strip_terminator, unwrap_condition};
pub use scan::DelimiterMode;
pub use types::{RenderedLine, TranslateOptions};

/// Translate one unit of BGT source into a Python body.
///
/// Best effort: never fails, unbalanced braces just skew indentation for the
/// rest of the unit. The result ends with a newline.
pub fn translate_source(text: &str, options: &TranslateOptions) -> String {
    let normalized = normalize(text, options.delimiters);
    let lines = annotate_depth(&normalized, options);

    let mut out = lines
        .iter()
        .map(|line| line.render(options.indent_width))
        .collect::<Vec<_>>()
        .join("\n");
    out.push('\n');
    out
}
