use super::rewriter::{attach_block_marker, collapse_else_if, strip_terminator, unwrap_condition};
use super::scan::{code_end, find_unquoted, segments, DelimiterMode};
use super::types::{RenderedLine, TranslateOptions};

const OPEN: char = '{';
const CLOSE: char = '}';

/// Running indent counter for one unit. Never negative.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IndentState {
    level: usize,
}

impl IndentState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self) -> usize {
        self.level
    }

    /// Apply closing braces, floored at zero.
    pub fn dedent(&mut self, closes: usize) {
        self.level = self.level.saturating_sub(closes);
    }

    pub fn indent(&mut self, opens: usize) {
        self.level += opens;
    }
}

/// Result of removing one kind of brace from a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BraceScan {
    pub text: String,
    pub count: usize,
    /// Offset in `text` where the last removed brace stood.
    pub last_at: Option<usize>,
}

fn strip_into(code: &str, brace: char, scan: &mut BraceScan) {
    for ch in code.chars() {
        if ch == brace {
            scan.count += 1;
            scan.last_at = Some(scan.text.len());
        } else {
            scan.text.push(ch);
        }
    }
}

/// Count and remove every `brace` in the countable part of `line`.
pub fn take_braces(line: &str, brace: char, mode: DelimiterMode) -> BraceScan {
    let end = code_end(line, mode);
    let (body, comment) = line.split_at(end);
    let mut scan = BraceScan {
        text: String::with_capacity(line.len()),
        count: 0,
        last_at: None,
    };

    match mode {
        DelimiterMode::Flat => strip_into(body, brace, &mut scan),
        DelimiterMode::StringAware => {
            for seg in segments(body) {
                if seg.quoted {
                    scan.text.push_str(seg.text);
                } else {
                    strip_into(seg.text, brace, &mut scan);
                }
            }
        }
    }

    scan.text.push_str(comment);
    scan
}

fn comment_start(text: &str, mode: DelimiterMode) -> usize {
    find_unquoted(text, "#", mode).unwrap_or(text.len())
}

/// Give the nearest earlier line with code its block marker. Comment-only
/// lines are skipped and a trailing comment stays after the `:`.
fn mark_header(out: &mut [RenderedLine], mode: DelimiterMode) {
    let header = out
        .iter_mut()
        .rev()
        .find(|l| !l.text[..comment_start(&l.text, mode)].trim().is_empty());
    let Some(header) = header else {
        return;
    };

    let (code, comment) = header.text.split_at(comment_start(&header.text, mode));
    let code = code.trim_end();
    if code.ends_with(':') {
        return;
    }
    header.text = if comment.is_empty() {
        format!("{}:", unwrap_condition(code))
    } else {
        format!("{}: {comment}", unwrap_condition(code))
    };
}

/// Run the per-line pipeline over normalized text, threading one
/// `IndentState` through the unit.
///
/// Closing braces dedent the line they sit on; opening braces indent only the
/// lines after it.
pub fn annotate_depth(normalized: &str, options: &TranslateOptions) -> Vec<RenderedLine> {
    let mode = options.delimiters;
    let mut state = IndentState::new();
    let mut out: Vec<RenderedLine> = Vec::new();

    for line in normalized.lines() {
        let closes = take_braces(line, CLOSE, mode);
        if closes.count > 0 {
            state.dedent(closes.count);
        }

        let collapsed = collapse_else_if(&closes.text, mode);
        let opens = take_braces(&collapsed, OPEN, mode);

        let (text, headless) = match opens.last_at {
            Some(at) if opens.text[..at].trim().is_empty() => (opens.text[at..].to_string(), true),
            Some(at) => (attach_block_marker(&opens.text, at), false),
            None => (opens.text.clone(), false),
        };
        let text = strip_terminator(&text).trim().to_string();

        // A bare `{` line hands its marker to the header above it.
        if headless {
            mark_header(&mut out, mode);
        }

        out.push(RenderedLine {
            indent: if text.is_empty() { 0 } else { state.level() },
            text,
            brace_delta: opens.count as i32 - closes.count as i32,
        });

        if opens.count > 0 {
            state.indent(opens.count);
        }
    }

    out
}
