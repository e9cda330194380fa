use std::sync::OnceLock;

use regex::Regex;

use super::scan::{map_code, segments, DelimiterMode};

const BLOCK_MARKER: char = ':';
const TERMINATOR: char = ';';

/// Keywords whose parenthesized condition is unwrapped.
const CONDITION_KEYWORDS: [&str; 3] = ["if", "elif", "while"];

fn else_if_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\belse\s+if\b").expect("static else-if pattern"))
}

/// Collapse `else if` (any whitespace between) into `elif`.
pub fn collapse_else_if(line: &str, mode: DelimiterMode) -> String {
    map_code(line, mode, |code| {
        else_if_pattern().replace_all(code, "elif").into_owned()
    })
}

/// Drop one trailing `;` along with surrounding trailing whitespace.
pub fn strip_terminator(line: &str) -> String {
    let trimmed = line.trim_end();
    trimmed
        .strip_suffix(TERMINATOR)
        .unwrap_or(trimmed)
        .trim_end()
        .to_string()
}

/// Put the block marker where the last opening brace stood, directly after
/// the (unwrapped) header.
pub fn attach_block_marker(text: &str, at: usize) -> String {
    let (head, tail) = text.split_at(at);
    format!(
        "{}{}{}",
        unwrap_condition(head.trim_end()),
        BLOCK_MARKER,
        tail
    )
}

/// If `cond` is exactly one balanced `( ... )` group, return its inside.
fn single_group(cond: &str) -> Option<&str> {
    if !cond.starts_with('(') || !cond.ends_with(')') {
        return None;
    }

    let last = cond.len() - 1;
    let mut depth = 0i32;
    for seg in segments(cond).into_iter().filter(|seg| !seg.quoted) {
        for (i, ch) in seg.text.char_indices() {
            match ch {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth < 0 || (depth == 0 && seg.start + i != last) {
                        return None;
                    }
                }
                _ => {}
            }
        }
    }

    (depth == 0).then(|| &cond[1..last])
}

/// `if (x > 1)` becomes `if x > 1`. Headers whose condition is not a single
/// parenthesized group come back unchanged.
pub fn unwrap_condition(head: &str) -> String {
    let trimmed = head.trim();
    for keyword in CONDITION_KEYWORDS {
        let Some(rest) = trimmed.strip_prefix(keyword) else {
            continue;
        };
        if !rest.starts_with(|c: char| c.is_whitespace() || c == '(') {
            continue;
        }
        if let Some(inner) = single_group(rest.trim()) {
            return format!("{keyword} {}", inner.trim());
        }
    }
    head.to_string()
}
