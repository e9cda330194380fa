use std::sync::OnceLock;

use regex::Regex;

use super::scan::{find_unquoted, map_code, DelimiterMode};

const BLOCK_OPEN: &str = "/*";
const BLOCK_CLOSE: &str = "*/";
const LINE_COMMENT: &str = "//";
const TARGET_COMMENT: &str = "# ";

/// Whole-word literal substitutions, applied in order.
fn literal_rules() -> &'static [(Regex, &'static str)] {
    static RULES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    RULES.get_or_init(|| {
        [("true", "True"), ("false", "False"), ("null", "None")]
            .into_iter()
            .map(|(word, replacement)| {
                let re = Regex::new(&format!(r"\b{word}\b")).expect("static literal pattern");
                (re, replacement)
            })
            .collect()
    })
}

/// Remove `/* ... */` spans. The first `*/` closes the comment, nesting is not
/// recognized, and an unterminated opener is left in place.
pub fn strip_block_comments(text: &str, mode: DelimiterMode) -> String {
    match mode {
        DelimiterMode::Flat => strip_block_comments_flat(text),
        DelimiterMode::StringAware => strip_block_comments_aware(text),
    }
}

fn strip_block_comments_flat(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find(BLOCK_OPEN) {
        let after_open = &rest[open + BLOCK_OPEN.len()..];
        match after_open.find(BLOCK_CLOSE) {
            Some(close) => {
                out.push_str(&rest[..open]);
                rest = &after_open[close + BLOCK_CLOSE.len()..];
            }
            None => break,
        }
    }

    out.push_str(rest);
    out
}

#[derive(Clone, Copy, PartialEq)]
enum ScanState {
    Code,
    Quoted { quote: char, escaped: bool },
    LineComment,
}

/// Like the flat variant, but `/*` inside a string literal or after a `//`
/// comment does not open a block comment.
fn strip_block_comments_aware(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut state = ScanState::Code;
    let mut i = 0usize;

    while i < text.len() {
        let rest = &text[i..];
        let Some(ch) = rest.chars().next() else {
            break;
        };

        match state {
            ScanState::Code => {
                if rest.starts_with(BLOCK_OPEN) {
                    if let Some(close) = rest[BLOCK_OPEN.len()..].find(BLOCK_CLOSE) {
                        i += BLOCK_OPEN.len() + close + BLOCK_CLOSE.len();
                        continue;
                    }
                    out.push_str(rest);
                    break;
                }
                if rest.starts_with(LINE_COMMENT) {
                    state = ScanState::LineComment;
                } else if ch == '"' || ch == '\'' {
                    state = ScanState::Quoted {
                        quote: ch,
                        escaped: false,
                    };
                }
            }
            ScanState::Quoted { quote, escaped } => {
                state = if escaped {
                    ScanState::Quoted {
                        quote,
                        escaped: false,
                    }
                } else if ch == '\\' {
                    ScanState::Quoted {
                        quote,
                        escaped: true,
                    }
                } else if ch == quote || ch == '\n' {
                    ScanState::Code
                } else {
                    state
                };
            }
            ScanState::LineComment => {
                if ch == '\n' {
                    state = ScanState::Code;
                }
            }
        }

        out.push(ch);
        i += ch.len_utf8();
    }

    out
}

/// Rewrite the first `//` on a line into a `# ` comment, keeping its content.
pub fn translate_line_comment(line: &str, mode: DelimiterMode) -> String {
    match find_unquoted(line, LINE_COMMENT, mode) {
        Some(pos) => {
            let mut out = String::with_capacity(line.len() + 1);
            out.push_str(&line[..pos]);
            out.push_str(TARGET_COMMENT);
            out.push_str(&line[pos + LINE_COMMENT.len()..]);
            out
        }
        None => line.to_string(),
    }
}

/// Replace whole-word `true`, `false` and `null` with their Python spelling.
pub fn substitute_literals(line: &str, mode: DelimiterMode) -> String {
    map_code(line, mode, |code| {
        let mut text = code.to_string();
        for (re, replacement) in literal_rules() {
            if re.is_match(&text) {
                text = re.replace_all(&text, *replacement).into_owned();
            }
        }
        text
    })
}

/// Full normalization pass over a unit's text.
///
/// Line endings are unified to `\n` first; the result keeps one line per
/// line of the comment-stripped input.
pub fn normalize(text: &str, mode: DelimiterMode) -> String {
    let unified = text.replace("\r\n", "\n");
    let stripped = strip_block_comments(&unified, mode);

    stripped
        .lines()
        .map(|line| {
            let commented = translate_line_comment(line, mode);
            substitute_literals(&commented, mode)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_comment_removed_across_lines() {
        let text = "a = 1; /* one\ntwo */ b = 2;";
        assert_eq!(
            strip_block_comments(text, DelimiterMode::Flat),
            "a = 1;  b = 2;"
        );
    }

    #[test]
    fn first_close_ends_nested_comment() {
        let text = "/* outer /* inner */ tail */";
        assert_eq!(strip_block_comments(text, DelimiterMode::Flat), " tail */");
    }

    #[test]
    fn unterminated_block_comment_is_kept() {
        let text = "x; /* never closed";
        assert_eq!(strip_block_comments(text, DelimiterMode::Flat), text);
    }

    #[test]
    fn aware_mode_ignores_openers_in_strings() {
        let text = "s = \"/* not */\"; /* gone */";
        assert_eq!(
            strip_block_comments(text, DelimiterMode::StringAware),
            "s = \"/* not */\"; "
        );
        assert_eq!(strip_block_comments(text, DelimiterMode::Flat), "s = \"\"; ");
    }

    #[test]
    fn aware_mode_ignores_openers_in_line_comments() {
        let text = "x; // see /*\ny; */";
        assert_eq!(strip_block_comments(text, DelimiterMode::StringAware), text);
    }

    #[test]
    fn line_comment_marker_translated_once() {
        assert_eq!(
            translate_line_comment("x = 1; // a // b", DelimiterMode::Flat),
            "x = 1; #  a // b"
        );
        assert_eq!(translate_line_comment("no comment", DelimiterMode::Flat), "no comment");
    }

    #[test]
    fn literals_are_word_bounded() {
        assert_eq!(
            substitute_literals("if (x == null || y != true) nullable = false;", DelimiterMode::Flat),
            "if (x == None || y != True) nullable = False;"
        );
        assert_eq!(
            substitute_literals("is_null(truechance)", DelimiterMode::Flat),
            "is_null(truechance)"
        );
    }

    #[test]
    fn aware_mode_keeps_literals_inside_strings() {
        assert_eq!(
            substitute_literals(r#"say("true"); x = true"#, DelimiterMode::StringAware),
            r#"say("true"); x = True"#
        );
    }

    #[test]
    fn normalize_unifies_line_endings() {
        let out = normalize("a = true;\r\n// hi\r\n", DelimiterMode::Flat);
        assert_eq!(out, "a = True;\n#  hi");
    }

    #[test]
    fn normalize_is_idempotent_on_normalized_text() {
        let source = "/* header */\nbool x = true; // flag\nif (y == null) {\n}\n";
        let once = normalize(source, DelimiterMode::Flat);
        let twice = normalize(&once, DelimiterMode::Flat);
        assert_eq!(once, twice);
    }
}
