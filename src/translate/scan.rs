/// How quoted string literals are treated when looking for comment markers,
/// braces and keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DelimiterMode {
    /// Every marker counts, including ones inside strings and comments.
    #[default]
    Flat,
    /// Markers inside quoted strings (and braces after a `#` comment) are ignored.
    StringAware,
}

/// A slice of a line that is either code or a quoted literal (quotes included).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub start: usize,
    pub text: &'a str,
    pub quoted: bool,
}

/// Split a line into code and string-literal segments, honoring `\` escapes.
/// An unterminated literal runs to the end of the line.
pub fn segments(line: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut start = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, ch) in line.char_indices() {
        match quote {
            None => {
                if ch == '"' || ch == '\'' {
                    if i > start {
                        out.push(Segment {
                            start,
                            text: &line[start..i],
                            quoted: false,
                        });
                    }
                    start = i;
                    quote = Some(ch);
                }
            }
            Some(q) => {
                if escaped {
                    escaped = false;
                    continue;
                }
                if ch == '\\' {
                    escaped = true;
                    continue;
                }
                if ch == q {
                    let end = i + ch.len_utf8();
                    out.push(Segment {
                        start,
                        text: &line[start..end],
                        quoted: true,
                    });
                    start = end;
                    quote = None;
                }
            }
        }
    }

    if start < line.len() {
        out.push(Segment {
            start,
            text: &line[start..],
            quoted: quote.is_some(),
        });
    }

    out
}

/// Byte offset of the first occurrence of `pat` that is not inside a string.
pub fn find_unquoted(line: &str, pat: &str, mode: DelimiterMode) -> Option<usize> {
    match mode {
        DelimiterMode::Flat => line.find(pat),
        DelimiterMode::StringAware => segments(line)
            .into_iter()
            .filter(|seg| !seg.quoted)
            .find_map(|seg| seg.text.find(pat).map(|pos| seg.start + pos)),
    }
}

/// Offset where the countable part of a line ends.
///
/// In flat mode the whole line counts. In string-aware mode a `#` comment
/// (outside strings) ends it.
pub fn code_end(line: &str, mode: DelimiterMode) -> usize {
    match mode {
        DelimiterMode::Flat => line.len(),
        DelimiterMode::StringAware => find_unquoted(line, "#", mode).unwrap_or(line.len()),
    }
}

/// Apply `f` to the parts of `line` that are code.
pub fn map_code<F>(line: &str, mode: DelimiterMode, f: F) -> String
where
    F: Fn(&str) -> String,
{
    match mode {
        DelimiterMode::Flat => f(line),
        DelimiterMode::StringAware => {
            let end = code_end(line, mode);
            let (body, comment) = line.split_at(end);
            let mut out = String::with_capacity(line.len());
            for seg in segments(body) {
                if seg.quoted {
                    out.push_str(seg.text);
                } else {
                    out.push_str(&f(seg.text));
                }
            }
            out.push_str(comment);
            out
        }
    }
}
