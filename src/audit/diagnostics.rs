use std::collections::BTreeSet;
use std::fmt;

use super::manifest::CoverageManifest;

pub const WARNING_HEADER: &str =
    "# WARN: The following BGT functions were referenced and may need explicit mapping:";
const WARNING_ITEM: &str = "#   - ";

/// A known symbol that a unit's raw text mentions. Orders by category, then symbol.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Diagnostic {
    pub category: String,
    pub symbol: String,
}

impl Diagnostic {
    pub fn new(category: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            symbol: symbol.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.category, self.symbol)
    }
}

/// Scan untranslated text for whole-word mentions of manifest symbols.
///
/// Purely textual: mentions inside strings and comments count too. Each
/// `(category, symbol)` pair is reported at most once, in sorted order.
pub fn audit(raw_text: &str, manifest: &CoverageManifest) -> Vec<Diagnostic> {
    manifest
        .symbols()
        .iter()
        .filter(|symbol| symbol.occurs_in(raw_text))
        .map(|symbol| Diagnostic::new(&symbol.category, &symbol.name))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Comment block listing the diagnostics, one `#   - category.symbol` line
/// each under a header. Empty when there is nothing to report.
pub fn render_warning_block(diagnostics: &[Diagnostic]) -> String {
    if diagnostics.is_empty() {
        return String::new();
    }

    let mut block = String::from(WARNING_HEADER);
    block.push('\n');
    for diagnostic in diagnostics {
        block.push_str(WARNING_ITEM);
        block.push_str(&diagnostic.to_string());
        block.push('\n');
    }
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> CoverageManifest {
        CoverageManifest::from_categories([
            ("net", vec!["http_get", "socket"]),
            ("audio", vec!["play_sound", "sound"]),
        ])
    }

    #[test]
    fn one_diagnostic_per_symbol_regardless_of_count() {
        let text = "play_sound(\"a\");\nplay_sound(\"b\");\nplay_sound(\"c\");";
        assert_eq!(audit(text, &manifest()), vec![Diagnostic::new("audio", "play_sound")]);
    }

    #[test]
    fn matches_are_word_bounded() {
        // `sound` only appears inside longer identifiers here.
        let text = "play_sound(x); sounds = 1; my_socket = 2;";
        assert_eq!(audit(text, &manifest()), vec![Diagnostic::new("audio", "play_sound")]);
    }

    #[test]
    fn comments_and_strings_still_count() {
        let text = "// uses http_get later\nsay(\"socket\");";
        assert_eq!(
            audit(text, &manifest()),
            vec![
                Diagnostic::new("net", "http_get"),
                Diagnostic::new("net", "socket"),
            ]
        );
    }

    #[test]
    fn output_is_sorted_and_stable() {
        let text = "socket(); sound(); http_get(); play_sound();";
        let first = audit(text, &manifest());
        let second = audit(text, &manifest());
        assert_eq!(first, second);
        let rendered: Vec<_> = first.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec!["audio.play_sound", "audio.sound", "net.http_get", "net.socket"]
        );
    }

    #[test]
    fn same_pair_listed_twice_in_manifest_reports_once() {
        let manifest = CoverageManifest::from_categories([("audio", vec!["beep", "beep"])]);
        assert_eq!(audit("beep();", &manifest).len(), 1);
    }

    #[test]
    fn empty_manifest_reports_nothing() {
        assert!(audit("play_sound();", &CoverageManifest::empty()).is_empty());
    }

    #[test]
    fn warning_block_format() {
        let block = render_warning_block(&[
            Diagnostic::new("audio", "play_sound"),
            Diagnostic::new("net", "http_get"),
        ]);
        assert_eq!(
            block,
            format!("{WARNING_HEADER}\n#   - audio.play_sound\n#   - net.http_get\n")
        );
        assert_eq!(render_warning_block(&[]), "");
    }
}
