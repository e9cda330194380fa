use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use regex::Regex;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::ManifestError;

/// On-disk shape: `{"categories": {"audio": ["play_sound", ...], ...}}`.
/// Unknown top-level keys are ignored.
#[derive(Debug, Deserialize)]
struct ManifestFile {
    categories: BTreeMap<String, Vec<String>>,
}

/// One known symbol with its precompiled whole-word matcher.
#[derive(Debug, Clone)]
pub struct ManifestSymbol {
    pub category: String,
    pub name: String,
    matcher: Regex,
}

impl ManifestSymbol {
    fn new(category: &str, name: &str) -> Result<Self, regex::Error> {
        let matcher = Regex::new(&format!(r"\b{}\b", regex::escape(name)))?;
        Ok(Self {
            category: category.to_string(),
            name: name.to_string(),
            matcher,
        })
    }

    /// Whole-word occurrence anywhere in `text`.
    pub fn occurs_in(&self, text: &str) -> bool {
        self.matcher.is_match(text)
    }
}

/// Known API symbols grouped by category. Read-only once loaded.
#[derive(Debug, Clone, Default)]
pub struct CoverageManifest {
    symbols: Vec<ManifestSymbol>,
}

impl CoverageManifest {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from `(category, symbols)` pairs. Blank names are skipped.
    pub fn from_categories<I, C, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = (C, Vec<S>)>,
        C: AsRef<str>,
        S: AsRef<str>,
    {
        let mut symbols = Vec::new();
        for (category, names) in categories {
            for name in names {
                let name = name.as_ref().trim();
                if name.is_empty() {
                    continue;
                }
                match ManifestSymbol::new(category.as_ref(), name) {
                    Ok(symbol) => symbols.push(symbol),
                    Err(error) => warn!(
                        category = category.as_ref(),
                        symbol = name,
                        %error,
                        "skipping manifest symbol"
                    ),
                }
            }
        }
        Self { symbols }
    }

    pub fn parse(json: &str) -> Result<Self, ManifestError> {
        let value: serde_json::Value = serde_json::from_str(json).map_err(ManifestError::Parse)?;
        let file: ManifestFile = serde_json::from_value(value).map_err(ManifestError::Shape)?;
        Ok(Self::from_categories(file.categories))
    }

    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let text = fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|error| error.at(path))
    }

    /// Load, degrading to an empty manifest on any failure.
    ///
    /// A missing file is routine and logged at info; an unreadable or
    /// malformed one is logged at warn so the operator can tell them apart.
    pub fn load_or_empty(path: &Path) -> Self {
        if !path.exists() {
            info!(path = %path.display(), "no coverage manifest, auditing disabled");
            return Self::empty();
        }
        match Self::load(path) {
            Ok(manifest) => {
                info!(
                    path = %path.display(),
                    symbols = manifest.len(),
                    "loaded coverage manifest"
                );
                manifest
            }
            Err(error) => {
                warn!(%error, "ignoring coverage manifest");
                Self::empty()
            }
        }
    }

    pub fn symbols(&self) -> &[ManifestSymbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_categories() {
        let manifest = CoverageManifest::parse(
            r#"{"version": 2, "categories": {"audio": ["play_sound", "sound_stop"], "net": ["http_get"]}}"#,
        )
        .unwrap();
        assert_eq!(manifest.len(), 3);
        let names: Vec<_> = manifest
            .symbols()
            .iter()
            .map(|s| format!("{}.{}", s.category, s.name))
            .collect();
        assert_eq!(names, vec!["audio.play_sound", "audio.sound_stop", "net.http_get"]);
    }

    #[test]
    fn wrong_shape_is_an_error() {
        assert!(matches!(
            CoverageManifest::parse(r#"{"categories": ["audio"]}"#),
            Err(ManifestError::Shape(_))
        ));
        assert!(matches!(
            CoverageManifest::parse(r#"{"categories": {"audio": "play_sound"}}"#),
            Err(ManifestError::Shape(_))
        ));
        assert!(matches!(
            CoverageManifest::parse(r#"{"other": {}}"#),
            Err(ManifestError::Shape(_))
        ));
        assert!(matches!(
            CoverageManifest::parse("not json"),
            Err(ManifestError::Parse(_))
        ));
    }

    #[test]
    fn load_attaches_path_to_shape_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cov.json");
        fs::write(&path, r#"{"categories": 3}"#).unwrap();
        match CoverageManifest::load(&path) {
            Err(ManifestError::ShapeFile { path: at, .. }) => assert_eq!(at, path),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn blank_symbols_are_skipped() {
        let manifest = CoverageManifest::from_categories([("audio", vec!["", "  ", "beep"])]);
        assert_eq!(manifest.len(), 1);
    }

    #[test]
    fn symbols_with_regex_metacharacters_match_literally() {
        let manifest = CoverageManifest::from_categories([("math", vec!["a.b"])]);
        let symbol = &manifest.symbols()[0];
        assert!(symbol.occurs_in("x = a.b(1)"));
        assert!(!symbol.occurs_in("x = axb(1)"));
    }

    #[test]
    fn missing_file_degrades_to_empty() {
        let manifest = CoverageManifest::load_or_empty(Path::new("definitely/not/here.json"));
        assert!(manifest.is_empty());
    }
}
