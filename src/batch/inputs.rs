use std::collections::HashSet;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::error::ConvertError;

/// What one input specification resolved to.
#[derive(Debug)]
pub enum ResolvedInput {
    File(PathBuf),
    /// Literal path that does not exist.
    Missing(PathBuf),
    /// Glob pattern that failed to compile.
    Invalid { pattern: String, error: ConvertError },
}

/// A spec is a glob when it carries any of `*`, `?` or `[`.
pub fn is_glob(spec: &str) -> bool {
    spec.contains(['*', '?', '['])
}

/// Expand input specs against the working directory.
///
/// Specs are handled in order, glob matches in the order `glob` yields them.
/// Directories and non-matching patterns are dropped silently; a path already
/// resolved by an earlier spec is not queued twice.
pub fn resolve_inputs<S: AsRef<str>>(specs: &[S]) -> Vec<ResolvedInput> {
    let mut out = Vec::new();
    let mut seen: HashSet<PathBuf> = HashSet::new();

    let mut push_file = |path: PathBuf, out: &mut Vec<ResolvedInput>| {
        if seen.insert(path.clone()) {
            out.push(ResolvedInput::File(path));
        } else {
            debug!(path = %path.display(), "input already queued");
        }
    };

    for spec in specs {
        let spec = spec.as_ref();
        if is_glob(spec) {
            let paths = match glob::glob(spec) {
                Ok(paths) => paths,
                Err(source) => {
                    warn!(pattern = spec, %source, "invalid input pattern");
                    out.push(ResolvedInput::Invalid {
                        pattern: spec.to_string(),
                        error: ConvertError::InvalidPattern {
                            pattern: spec.to_string(),
                            source,
                        },
                    });
                    continue;
                }
            };

            let mut matched = 0usize;
            for entry in paths {
                match entry {
                    Ok(path) if path.is_file() => {
                        matched += 1;
                        push_file(path, &mut out);
                    }
                    Ok(_) => {}
                    Err(error) => debug!(pattern = spec, %error, "unreadable glob entry"),
                }
            }
            if matched == 0 {
                info!(pattern = spec, "pattern matched no files");
            }
        } else {
            let path = PathBuf::from(spec);
            if path.is_file() {
                push_file(path, &mut out);
            } else if path.exists() {
                debug!(path = spec, "skipping non-file input");
            } else {
                out.push(ResolvedInput::Missing(path));
            }
        }
    }

    out
}
