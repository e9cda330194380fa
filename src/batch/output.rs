use std::fs;
use std::path::{Component, Path, PathBuf};

use super::types::{OutputLayout, OUTPUT_EXTENSION};
use crate::error::ConvertError;

/// Compute where the translation of `src` is written.
pub fn output_path(src: &Path, outdir: &Path, layout: &OutputLayout) -> PathBuf {
    let renamed = src.with_extension(OUTPUT_EXTENSION);
    match layout {
        OutputLayout::Flatten => match renamed.file_name() {
            Some(name) => outdir.join(name),
            None => outdir.join(&renamed),
        },
        OutputLayout::Mirror { root } => outdir.join(mirrored_relative(&renamed, root)),
    }
}

/// `path` relative to `root` when it lies under it; otherwise the path with
/// its root, prefix and `..` components dropped so it stays inside outdir.
fn mirrored_relative(path: &Path, root: &Path) -> PathBuf {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect()
}

/// Write `contents`, creating missing parent directories first.
pub fn write_output(path: &Path, contents: &str) -> Result<(), ConvertError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ConvertError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, contents).map_err(|source| ConvertError::Write {
        path: path.to_path_buf(),
        source,
    })
}
