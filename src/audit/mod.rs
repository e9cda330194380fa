mod diagnostics;
mod manifest;

pub use diagnostics::{audit, render_warning_block, Diagnostic, WARNING_HEADER};
pub use manifest::{CoverageManifest, ManifestSymbol};
