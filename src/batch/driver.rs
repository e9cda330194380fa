use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, debug_span, error, warn};

use super::inputs::{resolve_inputs, ResolvedInput};
use super::output::{output_path, write_output};
use super::types::{BatchConfig, BatchReport, ConversionResult, FileReport, FileStatus, SourceUnit};
use crate::audit::{audit, CoverageManifest};
use crate::error::ConvertError;
use crate::translate::{translate_source, TranslateOptions};

/// Read a unit, replacing invalid UTF-8 instead of failing.
pub fn read_source(path: &Path) -> Result<SourceUnit, ConvertError> {
    let bytes = fs::read(path).map_err(|source| ConvertError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let (text, lossy) = match String::from_utf8(bytes) {
        Ok(text) => (text, false),
        Err(err) => (String::from_utf8_lossy(err.as_bytes()).into_owned(), true),
    };
    if lossy {
        warn!(path = %path.display(), "invalid UTF-8 replaced while reading");
    }
    Ok(SourceUnit {
        path: path.to_path_buf(),
        text,
        lossy,
    })
}

/// Translate a unit and audit its raw text. No I/O.
pub fn convert_unit(
    unit: &SourceUnit,
    manifest: &CoverageManifest,
    options: &TranslateOptions,
) -> ConversionResult {
    ConversionResult {
        body: translate_source(&unit.text, options),
        diagnostics: audit(&unit.text, manifest),
    }
}

/// A resolved file together with its planned output path.
struct Job {
    input: PathBuf,
    output: PathBuf,
}

fn process(job: &Job, manifest: &CoverageManifest, config: &BatchConfig) -> FileStatus {
    let _span = debug_span!("unit", path = %job.input.display()).entered();

    let unit = match read_source(&job.input) {
        Ok(unit) => unit,
        Err(err) => {
            error!(%err, "failed to read unit");
            return FileStatus::Failed(err);
        }
    };

    let result = convert_unit(&unit, manifest, &config.translate);
    debug!(
        lines = result.body.lines().count(),
        diagnostics = result.diagnostics.len(),
        "translated"
    );

    if !config.dry_run {
        if let Err(err) = write_output(&job.output, &result.render(&config.runtime_module)) {
            error!(%err, "failed to write output");
            return FileStatus::Failed(err);
        }
    }

    FileStatus::Converted {
        output: job.output.clone(),
        diagnostics: result.diagnostics.len(),
    }
}

/// Warn when two inputs map to the same output file; the later one wins.
fn warn_on_collisions(jobs: &[Job]) {
    let mut owners: HashMap<&Path, &Path> = HashMap::new();
    for job in jobs {
        if let Some(previous) = owners.insert(job.output.as_path(), job.input.as_path()) {
            warn!(
                output = %job.output.display(),
                input = %job.input.display(),
                previous = %previous.display(),
                "output path already used by an earlier input"
            );
        }
    }
}

fn run_jobs(jobs: &[Job], manifest: &CoverageManifest, config: &BatchConfig) -> Vec<FileStatus> {
    if config.jobs > 1 {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(config.jobs)
            .build()
        {
            Ok(pool) => {
                return pool.install(|| {
                    jobs.par_iter()
                        .map(|job| process(job, manifest, config))
                        .collect()
                });
            }
            Err(err) => warn!(%err, "falling back to sequential processing"),
        }
    }
    jobs.iter()
        .map(|job| process(job, manifest, config))
        .collect()
}

/// Resolve `specs`, convert every file and report per input.
///
/// A failing input never stops the others. Reports come back in resolution
/// order even when units run in parallel.
pub fn run_batch<S: AsRef<str>>(
    specs: &[S],
    manifest: &CoverageManifest,
    config: &BatchConfig,
) -> BatchReport {
    let mut slots: Vec<Option<FileReport>> = Vec::new();
    let mut jobs: Vec<Job> = Vec::new();
    let mut job_slots: Vec<usize> = Vec::new();

    for resolved in resolve_inputs(specs) {
        match resolved {
            ResolvedInput::File(input) => {
                let output = output_path(&input, &config.outdir, &config.layout);
                job_slots.push(slots.len());
                slots.push(None);
                jobs.push(Job { input, output });
            }
            ResolvedInput::Missing(input) => {
                warn!(path = %input.display(), "input does not exist");
                slots.push(Some(FileReport {
                    input,
                    status: FileStatus::Missing,
                }));
            }
            ResolvedInput::Invalid { pattern, error } => {
                slots.push(Some(FileReport {
                    input: PathBuf::from(pattern),
                    status: FileStatus::Failed(error),
                }));
            }
        }
    }

    warn_on_collisions(&jobs);
    let statuses = run_jobs(&jobs, manifest, config);

    for ((slot, job), status) in job_slots.into_iter().zip(jobs).zip(statuses) {
        slots[slot] = Some(FileReport {
            input: job.input,
            status,
        });
    }

    BatchReport {
        files: slots.into_iter().flatten().collect(),
        dry_run: config.dry_run,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lossy_read_replaces_invalid_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.bgt");
        fs::write(&path, b"say(\"\xff\");").unwrap();
        let unit = read_source(&path).unwrap();
        assert!(unit.lossy);
        assert_eq!(unit.text, "say(\"\u{fffd}\");");
    }

    #[test]
    fn missing_file_read_error() {
        let err = read_source(Path::new("no/such/file.bgt")).unwrap_err();
        assert!(matches!(err, ConvertError::Read { .. }));
    }

    #[test]
    fn convert_unit_audits_raw_text() {
        let unit = SourceUnit {
            path: PathBuf::from("x.bgt"),
            text: "// play_sound is used below\nplay_sound(\"a\");".to_string(),
            lossy: false,
        };
        let manifest = CoverageManifest::from_categories([("audio", vec!["play_sound"])]);
        let result = convert_unit(&unit, &manifest, &TranslateOptions::default());
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.body, "#  play_sound is used below\nplay_sound(\"a\")\n");
    }

    #[test]
    fn convert_unit_reports_symbols_only_in_raw_text() {
        let unit = SourceUnit {
            path: PathBuf::from("x.bgt"),
            text: "/* old: play_sound(\"a\"); */\nx = null;".to_string(),
            lossy: false,
        };
        let manifest =
            CoverageManifest::from_categories([("audio", vec!["play_sound"]), ("values", vec!["null"])]);
        let result = convert_unit(&unit, &manifest, &TranslateOptions::default());
        assert_eq!(result.body, "\nx = None\n");
        assert_eq!(result.diagnostics.len(), 2);
    }
}
