//! Command-line arguments for the converter.

use std::path::PathBuf;

use bgt2py::batch::{BatchConfig, OutputLayout, DEFAULT_RUNTIME_MODULE};
use bgt2py::translate::{DelimiterMode, TranslateOptions};
use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};

pub const DEFAULT_COVERAGE_FILE: &str = "bgt_api_coverage.json";

#[derive(Parser)]
#[command(
    name = "bgt2py",
    version,
    about = "Convert BGT scripts to Python modules that import the BGT runtime",
    long_about = "Convert BGT scripts to Python modules that import the BGT runtime.\n\n\
                  Each output starts with the runtime import line, followed by warnings\n\
                  for any coverage-manifest symbols the script mentions."
)]
pub struct Cli {
    /// Input files or glob patterns (e.g. "src/**/*.bgt").
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<String>,

    /// Directory outputs are written to.
    #[arg(short = 'o', long = "outdir", value_name = "DIR", default_value = ".")]
    pub outdir: PathBuf,

    /// Mirror input paths under the output directory instead of flattening.
    #[arg(short = 'r', long = "relative")]
    pub relative: bool,

    /// Root that mirrored paths are made relative to (default: current directory).
    #[arg(long = "input-root", value_name = "DIR", requires = "relative")]
    pub input_root: Option<PathBuf>,

    /// Coverage manifest listing known API symbols by category.
    #[arg(long = "coverage", value_name = "PATH", default_value = DEFAULT_COVERAGE_FILE)]
    pub coverage: PathBuf,

    /// Module named in the generated `from ... import *` line.
    #[arg(long = "runtime-module", value_name = "NAME", default_value = DEFAULT_RUNTIME_MODULE)]
    pub runtime_module: String,

    /// Spaces per indentation level.
    #[arg(
        long = "indent-width",
        value_name = "N",
        default_value_t = 4,
        value_parser = clap::value_parser!(u8).range(1..=16)
    )]
    pub indent_width: u8,

    /// Ignore braces and comment markers inside string literals.
    #[arg(long = "string-aware")]
    pub string_aware: bool,

    /// Number of worker threads.
    #[arg(
        short = 'j',
        long = "jobs",
        value_name = "N",
        default_value_t = 1,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub jobs: u16,

    /// Translate and audit without writing any files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// CLI log format choices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl Cli {
    pub fn batch_config(&self) -> BatchConfig {
        let layout = if self.relative {
            let root = self
                .input_root
                .clone()
                .or_else(|| std::env::current_dir().ok())
                .unwrap_or_else(|| PathBuf::from("."));
            OutputLayout::Mirror { root }
        } else {
            OutputLayout::Flatten
        };

        BatchConfig {
            outdir: self.outdir.clone(),
            layout,
            runtime_module: self.runtime_module.clone(),
            translate: TranslateOptions {
                indent_width: usize::from(self.indent_width),
                delimiters: if self.string_aware {
                    DelimiterMode::StringAware
                } else {
                    DelimiterMode::Flat
                },
            },
            jobs: usize::from(self.jobs),
            dry_run: self.dry_run,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_flags() {
        let cli = Cli::try_parse_from(["bgt2py", "src/*.bgt"]).unwrap();
        let config = cli.batch_config();
        assert_eq!(cli.inputs, vec!["src/*.bgt"]);
        assert_eq!(cli.coverage, PathBuf::from(DEFAULT_COVERAGE_FILE));
        assert_eq!(config.outdir, PathBuf::from("."));
        assert_eq!(config.layout, OutputLayout::Flatten);
        assert_eq!(config.runtime_module, "bgt_runtime");
        assert_eq!(config.translate, TranslateOptions::default());
        assert_eq!(config.jobs, 1);
        assert!(!config.dry_run);
    }

    #[test]
    fn relative_layout_with_root() {
        let cli = Cli::try_parse_from([
            "bgt2py", "-r", "--input-root", "src", "-o", "out", "a.bgt", "b.bgt",
        ])
        .unwrap();
        let config = cli.batch_config();
        assert_eq!(
            config.layout,
            OutputLayout::Mirror {
                root: PathBuf::from("src")
            }
        );
        assert_eq!(config.outdir, PathBuf::from("out"));
        assert_eq!(cli.inputs.len(), 2);
    }

    #[test]
    fn input_root_requires_relative() {
        assert!(Cli::try_parse_from(["bgt2py", "--input-root", "src", "a.bgt"]).is_err());
    }

    #[test]
    fn inputs_are_required() {
        assert!(Cli::try_parse_from(["bgt2py"]).is_err());
    }

    #[test]
    fn translation_flags() {
        let cli = Cli::try_parse_from([
            "bgt2py",
            "--string-aware",
            "--indent-width",
            "2",
            "-j",
            "4",
            "a.bgt",
        ])
        .unwrap();
        let config = cli.batch_config();
        assert_eq!(config.translate.indent_width, 2);
        assert_eq!(config.translate.delimiters, DelimiterMode::StringAware);
        assert_eq!(config.jobs, 4);
        assert!(Cli::try_parse_from(["bgt2py", "-j", "0", "a.bgt"]).is_err());
    }
}
