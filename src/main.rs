mod cli;
mod summary;

use std::io::{self, IsTerminal};

use bgt2py::audit::CoverageManifest;
use bgt2py::batch::run_batch;
use bgt2py::logging::{init_logging, LogConfig, LogFormat};
use clap::Parser;

use crate::cli::{Cli, LogFormatArg};
use crate::summary::print_report;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging(&log_config_from_cli(&cli)) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let manifest = CoverageManifest::load_or_empty(&cli.coverage);
    let report = run_batch(&cli.inputs, &manifest, &cli.batch_config());
    print_report(&report);

    std::process::exit(if report.has_failures() { 1 } else { 0 });
}

fn log_config_from_cli(cli: &Cli) -> LogConfig {
    LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        use_env_filter: !cli.verbosity.is_present(),
        format: match cli.log_format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        },
        with_ansi: io::stderr().is_terminal(),
        log_file: cli.log_file.clone(),
    }
}
