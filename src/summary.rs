use bgt2py::batch::{BatchReport, FileStatus};

/// Print one status line per input, then the totals.
pub fn print_report(report: &BatchReport) {
    let tag = if report.dry_run { "[DRY]" } else { "[OK]" };
    for file in &report.files {
        match &file.status {
            FileStatus::Converted {
                output,
                diagnostics,
            } => {
                if *diagnostics > 0 {
                    println!(
                        "{tag} {} -> {} ({diagnostics} unmapped symbol warnings)",
                        file.input.display(),
                        output.display()
                    );
                } else {
                    println!("{tag} {} -> {}", file.input.display(), output.display());
                }
            }
            FileStatus::Failed(error) => {
                eprintln!("[FAIL] {}: {error}", file.input.display());
            }
            FileStatus::Missing => {
                eprintln!("[MISSING] {}", file.input.display());
            }
        }
    }

    println!(
        "converted {}, failed {}, missing {}",
        report.converted(),
        report.failed(),
        report.missing()
    );
}
