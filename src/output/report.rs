//! Human-readable run report and failure file

use crate::output::RunSummary;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Prints the run report to stdout
pub fn print_summary(summary: &RunSummary) {
    let mut stdout = io::stdout().lock();
    // A closed stdout is not worth failing the run over
    let _ = write_summary(&mut stdout, summary);
}

/// Writes the run report to any writer
///
/// Every failure is listed with the study id, the submitted URL, and the raw
/// message so it can be retried by hand.
pub fn write_summary<W: Write>(out: &mut W, summary: &RunSummary) -> io::Result<()> {
    writeln!(out, "=== Indexing Summary ===\n")?;

    writeln!(
        out,
        "Started:  {}",
        summary.started_at().format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(
        out,
        "Duration: {:.1}s",
        summary.duration().num_milliseconds() as f64 / 1000.0
    )?;
    writeln!(out)?;

    writeln!(out, "Studies attempted: {}", summary.attempted())?;
    writeln!(out, "Studies indexed:   {}", summary.succeeded())?;
    writeln!(out, "Studies failed:    {}", summary.failed())?;

    if summary.has_failures() {
        writeln!(out, "\nFailures:")?;
        for failure in summary.failures() {
            let status = if failure.is_transport() {
                "no response".to_string()
            } else {
                format!("HTTP {}", failure.status)
            };
            writeln!(out, "  - study {} ({})", failure.study_id, status)?;
            if !failure.url.is_empty() {
                writeln!(out, "    url: {}", failure.url)?;
            }
            writeln!(out, "    message: {}", failure.message.trim())?;
        }
    }

    Ok(())
}

/// Writes the failed study ids, one per line
///
/// The file can be passed back with `--ids-file` to retry only those studies.
pub fn write_failed_ids(summary: &RunSummary, path: &Path) -> io::Result<()> {
    let mut content = String::new();
    for failure in summary.failures() {
        content.push_str(failure.study_id.as_str());
        content.push('\n');
    }
    fs::write(path, content)
}
