//! Human-readable run summary.

use std::fmt::Write;

use crfbatch_pipeline::{JobReport, Summary};

/// Render the summary printed at the end of a run.
///
/// Without statistics (no job succeeded) only the outcome line is produced.
pub fn render(report: &JobReport, summary: Option<&Summary>) -> String {
    let mut out = format!(
        "Processed {} file(s): {} succeeded, {} failed\n",
        report.attempted, report.succeeded, report.failed
    );

    if let Some(s) = summary {
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "Median input size: {:.2} MiB ({} bytes)",
            s.median_input_mib(),
            s.median_input_bytes
        );
        let _ = writeln!(
            out,
            "Median output size: {:.2} MiB ({} bytes)",
            s.median_output_mib(),
            s.median_output_bytes
        );
        let _ = writeln!(out, "Total reduction: {:.1}%", s.reduction_percent());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_full_summary() {
        let report = JobReport {
            attempted: 3,
            succeeded: 2,
            failed: 1,
        };
        let summary = Summary {
            samples: 2,
            median_input_bytes: 3 * 1024 * 1024,
            median_output_bytes: 786_432,
            total_input_bytes: 6 * 1024 * 1024,
            total_output_bytes: 1_572_864,
        };

        assert_eq!(
            render(&report, Some(&summary)),
            "Processed 3 file(s): 2 succeeded, 1 failed\n\
             Median input size: 3.00 MiB (3145728 bytes)\n\
             Median output size: 0.75 MiB (786432 bytes)\n\
             Total reduction: 75.0%\n"
        );
    }

    #[test]
    fn renders_outcome_only_without_statistics() {
        let report = JobReport {
            attempted: 2,
            succeeded: 0,
            failed: 2,
        };
        assert_eq!(
            render(&report, None),
            "Processed 2 file(s): 0 succeeded, 2 failed\n"
        );
    }
}
