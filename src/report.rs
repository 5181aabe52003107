// Console rendering of a `ScalingReport`. Pure string building; printing is the caller's job.

use crate::benchmark::{ScalingReport, TestResult};
use std::fmt::Write;
use std::time::Duration;

const RULE_WIDTH: usize = 80;

/// `12.34 ms` below one second, `1.23 sec (1234 ms)` above.
pub fn format_time(milliseconds: f64) -> String {
    if milliseconds < 1000.0 {
        format!("{milliseconds:.2} ms")
    } else {
        format!("{:.2} sec ({milliseconds:.0} ms)", milliseconds / 1000.0)
    }
}

fn duration_ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

pub fn format_results(report: &ScalingReport<'_>) -> String {
    let mut out = String::new();
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);

    let _ = writeln!(out, "{heavy}\nTEST RESULTS\n{heavy}");
    if report.sizes.is_empty() {
        let _ = writeln!(out, "\nNo results: every fixture was missing or unreadable.");
        return out;
    }

    for size in &report.sizes {
        let _ = writeln!(out, "\nImage size: {} x {}\n{light}", size.size.width, size.size.height);
        for entry in &size.entries {
            let speedup = entry
                .speedup
                .map_or_else(|| "n/a".to_owned(), |s| format!("{s:.2}x"));
            let _ = writeln!(out, "  {} Speedup: {speedup}", format_row(entry.result));
        }
    }
    out
}

fn format_row(result: &TestResult) -> String {
    format!(
        "Threads: {:<2} Avg: {:<16} Min: {:<16} Max: {:<16} StdDev: {:<16}",
        result.thread_count,
        format_time(result.average_ms()),
        format_time(duration_ms(result.min())),
        format_time(duration_ms(result.max())),
        format_time(result.standard_deviation_ms()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmark::TestConfiguration;
    use crate::fixtures::ImageSize;
    use std::path::PathBuf;

    fn config(thread_counts: &[usize]) -> TestConfiguration {
        TestConfiguration::new(vec![ImageSize::new(64, 48)], thread_counts.to_vec(), 1)
    }

    fn result(thread_count: usize, timings_ms: &[u64]) -> TestResult {
        TestResult {
            width: 64,
            height: 48,
            thread_count,
            timings: timings_ms.iter().map(|&ms| Duration::from_millis(ms)).collect(),
            output_file: PathBuf::from("result_64x48.png"),
        }
    }

    #[test]
    fn times_switch_units_at_one_second() {
        assert_eq!(format_time(12.346), "12.35 ms");
        assert_eq!(format_time(1234.0), "1.23 sec (1234 ms)");
    }

    #[test]
    fn table_lists_each_thread_count_with_speedup() {
        let results = vec![result(2, &[100, 300]), result(4, &[100])];
        let report = ScalingReport::new(&results, &config(&[2, 4]));
        let text = format_results(&report);

        assert!(text.contains("Image size: 64 x 48"));
        assert!(text.contains("Threads: 2  Avg: 200.00 ms"));
        assert!(text.contains("StdDev: 100.00 ms"));
        assert!(text.contains("Speedup: 1.00x"));
        assert!(text.contains("Speedup: 2.00x"));
    }

    #[test]
    fn missing_baseline_prints_not_available() {
        let results = vec![result(4, &[100])];
        let report = ScalingReport::new(&results, &config(&[2, 4]));
        assert!(format_results(&report).contains("Speedup: n/a"));
    }

    #[test]
    fn empty_report_says_so() {
        let report = ScalingReport::new(&[], &config(&[2]));
        assert!(format_results(&report).contains("No results"));
    }
}
