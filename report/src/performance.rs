//! Performance analysis report
//!
//! Lays out both simulation datasets, a side-by-side comparison table and an
//! overall verdict. Rendering is a pure function of its inputs, including the
//! timestamp, so identical inputs give identical text.

use crate::config::ReportConfig;
use crate::dataset::SimulationDataset;
use crate::rule;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use simlog::{compare_tests, PerformanceMetrics};
use tracing::warn;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const LABEL_WIDTH: usize = 26;
const VALUE_WIDTH: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    NoSimulationData,
    AllTestsPassed,
    SomeTestsFailed,
}

impl OverallStatus {
    pub fn evaluate(a: &SimulationDataset, b: &SimulationDataset) -> Self {
        if a.total() == 0 && b.total() == 0 {
            OverallStatus::NoSimulationData
        } else if a.all_passed() && b.all_passed() {
            OverallStatus::AllTestsPassed
        } else {
            OverallStatus::SomeTestsFailed
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            OverallStatus::NoSimulationData => "NO SIMULATION DATA FOUND",
            OverallStatus::AllTestsPassed => "ALL TESTS PASSED",
            OverallStatus::SomeTestsFailed => "SOME TESTS FAILED",
        }
    }
}

/// Report time: `SOURCE_DATE_EPOCH` when set, otherwise now.
pub fn report_timestamp() -> DateTime<Utc> {
    match std::env::var("SOURCE_DATE_EPOCH") {
        Ok(value) => match value
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
        {
            Some(pinned) => pinned,
            None => {
                warn!("Ignoring invalid SOURCE_DATE_EPOCH: {}", value);
                Utc::now()
            }
        },
        Err(_) => Utc::now(),
    }
}

pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

fn dataset_section(lines: &mut Vec<String>, dataset: &SimulationDataset) {
    lines.push(rule('-'));
    lines.push(format!("{} RESULTS", dataset.title.to_uppercase()));
    lines.push(rule('-'));

    if !dataset.tests.is_empty() {
        lines.push(String::new());
        lines.push("Test Results:".to_string());
        for test in &dataset.tests {
            lines.push(format!("  [{}] {}", test.status(), test.name));
        }
        lines.push(String::new());
        lines.push(format!(
            "Summary: {}/{} tests passed ({}%)",
            dataset.passed(),
            dataset.total(),
            dataset.pass_rate()
        ));
    }

    let metrics = &dataset.metrics;
    if metrics.has_data() {
        lines.push(String::new());
        lines.push("Performance Metrics:".to_string());
        lines.push(format!("  Total Writes:    {}", metrics.total_writes));
        lines.push(format!("  Total Reads:     {}", metrics.total_reads));
        lines.push(format!(
            "  Peak Occupancy:  {}/{} ({}%)",
            metrics.peak_occupancy,
            metrics.fifo_depth,
            dataset.occupancy_percent()
        ));
        if metrics.throughput_mbps > 0.0 {
            lines.push(format!("  Throughput:      {:.2} MB/s", metrics.throughput_mbps));
        }
        if metrics.success_rate > 0.0 {
            lines.push(format!("  Success Rate:    {}%", metrics.success_rate));
        }
    }

    lines.push(String::new());
}

fn table_row(label: &str, a: impl std::fmt::Display, b: impl std::fmt::Display) -> String {
    format!(
        "{:<lw$}{:>vw$}{:>vw$}",
        label,
        a.to_string(),
        b.to_string(),
        lw = LABEL_WIDTH,
        vw = VALUE_WIDTH
    )
}

fn comparison_section(lines: &mut Vec<String>, a: &SimulationDataset, b: &SimulationDataset) {
    lines.push(rule('-'));
    lines.push("COMPARISON SUMMARY".to_string());
    lines.push(rule('-'));
    lines.push(String::new());

    lines.push(table_row("", &a.label, &b.label));
    lines.push(table_row(
        "",
        "-".repeat(a.label.chars().count()),
        "-".repeat(b.label.chars().count()),
    ));
    let tests = compare_tests(&a.tests, &b.tests);
    lines.push(table_row("  Tests Passed:", tests.passed_a, tests.passed_b));
    lines.push(table_row("  Tests Failed:", tests.failed_a, tests.failed_b));
    lines.push(table_row(
        "  Total Writes:",
        a.metrics.total_writes,
        b.metrics.total_writes,
    ));
    lines.push(table_row(
        "  Total Reads:",
        a.metrics.total_reads,
        b.metrics.total_reads,
    ));
    lines.push(table_row(
        "  Pass Rate:",
        format!("{}%", a.pass_rate()),
        format!("{}%", b.pass_rate()),
    ));
    lines.push(table_row(
        "  Peak Occupancy:",
        format!("{}%", a.occupancy_percent()),
        format!("{}%", b.occupancy_percent()),
    ));
}

pub fn render_performance_report(
    config: &ReportConfig,
    a: &SimulationDataset,
    b: &SimulationDataset,
    generated_at: &DateTime<Utc>,
) -> String {
    let mut lines = Vec::new();
    lines.push(rule('='));
    lines.push(format!("{} - PERFORMANCE ANALYSIS REPORT", config.project_title()));
    lines.push(rule('='));
    lines.push(format!("Generated: {}", format_timestamp(generated_at)));
    lines.push(String::new());

    dataset_section(&mut lines, a);
    dataset_section(&mut lines, b);
    comparison_section(&mut lines, a, b);

    lines.push(String::new());
    lines.push(rule('='));
    let status = OverallStatus::evaluate(a, b);
    lines.push(format!("OVERALL STATUS: {}", status.headline()));
    if status == OverallStatus::NoSimulationData {
        lines.push(config.simulation_hint.clone());
    }
    lines.push(rule('='));

    let mut report = lines.join("\n");
    report.push('\n');
    report
}

/// Per-variant figures in the JSON summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub label: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: u64,
    pub occupancy_percent: u64,
    pub metrics: PerformanceMetrics,
}

impl DatasetSummary {
    fn new(dataset: &SimulationDataset, passed: usize, failed: usize, total: usize) -> Self {
        Self {
            label: dataset.label.clone(),
            total,
            passed,
            failed,
            pass_rate: dataset.pass_rate(),
            occupancy_percent: dataset.occupancy_percent(),
            metrics: dataset.metrics.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub generated_at: String,
    pub baseline: DatasetSummary,
    pub candidate: DatasetSummary,
    pub status: OverallStatus,
}

impl PerformanceSummary {
    pub fn new(a: &SimulationDataset, b: &SimulationDataset, generated_at: &DateTime<Utc>) -> Self {
        let tests = compare_tests(&a.tests, &b.tests);
        Self {
            generated_at: format_timestamp(generated_at),
            baseline: DatasetSummary::new(a, tests.passed_a, tests.failed_a, tests.total_a),
            candidate: DatasetSummary::new(b, tests.passed_b, tests.failed_b, tests.total_b),
            status: OverallStatus::evaluate(a, b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VariantConfig;
    use simlog::{parse, RuleSet};

    const SYNC_LOG: &str = "\
[TEST 1] Reset behavior.......... PASS
[TEST 2] Single write/read....... PASS
[TEST 3] Fill FIFO............... FAIL
Total Writes: 2048
Total Reads: 2040
Peak Occupancy: 12/16
Throughput: 400.00 MB/s
";

    const ASYNC_LOG: &str = "\
[TEST 1] Reset behavior.......... PASS
[TEST 2] CDC stress test......... PASS
Total Writes: 1000
Total Reads: 1000
Peak Occupancy: 16/16
Success Rate: 100%
";

    fn dataset(variant: VariantConfig, log: &str) -> SimulationDataset {
        SimulationDataset::new(&variant, parse(log, &RuleSet::standard()))
    }

    fn fixed_time() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn render(a: &SimulationDataset, b: &SimulationDataset) -> String {
        render_performance_report(&ReportConfig::default(), a, b, &fixed_time())
    }

    #[test]
    fn test_header_and_sections() {
        let a = dataset(VariantConfig::sync_fifo(), SYNC_LOG);
        let b = dataset(VariantConfig::async_fifo(), ASYNC_LOG);
        let report = render(&a, &b);
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines[0], "=".repeat(70));
        assert_eq!(lines[1], "FIFO PROJECT - PERFORMANCE ANALYSIS REPORT");
        assert_eq!(lines[3], "Generated: 2023-11-14 22:13:20");
        assert!(report.contains("SYNCHRONOUS FIFO RESULTS"));
        assert!(report.contains("ASYNCHRONOUS FIFO RESULTS"));
        assert!(report.contains("  [FAIL] Fill FIFO"));
        assert!(report.contains("Summary: 2/3 tests passed (66%)"));
        assert!(report.contains("  Peak Occupancy:  12/16 (75%)"));
        assert!(report.contains("  Throughput:      400.00 MB/s"));
        assert!(report.contains("  Success Rate:    100%"));
    }

    #[test]
    fn test_comparison_table_layout() {
        let a = dataset(VariantConfig::sync_fifo(), SYNC_LOG);
        let b = dataset(VariantConfig::async_fifo(), ASYNC_LOG);
        let report = render(&a, &b);

        let row = |label: &str, a: &str, b: &str| format!("{:<26}{:>12}{:>12}", label, a, b);

        assert!(report.contains(&row("", "Sync FIFO", "Async FIFO")));
        assert!(report.contains(&row("  Tests Passed:", "2", "2")));
        assert!(report.contains(&row("  Total Reads:", "2040", "1000")));
        assert!(report.contains(&row("  Pass Rate:", "66%", "100%")));
        assert!(report.contains(&row("  Peak Occupancy:", "75%", "100%")));
    }

    #[test]
    fn test_table_and_summary_follow_test_comparison() {
        let a = dataset(VariantConfig::sync_fifo(), SYNC_LOG);
        let b = dataset(VariantConfig::async_fifo(), ASYNC_LOG);
        let tests = compare_tests(&a.tests, &b.tests);
        let summary = PerformanceSummary::new(&a, &b, &fixed_time());

        assert_eq!(
            (summary.baseline.passed, summary.baseline.failed, summary.baseline.total),
            (tests.passed_a, tests.failed_a, tests.total_a)
        );
        assert_eq!(
            (summary.candidate.passed, summary.candidate.failed, summary.candidate.total),
            (tests.passed_b, tests.failed_b, tests.total_b)
        );
        let row = format!(
            "{:<26}{:>12}{:>12}",
            "  Tests Failed:", tests.failed_a, tests.failed_b
        );
        assert!(render(&a, &b).contains(&row));
    }

    #[test]
    fn test_status_some_failed() {
        let a = dataset(VariantConfig::sync_fifo(), SYNC_LOG);
        let b = dataset(VariantConfig::async_fifo(), ASYNC_LOG);
        assert_eq!(OverallStatus::evaluate(&a, &b), OverallStatus::SomeTestsFailed);
        assert!(render(&a, &b).contains("OVERALL STATUS: SOME TESTS FAILED"));
    }

    #[test]
    fn test_status_all_passed() {
        let a = dataset(VariantConfig::sync_fifo(), ASYNC_LOG);
        let b = dataset(VariantConfig::async_fifo(), ASYNC_LOG);
        assert_eq!(OverallStatus::evaluate(&a, &b), OverallStatus::AllTestsPassed);
    }

    #[test]
    fn test_status_one_side_empty_is_failure() {
        let a = dataset(VariantConfig::sync_fifo(), ASYNC_LOG);
        let b = dataset(VariantConfig::async_fifo(), "");
        assert_eq!(OverallStatus::evaluate(&a, &b), OverallStatus::SomeTestsFailed);
    }

    #[test]
    fn test_no_data_report() {
        let a = dataset(VariantConfig::sync_fifo(), "");
        let b = dataset(VariantConfig::async_fifo(), "");
        let report = render(&a, &b);

        assert!(report.contains(
            "OVERALL STATUS: NO SIMULATION DATA FOUND\nRun 'make test' in the sim/ directory first."
        ));
        assert!(!report.contains("Test Results:"));
        assert!(!report.contains("Performance Metrics:"));
        assert!(report.contains(&format!("{:<26}{:>12}{:>12}", "  Pass Rate:", "0%", "0%")));
        assert!(report.ends_with(&format!("{}\n", "=".repeat(70))));
    }

    #[test]
    fn test_render_is_deterministic() {
        let a = dataset(VariantConfig::sync_fifo(), SYNC_LOG);
        let b = dataset(VariantConfig::async_fifo(), ASYNC_LOG);
        assert_eq!(render(&a, &b), render(&a, &b));
    }

    #[test]
    fn test_summary_matches_report_figures() {
        let a = dataset(VariantConfig::sync_fifo(), SYNC_LOG);
        let b = dataset(VariantConfig::async_fifo(), ASYNC_LOG);
        let summary = PerformanceSummary::new(&a, &b, &fixed_time());

        assert_eq!(summary.baseline.pass_rate, 66);
        assert_eq!(summary.baseline.occupancy_percent, 75);
        assert_eq!(summary.candidate.failed, 0);
        assert_eq!(summary.status, OverallStatus::SomeTestsFailed);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["status"], "some_tests_failed");
        assert_eq!(json["generated_at"], "2023-11-14 22:13:20");
    }
}
