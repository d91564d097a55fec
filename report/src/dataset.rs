use crate::config::{ReportConfig, VariantConfig};
use serde::{Deserialize, Serialize};
use simlog::metrics::{count_failed, count_passed};
use simlog::{
    occupancy_percent, parse_log_file, pass_rate, InputWarning, ParsedLog, PerformanceMetrics,
    RuleSet, TestResult,
};
use tracing::{info, warn};

/// Parsed simulation results for one variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationDataset {
    pub label: String,
    pub title: String,
    pub tests: Vec<TestResult>,
    pub metrics: PerformanceMetrics,
    #[serde(skip)]
    pub warnings: Vec<InputWarning>,
}

impl SimulationDataset {
    pub fn new(variant: &VariantConfig, parsed: ParsedLog) -> Self {
        if !parsed.metrics.occupancy_within_depth() {
            warn!(
                "{} log reports peak occupancy {} above FIFO depth {}",
                variant.label, parsed.metrics.peak_occupancy, parsed.metrics.fifo_depth
            );
        }
        Self {
            label: variant.label.clone(),
            title: variant.title.clone(),
            tests: parsed.tests,
            metrics: parsed.metrics,
            warnings: parsed.warnings,
        }
    }

    pub fn load(config: &ReportConfig, variant: &VariantConfig, rules: &RuleSet) -> Self {
        let path = config.log_path(variant);
        info!("Parsing {} log: {}", variant.label, path.display());
        Self::new(variant, parse_log_file(&path, rules))
    }

    pub fn passed(&self) -> usize {
        count_passed(&self.tests)
    }

    pub fn failed(&self) -> usize {
        count_failed(&self.tests)
    }

    pub fn total(&self) -> usize {
        self.tests.len()
    }

    pub fn pass_rate(&self) -> u64 {
        pass_rate(&self.tests)
    }

    pub fn occupancy_percent(&self) -> u64 {
        occupancy_percent(&self.metrics)
    }

    /// At least one test ran and none failed.
    pub fn all_passed(&self) -> bool {
        self.total() > 0 && self.failed() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(outcomes: &[bool]) -> SimulationDataset {
        let parsed = ParsedLog {
            tests: outcomes
                .iter()
                .enumerate()
                .map(|(i, &p)| TestResult::new(i as u32 + 1, format!("check {}", i), p))
                .collect(),
            ..ParsedLog::default()
        };
        SimulationDataset::new(&VariantConfig::sync_fifo(), parsed)
    }

    #[test]
    fn test_counts_and_rate() {
        let ds = dataset(&[true, true, false]);
        assert_eq!(ds.label, "Sync FIFO");
        assert_eq!(ds.passed(), 2);
        assert_eq!(ds.failed(), 1);
        assert_eq!(ds.total(), 3);
        assert_eq!(ds.pass_rate(), 66);
        assert!(!ds.all_passed());
    }

    #[test]
    fn test_all_passed_needs_a_test() {
        assert!(!dataset(&[]).all_passed());
        assert!(dataset(&[true]).all_passed());
    }

    #[test]
    fn test_overfull_occupancy_is_reported_as_logged() {
        let parsed = simlog::parse("Peak Occupancy: 20/16\n", &RuleSet::standard());
        assert!(!parsed.metrics.occupancy_within_depth());
        let ds = SimulationDataset::new(&VariantConfig::sync_fifo(), parsed);
        assert_eq!(ds.metrics.peak_occupancy, 20);
        assert_eq!(ds.occupancy_percent(), 125);
    }

    #[test]
    fn test_load_missing_log() {
        let dir = tempfile::tempdir().unwrap();
        let config = ReportConfig::new().with_project_dir(dir.path());
        let ds = SimulationDataset::load(&config, &config.candidate, &RuleSet::standard());
        assert_eq!(ds.title, "Asynchronous FIFO");
        assert!(ds.tests.is_empty());
        assert_eq!(ds.metrics.fifo_depth, 16);
        assert_eq!(ds.warnings.len(), 1);
    }
}
