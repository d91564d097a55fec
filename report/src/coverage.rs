//! Test coverage report
//!
//! Scenarios come from the testbench task declarations, outcomes from the
//! simulation log. The two are reconciled by the scenario matcher.

use crate::config::{ReportConfig, RequiredCategory, VariantConfig};
use crate::rule;
use serde::{Deserialize, Serialize};
use simlog::metrics::floor_percent;
use simlog::{
    extract_scenarios_from_file, match_scenarios, parse_log_file, InputWarning, MatchOutcome,
    RuleSet, ScenarioMatch,
};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageDataset {
    pub label: String,
    pub title: String,
    pub outcome: MatchOutcome,
    #[serde(skip)]
    pub warnings: Vec<InputWarning>,
}

impl CoverageDataset {
    pub fn new(variant: &VariantConfig, outcome: MatchOutcome) -> Self {
        Self {
            label: variant.label.clone(),
            title: variant.title.clone(),
            outcome,
            warnings: Vec::new(),
        }
    }

    pub fn load(config: &ReportConfig, variant: &VariantConfig, rules: &RuleSet) -> Self {
        let testbench = config.testbench_path(variant);
        info!("Scanning {} testbench: {}", variant.label, testbench.display());
        let (scenarios, missing) = extract_scenarios_from_file(&testbench);
        let parsed = parse_log_file(&config.log_path(variant), rules);

        let mut dataset = Self::new(variant, match_scenarios(&scenarios, &parsed.tests));
        dataset.warnings.extend(missing);
        dataset.warnings.extend(parsed.warnings);
        dataset
    }

    pub fn defined(&self) -> usize {
        self.outcome.scenarios.len()
    }

    pub fn executed(&self) -> usize {
        self.outcome.executed()
    }

    pub fn passed(&self) -> usize {
        self.outcome.passed()
    }

    pub fn coverage_percent(&self) -> u64 {
        floor_percent(self.executed() as u64, self.defined() as u64)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub test: String,
    pub covered: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistCategory {
    pub name: String,
    pub items: Vec<ChecklistItem>,
}

/// Mark each required test covered when any scenario description, from
/// either variant, contains its name (case-insensitive).
pub fn required_coverage(
    required: &[RequiredCategory],
    datasets: &[&CoverageDataset],
) -> Vec<ChecklistCategory> {
    let descriptions: Vec<String> = datasets
        .iter()
        .flat_map(|d| d.outcome.scenarios.iter())
        .map(|s| s.description.to_lowercase())
        .collect();

    required
        .iter()
        .map(|category| ChecklistCategory {
            name: category.name.clone(),
            items: category
                .tests
                .iter()
                .map(|test| {
                    let wanted = test.to_lowercase();
                    ChecklistItem {
                        test: test.clone(),
                        covered: descriptions.iter().any(|d| d.contains(&wanted)),
                    }
                })
                .collect(),
        })
        .collect()
}

fn variant_section(lines: &mut Vec<String>, dataset: &CoverageDataset) {
    lines.push(rule('-'));
    lines.push(format!("{} COVERAGE", dataset.title.to_uppercase()));
    lines.push(rule('-'));
    lines.push(String::new());
    lines.push(format!("Tests Defined: {}", dataset.defined()));
    lines.push(format!("Tests Executed: {}", dataset.executed()));
    lines.push(format!("Coverage: {}%", dataset.coverage_percent()));
    lines.push(String::new());

    lines.push("Test Status:".to_string());
    for scenario in &dataset.outcome.scenarios {
        lines.push(format!(
            "  {} {}: {}",
            scenario.symbol(),
            scenario.description,
            scenario.status()
        ));
    }
    lines.push(String::new());
}

pub fn render_coverage_report(
    config: &ReportConfig,
    a: &CoverageDataset,
    b: &CoverageDataset,
) -> String {
    let mut lines = Vec::new();
    lines.push(rule('='));
    lines.push(format!("{} - TEST COVERAGE REPORT", config.project_title()));
    lines.push(rule('='));
    lines.push(String::new());

    variant_section(&mut lines, a);
    variant_section(&mut lines, b);

    lines.push(rule('-'));
    lines.push("REQUIRED TEST COVERAGE CHECKLIST".to_string());
    lines.push(rule('-'));
    lines.push(String::new());
    for category in required_coverage(&config.required_tests, &[a, b]) {
        lines.push(format!("{}:", category.name));
        for item in category.items {
            let mark = if item.covered { "[x]" } else { "[ ]" };
            lines.push(format!("  {} {}", mark, item.test));
        }
        lines.push(String::new());
    }

    let ambiguous: Vec<InputWarning> = [a, b]
        .iter()
        .flat_map(|d| d.outcome.warnings())
        .collect();
    if !ambiguous.is_empty() {
        lines.push("Matching Warnings:".to_string());
        for warning in &ambiguous {
            lines.push(format!("  - {}", warning));
        }
        lines.push(String::new());
    }

    let summary = CoverageSummary::new(config, a, b);
    lines.push(rule('='));
    lines.push(format!(
        "OVERALL COVERAGE: {}/{} tests executed ({}%)",
        summary.executed, summary.defined, summary.coverage_percent
    ));
    lines.push(format!(
        "PASS RATE: {}/{} tests passed ({}%)",
        summary.passed, summary.executed, summary.pass_percent
    ));
    lines.push(rule('='));

    let mut report = lines.join("\n");
    report.push('\n');
    report
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantCoverage {
    pub label: String,
    pub defined: usize,
    pub executed: usize,
    pub passed: usize,
    pub coverage_percent: u64,
    pub matches: Vec<ScenarioMatch>,
}

impl From<&CoverageDataset> for VariantCoverage {
    fn from(dataset: &CoverageDataset) -> Self {
        Self {
            label: dataset.label.clone(),
            defined: dataset.defined(),
            executed: dataset.executed(),
            passed: dataset.passed(),
            coverage_percent: dataset.coverage_percent(),
            matches: dataset.outcome.matches.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageSummary {
    pub baseline: VariantCoverage,
    pub candidate: VariantCoverage,
    pub checklist: Vec<ChecklistCategory>,
    pub defined: usize,
    pub executed: usize,
    pub passed: usize,
    pub coverage_percent: u64,
    pub pass_percent: u64,
}

impl CoverageSummary {
    pub fn new(config: &ReportConfig, a: &CoverageDataset, b: &CoverageDataset) -> Self {
        let defined = a.defined() + b.defined();
        let executed = a.executed() + b.executed();
        let passed = a.passed() + b.passed();
        if defined == 0 {
            warn!("No test scenarios found in either testbench");
        }
        Self {
            baseline: a.into(),
            candidate: b.into(),
            checklist: required_coverage(&config.required_tests, &[a, b]),
            defined,
            executed,
            passed,
            coverage_percent: floor_percent(executed as u64, defined as u64),
            pass_percent: floor_percent(passed as u64, executed as u64),
        }
    }
}
