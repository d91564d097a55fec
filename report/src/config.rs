use crate::error::{ReportError, ReportResult};
use serde::{Deserialize, Serialize};
use simlog::{RuleSet, RuleSpec};
use std::path::{Path, PathBuf};

/// Where one hardware variant's inputs live and how it is labelled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantConfig {
    /// Short label used in table headers and charts
    pub label: String,
    /// Section title, upper-cased in reports
    pub title: String,
    /// Simulation log, relative to the log directory
    pub log_file: PathBuf,
    /// Testbench source, relative to the testbench directory
    pub testbench_file: PathBuf,
    /// Synthesis report, relative to the synthesis directory
    pub synthesis_report: PathBuf,
    /// Make target that produces the synthesis report
    pub synthesis_target: String,
}

impl VariantConfig {
    pub fn sync_fifo() -> Self {
        Self {
            label: "Sync FIFO".to_string(),
            title: "Synchronous FIFO".to_string(),
            log_file: PathBuf::from("fifo_sync.log"),
            testbench_file: PathBuf::from("fifo_sync_tb.v"),
            synthesis_report: PathBuf::from("fifo_sync_synth.rpt"),
            synthesis_target: "synth_sync".to_string(),
        }
    }

    pub fn async_fifo() -> Self {
        Self {
            label: "Async FIFO".to_string(),
            title: "Asynchronous FIFO".to_string(),
            log_file: PathBuf::from("fifo_async.log"),
            testbench_file: PathBuf::from("fifo_async_tb.v"),
            synthesis_report: PathBuf::from("fifo_async_synth.rpt"),
            synthesis_target: "synth_async".to_string(),
        }
    }
}

/// A group of test names the coverage checklist expects to find.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredCategory {
    pub name: String,
    pub tests: Vec<String>,
}

impl RequiredCategory {
    pub fn new(name: &str, tests: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            tests: tests.iter().map(|t| t.to_string()).collect(),
        }
    }

    pub fn fifo_checklist() -> Vec<RequiredCategory> {
        vec![
            RequiredCategory::new(
                "Basic Functionality",
                &[
                    "Reset behavior",
                    "Single write/read",
                    "Fill FIFO",
                    "Drain FIFO",
                    "Simultaneous read/write",
                ],
            ),
            RequiredCategory::new(
                "Corner Cases",
                &["Overflow detection", "Underflow detection", "Pointer wrap-around"],
            ),
            RequiredCategory::new(
                "Stress Tests",
                &["Random operations", "Burst operations", "Performance test"],
            ),
            RequiredCategory::new(
                "CDC Tests (Async only)",
                &["Clock ratio variations", "CDC stress test"],
            ),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Design name used in report and chart titles
    pub design_name: String,
    /// Root that every relative directory below is resolved against
    pub project_dir: PathBuf,
    pub log_dir: PathBuf,
    pub testbench_dir: PathBuf,
    pub synthesis_dir: PathBuf,
    pub report_dir: PathBuf,
    /// Printed when neither log contains any test result
    pub simulation_hint: String,
    pub baseline: VariantConfig,
    pub candidate: VariantConfig,
    pub required_tests: Vec<RequiredCategory>,
    /// Extraction rules applied after the built-in ones
    pub rules: Vec<RuleSpec>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            design_name: "FIFO".to_string(),
            project_dir: PathBuf::from("."),
            log_dir: PathBuf::from("results/logs"),
            testbench_dir: PathBuf::from("tb"),
            synthesis_dir: PathBuf::from("syn/reports"),
            report_dir: PathBuf::from("results/reports"),
            simulation_hint: "Run 'make test' in the sim/ directory first.".to_string(),
            baseline: VariantConfig::sync_fifo(),
            candidate: VariantConfig::async_fifo(),
            required_tests: RequiredCategory::fifo_checklist(),
            rules: Vec::new(),
        }
    }
}

impl ReportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn load(path: &Path) -> ReportResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ReportError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ReportError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn with_project_dir(mut self, project_dir: impl Into<PathBuf>) -> Self {
        self.project_dir = project_dir.into();
        self
    }

    pub fn with_report_dir(mut self, report_dir: impl Into<PathBuf>) -> Self {
        self.report_dir = report_dir.into();
        self
    }

    pub fn with_design_name(mut self, design_name: impl Into<String>) -> Self {
        self.design_name = design_name.into();
        self
    }

    pub fn with_rule(mut self, rule: RuleSpec) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.design_name.trim().is_empty() {
            return Err("Design name cannot be empty".to_string());
        }

        for (role, variant) in [("baseline", &self.baseline), ("candidate", &self.candidate)] {
            if variant.label.trim().is_empty() {
                return Err(format!("The {} variant needs a label", role));
            }
            if variant.log_file.as_os_str().is_empty() {
                return Err(format!("The {} variant needs a log file", role));
            }
        }

        if self.baseline.label == self.candidate.label {
            return Err("Baseline and candidate labels must differ".to_string());
        }

        if self.report_dir.as_os_str().is_empty() {
            return Err("Report directory cannot be empty".to_string());
        }

        Ok(())
    }

    /// Report heading, e.g. `FIFO PROJECT`.
    pub fn project_title(&self) -> String {
        format!("{} PROJECT", self.design_name.to_uppercase())
    }

    /// Built-in extraction rules plus any configured ones.
    pub fn rule_set(&self) -> ReportResult<RuleSet> {
        Ok(RuleSet::with_extra(&self.rules)?)
    }

    fn resolve(&self, dir: &Path, file: &Path) -> PathBuf {
        self.project_dir.join(dir).join(file)
    }

    pub fn log_path(&self, variant: &VariantConfig) -> PathBuf {
        self.resolve(&self.log_dir, &variant.log_file)
    }

    pub fn testbench_path(&self, variant: &VariantConfig) -> PathBuf {
        self.resolve(&self.testbench_dir, &variant.testbench_file)
    }

    pub fn synthesis_path(&self, variant: &VariantConfig) -> PathBuf {
        self.resolve(&self.synthesis_dir, &variant.synthesis_report)
    }

    pub fn report_output_dir(&self) -> PathBuf {
        self.project_dir.join(&self.report_dir)
    }
}
