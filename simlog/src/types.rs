use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Depth assumed when a log never reports `Peak Occupancy: n/depth`.
pub const DEFAULT_FIFO_DEPTH: u64 = 16;

/// Outcome of a single `[TEST n] name.... PASS|FAIL` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    pub index: u32,
    pub name: String,
    pub passed: bool,
    /// Text following the PASS/FAIL token, trimmed. Empty when absent.
    #[serde(default)]
    pub details: String,
}

impl TestResult {
    pub fn new(index: u32, name: impl Into<String>, passed: bool) -> Self {
        Self {
            index,
            name: name.into(),
            passed,
            details: String::new(),
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = details.into();
        self
    }

    pub fn status(&self) -> &'static str {
        if self.passed {
            "PASS"
        } else {
            "FAIL"
        }
    }
}

/// Counters reported by a simulation run.
///
/// Fields that a log never mentions keep their defaults: zero for every
/// counter and [`DEFAULT_FIFO_DEPTH`] for the depth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub total_writes: u64,
    pub total_reads: u64,
    pub peak_occupancy: u64,
    pub fifo_depth: u64,
    pub throughput_mbps: f64,
    pub success_rate: f64,
}

impl PerformanceMetrics {
    pub fn defaults() -> Self {
        Self {
            total_writes: 0,
            total_reads: 0,
            peak_occupancy: 0,
            fifo_depth: DEFAULT_FIFO_DEPTH,
            throughput_mbps: 0.0,
            success_rate: 0.0,
        }
    }

    /// True when the log reported at least one non-zero counter.
    pub fn has_data(&self) -> bool {
        self.total_writes > 0
            || self.total_reads > 0
            || self.peak_occupancy > 0
            || self.throughput_mbps > 0.0
            || self.success_rate > 0.0
    }

    /// Peak occupancy never exceeds the depth when both were reported.
    pub fn occupancy_within_depth(&self) -> bool {
        self.fifo_depth == 0 || self.peak_occupancy <= self.fifo_depth
    }
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self::defaults()
    }
}

/// A test declared in a testbench, reconciled against execution logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestScenario {
    pub name: String,
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub executed: bool,
    #[serde(default)]
    pub passed: bool,
}

impl TestScenario {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            description: description.into(),
            executed: false,
            passed: false,
        }
    }

    pub fn status(&self) -> &'static str {
        match (self.executed, self.passed) {
            (_, true) => "PASS",
            (true, false) => "FAIL",
            (false, false) => "NOT RUN",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match (self.executed, self.passed) {
            (_, true) => "[+]",
            (true, false) => "[-]",
            (false, false) => "[ ]",
        }
    }
}

/// Cell statistics from a synthesis report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellReport {
    /// Design name from the `=== name ===` heading, if the report had one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design: Option<String>,
    pub cells: BTreeMap<String, u64>,
    pub wires: u64,
    pub memories: u64,
    pub memory_bits: u64,
    pub processes: u64,
}

impl CellReport {
    pub fn total_cells(&self) -> u64 {
        self.cells.values().sum()
    }

    /// Cell types ordered by descending count, ties broken by name.
    pub fn ranked_cells(&self) -> Vec<(&str, u64)> {
        let mut ranked: Vec<(&str, u64)> = self
            .cells
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }
}

/// Coarse resource buckets derived from a [`CellReport`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSummary {
    pub logic_cells: u64,
    pub flip_flops: u64,
    pub muxes: u64,
    pub memory_bits: u64,
    pub total_cells: u64,
}

impl ResourceSummary {
    /// How far the class counts overshoot `total_cells`.
    ///
    /// Classification is not mutually exclusive, so a cell type such as
    /// `XORFF` is counted in more than one class.
    pub fn overlap(&self) -> u64 {
        (self.logic_cells + self.flip_flops + self.muxes).saturating_sub(self.total_cells)
    }
}
