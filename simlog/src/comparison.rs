//! Resource and test comparison between two variants
//!
//! Cell types are bucketed by substring. The buckets overlap on purpose: a
//! cell type matching several rules counts in each of them, so class totals
//! can add up to more than `total_cells`. See [`ResourceSummary::overlap`].

use crate::metrics::{count_passed, percent_difference};
use crate::types::{CellReport, ResourceSummary, TestResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const FLIP_FLOP_MARKERS: &[&str] = &["DFF", "FF"];
const MUX_MARKERS: &[&str] = &["MUX"];
const LOGIC_MARKERS: &[&str] = &["LUT", "AND", "OR", "XOR", "NOT", "NAND", "NOR"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceClass {
    TotalCells,
    FlipFlops,
    LogicCells,
    Muxes,
}

impl ResourceClass {
    pub const ALL: [ResourceClass; 4] = [
        ResourceClass::TotalCells,
        ResourceClass::FlipFlops,
        ResourceClass::LogicCells,
        ResourceClass::Muxes,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ResourceClass::TotalCells => "total_cells",
            ResourceClass::FlipFlops => "flip_flops",
            ResourceClass::LogicCells => "logic_cells",
            ResourceClass::Muxes => "muxes",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ResourceClass::TotalCells => "Total Cells",
            ResourceClass::FlipFlops => "Flip Flops",
            ResourceClass::LogicCells => "Logic Cells",
            ResourceClass::Muxes => "Muxes",
        }
    }

    pub fn count(&self, summary: &ResourceSummary) -> u64 {
        match self {
            ResourceClass::TotalCells => summary.total_cells,
            ResourceClass::FlipFlops => summary.flip_flops,
            ResourceClass::LogicCells => summary.logic_cells,
            ResourceClass::Muxes => summary.muxes,
        }
    }
}

/// Every class a cell type belongs to, besides `TotalCells`.
pub fn classify(cell_type: &str) -> Vec<ResourceClass> {
    let has_any = |markers: &[&str]| markers.iter().any(|m| cell_type.contains(m));
    let mut classes = Vec::new();
    if has_any(FLIP_FLOP_MARKERS) {
        classes.push(ResourceClass::FlipFlops);
    }
    if has_any(MUX_MARKERS) {
        classes.push(ResourceClass::Muxes);
    }
    if has_any(LOGIC_MARKERS) {
        classes.push(ResourceClass::LogicCells);
    }
    classes
}

pub fn summarize(report: &CellReport) -> ResourceSummary {
    let mut summary = ResourceSummary {
        memory_bits: report.memory_bits,
        ..ResourceSummary::default()
    };
    for (cell_type, &count) in &report.cells {
        summary.total_cells += count;
        for class in classify(cell_type) {
            match class {
                ResourceClass::FlipFlops => summary.flip_flops += count,
                ResourceClass::Muxes => summary.muxes += count,
                ResourceClass::LogicCells => summary.logic_cells += count,
                ResourceClass::TotalCells => {}
            }
        }
    }
    summary
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceDelta {
    pub a: u64,
    pub b: u64,
    /// `b - a`
    pub diff: i64,
    /// Percentage change from `a` to `b`; 0 when `a` is 0.
    pub diff_percent: f64,
}

impl ResourceDelta {
    pub fn new(a: u64, b: u64) -> Self {
        Self {
            a,
            b,
            diff: b as i64 - a as i64,
            diff_percent: percent_difference(b as f64, a as f64),
        }
    }
}

pub fn compare_resources(
    a: &ResourceSummary,
    b: &ResourceSummary,
) -> BTreeMap<ResourceClass, ResourceDelta> {
    ResourceClass::ALL
        .iter()
        .map(|class| (*class, ResourceDelta::new(class.count(a), class.count(b))))
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestComparison {
    pub passed_a: usize,
    pub passed_b: usize,
    pub failed_a: usize,
    pub failed_b: usize,
    pub total_a: usize,
    pub total_b: usize,
}

pub fn compare_tests(results_a: &[TestResult], results_b: &[TestResult]) -> TestComparison {
    let passed_a = count_passed(results_a);
    let passed_b = count_passed(results_b);
    TestComparison {
        passed_a,
        passed_b,
        failed_a: results_a.len() - passed_a,
        failed_b: results_b.len() - passed_b,
        total_a: results_a.len(),
        total_b: results_b.len(),
    }
}
