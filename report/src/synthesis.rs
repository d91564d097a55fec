//! Synthesis resource report
//!
//! Per-variant resource utilization followed by a class-by-class comparison
//! when both reports are present.

use crate::config::{ReportConfig, VariantConfig};
use crate::rule;
use serde::{Deserialize, Serialize};
use simlog::{
    compare_resources, parse_synthesis_file, summarize, CellReport, InputWarning, ResourceClass,
    ResourceDelta, ResourceSummary,
};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::info;

/// Cell types listed individually before the rest are summarized.
const TOP_CELL_TYPES: usize = 15;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisDataset {
    pub label: String,
    pub title: String,
    pub target: String,
    pub path: PathBuf,
    /// `None` when the report file was missing or unreadable.
    pub report: Option<CellReport>,
    #[serde(skip)]
    pub warning: Option<InputWarning>,
}

impl SynthesisDataset {
    pub fn new(variant: &VariantConfig, path: PathBuf, report: Option<CellReport>) -> Self {
        Self {
            label: variant.label.clone(),
            title: variant.title.clone(),
            target: variant.synthesis_target.clone(),
            path,
            report,
            warning: None,
        }
    }

    pub fn load(config: &ReportConfig, variant: &VariantConfig) -> Self {
        let path = config.synthesis_path(variant);
        info!("Reading {} synthesis report: {}", variant.label, path.display());
        match parse_synthesis_file(&path) {
            Ok(report) => Self::new(variant, path, Some(report)),
            Err(warning) => Self {
                warning: Some(warning),
                ..Self::new(variant, path, None)
            },
        }
    }

    pub fn summary(&self) -> Option<ResourceSummary> {
        self.report.as_ref().map(summarize)
    }
}

fn design_section(lines: &mut Vec<String>, dataset: &SynthesisDataset) {
    let Some(report) = &dataset.report else {
        lines.push(String::new());
        match &dataset.warning {
            Some(warning @ InputWarning::UnreadableInputFile { .. }) => {
                lines.push(format!("WARNING: {}", warning))
            }
            _ => lines.push(format!("WARNING: {} not found!", dataset.path.display())),
        }
        lines.push(format!(
            "Run 'make {}' in syn/ directory first.",
            dataset.target
        ));
        lines.push(String::new());
        return;
    };

    lines.push(String::new());
    lines.push(rule('='));
    lines.push(format!("SYNTHESIS REPORT: {}", dataset.title));
    lines.push(rule('='));
    lines.push(String::new());

    if report.cells.is_empty() {
        lines.push("ERROR: No synthesis results found!".to_string());
        return;
    }

    let resources = summarize(report);
    lines.push("Resource Utilization:".to_string());
    lines.push(format!("  Total Cells:        {:6}", resources.total_cells));
    lines.push(format!("  Flip-Flops:         {:6}", resources.flip_flops));
    lines.push(format!("  Logic Cells (LUTs): {:6}", resources.logic_cells));
    lines.push(format!("  Multiplexers:       {:6}", resources.muxes));
    lines.push(format!("  Wires:              {:6}", report.wires));
    lines.push(format!("  Memories:           {:6}", report.memories));
    if report.memory_bits > 0 {
        lines.push(format!("  Memory Bits:        {:6}", report.memory_bits));
    }
    let overlap = resources.overlap();
    if overlap > 0 {
        lines.push(format!(
            "  Note: {} cell(s) counted in more than one resource class",
            overlap
        ));
    }

    lines.push(String::new());
    lines.push("Cell Breakdown:".to_string());
    let ranked = report.ranked_cells();
    for (cell_type, count) in ranked.iter().take(TOP_CELL_TYPES) {
        lines.push(format!("  {:20} {:6}", cell_type, count));
    }
    if ranked.len() > TOP_CELL_TYPES {
        lines.push(format!(
            "  ... and {} more cell types",
            ranked.len() - TOP_CELL_TYPES
        ));
    }

    lines.push(String::new());
    lines.push(rule('='));
    lines.push(String::new());
}

fn comparison_section(
    lines: &mut Vec<String>,
    a: &SynthesisDataset,
    b: &SynthesisDataset,
    deltas: &BTreeMap<ResourceClass, ResourceDelta>,
) {
    lines.push(rule('='));
    lines.push(format!("COMPARISON: {} vs {}", a.label, b.label));
    lines.push(rule('='));
    lines.push(String::new());
    lines.push(format!(
        "{:<25} {:>12} {:>12} {:>15}",
        "Resource", a.label, b.label, "Difference"
    ));
    lines.push(rule('-'));
    for (class, delta) in deltas {
        lines.push(format!(
            "{:<25} {:>12} {:>12} {:+6} ({:+6.1}%)",
            class.display_name(),
            delta.a,
            delta.b,
            delta.diff,
            delta.diff_percent
        ));
    }
    lines.push(String::new());
    lines.push(rule('='));
    lines.push(format!(
        "{} Overhead: Clock domain crossing logic (Gray counters,",
        b.label
    ));
    lines.push(format!(
        "synchronizers) increases resource usage compared to {}.",
        a.label
    ));
    lines.push(rule('='));
}

pub fn render_synthesis_report(a: &SynthesisDataset, b: &SynthesisDataset) -> String {
    let mut lines = Vec::new();
    lines.push(rule('='));
    lines.push("FPGA SYNTHESIS ANALYSIS".to_string());
    lines.push(rule('='));

    design_section(&mut lines, a);
    design_section(&mut lines, b);

    if let Some(summary) = SynthesisSummary::new(a, b).comparison {
        comparison_section(&mut lines, a, b, &summary);
    }

    let mut report = lines.join("\n");
    report.push('\n');
    report
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisSummary {
    pub baseline: Option<ResourceSummary>,
    pub candidate: Option<ResourceSummary>,
    /// Present only when both reports were found.
    pub comparison: Option<BTreeMap<ResourceClass, ResourceDelta>>,
}

impl SynthesisSummary {
    pub fn new(a: &SynthesisDataset, b: &SynthesisDataset) -> Self {
        let baseline = a.summary();
        let candidate = b.summary();
        let comparison = match (&baseline, &candidate) {
            (Some(sa), Some(sb)) => Some(compare_resources(sa, sb)),
            _ => None,
        };
        Self {
            baseline,
            candidate,
            comparison,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simlog::parse_synthesis_report;

    const SYNC_REPORT: &str = "\
2.27. Printing statistics.

=== fifo_sync ===

   Number of wires:                 87
   Number of memories:               0
   Number of processes:              0
   Number of cells:                880
     $_AND_                         31
     $_DFFE_PP_                    512
     $_DFF_P_                       10
     $_MUX_                        296
     $_NOT_                         13
     $_OR_                          18

===
";

    const ASYNC_REPORT: &str = "\
2.27. Printing statistics.

=== fifo_async ===

   Number of wires:                120
     $_AND_                         40
     $_DFFE_PP_                    512
     $_DFF_P_                       50
     $_MUX_                        300
     $_XOR_                         24
     $_NOT_                         20
     $_OR_                          18

===
";

    fn dataset(variant: VariantConfig, text: Option<&str>) -> SynthesisDataset {
        let path = PathBuf::from("syn/reports").join(&variant.synthesis_report);
        SynthesisDataset::new(&variant, path, text.map(parse_synthesis_report))
    }

    #[test]
    fn test_design_section() {
        let a = dataset(VariantConfig::sync_fifo(), Some(SYNC_REPORT));
        let b = dataset(VariantConfig::async_fifo(), None);
        let report = render_synthesis_report(&a, &b);

        assert!(report.contains("SYNTHESIS REPORT: Synchronous FIFO"));
        assert!(report.contains("  Total Cells:           880"));
        assert!(report.contains("  Flip-Flops:            522"));
        assert!(report.contains("  Logic Cells (LUTs):     62"));
        assert!(report.contains("  Multiplexers:          296"));
        assert!(report.contains("  Wires:                  87"));
        assert!(report.contains(&format!("  {:20} {:6}", "$_DFFE_PP_", 512)));
        assert!(!report.contains("more cell types"));
        assert!(!report.contains("Note:"));
    }

    #[test]
    fn test_missing_report_warning() {
        let a = dataset(VariantConfig::sync_fifo(), Some(SYNC_REPORT));
        let b = dataset(VariantConfig::async_fifo(), None);
        let report = render_synthesis_report(&a, &b);

        assert!(report.contains("WARNING: syn/reports/fifo_async_synth.rpt not found!"));
        assert!(report.contains("Run 'make synth_async' in syn/ directory first."));
        assert!(!report.contains("COMPARISON:"));
        assert!(SynthesisSummary::new(&a, &b).comparison.is_none());
    }

    #[test]
    fn test_comparison_rows() {
        let a = dataset(VariantConfig::sync_fifo(), Some(SYNC_REPORT));
        let b = dataset(VariantConfig::async_fifo(), Some(ASYNC_REPORT));
        let report = render_synthesis_report(&a, &b);

        assert!(report.contains("COMPARISON: Sync FIFO vs Async FIFO"));
        assert!(report.contains(&format!(
            "{:<25} {:>12} {:>12} {:>15}",
            "Resource", "Sync FIFO", "Async FIFO", "Difference"
        )));
        // 880 -> 964 cells
        assert!(report.contains(&format!(
            "{:<25} {:>12} {:>12} {:+6} ({:+6.1}%)",
            "Total Cells", 880, 964, 84, 84.0 / 880.0 * 100.0
        )));
        assert!(
            report.contains("Async FIFO Overhead: Clock domain crossing logic (Gray counters,")
        );
    }

    #[test]
    fn test_comparison_row_order() {
        let a = dataset(VariantConfig::sync_fifo(), Some(SYNC_REPORT));
        let b = dataset(VariantConfig::async_fifo(), Some(ASYNC_REPORT));
        let report = render_synthesis_report(&a, &b);

        let position = |name: &str| report.find(&format!("\n{:<25} ", name)).unwrap();
        assert!(position("Total Cells") < position("Flip Flops"));
        assert!(position("Flip Flops") < position("Logic Cells"));
        assert!(position("Logic Cells") < position("Muxes"));
    }

    #[test]
    fn test_long_breakdown_is_truncated() {
        let mut text = String::from("Printing statistics.\n");
        for i in 0..18 {
            text.push_str(&format!("     CELL_{:02}    {}\n", i, 100 - i));
        }
        let a = dataset(VariantConfig::sync_fifo(), Some(&text));
        let b = dataset(VariantConfig::async_fifo(), None);
        let report = render_synthesis_report(&a, &b);

        assert!(report.contains(&format!("  {:20} {:6}", "CELL_14", 86)));
        assert!(!report.contains("CELL_15"));
        assert!(report.contains("  ... and 3 more cell types"));
    }

    #[test]
    fn test_overlap_note() {
        let text = "Printing statistics.\n     XORFF   10\n     $_MUX_   4\n";
        let a = dataset(VariantConfig::sync_fifo(), Some(text));
        let b = dataset(VariantConfig::async_fifo(), None);
        let report = render_synthesis_report(&a, &b);
        assert!(report.contains("  Note: 10 cell(s) counted in more than one resource class"));
    }

    #[test]
    fn test_empty_report() {
        let a = dataset(VariantConfig::sync_fifo(), Some("no statistics here\n"));
        let b = dataset(VariantConfig::async_fifo(), None);
        let report = render_synthesis_report(&a, &b);
        assert!(report.contains("ERROR: No synthesis results found!"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = ReportConfig::new().with_project_dir(dir.path());
        let ds = SynthesisDataset::load(&config, &config.baseline);
        assert!(ds.report.is_none());
        assert!(matches!(ds.warning, Some(InputWarning::MissingInputFile { .. })));
        assert_eq!(ds.target, "synth_sync");

        let report = render_synthesis_report(&ds, &ds);
        assert!(report.contains("fifo_sync_synth.rpt not found!"));
    }

    #[test]
    fn test_load_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = ReportConfig::new().with_project_dir(dir.path());
        // A directory where the report file should be cannot be read as text.
        std::fs::create_dir_all(config.synthesis_path(&config.baseline)).unwrap();

        let ds = SynthesisDataset::load(&config, &config.baseline);
        assert!(ds.report.is_none());
        assert!(matches!(
            ds.warning,
            Some(InputWarning::UnreadableInputFile { .. })
        ));

        let report = render_synthesis_report(&ds, &ds);
        assert!(report.contains("WARNING: Could not read "));
        assert!(!report.contains("not found!"));
        assert!(report.contains("Run 'make synth_sync' in syn/ directory first."));
    }
}
