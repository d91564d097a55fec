//! Comparison charts
//!
//! Builds one [`ChartData`] per [`ChartKind`] from the two simulation
//! datasets and hands each to the injected renderer in turn.

use crate::config::ReportConfig;
use crate::dataset::SimulationDataset;
use charts::{ChartData, ChartKind, ChartRenderer, Series};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const PASSED_COLOR: &str = "green";
const FAILED_COLOR: &str = "red";
const BASELINE_COLOR: &str = "#2ecc71";
const CANDIDATE_COLOR: &str = "#3498db";

pub fn build_chart(
    kind: ChartKind,
    config: &ReportConfig,
    a: &SimulationDataset,
    b: &SimulationDataset,
) -> ChartData {
    let design = &config.design_name;
    let variants = vec![a.label.clone(), b.label.clone()];

    match kind {
        ChartKind::TestResults => {
            let failed = [a.failed() as f64, b.failed() as f64];
            ChartData::new(format!("{} Test Results Summary", design), "Number of Tests")
                .with_x_label(format!("{} Type", design))
                .with_categories(variants)
                .with_series(Series::new(
                    "Passed",
                    vec![a.passed() as f64, b.passed() as f64],
                    PASSED_COLOR,
                ))
                .with_series(
                    Series::new("Failed", failed.to_vec(), FAILED_COLOR).with_annotations(
                        failed
                            .iter()
                            .map(|&n| if n > 0.0 { format!("{}", n) } else { String::new() })
                            .collect(),
                    ),
                )
        }
        ChartKind::Throughput => {
            let values = vec![a.metrics.throughput_mbps, b.metrics.throughput_mbps];
            let annotations = values.iter().map(|v| format!("{:.1} MB/s", v)).collect();
            ChartData::new(format!("{} Throughput Comparison", design), "Throughput (MB/s)")
                .with_x_label(format!("{} Type", design))
                .with_categories(variants)
                .with_series(
                    Series::new("Throughput", values, BASELINE_COLOR).with_annotations(annotations),
                )
        }
        ChartKind::Occupancy => {
            let annotations = [a, b]
                .iter()
                .map(|d| {
                    format!(
                        "{}/{} ({}%)",
                        d.metrics.peak_occupancy,
                        d.metrics.fifo_depth,
                        d.occupancy_percent()
                    )
                })
                .collect();
            ChartData::new(format!("{} Peak Occupancy", design), "Number of Entries")
                .with_x_label(format!("{} Type", design))
                .with_categories(variants)
                .with_capacity(vec![a.metrics.fifo_depth as f64, b.metrics.fifo_depth as f64])
                .with_series(
                    Series::new(
                        "Peak Occupancy",
                        vec![a.metrics.peak_occupancy as f64, b.metrics.peak_occupancy as f64],
                        BASELINE_COLOR,
                    )
                    .with_annotations(annotations),
                )
        }
        ChartKind::Transactions => {
            ChartData::new("Total Transactions During Simulation", "Transaction Count")
                .with_x_label("Transaction Type")
                .with_categories(vec!["Writes".to_string(), "Reads".to_string()])
                .with_series(Series::new(
                    a.label.clone(),
                    vec![a.metrics.total_writes as f64, a.metrics.total_reads as f64],
                    BASELINE_COLOR,
                ))
                .with_series(Series::new(
                    b.label.clone(),
                    vec![b.metrics.total_writes as f64, b.metrics.total_reads as f64],
                    CANDIDATE_COLOR,
                ))
        }
    }
}

/// Result of drawing one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartOutcome {
    pub kind: ChartKind,
    pub path: Option<PathBuf>,
    pub error: Option<String>,
}

impl ChartOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Draw every chart, one after another. A failed chart is logged and
/// recorded; the others are still drawn.
pub fn generate_charts(
    renderer: &dyn ChartRenderer,
    config: &ReportConfig,
    a: &SimulationDataset,
    b: &SimulationDataset,
    output_dir: &Path,
) -> Vec<ChartOutcome> {
    info!("Drawing charts with the {} backend", renderer.name());
    ChartKind::ALL
        .iter()
        .map(|&kind| {
            let data = build_chart(kind, config, a, b);
            match renderer.draw(kind, &data, output_dir) {
                Ok(path) => ChartOutcome {
                    kind,
                    path: Some(path),
                    error: None,
                },
                Err(e) => {
                    warn!("Failed to draw {} chart: {}", kind, e);
                    ChartOutcome {
                        kind,
                        path: None,
                        error: Some(e.to_string()),
                    }
                }
            }
        })
        .collect()
}
