//! Chart rendering for FIFO analysis reports
//!
//! Report generation never depends on a plotting backend directly. It builds
//! [`ChartData`] and hands it to whatever [`ChartRenderer`] is available,
//! one chart at a time. The SVG backend is compiled in with the default
//! `svg` feature; without it [`default_renderer`] returns `None`.

#[cfg(feature = "svg")]
pub mod svg;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[cfg(feature = "svg")]
pub use svg::SvgChartRenderer;

/// Errors related to chart rendering
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("No chart backend is available")]
    Unavailable,
    #[error("Invalid chart data for {kind}: {message}")]
    InvalidData { kind: ChartKind, message: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ChartResult<T> = Result<T, ChartError>;

/// The charts produced for a variant comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Passed and failed test counts per variant
    TestResults,
    /// Throughput per variant
    Throughput,
    /// Peak occupancy against capacity
    Occupancy,
    /// Write and read transaction counts
    Transactions,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::TestResults,
        ChartKind::Throughput,
        ChartKind::Occupancy,
        ChartKind::Transactions,
    ];

    /// Artifact file name without extension.
    pub fn file_stem(&self) -> &'static str {
        match self {
            ChartKind::TestResults => "test_results",
            ChartKind::Throughput => "throughput_comparison",
            ChartKind::Occupancy => "occupancy",
            ChartKind::Transactions => "transactions",
        }
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_stem())
    }
}

/// One bar per category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub label: String,
    pub values: Vec<f64>,
    /// Text drawn above each bar. Empty entries draw nothing.
    pub annotations: Vec<String>,
    pub color: String,
}

impl Series {
    pub fn new(label: impl Into<String>, values: Vec<f64>, color: impl Into<String>) -> Self {
        let annotations = values.iter().map(|v| format!("{}", v)).collect();
        Self {
            label: label.into(),
            values,
            annotations,
            color: color.into(),
        }
    }

    pub fn with_annotations(mut self, annotations: Vec<String>) -> Self {
        self.annotations = annotations;
        self
    }
}

/// Grouped bar chart description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub categories: Vec<String>,
    pub series: Vec<Series>,
    /// Per-category capacity drawn as a background bar.
    pub capacity: Option<Vec<f64>>,
}

impl ChartData {
    pub fn new(title: impl Into<String>, y_label: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_label: String::new(),
            y_label: y_label.into(),
            categories: Vec::new(),
            series: Vec::new(),
            capacity: None,
        }
    }

    pub fn with_x_label(mut self, x_label: impl Into<String>) -> Self {
        self.x_label = x_label.into();
        self
    }

    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    pub fn with_capacity(mut self, capacity: Vec<f64>) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Largest value any bar reaches, including capacity bars.
    pub fn max_value(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.values.iter())
            .chain(self.capacity.iter().flatten())
            .copied()
            .fold(0.0, f64::max)
    }

    pub fn validate(&self, kind: ChartKind) -> ChartResult<()> {
        let invalid = |message: String| ChartError::InvalidData { kind, message };

        if self.categories.is_empty() {
            return Err(invalid("no categories".to_string()));
        }
        if self.series.is_empty() {
            return Err(invalid("no series".to_string()));
        }
        for series in &self.series {
            if series.values.len() != self.categories.len() {
                return Err(invalid(format!(
                    "series '{}' has {} values for {} categories",
                    series.label,
                    series.values.len(),
                    self.categories.len()
                )));
            }
            if series.values.iter().any(|v| !v.is_finite() || *v < 0.0) {
                return Err(invalid(format!(
                    "series '{}' has a negative or non-finite value",
                    series.label
                )));
            }
        }
        if let Some(capacity) = &self.capacity {
            if capacity.len() != self.categories.len() {
                return Err(invalid(format!(
                    "capacity has {} values for {} categories",
                    capacity.len(),
                    self.categories.len()
                )));
            }
        }
        Ok(())
    }
}

/// A backend that turns chart data into an artifact on disk.
pub trait ChartRenderer {
    fn name(&self) -> &str;

    /// Draw one chart into `output_dir` and return the written path.
    fn draw(&self, kind: ChartKind, data: &ChartData, output_dir: &Path) -> ChartResult<PathBuf>;
}

/// The backend compiled into this build, if any.
pub fn default_renderer() -> Option<Box<dyn ChartRenderer>> {
    #[cfg(feature = "svg")]
    {
        Some(Box::new(SvgChartRenderer::new()))
    }
    #[cfg(not(feature = "svg"))]
    {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_variant_chart() -> ChartData {
        ChartData::new("FIFO Throughput Comparison", "Throughput (MB/s)")
            .with_categories(vec!["Sync FIFO".to_string(), "Async FIFO".to_string()])
            .with_series(Series::new("Throughput", vec![400.0, 266.67], "#2ecc71"))
    }

    #[test]
    fn test_chart_kind_file_stems() {
        let stems: Vec<&str> = ChartKind::ALL.iter().map(|k| k.file_stem()).collect();
        assert_eq!(
            stems,
            vec!["test_results", "throughput_comparison", "occupancy", "transactions"]
        );
    }

    #[test]
    fn test_validate_accepts_matching_series() {
        assert!(two_variant_chart().validate(ChartKind::Throughput).is_ok());
    }

    #[test]
    fn test_validate_rejects_length_mismatch() {
        let data = two_variant_chart().with_series(Series::new("Extra", vec![1.0], "#000"));
        let err = data.validate(ChartKind::Throughput).unwrap_err();
        assert!(matches!(err, ChartError::InvalidData { .. }));
        assert!(err.to_string().contains("throughput_comparison"));
    }

    #[test]
    fn test_validate_rejects_empty_chart() {
        let data = ChartData::new("Empty", "Count");
        assert!(data.validate(ChartKind::TestResults).is_err());
    }

    #[test]
    fn test_max_value_includes_capacity() {
        let data = ChartData::new("FIFO Peak Occupancy", "Entries")
            .with_categories(vec!["Sync FIFO".to_string()])
            .with_series(Series::new("Peak Occupancy", vec![12.0], "#2ecc71"))
            .with_capacity(vec![16.0]);
        assert_eq!(data.max_value(), 16.0);
    }

    #[cfg(feature = "svg")]
    #[test]
    fn test_default_renderer_is_svg() {
        let renderer = default_renderer().unwrap();
        assert_eq!(renderer.name(), "svg");
    }
}
