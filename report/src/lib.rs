//! Report generation for FIFO verification runs
//!
//! Ties the `simlog` parsers to the text reports and charts: load both
//! variants, render, write each report under the configured report directory.

pub mod config;
pub mod coverage;
pub mod dataset;
pub mod error;
pub mod performance;
pub mod plot;
pub mod synthesis;

pub use config::{ReportConfig, RequiredCategory, VariantConfig};
pub use coverage::{render_coverage_report, CoverageDataset, CoverageSummary};
pub use dataset::SimulationDataset;
pub use error::{ReportError, ReportResult};
pub use performance::{
    render_performance_report, report_timestamp, OverallStatus, PerformanceSummary,
};
pub use plot::{build_chart, generate_charts, ChartOutcome};
pub use synthesis::{render_synthesis_report, SynthesisDataset, SynthesisSummary};

use chrono::{DateTime, Utc};
use charts::ChartRenderer;
use simlog::RuleSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const PERFORMANCE_REPORT: &str = "performance_report.txt";
pub const COVERAGE_REPORT: &str = "coverage_report.txt";
pub const SYNTHESIS_REPORT: &str = "synthesis_report.txt";

pub(crate) const RULE_WIDTH: usize = 70;

/// A horizontal rule spanning the report width.
pub(crate) fn rule(c: char) -> String {
    c.to_string().repeat(RULE_WIDTH)
}

pub fn write_report(dir: &Path, file_name: &str, text: &str) -> ReportResult<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    fs::write(&path, text)?;
    info!("Report saved to: {}", path.display());
    Ok(path)
}

/// A rendered report, where it was written, and its JSON summary.
#[derive(Debug, Clone)]
pub struct GeneratedReport<S> {
    pub path: PathBuf,
    pub text: String,
    pub summary: S,
}

/// Validated configuration plus the compiled extraction rules.
pub struct Pipeline {
    config: ReportConfig,
    rules: RuleSet,
}

impl Pipeline {
    pub fn new(config: ReportConfig) -> ReportResult<Self> {
        config
            .validate()
            .map_err(|message| ReportError::InvalidConfig { message })?;
        let rules = config.rule_set()?;
        Ok(Self { config, rules })
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn simulation(&self) -> (SimulationDataset, SimulationDataset) {
        (
            SimulationDataset::load(&self.config, &self.config.baseline, &self.rules),
            SimulationDataset::load(&self.config, &self.config.candidate, &self.rules),
        )
    }

    pub fn performance(
        &self,
        generated_at: &DateTime<Utc>,
    ) -> ReportResult<GeneratedReport<PerformanceSummary>> {
        let (a, b) = self.simulation();
        let text = render_performance_report(&self.config, &a, &b, generated_at);
        let path = write_report(&self.config.report_output_dir(), PERFORMANCE_REPORT, &text)?;
        Ok(GeneratedReport {
            path,
            text,
            summary: PerformanceSummary::new(&a, &b, generated_at),
        })
    }

    pub fn coverage(&self) -> ReportResult<GeneratedReport<CoverageSummary>> {
        let a = CoverageDataset::load(&self.config, &self.config.baseline, &self.rules);
        let b = CoverageDataset::load(&self.config, &self.config.candidate, &self.rules);
        let text = render_coverage_report(&self.config, &a, &b);
        let path = write_report(&self.config.report_output_dir(), COVERAGE_REPORT, &text)?;
        Ok(GeneratedReport {
            path,
            text,
            summary: CoverageSummary::new(&self.config, &a, &b),
        })
    }

    pub fn synthesis(&self) -> ReportResult<GeneratedReport<SynthesisSummary>> {
        let a = SynthesisDataset::load(&self.config, &self.config.baseline);
        let b = SynthesisDataset::load(&self.config, &self.config.candidate);
        let text = render_synthesis_report(&a, &b);
        let path = write_report(&self.config.report_output_dir(), SYNTHESIS_REPORT, &text)?;
        Ok(GeneratedReport {
            path,
            text,
            summary: SynthesisSummary::new(&a, &b),
        })
    }

    /// Charts go to `output_dir`, or the report directory when `None`.
    pub fn charts(
        &self,
        renderer: &dyn ChartRenderer,
        output_dir: Option<&Path>,
    ) -> Vec<ChartOutcome> {
        let dir = output_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.report_output_dir());
        let (a, b) = self.simulation();
        generate_charts(renderer, &self.config, &a, &b, &dir)
    }

    /// Draw every chart with `renderer`. Without a renderer this fails when
    /// `required` and otherwise draws nothing.
    pub fn draw_charts(
        &self,
        renderer: Option<&dyn ChartRenderer>,
        output_dir: Option<&Path>,
        required: bool,
    ) -> ReportResult<Vec<ChartOutcome>> {
        let Some(renderer) = renderer else {
            if required {
                return Err(charts::ChartError::Unavailable.into());
            }
            warn!("No chart backend built in; skipping charts");
            return Ok(Vec::new());
        };

        let outcomes = self.charts(renderer, output_dir);
        let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
        if failed > 0 {
            warn!("{} of {} chart(s) could not be drawn", failed, outcomes.len());
        }
        Ok(outcomes)
    }
}
