use clap::{Parser, Subcommand};
use fifo_report::{
    report_timestamp, ChartOutcome, GeneratedReport, Pipeline, ReportConfig, ReportError,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "fifo-report")]
#[command(about = "Analyze FIFO simulation and synthesis logs")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Project root the configured directories are relative to
    #[arg(long, global = true)]
    project_dir: Option<PathBuf>,
    /// Directory for the written reports, relative to the project root
    #[arg(long, global = true)]
    report_dir: Option<PathBuf>,
    /// Print a JSON summary instead of the text report
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare test results and performance counters
    Performance,
    /// Reconcile testbench scenarios with executed tests
    Coverage,
    /// Compare synthesis resource usage
    Synthesis,
    /// Draw comparison charts
    Plot {
        /// Directory for the chart files (defaults to the report directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Run every analysis
    All {
        /// Fail when no chart backend is built in instead of skipping charts
        #[arg(long)]
        charts: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ReportConfig::load(path)?,
        None => ReportConfig::default(),
    };
    if let Some(project_dir) = cli.project_dir {
        config = config.with_project_dir(project_dir);
    }
    if let Some(report_dir) = cli.report_dir {
        config = config.with_report_dir(report_dir);
    }
    let pipeline = Pipeline::new(config)?;

    match cli.command.unwrap_or(Commands::All { charts: false }) {
        Commands::Performance => {
            let report = pipeline.performance(&report_timestamp())?;
            emit(&report, cli.json)?;
        }
        Commands::Coverage => {
            let report = pipeline.coverage()?;
            emit(&report, cli.json)?;
        }
        Commands::Synthesis => {
            let report = pipeline.synthesis()?;
            emit(&report, cli.json)?;
        }
        Commands::Plot { output_dir } => {
            let outcomes = draw_charts(&pipeline, output_dir.as_deref(), true)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&outcomes)?);
            } else {
                list_charts(&outcomes);
            }
        }
        Commands::All { charts } => {
            let performance = pipeline.performance(&report_timestamp())?;
            let coverage = pipeline.coverage()?;
            let synthesis = pipeline.synthesis()?;

            if cli.json {
                let summary = serde_json::json!({
                    "performance": performance.summary,
                    "coverage": coverage.summary,
                    "synthesis": synthesis.summary,
                });
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", performance.text);
                println!();
                print!("{}", coverage.text);
                println!();
                print!("{}", synthesis.text);
            }

            let outcomes = draw_charts(&pipeline, None, charts)?;
            if !cli.json {
                list_charts(&outcomes);
            }
        }
    }

    Ok(())
}

fn emit<S: Serialize>(report: &GeneratedReport<S>, json: bool) -> Result<(), ReportError> {
    if json {
        println!("{}", serde_json::to_string_pretty(&report.summary)?);
    } else {
        print!("{}", report.text);
    }
    Ok(())
}

fn draw_charts(
    pipeline: &Pipeline,
    output_dir: Option<&Path>,
    required: bool,
) -> Result<Vec<ChartOutcome>, ReportError> {
    let renderer = charts::default_renderer();
    pipeline.draw_charts(renderer.as_deref(), output_dir, required)
}

fn list_charts(outcomes: &[ChartOutcome]) {
    for path in outcomes.iter().filter_map(|o| o.path.as_ref()) {
        println!("Generated: {}", path.display());
    }
}
