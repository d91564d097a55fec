pub mod catalog;
pub mod comparison;
pub mod error;
pub mod matcher;
pub mod metrics;
pub mod parser;
pub mod rules;
pub mod synthesis;
pub mod types;

pub use catalog::{extract_scenarios, extract_scenarios_from_file};
pub use comparison::{
    classify, compare_resources, compare_tests, summarize, ResourceClass, ResourceDelta,
    TestComparison,
};
pub use error::{InputWarning, SimlogError, SimlogResult};
pub use matcher::{match_scenarios, MatchConfidence, MatchOutcome, ScenarioMatch};
pub use metrics::{occupancy_percent, pass_rate, percent_difference};
pub use parser::{parse, parse_log_file, ParsedLog};
pub use rules::{Converter, ExtractionRule, MetricField, RuleSet, RuleSpec};
pub use synthesis::{parse_synthesis_file, parse_synthesis_report};
pub use types::{
    CellReport, PerformanceMetrics, ResourceSummary, TestResult, TestScenario, DEFAULT_FIFO_DEPTH,
};

pub mod prelude {
    pub use crate::catalog::*;
    pub use crate::comparison::*;
    pub use crate::error::*;
    pub use crate::matcher::*;
    pub use crate::metrics::*;
    pub use crate::parser::*;
    pub use crate::rules::*;
    pub use crate::synthesis::*;
    pub use crate::types::*;
}
