//! Simulation log parsing
//!
//! Test outcomes are read from lines shaped like
//! `[TEST 3] Fill FIFO.......... PASS`, in document order. Metrics come from
//! the [`RuleSet`]. Both FIFO variants write the same log format, so a single
//! parser serves both.

use crate::error::{read_input, InputWarning};
use crate::rules::RuleSet;
use crate::types::{PerformanceMetrics, TestResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, warn};

fn test_line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\[TEST (\d+)\] (.+?)\.+ (PASS|FAIL)([^\n]*)").expect("static pattern")
    })
}

/// Everything extracted from one simulation log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedLog {
    pub tests: Vec<TestResult>,
    pub metrics: PerformanceMetrics,
    #[serde(skip)]
    pub warnings: Vec<InputWarning>,
}

impl ParsedLog {
    pub fn is_empty(&self) -> bool {
        self.tests.is_empty() && !self.metrics.has_data()
    }
}

/// Extract test outcomes in the order they appear. Repeated names are kept.
pub fn parse_tests(text: &str) -> Vec<TestResult> {
    test_line_pattern()
        .captures_iter(text)
        .filter_map(|caps| {
            let index = caps[1].parse::<u32>().ok()?;
            let name = caps[2].trim();
            let passed = &caps[3] == "PASS";
            let details = caps.get(4).map(|m| m.as_str().trim()).unwrap_or("");
            Some(TestResult::new(index, name, passed).with_details(details))
        })
        .collect()
}

pub fn parse(text: &str, rules: &RuleSet) -> ParsedLog {
    let tests = parse_tests(text);
    let metrics = rules.apply(text);
    debug!(
        "Parsed {} test result(s), metrics present: {}",
        tests.len(),
        metrics.has_data()
    );
    ParsedLog {
        tests,
        metrics,
        warnings: Vec::new(),
    }
}

/// Parse a log on disk. A missing or unreadable file yields an empty result
/// carrying a warning; it is never an error.
pub fn parse_log_file(path: &Path, rules: &RuleSet) -> ParsedLog {
    match read_input(path) {
        Ok(content) => parse(&content, rules),
        Err(warning) => {
            warn!("{}", warning);
            ParsedLog {
                warnings: vec![warning],
                ..ParsedLog::default()
            }
        }
    }
}
