//! Synthesis statistics parsing
//!
//! Reads the cell table that follows the `Printing statistics` marker of a
//! synthesis report, plus the `Number of ...:` counters wherever they appear.

use crate::error::{read_input, InputWarning};
use crate::types::CellReport;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, warn};

const STATISTICS_MARKER: &str = "Printing statistics";

fn cell_line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\s+([\w$]+)\s+(\d+)").expect("static pattern"))
}

fn heading_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\s*===\s*(\S.*?)\s*===\s*$").expect("static pattern"))
}

fn counter_value(line: &str, label: &str) -> Option<u64> {
    let rest = &line[line.find(label)? + label.len()..];
    let digits: String = rest
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Before,
    Cells,
    After,
}

pub fn parse_synthesis_report(text: &str) -> CellReport {
    let mut report = CellReport::default();
    let mut section = Section::Before;

    for line in text.lines() {
        match section {
            Section::Before if line.contains(STATISTICS_MARKER) => {
                section = Section::Cells;
                continue;
            }
            Section::Cells => {
                if line.trim().is_empty() {
                    continue;
                }
                if line.contains("===") || line.contains("---") {
                    // A `=== name ===` line ahead of the first cell names the design.
                    let heading = heading_pattern().captures(line);
                    match heading {
                        Some(caps) if report.cells.is_empty() && report.design.is_none() => {
                            report.design = Some(caps[1].to_string());
                        }
                        _ => section = Section::After,
                    }
                    continue;
                }
                if let Some(caps) = cell_line_pattern().captures(line) {
                    if let Ok(count) = caps[2].parse::<u64>() {
                        report.cells.insert(caps[1].to_string(), count);
                    }
                }
            }
            _ => {}
        }

        if let Some(v) = counter_value(line, "Number of wires:") {
            report.wires = v;
        } else if let Some(v) = counter_value(line, "Number of memories:") {
            report.memories = v;
        } else if let Some(v) = counter_value(line, "Number of memory bits:") {
            report.memory_bits = v;
        } else if let Some(v) = counter_value(line, "Number of processes:") {
            report.processes = v;
        }
    }

    debug!(
        "Synthesis statistics: {} cell type(s), {} wire(s)",
        report.cells.len(),
        report.wires
    );
    report
}

/// Parse a report on disk; a missing report is reported back as a warning.
pub fn parse_synthesis_file(path: &Path) -> Result<CellReport, InputWarning> {
    let content = read_input(path).inspect_err(|w| warn!("{}", w))?;
    Ok(parse_synthesis_report(&content))
}
