//! Test scenario catalog
//!
//! Builds the list of scenarios a testbench declares (`task test_xxx;`),
//! independently of whether any of them ran.

use crate::error::{read_input, InputWarning};
use crate::types::TestScenario;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use tracing::warn;

/// Prefix that marks a testbench task as a test.
pub const TEST_MARKER: &str = "test_";

/// Category given to every catalog entry.
pub const FUNCTIONAL_CATEGORY: &str = "functional";

fn task_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"task\s+(test_\w+)\s*;").expect("static pattern"))
}

/// Upper-case the first letter of every alphabetic run and lower-case the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if previous_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_alpha = true;
        } else {
            out.push(c);
            previous_alpha = false;
        }
    }
    out
}

/// `test_fill_fifo` becomes `fill fifo`.
pub fn normalize_name(name: &str) -> String {
    name.strip_prefix(TEST_MARKER)
        .unwrap_or(name)
        .replace('_', " ")
}

/// `test_fill_fifo` becomes `Fill Fifo`.
pub fn describe(name: &str) -> String {
    title_case(&normalize_name(name))
}

pub fn extract_scenarios(source: &str) -> Vec<TestScenario> {
    task_pattern()
        .captures_iter(source)
        .map(|caps| {
            let name = &caps[1];
            TestScenario::new(name, FUNCTIONAL_CATEGORY, describe(name))
        })
        .collect()
}

/// Scan a testbench on disk. A missing testbench yields an empty catalog and a warning.
pub fn extract_scenarios_from_file(path: &Path) -> (Vec<TestScenario>, Option<InputWarning>) {
    match read_input(path) {
        Ok(source) => (extract_scenarios(&source), None),
        Err(warning) => {
            warn!("{}", warning);
            (Vec::new(), Some(warning))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TESTBENCH: &str = "\
module fifo_sync_tb;
    task test_reset_behavior;
    begin
    end
    endtask

    task   test_single_write_read ;
    endtask

    task helper_drive_write;
    endtask

    task test_pointer_wrap_around;
    endtask
endmodule
";

    #[test]
    fn test_extract_in_declaration_order() {
        let scenarios = extract_scenarios(TESTBENCH);
        let names: Vec<&str> = scenarios.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "test_reset_behavior",
                "test_single_write_read",
                "test_pointer_wrap_around"
            ]
        );
        assert!(scenarios.iter().all(|s| s.category == "functional"));
        assert!(scenarios.iter().all(|s| !s.executed && !s.passed));
    }

    #[test]
    fn test_descriptions() {
        let scenarios = extract_scenarios(TESTBENCH);
        assert_eq!(scenarios[0].description, "Reset Behavior");
        assert_eq!(scenarios[1].description, "Single Write Read");
        assert_eq!(scenarios[2].description, "Pointer Wrap Around");
    }

    #[test]
    fn test_title_case_word_boundaries() {
        assert_eq!(title_case("cdc stress test"), "Cdc Stress Test");
        assert_eq!(title_case("FIFO full"), "Fifo Full");
        assert_eq!(title_case("ratio 2x"), "Ratio 2X");
    }

    #[test]
    fn test_only_prefix_marker_is_stripped() {
        assert_eq!(normalize_name("test_retest_after_reset"), "retest after reset");
        assert_eq!(describe("test_retest_after_reset"), "Retest After Reset");
    }

    #[test]
    fn test_missing_testbench() {
        let dir = tempfile::tempdir().unwrap();
        let (scenarios, warning) = extract_scenarios_from_file(&dir.path().join("missing_tb.v"));
        assert!(scenarios.is_empty());
        assert!(matches!(warning, Some(InputWarning::MissingInputFile { .. })));
    }
}
