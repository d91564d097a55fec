//! Reconcile catalog scenarios with executed test results
//!
//! A scenario is bound to an executed result by its description (exact,
//! case-insensitive) or, failing that, by substring containment between the
//! normalized task name and the executed name. Under substring matching the
//! first executed result wins; any other candidates are kept so the caller
//! can report the ambiguity.

use crate::catalog::normalize_name;
use crate::error::InputWarning;
use crate::types::{TestResult, TestScenario};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchConfidence {
    Exact,
    Fallback,
    Unmatched,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioMatch {
    pub scenario: String,
    pub confidence: MatchConfidence,
    pub matched_name: Option<String>,
    /// Other executed results that also satisfied the substring rule.
    pub alternatives: Vec<String>,
}

impl ScenarioMatch {
    pub fn is_ambiguous(&self) -> bool {
        self.confidence == MatchConfidence::Fallback && !self.alternatives.is_empty()
    }

    pub fn to_warning(&self) -> Option<InputWarning> {
        if !self.is_ambiguous() {
            return None;
        }
        Some(InputWarning::AmbiguousMatch {
            scenario: self.scenario.clone(),
            chosen: self.matched_name.clone().unwrap_or_default(),
            alternatives: self.alternatives.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub scenarios: Vec<TestScenario>,
    pub matches: Vec<ScenarioMatch>,
}

impl MatchOutcome {
    pub fn executed(&self) -> usize {
        self.scenarios.iter().filter(|s| s.executed).count()
    }

    pub fn passed(&self) -> usize {
        self.scenarios.iter().filter(|s| s.passed).count()
    }

    pub fn warnings(&self) -> Vec<InputWarning> {
        self.matches.iter().filter_map(ScenarioMatch::to_warning).collect()
    }
}

struct ExecutedEntry {
    key: String,
    name: String,
    passed: bool,
}

/// Executed results keyed by lower-cased name, in first-seen order.
/// A name reported twice keeps its position but takes the later outcome.
struct ExecutedIndex {
    entries: Vec<ExecutedEntry>,
}

impl ExecutedIndex {
    fn new(results: &[TestResult]) -> Self {
        let mut entries: Vec<ExecutedEntry> = Vec::new();
        for result in results {
            let key = result.name.trim().to_lowercase();
            match entries.iter_mut().find(|e| e.key == key) {
                Some(entry) => entry.passed = result.passed,
                None => entries.push(ExecutedEntry {
                    key,
                    name: result.name.trim().to_string(),
                    passed: result.passed,
                }),
            }
        }
        Self { entries }
    }

    fn exact(&self, description: &str) -> Option<&ExecutedEntry> {
        let wanted = description.to_lowercase();
        self.entries.iter().find(|e| e.key == wanted)
    }

    fn substring_candidates(&self, scenario_name: &str) -> Vec<&ExecutedEntry> {
        let needle = normalize_name(scenario_name).to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.entries
            .iter()
            .filter(|e| !e.key.is_empty() && (e.key.contains(&needle) || needle.contains(&e.key)))
            .collect()
    }
}

fn match_one(scenario: &mut TestScenario, index: &ExecutedIndex) -> ScenarioMatch {
    if let Some(entry) = index.exact(&scenario.description) {
        scenario.executed = true;
        scenario.passed = entry.passed;
        return ScenarioMatch {
            scenario: scenario.name.clone(),
            confidence: MatchConfidence::Exact,
            matched_name: Some(entry.name.clone()),
            alternatives: Vec::new(),
        };
    }

    let candidates = index.substring_candidates(&scenario.name);
    let Some((first, rest)) = candidates.split_first() else {
        debug!("No executed result for {}", scenario.name);
        return ScenarioMatch {
            scenario: scenario.name.clone(),
            confidence: MatchConfidence::Unmatched,
            matched_name: None,
            alternatives: Vec::new(),
        };
    };

    scenario.executed = true;
    scenario.passed = first.passed;
    let found = ScenarioMatch {
        scenario: scenario.name.clone(),
        confidence: MatchConfidence::Fallback,
        matched_name: Some(first.name.clone()),
        alternatives: rest.iter().map(|e| e.name.clone()).collect(),
    };
    if let Some(warning) = found.to_warning() {
        warn!("Ambiguous scenario match: {}", warning);
    }
    found
}

pub fn match_scenarios(scenarios: &[TestScenario], executed: &[TestResult]) -> MatchOutcome {
    let index = ExecutedIndex::new(executed);
    let mut updated = scenarios.to_vec();
    let matches = updated
        .iter_mut()
        .map(|scenario| match_one(scenario, &index))
        .collect();
    MatchOutcome {
        scenarios: updated,
        matches,
    }
}
