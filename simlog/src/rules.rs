//! Declarative extraction rules
//!
//! Every numeric field of [`PerformanceMetrics`] is filled by an independent
//! rule: a field name, a regex pattern, the capture group holding the value
//! and an optional converter. Rules are evaluated one by one against the whole
//! log text, so supporting a new log dialect means adding rules rather than
//! changing a grammar.

use crate::error::{SimlogError, SimlogResult};
use crate::types::PerformanceMetrics;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A [`PerformanceMetrics`] field that a rule can populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricField {
    TotalWrites,
    TotalReads,
    PeakOccupancy,
    FifoDepth,
    ThroughputMbps,
    SuccessRate,
}

impl MetricField {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricField::TotalWrites => "total_writes",
            MetricField::TotalReads => "total_reads",
            MetricField::PeakOccupancy => "peak_occupancy",
            MetricField::FifoDepth => "fifo_depth",
            MetricField::ThroughputMbps => "throughput_mbps",
            MetricField::SuccessRate => "success_rate",
        }
    }
}

impl std::fmt::Display for MetricField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How captured text becomes a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Converter {
    Integer,
    Float,
}

impl Converter {
    pub fn convert(&self, raw: &str) -> Option<FieldValue> {
        match self {
            Converter::Integer => raw.parse::<u64>().ok().map(FieldValue::Integer),
            Converter::Float => raw.parse::<f64>().ok().map(FieldValue::Float),
        }
    }

    /// Pick a converter from the text itself: anything with a decimal point is a float.
    pub fn infer(raw: &str) -> Converter {
        if raw.contains('.') {
            Converter::Float
        } else {
            Converter::Integer
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Integer(u64),
    Float(f64),
}

impl FieldValue {
    pub fn as_u64(&self) -> u64 {
        match *self {
            FieldValue::Integer(v) => v,
            FieldValue::Float(v) if v.is_finite() && v > 0.0 => v.floor() as u64,
            FieldValue::Float(_) => 0,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            FieldValue::Integer(v) => v as f64,
            FieldValue::Float(v) => v,
        }
    }
}

impl MetricField {
    pub fn apply(&self, metrics: &mut PerformanceMetrics, value: FieldValue) {
        match self {
            MetricField::TotalWrites => metrics.total_writes = value.as_u64(),
            MetricField::TotalReads => metrics.total_reads = value.as_u64(),
            MetricField::PeakOccupancy => metrics.peak_occupancy = value.as_u64(),
            MetricField::FifoDepth => metrics.fifo_depth = value.as_u64(),
            MetricField::ThroughputMbps => metrics.throughput_mbps = value.as_f64(),
            MetricField::SuccessRate => metrics.success_rate = value.as_f64(),
        }
    }
}

fn default_group() -> usize {
    1
}

/// Uncompiled rule, as written in configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub field: MetricField,
    pub pattern: String,
    #[serde(default = "default_group")]
    pub group: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub converter: Option<Converter>,
}

impl RuleSpec {
    pub fn new(field: MetricField, pattern: impl Into<String>) -> Self {
        Self {
            field,
            pattern: pattern.into(),
            group: default_group(),
            converter: None,
        }
    }

    pub fn with_group(mut self, group: usize) -> Self {
        self.group = group;
        self
    }

    pub fn with_converter(mut self, converter: Converter) -> Self {
        self.converter = Some(converter);
        self
    }

    /// The rules shared by the synchronous and asynchronous simulation logs.
    pub fn defaults() -> Vec<RuleSpec> {
        vec![
            RuleSpec::new(MetricField::TotalWrites, r"Total Writes:\s*(\d+)")
                .with_converter(Converter::Integer),
            RuleSpec::new(MetricField::TotalReads, r"Total Reads:\s*(\d+)")
                .with_converter(Converter::Integer),
            RuleSpec::new(MetricField::PeakOccupancy, r"Peak Occupancy:\s*(\d+)/(\d+)")
                .with_converter(Converter::Integer),
            RuleSpec::new(MetricField::FifoDepth, r"Peak Occupancy:\s*(\d+)/(\d+)")
                .with_group(2)
                .with_converter(Converter::Integer),
            RuleSpec::new(MetricField::ThroughputMbps, r"Throughput:\s*([\d.]+)\s*MB/s")
                .with_converter(Converter::Float),
            RuleSpec::new(MetricField::SuccessRate, r"Success Rate:\s*(\d+)%")
                .with_converter(Converter::Float),
        ]
    }

    pub fn compile(&self) -> SimlogResult<ExtractionRule> {
        let pattern = Regex::new(&self.pattern).map_err(|source| SimlogError::InvalidPattern {
            field: self.field.to_string(),
            source,
        })?;

        // captures_len() counts the implicit whole-match group 0.
        let groups = pattern.captures_len() - 1;
        if self.group == 0 || self.group > groups {
            return Err(SimlogError::InvalidRule {
                field: self.field.to_string(),
                message: format!(
                    "capture group {} requested but pattern has {} group(s)",
                    self.group, groups
                ),
            });
        }

        Ok(ExtractionRule {
            field: self.field,
            pattern,
            group: self.group,
            converter: self.converter,
        })
    }
}

/// A compiled rule.
#[derive(Debug, Clone)]
pub struct ExtractionRule {
    field: MetricField,
    pattern: Regex,
    group: usize,
    converter: Option<Converter>,
}

impl ExtractionRule {
    pub fn field(&self) -> MetricField {
        self.field
    }

    /// Value of the first match in `text`, if any.
    pub fn extract(&self, text: &str) -> Option<FieldValue> {
        let captures = self.pattern.captures(text)?;
        let raw = captures.get(self.group)?.as_str();
        let converter = self.converter.unwrap_or_else(|| Converter::infer(raw));
        let value = converter.convert(raw);
        if value.is_none() {
            debug!("Rule for {} captured unconvertible text '{}'", self.field, raw);
        }
        value
    }
}

/// Ordered collection of extraction rules.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<ExtractionRule>,
}

impl RuleSet {
    pub fn from_specs(specs: &[RuleSpec]) -> SimlogResult<Self> {
        let rules = specs
            .iter()
            .map(RuleSpec::compile)
            .collect::<SimlogResult<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// The default rules followed by `extra`, which take precedence on overlap.
    pub fn with_extra(extra: &[RuleSpec]) -> SimlogResult<Self> {
        let mut specs = RuleSpec::defaults();
        specs.extend_from_slice(extra);
        Self::from_specs(&specs)
    }

    pub fn standard() -> Self {
        Self::from_specs(&RuleSpec::defaults()).expect("built-in extraction rules compile")
    }

    pub fn rules(&self) -> &[ExtractionRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule over `text`, starting from default metrics.
    pub fn apply(&self, text: &str) -> PerformanceMetrics {
        let mut metrics = PerformanceMetrics::defaults();
        for rule in &self.rules {
            match rule.extract(text) {
                Some(value) => rule.field.apply(&mut metrics, value),
                None => debug!("No match for {}", rule.field),
            }
        }
        metrics
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_rules_extract_all_fields() {
        let text = "\
Total Writes: 1024
Total Reads:  1000
Peak Occupancy: 12/16
Throughput: 381.47 MB/s
Success Rate: 98%
";
        let metrics = RuleSet::standard().apply(text);
        assert_eq!(metrics.total_writes, 1024);
        assert_eq!(metrics.total_reads, 1000);
        assert_eq!(metrics.peak_occupancy, 12);
        assert_eq!(metrics.fifo_depth, 16);
        assert_eq!(metrics.throughput_mbps, 381.47);
        assert_eq!(metrics.success_rate, 98.0);
    }

    #[test]
    fn test_absent_fields_keep_defaults() {
        let metrics = RuleSet::standard().apply("Total Reads: 7\nnothing else here");
        assert_eq!(metrics.total_reads, 7);
        assert_eq!(metrics.total_writes, 0);
        assert_eq!(metrics.fifo_depth, 16);
        assert_eq!(metrics.throughput_mbps, 0.0);
    }

    #[test]
    fn test_first_match_wins_within_a_rule() {
        let metrics = RuleSet::standard().apply("Total Writes: 5\nTotal Writes: 9\n");
        assert_eq!(metrics.total_writes, 5);
    }

    #[test]
    fn test_inferred_converter() {
        assert_eq!(Converter::infer("12.5"), Converter::Float);
        assert_eq!(Converter::infer("12"), Converter::Integer);

        let rule = RuleSpec::new(MetricField::ThroughputMbps, r"BW=([\d.]+)")
            .compile()
            .unwrap();
        assert_eq!(rule.extract("BW=12.5"), Some(FieldValue::Float(12.5)));
        assert_eq!(rule.extract("BW=12"), Some(FieldValue::Integer(12)));
    }

    #[test]
    fn test_unconvertible_capture_contributes_nothing() {
        let rule = RuleSpec::new(MetricField::ThroughputMbps, r"Throughput:\s*([\d.]+)")
            .with_converter(Converter::Float)
            .compile()
            .unwrap();
        assert_eq!(rule.extract("Throughput: 1.2.3"), None);
    }

    #[test]
    fn test_extra_rules_override_defaults() {
        let extra = vec![RuleSpec::new(MetricField::TotalWrites, r"wr_count=(\d+)")];
        let rules = RuleSet::with_extra(&extra).unwrap();
        assert_eq!(rules.len(), RuleSpec::defaults().len() + 1);

        let metrics = rules.apply("Total Writes: 10\nwr_count=42\n");
        assert_eq!(metrics.total_writes, 42);

        // An extra rule that does not match leaves the default rule's value alone.
        let metrics = rules.apply("Total Writes: 10\n");
        assert_eq!(metrics.total_writes, 10);
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let err = RuleSpec::new(MetricField::TotalReads, r"Total Reads:\s*(\d+")
            .compile()
            .unwrap_err();
        assert!(matches!(err, SimlogError::InvalidPattern { .. }));
        assert!(err.to_string().contains("total_reads"));
    }

    #[test]
    fn test_missing_capture_group_is_reported() {
        let err = RuleSpec::new(MetricField::FifoDepth, r"Depth:\s*(\d+)")
            .with_group(2)
            .compile()
            .unwrap_err();
        assert!(matches!(err, SimlogError::InvalidRule { .. }));

        let err = RuleSpec::new(MetricField::FifoDepth, r"Depth:\s*(\d+)")
            .with_group(0)
            .compile()
            .unwrap_err();
        assert!(matches!(err, SimlogError::InvalidRule { .. }));
    }

    #[test]
    fn test_rule_spec_from_toml() {
        let spec: RuleSpec = toml::from_str(
            r#"
field = "peak_occupancy"
pattern = 'max_level=(\d+)'
"#,
        )
        .unwrap();
        assert_eq!(spec.field, MetricField::PeakOccupancy);
        assert_eq!(spec.group, 1);
        assert_eq!(spec.converter, None);

        let spec: RuleSpec = toml::from_str(
            r#"
field = "fifo_depth"
pattern = 'level=(\d+)/(\d+)'
group = 2
converter = "integer"
"#,
        )
        .unwrap();
        assert_eq!(spec.group, 2);
        assert_eq!(spec.converter, Some(Converter::Integer));
    }

    #[test]
    fn test_float_value_as_counter() {
        assert_eq!(FieldValue::Float(12.9).as_u64(), 12);
        assert_eq!(FieldValue::Float(-1.0).as_u64(), 0);
        assert_eq!(FieldValue::Integer(4).as_f64(), 4.0);
    }
}
