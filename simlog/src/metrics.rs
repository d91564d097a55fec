//! Derived percentages
//!
//! Pass rates, occupancy and coverage use integer floor division; resource
//! differences use floating point. Every denominator of zero yields 0.

use crate::types::{PerformanceMetrics, TestResult};

/// `floor(numerator * 100 / denominator)`, or 0 when the denominator is 0.
pub fn floor_percent(numerator: u64, denominator: u64) -> u64 {
    if denominator == 0 {
        return 0;
    }
    numerator.saturating_mul(100) / denominator
}

pub fn count_passed(results: &[TestResult]) -> usize {
    results.iter().filter(|r| r.passed).count()
}

pub fn count_failed(results: &[TestResult]) -> usize {
    results.len() - count_passed(results)
}

pub fn pass_rate(results: &[TestResult]) -> u64 {
    floor_percent(count_passed(results) as u64, results.len() as u64)
}

pub fn occupancy_percent(metrics: &PerformanceMetrics) -> u64 {
    floor_percent(metrics.peak_occupancy, metrics.fifo_depth)
}

/// `(a - b) / b * 100`, or 0 when `b` is 0.
pub fn percent_difference(a: f64, b: f64) -> f64 {
    if b == 0.0 {
        return 0.0;
    }
    (a - b) / b * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results(outcomes: &[bool]) -> Vec<TestResult> {
        outcomes
            .iter()
            .enumerate()
            .map(|(i, &passed)| TestResult::new(i as u32 + 1, format!("test {}", i + 1), passed))
            .collect()
    }

    #[test]
    fn test_pass_rate_floors() {
        assert_eq!(pass_rate(&results(&[true, true, false])), 66);
        assert_eq!(pass_rate(&results(&[true, true])), 100);
        assert_eq!(pass_rate(&results(&[false])), 0);
    }

    #[test]
    fn test_pass_rate_empty_is_zero() {
        assert_eq!(pass_rate(&[]), 0);
    }

    #[test]
    fn test_counts() {
        let r = results(&[true, false, false, true, true]);
        assert_eq!(count_passed(&r), 3);
        assert_eq!(count_failed(&r), 2);
    }

    #[test]
    fn test_occupancy_percent() {
        let metrics = PerformanceMetrics {
            peak_occupancy: 12,
            fifo_depth: 16,
            ..PerformanceMetrics::defaults()
        };
        assert_eq!(occupancy_percent(&metrics), 75);

        let metrics = PerformanceMetrics {
            peak_occupancy: 5,
            fifo_depth: 0,
            ..PerformanceMetrics::defaults()
        };
        assert_eq!(occupancy_percent(&metrics), 0);
    }

    #[test]
    fn test_percent_difference() {
        assert_eq!(percent_difference(150.0, 100.0), 50.0);
        assert_eq!(percent_difference(50.0, 100.0), -50.0);
        assert_eq!(percent_difference(5.0, 0.0), 0.0);
        assert_eq!(percent_difference(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_floor_percent() {
        assert_eq!(floor_percent(1, 3), 33);
        assert_eq!(floor_percent(7, 0), 0);
    }
}
