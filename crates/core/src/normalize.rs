// Copyright 2025 Benchmark Explorer Contributors
// SPDX-License-Identifier: Apache-2.0

//! Per-column normalization of benchmark metrics.
//!
//! Every metric column is divided by its minimum over the result set, so the
//! smallest value of each column becomes `1` and the others read as "times
//! the minimum". The minimum is used for every column, including the rate
//! columns where a larger value is better.
//!
//! Normalization is a transform: [`NormalizedResults::new`] takes the raw
//! results by value and pairs each record with a [`NormalizedMetrics`], so
//! the raw data cannot be normalized twice.

use crate::model::{BenchmarkRecord, BenchmarkResults, Metric};
use serde::{Deserialize, Serialize};

/// How the reference value of a column is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregator {
    /// Smallest present value.
    #[default]
    Min,
    /// Largest present value.
    Max,
}

impl Aggregator {
    /// Aggregate the present, non-NaN values of `metric`.
    ///
    /// Returns `None` when no record carries the metric.
    pub fn aggregate(self, records: &[BenchmarkRecord], metric: Metric) -> Option<f64> {
        let values = records
            .iter()
            .filter_map(|r| r.metric(metric))
            .filter(|v| !v.is_nan());
        match self {
            Self::Min => values.reduce(f64::min),
            Self::Max => values.reduce(f64::max),
        }
    }
}

/// Ratio of each record's `metric` to the column aggregate.
///
/// The result has one entry per record, in order. A record without the
/// metric gets NaN, and so does every record when no value is present.
pub fn normalize_by(records: &[BenchmarkRecord], metric: Metric, aggregator: Aggregator) -> Vec<f64> {
    let Some(best) = aggregator.aggregate(records, metric) else {
        return vec![f64::NAN; records.len()];
    };
    records
        .iter()
        .map(|r| r.metric(metric).map_or(f64::NAN, |v| v / best))
        .collect()
}

/// Normalized values of one record. NaN marks an undefined ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedMetrics {
    /// `iterations / min(iterations)`
    pub iterations: f64,
    /// `real_time / min(real_time)`
    pub real_time: f64,
    /// `cpu_time / min(cpu_time)`
    pub cpu_time: f64,
    /// `bytes_per_second / min(bytes_per_second)`
    pub bytes_per_second: f64,
    /// `items_per_second / min(items_per_second)`
    pub items_per_second: f64,
}

impl Default for NormalizedMetrics {
    fn default() -> Self {
        Self {
            iterations: f64::NAN,
            real_time: f64::NAN,
            cpu_time: f64::NAN,
            bytes_per_second: f64::NAN,
            items_per_second: f64::NAN,
        }
    }
}

impl NormalizedMetrics {
    /// Normalized value of `metric`.
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Iterations => self.iterations,
            Metric::RealTime => self.real_time,
            Metric::CpuTime => self.cpu_time,
            Metric::BytesPerSecond => self.bytes_per_second,
            Metric::ItemsPerSecond => self.items_per_second,
        }
    }

    fn set(&mut self, metric: Metric, value: f64) {
        match metric {
            Metric::Iterations => self.iterations = value,
            Metric::RealTime => self.real_time = value,
            Metric::CpuTime => self.cpu_time = value,
            Metric::BytesPerSecond => self.bytes_per_second = value,
            Metric::ItemsPerSecond => self.items_per_second = value,
        }
    }
}

/// Results paired with their normalized metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedResults {
    /// The raw results.
    pub results: BenchmarkResults,
    /// One entry per record, same order as `results.records()`.
    pub normalized: Vec<NormalizedMetrics>,
}

impl NormalizedResults {
    /// Normalize every metric column by its minimum.
    pub fn new(results: BenchmarkResults) -> Self {
        Self::with_aggregator(results, Aggregator::Min)
    }

    /// Normalize every metric column with the given aggregator.
    pub fn with_aggregator(results: BenchmarkResults, aggregator: Aggregator) -> Self {
        let mut normalized = vec![NormalizedMetrics::default(); results.len()];
        for metric in Metric::ALL {
            let column = normalize_by(results.records(), metric, aggregator);
            for (entry, value) in normalized.iter_mut().zip(column) {
                entry.set(metric, value);
            }
        }
        tracing::trace!(records = results.len(), ?aggregator, "normalized results");
        Self {
            results,
            normalized,
        }
    }

    /// Records paired with their normalized metrics.
    pub fn iter(&self) -> impl Iterator<Item = (&BenchmarkRecord, &NormalizedMetrics)> {
        self.results.records().iter().zip(self.normalized.iter())
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.normalized.len()
    }

    /// Whether there are no records.
    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn records() -> Vec<BenchmarkRecord> {
        vec![
            BenchmarkRecord::named("a")
                .with(Metric::Iterations, 3000.0)
                .with(Metric::RealTime, 20.0),
            BenchmarkRecord::named("b")
                .with(Metric::Iterations, 1000.0)
                .with(Metric::RealTime, 10.0),
            BenchmarkRecord::named("c")
                .with(Metric::Iterations, 2000.0)
                .with(Metric::RealTime, 40.0),
        ]
    }

    #[test]
    fn test_normalize_by_min() {
        let ratios = normalize_by(&records(), Metric::Iterations, Aggregator::Min);
        assert_eq!(ratios, [3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_normalize_by_max() {
        let ratios = normalize_by(&records(), Metric::RealTime, Aggregator::Max);
        assert_eq!(ratios, [0.5, 0.25, 1.0]);
    }

    #[test]
    fn test_normalize_minimum_is_one() {
        let ratios = normalize_by(&records(), Metric::Iterations, Aggregator::default());
        let min = ratios.iter().copied().fold(f64::INFINITY, f64::min);
        assert_eq!(min, 1.0);
        assert!(ratios.iter().all(|r| *r >= 1.0));
    }

    #[test]
    fn test_normalize_missing_value_is_nan() {
        let mut recs = records();
        recs.push(BenchmarkRecord::named("d").with(Metric::Iterations, 500.0));
        let ratios = normalize_by(&recs, Metric::RealTime, Aggregator::Min);
        assert_eq!(&ratios[..3], [2.0, 1.0, 4.0]);
        assert!(ratios[3].is_nan());
    }

    #[test]
    fn test_normalize_column_absent_everywhere() {
        let ratios = normalize_by(&records(), Metric::BytesPerSecond, Aggregator::Min);
        assert_eq!(ratios.len(), 3);
        assert!(ratios.iter().all(|r| r.is_nan()));
    }

    #[test]
    fn test_normalize_empty() {
        assert!(normalize_by(&[], Metric::CpuTime, Aggregator::Min).is_empty());
    }

    #[test]
    fn test_normalized_results_keeps_raw_values() {
        let results = BenchmarkResults::new(Map::new(), records());
        let normalized = NormalizedResults::new(results);
        assert_eq!(normalized.len(), 3);

        let (record, metrics) = normalized.iter().nth(2).unwrap();
        assert_eq!(record.iterations, Some(2000.0));
        assert_eq!(metrics.iterations, 2.0);
        assert_eq!(metrics.real_time, 4.0);
        assert!(metrics.cpu_time.is_nan());
    }
}
