//! Time-series curves embedded in materials

use serde::{Deserialize, Serialize};

/// One curve sample: `(timestamp_ms, value)`
///
/// Serialized as a two-element array, the shape the metrics API returns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(i64, f64)", into = "(i64, f64)")]
pub struct Sample {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp: i64, value: f64) -> Self {
        Self { timestamp, value }
    }
}

impl From<(i64, f64)> for Sample {
    fn from((timestamp, value): (i64, f64)) -> Self {
        Self { timestamp, value }
    }
}

impl From<Sample> for (i64, f64) {
    fn from(sample: Sample) -> Self {
        (sample.timestamp, sample.value)
    }
}

/// Ordered sequence of samples, ascending by timestamp
///
/// Gaps are allowed and spacing is not assumed. The curve is read-only once
/// built; windowed aggregates always slice it afresh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Sample>", into = "Vec<Sample>")]
pub struct Curve {
    samples: Vec<Sample>,
}

impl Curve {
    /// Build a curve, sorting samples by timestamp (stable for equal stamps)
    pub fn new(mut samples: Vec<Sample>) -> Self {
        samples.sort_by_key(|s| s.timestamp);
        Self { samples }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    /// Samples with `start_ms <= timestamp <= end_ms`
    ///
    /// Returns an empty slice when `start_ms > end_ms`.
    pub fn in_range(&self, start_ms: i64, end_ms: i64) -> &[Sample] {
        if start_ms > end_ms {
            return &[];
        }
        let lo = self.samples.partition_point(|s| s.timestamp < start_ms);
        let hi = self.samples.partition_point(|s| s.timestamp <= end_ms);
        &self.samples[lo..hi]
    }

    /// Most recent sample, if any
    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }
}

impl From<Vec<Sample>> for Curve {
    fn from(samples: Vec<Sample>) -> Self {
        Self::new(samples)
    }
}

impl From<Curve> for Vec<Sample> {
    fn from(curve: Curve) -> Self {
        curve.samples
    }
}

impl FromIterator<(i64, f64)> for Curve {
    fn from_iter<I: IntoIterator<Item = (i64, f64)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Sample::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sorts_by_timestamp() {
        let curve: Curve = vec![(30, 3.0), (10, 1.0), (20, 2.0)].into_iter().collect();
        let stamps: Vec<i64> = curve.iter().map(|s| s.timestamp).collect();
        assert_eq!(stamps, vec![10, 20, 30]);
    }

    #[test]
    fn test_in_range_inclusive_both_ends() {
        let curve: Curve = vec![(10, 1.0), (20, 2.0), (30, 3.0), (40, 4.0)]
            .into_iter()
            .collect();

        let slice = curve.in_range(20, 30);
        assert_eq!(slice.len(), 2);
        assert_eq!(slice[0].timestamp, 20);
        assert_eq!(slice[1].timestamp, 30);
    }

    #[test]
    fn test_in_range_with_gaps_and_empty() {
        let curve: Curve = vec![(10, 1.0), (100, 2.0)].into_iter().collect();
        assert!(curve.in_range(11, 99).is_empty());
        assert!(curve.in_range(50, 40).is_empty());
        assert!(Curve::default().in_range(0, 1000).is_empty());
    }

    #[test]
    fn test_serde_as_pairs() {
        let curve: Curve = vec![(1_700_000_000_000, 12.5)].into_iter().collect();
        let json = serde_json::to_string(&curve).unwrap();
        assert_eq!(json, "[[1700000000000,12.5]]");

        let back: Curve = serde_json::from_str("[[2,1.0],[1,0.5]]").unwrap();
        assert_eq!(back.samples()[0].timestamp, 1);
    }
}
