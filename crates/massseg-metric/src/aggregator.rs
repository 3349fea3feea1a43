//! Running mean of metric vectors across a validation pass.

use crate::vector::MetricVector;

/// Sums per-example metric vectors and reports their mean.
#[derive(Debug, Clone, Default)]
pub struct MetricsAggregator {
    sum: MetricVector,
    count: usize,
}

impl MetricsAggregator {
    /// Create an empty aggregator.
    pub const fn new() -> Self {
        Self {
            sum: MetricVector::from_array([0.0; 8]),
            count: 0,
        }
    }

    /// Add the metrics of one example.
    pub fn update(&mut self, metrics: MetricVector) {
        self.sum += metrics;
        self.count += 1;
    }

    /// Number of examples accumulated so far.
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Element-wise mean. All zeros when nothing has been accumulated.
    pub fn mean(&self) -> MetricVector {
        if self.count == 0 {
            return MetricVector::default();
        }
        self.sum / self.count as f64
    }

    /// Reset the aggregator.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
