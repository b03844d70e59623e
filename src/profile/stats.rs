use serde::Serialize;

use crate::sanitize::metric;

/// Summary statistics over the non-null values of a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericStats {
    pub count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std: Option<f64>,
}

/// Running accumulator; variance uses Welford's update so large offsets do
/// not cancel out.
#[derive(Debug, Default)]
pub(crate) struct StatsAccumulator {
    count: usize,
    mean: f64,
    m2: f64,
    min: Option<f64>,
    max: Option<f64>,
}

impl StatsAccumulator {
    pub(crate) fn add(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
        self.min = Some(self.min.map_or(value, |current| current.min(value)));
        self.max = Some(self.max.map_or(value, |current| current.max(value)));
    }

    pub(crate) fn count(&self) -> usize {
        self.count
    }

    pub(crate) fn min(&self) -> Option<f64> {
        self.min
    }

    pub(crate) fn max(&self) -> Option<f64> {
        self.max
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean)
    }

    /// Sample standard deviation; zero with fewer than two values.
    fn std_dev(&self) -> f64 {
        if self.count < 2 {
            return 0.0;
        }
        let variance = self.m2 / (self.count as f64 - 1.0);
        if variance.is_finite() {
            variance.max(0.0).sqrt()
        } else {
            f64::NAN
        }
    }

    /// `sorted` must hold the same values in ascending order.
    pub(crate) fn finish(&self, sorted: &[f64]) -> Option<NumericStats> {
        if self.count == 0 {
            return None;
        }
        Some(NumericStats {
            count: self.count,
            min: self.min.and_then(metric),
            max: self.max.and_then(metric),
            mean: self.mean().and_then(metric),
            median: percentile(sorted, 0.5).and_then(metric),
            std: metric(self.std_dev()),
        })
    }
}

/// Linear interpolation between the two closest ranks of an ascending slice.
pub fn percentile(sorted: &[f64], quantile: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = (sorted.len() - 1) as f64 * quantile.clamp(0.0, 1.0);
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}
