//! Summary statistics over field value sequences
//!
//! Reducers are explicit accumulators rather than library calls so that the
//! empty and singleton cases are deliberate:
//!
//! | sequence  | mean  | variance | median |
//! |-----------|-------|----------|--------|
//! | empty     | None  | None     | None   |
//! | singleton | x     | 0.0      | x      |
//!
//! Variance is the population variance (divide by `n`).

use serde::{Deserialize, Serialize};

/// Running mean and sum of squared deviations (Welford update).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Accumulator {
    count: usize,
    mean: f64,
    m2: f64,
}

impl Accumulator {
    /// Create an empty accumulator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
        }
    }

    /// Fold one value into the accumulator.
    #[allow(clippy::cast_precision_loss)]
    pub fn push(&mut self, x: f64) {
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (x - self.mean);
    }

    /// Number of values seen.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Arithmetic mean, or `None` if no values were pushed.
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean)
    }

    /// Population variance, or `None` if no values were pushed.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn variance(&self) -> Option<f64> {
        // rounding can leave m2 a hair below zero
        (self.count > 0).then(|| (self.m2 / self.count as f64).max(0.0))
    }
}

impl FromIterator<f64> for Accumulator {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut acc = Self::new();
        for x in iter {
            acc.push(x);
        }
        acc
    }
}

impl Extend<f64> for Accumulator {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for x in iter {
            self.push(x);
        }
    }
}

/// Arithmetic mean of `values`.
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    values.iter().copied().collect::<Accumulator>().mean()
}

/// Population variance of `values`.
#[must_use]
pub fn variance(values: &[f64]) -> Option<f64> {
    values.iter().copied().collect::<Accumulator>().variance()
}

/// Median of `values`; the average of the two middle values for an even count.
#[must_use]
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// A statistic a combinator can derive for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Statistic {
    /// Arithmetic mean.
    Mean,
    /// Median.
    Median,
    /// Population variance.
    Variance,
}

impl Statistic {
    /// Suffix appended to a field name to name this statistic.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Mean => "_mean",
            Self::Median => "_median",
            Self::Variance => "_variance",
        }
    }

    /// Derived field name: `<field><suffix>`.
    #[must_use]
    pub fn field_name(self, field: &str) -> String {
        format!("{field}{}", self.suffix())
    }

    /// Reduce `values` to this statistic.
    #[must_use]
    pub fn reduce(self, values: &[f64]) -> Option<f64> {
        match self {
            Self::Mean => mean(values),
            Self::Median => median(values),
            Self::Variance => variance(values),
        }
    }
}
