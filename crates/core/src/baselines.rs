//! Reference accumulators used as comparison oracles for [`ExactSum`](crate::ExactSum).

use common::types::Precision;

use super::big_float::BigFloat;
use super::traits::Accumulator;

/// Plain repeated addition. The worst case for drift and cancellation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Naive {
    sum: f64,
}

impl Accumulator for Naive {
    fn add(&mut self, value: f64) {
        self.sum += value;
    }

    fn value(&self) -> f64 {
        self.sum
    }
}

/// Classical two-term compensated summation.
///
/// Note: infinities poison the compensation term, so `-inf + 0` and similar inputs yield NaN.
#[derive(Debug, Clone, Copy, Default)]
pub struct Kahan {
    sum: f64,
    compensation: f64,
}

impl Accumulator for Kahan {
    fn add(&mut self, value: f64) {
        let y = value - self.compensation;
        let t = self.sum + y;
        self.compensation = (t - self.sum) - y;
        self.sum = t;
    }

    fn value(&self) -> f64 {
        self.sum
    }
}

/// One arbitrary-precision running total, no binning.
///
/// With `Precision::Exact` (the default) this is the brute-force correctness oracle. With a
/// bounded precision every addition rounds, so catastrophic cancellation is not handled.
/// Non-finite inputs are folded together with IEEE-754 addition and override the total.
#[derive(Debug, Clone, Default)]
pub struct BigSum {
    total: BigFloat,
    special: Option<f64>,
    precision: Precision,
}

impl BigSum {
    pub fn new(precision: Precision) -> Self {
        Self {
            precision,
            ..Self::default()
        }
    }

    /// The running total of the finite inputs.
    pub fn total(&self) -> &BigFloat {
        &self.total
    }
}

impl Accumulator for BigSum {
    fn add(&mut self, value: f64) {
        match BigFloat::try_from(value) {
            Ok(v) => self.total = (&self.total + &v).round(self.precision),
            Err(_) => {
                self.special = Some(self.special.map_or(value, |s| s + value));
            }
        }
    }

    fn value(&self) -> f64 {
        self.special.unwrap_or_else(|| self.total.to_f64())
    }
}
