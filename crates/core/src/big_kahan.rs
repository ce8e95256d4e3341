use common::types::Precision;

use super::big_float::BigFloat;

/// Compensated (Kahan) summation carried out in arbitrary precision.
///
/// Every intermediate is rounded to `precision`; with `Precision::Exact` nothing is ever lost and
/// the compensation stays zero.
#[derive(Debug, Clone, Default)]
pub struct BigKahan {
    sum: BigFloat,
    compensation: BigFloat,
    precision: Precision,
}

impl BigKahan {
    pub fn new(precision: Precision) -> Self {
        Self {
            precision,
            ..Self::default()
        }
    }

    pub fn add(&mut self, value: &BigFloat) {
        let p = self.precision;
        let y = (value - &self.compensation).round(p);
        let t = (&self.sum + &y).round(p);
        self.compensation = (&(&t - &self.sum).round(p) - &y).round(p);
        self.sum = t;
    }

    pub fn sum(&self) -> &BigFloat {
        &self.sum
    }

    pub fn into_sum(self) -> BigFloat {
        self.sum
    }
}
