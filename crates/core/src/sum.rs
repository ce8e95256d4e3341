use std::fmt;

use num_bigint::BigInt;

use common::numeric_kernel::{BIN_COUNT, MANTISSA_BITS, MAX_BIASED_EXPONENT, decode, lsb_exponent};
use common::types::{Category, Precision};

use super::big_float::BigFloat;
use super::bin::Bin;
use super::bin_adder::BinAdder;
use super::traits::Accumulator;

/// Exact sum of a stream of doubles, correctly rounded on read.
///
/// Addition is commutative and associative: any permutation of the same inputs yields
/// bit-identical results, and `(A + B + C) + D - (A + B + C)` gives exactly `D` even when the
/// intermediate sum overflows a double.
///
/// Each finite input adds its full mantissa into the bin of its biased exponent, so `add` is
/// O(1) and allocation-free. All rounding happens in [`ExactSum::value`], which reduces the 2048
/// bins regardless of how many values were added.
///
/// Signed zeros are not preserved (the sum of a single `-0.0` is `+0.0`), and NaN payloads are
/// not propagated: any NaN input makes the result the canonical NaN.
#[derive(Clone)]
pub struct ExactSum {
    bins: [Bin; BIN_COUNT],
    plus_infs: u64,
    minus_infs: u64,
    nans: u64,
}

/// Counts of non-finite inputs seen by an [`ExactSum`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tallies {
    pub plus_infs: u64,
    pub minus_infs: u64,
    pub nans: u64,
}

/// Unrounded result of an [`ExactSum`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExactValue {
    Finite(BigFloat),
    Infinite { negative: bool },
    NaN,
}

impl ExactValue {
    pub fn is_nan(&self) -> bool {
        matches!(self, ExactValue::NaN)
    }

    pub fn finite(&self) -> Option<&BigFloat> {
        match self {
            ExactValue::Finite(v) => Some(v),
            _ => None,
        }
    }

    /// Rounds to the nearest double, ties to even.
    pub fn to_f64(&self) -> f64 {
        match self {
            ExactValue::Finite(v) => v.to_f64(),
            ExactValue::Infinite { negative: true } => f64::NEG_INFINITY,
            ExactValue::Infinite { negative: false } => f64::INFINITY,
            ExactValue::NaN => f64::NAN,
        }
    }
}

impl fmt::Display for ExactValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExactValue::Finite(v) => write!(f, "{}", v),
            ExactValue::Infinite { negative: true } => write!(f, "-inf"),
            ExactValue::Infinite { negative: false } => write!(f, "+inf"),
            ExactValue::NaN => write!(f, "NaN"),
        }
    }
}

impl ExactSum {
    pub fn new() -> Self {
        Self {
            bins: [Bin::ZERO; BIN_COUNT],
            plus_infs: 0,
            minus_infs: 0,
            nans: 0,
        }
    }

    /// Adds a value. Total over every bit pattern; touches one bin or one tally.
    #[inline]
    pub fn add(&mut self, value: f64) {
        let d = decode(value);
        match d.category {
            Category::Zero => {}
            Category::Infinite if d.negative => self.minus_infs += 1,
            Category::Infinite => self.plus_infs += 1,
            Category::Nan => self.nans += 1,
            Category::Subnormal | Category::Normal => {
                let bin = &mut self.bins[d.biased_exponent];
                if d.negative {
                    bin.sub(d.mantissa);
                } else {
                    bin.add(d.mantissa);
                }
            }
        }
    }

    /// Returns the exact sum rounded to the nearest double, or NaN / ±∞ per IEEE-754.
    pub fn value(&self) -> f64 {
        self.exact_value().to_f64()
    }

    /// Returns the unrounded sum.
    pub fn exact_value(&self) -> ExactValue {
        self.exact_value_with(Precision::Exact)
    }

    /// Returns the sum reduced at a bounded working precision.
    ///
    /// Resolution order: any NaN, then opposite infinities (NaN), then a single-signed infinity,
    /// and only then the reduction of the bins.
    pub fn exact_value_with(&self, precision: Precision) -> ExactValue {
        if self.nans > 0 {
            return ExactValue::NaN;
        }
        match (self.plus_infs > 0, self.minus_infs > 0) {
            (true, true) => return ExactValue::NaN,
            (false, true) => return ExactValue::Infinite { negative: true },
            (true, false) => return ExactValue::Infinite { negative: false },
            (false, false) => {}
        }

        let mut adder = BinAdder::new(precision);
        let mut terms = 0usize;
        for term in self.terms() {
            adder.add(term);
            terms += 1;
        }
        tracing::trace!(terms, slots = adder.populated(), "reduced exponent bins");

        ExactValue::Finite(adder.total())
    }

    /// Folds another accumulator into this one, as if its inputs had been added here.
    pub fn merge(&mut self, other: &ExactSum) {
        for (bin, theirs) in self.bins.iter_mut().zip(other.bins.iter()) {
            bin.merge(*theirs);
        }
        self.plus_infs += other.plus_infs;
        self.minus_infs += other.minus_infs;
        self.nans += other.nans;
    }

    pub fn tallies(&self) -> Tallies {
        Tallies {
            plus_infs: self.plus_infs,
            minus_infs: self.minus_infs,
            nans: self.nans,
        }
    }

    /// Number of exponent bins holding a non-zero mantissa sum.
    pub fn populated_bins(&self) -> usize {
        self.bins.iter().filter(|b| !b.is_zero()).count()
    }

    /// Rebuilds arbitrary-precision terms from the bins, at most two per populated bin.
    ///
    /// The low 52 bits sit at the bin's scale, the rest one mantissa width higher, so each term's
    /// significand fits a double before promotion.
    fn terms(&self) -> impl Iterator<Item = BigFloat> + '_ {
        self.bins[..MAX_BIASED_EXPONENT]
            .iter()
            .enumerate()
            .filter_map(|(e, bin)| bin.split().map(|split| (lsb_exponent(e), split)))
            .flat_map(|(scale, split)| {
                [
                    (split.low, scale),
                    (split.high, scale + i64::from(MANTISSA_BITS)),
                ]
                .into_iter()
                .filter(|&(mantissa, _)| mantissa != 0)
                .map(move |(mantissa, exp)| {
                    let mantissa = BigInt::from(mantissa);
                    let mantissa = if split.negative { -mantissa } else { mantissa };
                    BigFloat::from_parts(mantissa, exp)
                })
            })
    }
}

impl Default for ExactSum {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ExactSum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExactSum")
            .field("populated_bins", &self.populated_bins())
            .field("plus_infs", &self.plus_infs)
            .field("minus_infs", &self.minus_infs)
            .field("nans", &self.nans)
            .finish()
    }
}

impl Accumulator for ExactSum {
    fn add(&mut self, value: f64) {
        ExactSum::add(self, value);
    }

    fn value(&self) -> f64 {
        ExactSum::value(self)
    }
}

impl Extend<f64> for ExactSum {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for v in iter {
            self.add(v);
        }
    }
}

impl FromIterator<f64> for ExactSum {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut sum = ExactSum::new();
        sum.extend(iter);
        sum
    }
}
