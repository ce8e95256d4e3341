use common::types::Precision;

use super::big_float::BigFloat;
use super::big_kahan::BigKahan;

/// Exponent-binned reducer over arbitrary-precision terms.
///
/// Each slot only ever holds a value whose exponent equals the slot's index. When an addition
/// moves a slot out of its binade (carry upward, or cancellation downward) the slot is emptied
/// and its value is re-inserted where it now belongs, so cancellation between bins is resolved
/// exactly instead of being truncated at the old scale.
///
/// - `nonneg[e]` holds values with exponent `e >= 0`.
/// - `neg[1 - e]` holds values with exponent `e < 0`.
#[derive(Debug, Clone, Default)]
pub struct BinAdder {
    nonneg: Vec<BigFloat>,
    neg: Vec<BigFloat>,
    precision: Precision,
}

impl BinAdder {
    pub fn new(precision: Precision) -> Self {
        Self {
            precision,
            ..Self::default()
        }
    }

    /// Adds a term, cascading re-insertions until every touched slot is back in its binade.
    ///
    /// The cascade runs off an explicit worklist; each step either settles a slot or empties one.
    pub fn add(&mut self, term: BigFloat) {
        let mut pending = vec![term];

        while let Some(value) = pending.pop() {
            if value.is_zero() {
                continue;
            }
            let exp = value.exponent();
            let precision = self.precision;
            let slot = self.slot_mut(exp);

            *slot = (&*slot + &value).round(precision);

            if slot.exponent() != exp {
                pending.push(std::mem::take(slot));
            }
        }
    }

    /// Number of slots currently holding a non-zero value.
    pub fn populated(&self) -> usize {
        self.nonneg
            .iter()
            .chain(&self.neg)
            .filter(|v| !v.is_zero())
            .count()
    }

    /// Sums the slots from the most significant to the least significant with `BigKahan`.
    pub fn total(&self) -> BigFloat {
        let mut sum = BigKahan::new(self.precision);
        for v in self.nonneg.iter().rev().chain(&self.neg) {
            if !v.is_zero() {
                sum.add(v);
            }
        }
        sum.into_sum()
    }

    fn slot_mut(&mut self, exp: i64) -> &mut BigFloat {
        let (bins, index) = if exp >= 0 {
            (&mut self.nonneg, exp as usize)
        } else {
            (&mut self.neg, (1 - exp) as usize)
        };
        if bins.len() <= index {
            bins.resize_with(index + 1, BigFloat::zero);
        }
        &mut bins[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-80 * 9.87654321;
    const N: usize = 100_000;

    fn big(v: f64) -> BigFloat {
        BigFloat::try_from(v).unwrap()
    }

    #[test]
    fn cancellation_is_resolved_at_double_precision() {
        let mut adder = BinAdder::new(Precision::DOUBLE);
        for x in [EPS, 1000.0, 1000.0, 1000.0, 1000.0, 1000.0, -5000.0] {
            adder.add(big(x));
        }
        let diff = (&big(EPS) - &adder.total()).abs();
        assert!(
            diff < big(EPS / 1000.0),
            "expected {} and {} to be close",
            adder.total(),
            big(EPS)
        );
    }

    #[test]
    fn tiny_terms_survive_between_large_ones() {
        let mut adder = BinAdder::new(Precision::DOUBLE);
        adder.add(big(17.0));
        for _ in 0..N {
            adder.add(big(EPS));
        }
        adder.add(big(-17.0));

        let diff = (&big(EPS * N as f64) - &adder.total()).abs();
        assert!(
            diff < big(EPS / 1000.0),
            "expected {} and {} to be close",
            adder.total(),
            EPS * N as f64
        );
    }

    #[test]
    fn slots_stay_in_their_binade() {
        let mut adder = BinAdder::new(Precision::Exact);
        for x in [1000.0, 1000.0, 1000.0, 1000.0, 1000.0, -5000.0, 0.25, -0.125] {
            adder.add(big(x));
        }
        for (e, v) in adder.nonneg.iter().enumerate() {
            assert!(v.is_zero() || v.exponent() == e as i64);
        }
        for (i, v) in adder.neg.iter().enumerate() {
            assert!(v.is_zero() || v.exponent() == 1 - i as i64);
        }
        assert_eq!(adder.total(), big(0.125));
        assert_eq!(adder.populated(), 5);
    }

    #[test]
    fn full_cancellation_empties_the_adder() {
        let mut adder = BinAdder::default();
        adder.add(big(3.5));
        adder.add(big(-3.5));
        assert_eq!(adder.populated(), 0);
        assert!(adder.total().is_zero());
    }

    #[test]
    fn zero_terms_are_ignored() {
        let mut adder = BinAdder::default();
        adder.add(BigFloat::zero());
        assert!(adder.nonneg.is_empty() && adder.neg.is_empty());
    }
}
