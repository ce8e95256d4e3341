use common::numeric_kernel::{FRACTION_MASK, MANTISSA_BITS};

/// Signed 96-bit counter holding the sum of full mantissas sharing one biased exponent.
///
/// `lo` wraps like two's-complement arithmetic and `hi` counts the carries, so the value is
/// `hi × 2^64 + lo`. Updates never allocate and never overflow in practice: `hi` only moves once
/// per 2^11 maximal mantissas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bin {
    lo: u64,
    hi: i32,
}

/// A bin's value as a sign and magnitude, cut at the 52-bit mantissa boundary.
///
/// `|value| = high × 2^52 + low`, with `low < 2^52` and `high < 2^44`: both fit a double
/// significand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split {
    pub negative: bool,
    pub low: u64,
    pub high: u64,
}

impl Bin {
    pub const ZERO: Bin = Bin { lo: 0, hi: 0 };

    #[inline]
    pub fn add(&mut self, mantissa: u64) {
        let (lo, wrapped) = self.lo.overflowing_add(mantissa);
        self.lo = lo;
        if wrapped {
            self.hi = self.hi.wrapping_add(1);
        }
    }

    #[inline]
    pub fn sub(&mut self, mantissa: u64) {
        let (lo, wrapped) = self.lo.overflowing_sub(mantissa);
        self.lo = lo;
        if wrapped {
            self.hi = self.hi.wrapping_sub(1);
        }
    }

    /// Adds another bin's value, carrying out of `lo` into `hi`.
    pub fn merge(&mut self, other: Bin) {
        self.add(other.lo);
        self.hi = self.hi.wrapping_add(other.hi);
    }

    pub fn is_zero(&self) -> bool {
        self.lo == 0 && self.hi == 0
    }

    pub fn value(&self) -> i128 {
        (i128::from(self.hi) << 64) | i128::from(self.lo)
    }

    /// Splits a non-zero bin into sign, low 52 bits and remaining high bits of its magnitude.
    pub fn split(&self) -> Option<Split> {
        if self.is_zero() {
            return None;
        }
        let value = self.value();
        let magnitude = value.unsigned_abs();
        Some(Split {
            negative: value < 0,
            low: (magnitude as u64) & FRACTION_MASK,
            high: (magnitude >> MANTISSA_BITS) as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: u64 = (1 << 53) - 1;

    #[test]
    fn add_carries_into_high_part() {
        let mut bin = Bin::ZERO;
        bin.add(u64::MAX);
        bin.add(2);
        assert_eq!(bin.value(), i128::from(u64::MAX) + 2);
        assert_eq!(bin.hi, 1);
        assert_eq!(bin.lo, 1);
    }

    #[test]
    fn sub_borrows_from_high_part() {
        let mut bin = Bin::ZERO;
        bin.sub(5);
        assert_eq!(bin.value(), -5);
        assert_eq!(bin.hi, -1);

        bin.add(5);
        assert!(bin.is_zero());
    }

    #[test]
    fn many_maximal_mantissas_do_not_overflow() {
        let mut bin = Bin::ZERO;
        for _ in 0..10_000 {
            bin.add(FULL);
        }
        assert_eq!(bin.value(), 10_000 * i128::from(FULL));
        for _ in 0..25_000 {
            bin.sub(FULL);
        }
        assert_eq!(bin.value(), -15_000 * i128::from(FULL));
    }

    #[test]
    fn merge_matches_sequential_updates() {
        let mut left = Bin::ZERO;
        let mut right = Bin::ZERO;
        let mut both = Bin::ZERO;
        for i in 0..5_000u64 {
            let m = FULL - i;
            if i % 3 == 0 {
                left.sub(m);
                both.sub(m);
            } else {
                right.add(m);
                both.add(m);
            }
        }
        left.merge(right);
        assert_eq!(left, both);
    }

    #[test]
    fn split_cuts_magnitude_at_mantissa_boundary() {
        assert_eq!(Bin::ZERO.split(), None);

        let mut bin = Bin::ZERO;
        bin.add(FULL);
        bin.add(FULL);
        let split = bin.split().unwrap();
        assert!(!split.negative);
        assert_eq!((u128::from(split.high) << 52) | u128::from(split.low), 2 * u128::from(FULL));
        assert!(split.low < 1 << 52);

        let mut bin = Bin::ZERO;
        bin.sub(3 << 52);
        bin.sub(7);
        let split = bin.split().unwrap();
        assert_eq!(
            split,
            Split {
                negative: true,
                low: 7,
                high: 3
            }
        );
    }

    #[test]
    fn split_of_exact_power_of_two_sixty_four() {
        // -2^64 is hi = -1, lo = 0.
        let mut bin = Bin::ZERO;
        bin.sub(1 << 63);
        bin.sub(1 << 63);
        assert_eq!(bin.value(), -(1i128 << 64));
        let split = bin.split().unwrap();
        assert!(split.negative);
        assert_eq!(split.low, 0);
        assert_eq!(split.high, 1 << 12);
    }
}
