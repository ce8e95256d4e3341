use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Neg, Sub};

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{Signed, Zero};

use common::error::Error;
use common::numeric_kernel::{
    EXPONENT_BIAS, FRACTION_MASK, MANTISSA_BITS, MAX_BIASED_EXPONENT, MIN_LSB_EXPONENT, decode,
    lsb_exponent,
};
use common::types::Precision;

/// Arbitrary-precision binary number `mantissa × 2^exponent`.
///
/// The representation is canonical: the mantissa is odd, or the value is zero with exponent `0`.
/// Derived equality and hashing are therefore value equality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BigFloat {
    mantissa: BigInt,
    exponent: i64,
}

impl BigFloat {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Builds `mantissa × 2^exponent`, normalizing trailing zero bits into the exponent.
    pub fn from_parts(mantissa: impl Into<BigInt>, exponent: i64) -> Self {
        let mantissa = mantissa.into();
        match mantissa.trailing_zeros() {
            None => Self::zero(),
            Some(0) => Self { mantissa, exponent },
            Some(tz) => Self {
                mantissa: mantissa >> tz,
                exponent: exponent + tz as i64,
            },
        }
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    pub fn is_sign_negative(&self) -> bool {
        self.mantissa.is_negative()
    }

    pub fn abs(&self) -> Self {
        Self {
            mantissa: self.mantissa.abs(),
            exponent: self.exponent,
        }
    }

    /// Binary exponent `e` such that `self = m × 2^e` with `0.5 <= |m| < 1`; `0` for zero.
    ///
    /// Two values share an exponent exactly when their magnitudes lie in the same binade.
    pub fn exponent(&self) -> i64 {
        if self.is_zero() {
            return 0;
        }
        self.mantissa.bits() as i64 + self.exponent
    }

    /// Rounds to the given working precision, nearest, ties to even.
    pub fn round(&self, precision: Precision) -> Self {
        let Precision::Bits(bits) = precision else {
            return self.clone();
        };
        let bits = u64::from(bits.get());
        let len = self.mantissa.bits();
        if len <= bits {
            return self.clone();
        }

        let shift = len - bits;
        let magnitude = round_shifted(self.mantissa.magnitude(), shift);
        Self::from_parts(
            BigInt::from_biguint(self.mantissa.sign(), magnitude),
            self.exponent + shift as i64,
        )
    }

    /// Correctly rounded conversion to the nearest double, ties to even.
    ///
    /// Values below half the smallest subnormal round to a zero of matching sign; values at or
    /// beyond the overflow threshold become infinities.
    pub fn to_f64(&self) -> f64 {
        if self.is_zero() {
            return 0.0;
        }
        let negative = self.is_sign_negative();
        let signed = |v: f64| if negative { -v } else { v };

        let top = self.exponent() - 1;
        if top > EXPONENT_BIAS {
            return signed(f64::INFINITY);
        }

        let mut lsb = (top - MANTISSA_BITS as i64).max(MIN_LSB_EXPONENT);
        let magnitude = self.mantissa.magnitude();
        let significand = if lsb >= self.exponent {
            round_shifted(magnitude, (lsb - self.exponent) as u64)
        } else {
            magnitude << (self.exponent - lsb) as u64
        };
        // At most 2^53 after rounding, so a single digit holds it.
        let mut significand = significand.iter_u64_digits().next().unwrap_or(0);

        if significand == 1 << (MANTISSA_BITS + 1) {
            significand >>= 1;
            lsb += 1;
        }

        if significand >> MANTISSA_BITS == 0 {
            // Subnormal or zero: `lsb` sits at the subnormal scale.
            return signed(f64::from_bits(significand));
        }

        let biased = lsb + MANTISSA_BITS as i64 + EXPONENT_BIAS;
        if biased >= MAX_BIASED_EXPONENT as i64 {
            return signed(f64::INFINITY);
        }
        signed(f64::from_bits(
            ((biased as u64) << MANTISSA_BITS) | (significand & FRACTION_MASK),
        ))
    }
}

/// `magnitude >> shift`, rounded to nearest with ties to even.
fn round_shifted(magnitude: &BigUint, shift: u64) -> BigUint {
    if shift == 0 {
        return magnitude.clone();
    }
    let quotient = magnitude >> shift;
    let half = magnitude.bit(shift - 1);
    let sticky = magnitude
        .trailing_zeros()
        .is_some_and(|tz| tz < shift - 1);

    if half && (sticky || quotient.bit(0)) {
        quotient + 1u32
    } else {
        quotient
    }
}

impl TryFrom<f64> for BigFloat {
    type Error = Error;

    /// Exact conversion; every finite double has a finite binary expansion.
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        let decoded = decode(value);
        if !decoded.is_finite() {
            return Err(Error::NonFiniteValue(value));
        }
        let mantissa = BigInt::from(decoded.mantissa);
        let mantissa = if decoded.negative { -mantissa } else { mantissa };
        Ok(Self::from_parts(
            mantissa,
            lsb_exponent(decoded.biased_exponent),
        ))
    }
}

impl Add<&BigFloat> for &BigFloat {
    type Output = BigFloat;

    fn add(self, rhs: &BigFloat) -> BigFloat {
        if self.is_zero() {
            return rhs.clone();
        }
        if rhs.is_zero() {
            return self.clone();
        }
        let (low, high) = if self.exponent <= rhs.exponent {
            (self, rhs)
        } else {
            (rhs, self)
        };
        let shift = (high.exponent - low.exponent) as u64;
        BigFloat::from_parts(
            &low.mantissa + (high.mantissa.clone() << shift),
            low.exponent,
        )
    }
}

impl Add for BigFloat {
    type Output = BigFloat;

    fn add(self, rhs: BigFloat) -> BigFloat {
        &self + &rhs
    }
}

impl Neg for &BigFloat {
    type Output = BigFloat;

    fn neg(self) -> BigFloat {
        BigFloat {
            mantissa: -&self.mantissa,
            exponent: self.exponent,
        }
    }
}

impl Neg for BigFloat {
    type Output = BigFloat;

    fn neg(self) -> BigFloat {
        BigFloat {
            mantissa: -self.mantissa,
            exponent: self.exponent,
        }
    }
}

impl Sub<&BigFloat> for &BigFloat {
    type Output = BigFloat;

    fn sub(self, rhs: &BigFloat) -> BigFloat {
        self + &(-rhs)
    }
}

impl Sub for BigFloat {
    type Output = BigFloat;

    fn sub(self, rhs: BigFloat) -> BigFloat {
        &self - &rhs
    }
}

impl Ord for BigFloat {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self - other).mantissa.sign() {
            Sign::Minus => Ordering::Less,
            Sign::NoSign => Ordering::Equal,
            Sign::Plus => Ordering::Greater,
        }
    }
}

impl PartialOrd for BigFloat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for BigFloat {
    /// Exact `<mantissa>p<exponent>` form, e.g. `3p-2` for `0.75`.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.exponent == 0 {
            write!(f, "{}", self.mantissa)
        } else {
            write!(f, "{}p{}", self.mantissa, self.exponent)
        }
    }
}
