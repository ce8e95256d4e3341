use std::num::NonZeroU32;

use super::error::Error;

/// IEEE-754 category of a double-precision bit pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Zero,
    Subnormal,
    Normal,
    Infinite,
    Nan,
}

/// A double-precision value split into its fields.
///
/// Fields:
/// - `negative`: the sign bit.
/// - `biased_exponent`: the raw 11-bit exponent field (`0..=2047`).
/// - `mantissa`: the full mantissa. Fraction plus implicit bit for normals, the raw fraction for
///   subnormals, `0` for zeros and infinities. For NaNs this is the payload and carries no meaning.
/// - `category`: the IEEE-754 class of the pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    pub negative: bool,
    pub biased_exponent: usize,
    pub mantissa: u64,
    pub category: Category,
}

impl Decoded {
    /// Returns true for zeros, subnormals and normals.
    pub fn is_finite(&self) -> bool {
        matches!(
            self.category,
            Category::Zero | Category::Subnormal | Category::Normal
        )
    }
}

/// Working precision of arbitrary-precision arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Precision {
    /// Results are never rounded.
    #[default]
    Exact,

    /// Results are rounded to this many significant bits, nearest, ties to even.
    Bits(NonZeroU32),
}

impl Precision {
    /// The precision of a double-precision significand.
    pub const DOUBLE: Precision = match NonZeroU32::new(53) {
        Some(bits) => Precision::Bits(bits),
        None => Precision::Exact,
    };

    /// Builds a bounded precision.
    ///
    /// # Errors
    /// Returns `Error::InvalidPrecision` if `bits` is zero.
    pub fn bits(bits: u32) -> Result<Self, Error> {
        NonZeroU32::new(bits)
            .map(Precision::Bits)
            .ok_or(Error::InvalidPrecision(bits))
    }

    /// Maps an optional bit count to a precision; `None` means exact.
    pub fn from_option(bits: Option<u32>) -> Result<Self, Error> {
        bits.map_or(Ok(Precision::Exact), Precision::bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_precision_is_exact() {
        assert_eq!(Precision::default(), Precision::Exact);
    }

    #[test]
    fn zero_bits_is_rejected() {
        assert_eq!(Precision::bits(0), Err(Error::InvalidPrecision(0)));
    }

    #[test]
    fn optional_bits_map_to_precision() {
        assert_eq!(Precision::from_option(None), Ok(Precision::Exact));
        assert_eq!(Precision::from_option(Some(53)), Ok(Precision::DOUBLE));
        assert!(Precision::from_option(Some(0)).is_err());
    }
}
