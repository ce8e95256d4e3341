use super::types::{Category, Decoded};

/// Width of the exponent field of a double.
pub const EXPONENT_BITS: u32 = 11;

/// Stored fraction bits, not counting the implicit one.
pub const MANTISSA_BITS: u32 = 64 - EXPONENT_BITS - 1;

pub const EXPONENT_BIAS: i64 = (1 << (EXPONENT_BITS - 1)) - 1;

/// One accumulator slot per biased exponent value.
pub const BIN_COUNT: usize = 1 << EXPONENT_BITS;

/// Biased exponent shared by infinities and NaNs.
pub const MAX_BIASED_EXPONENT: usize = BIN_COUNT - 1;

pub const FRACTION_MASK: u64 = (1 << MANTISSA_BITS) - 1;

pub const IMPLICIT_BIT: u64 = 1 << MANTISSA_BITS;

/// Power of two carried by the lowest bit of the smallest subnormal.
pub const MIN_LSB_EXPONENT: i64 = 1 - EXPONENT_BIAS - MANTISSA_BITS as i64;

const SIGN_SHIFT: u32 = 63;
const EXPONENT_MASK: u64 = (1 << EXPONENT_BITS) - 1;

/// Splits a double into sign, biased exponent, full mantissa and category.
///
/// Total over all 2^64 bit patterns: both signed zeros map to `Category::Zero`, every NaN
/// (quiet or signaling) maps to `Category::Nan`.
pub fn decode(value: f64) -> Decoded {
    let bits = value.to_bits();
    let negative = bits >> SIGN_SHIFT == 1;
    let biased_exponent = ((bits >> MANTISSA_BITS) & EXPONENT_MASK) as usize;
    let fraction = bits & FRACTION_MASK;

    let (mantissa, category) = match biased_exponent {
        0 if fraction == 0 => (0, Category::Zero),
        0 => (fraction, Category::Subnormal),
        MAX_BIASED_EXPONENT if fraction == 0 => (0, Category::Infinite),
        MAX_BIASED_EXPONENT => (fraction, Category::Nan),
        _ => (fraction | IMPLICIT_BIT, Category::Normal),
    };

    Decoded {
        negative,
        biased_exponent,
        mantissa,
        category,
    }
}

/// Power of two carried by the lowest mantissa bit of values in bin `biased_exponent`.
///
/// Subnormal mantissas are not normalized, so bin `0` shares the scale of bin `1`.
pub fn lsb_exponent(biased_exponent: usize) -> i64 {
    biased_exponent.max(1) as i64 - EXPONENT_BIAS - MANTISSA_BITS as i64
}

#[cfg(test)]
mod numerical_kernel_tests {
    use super::*;

    #[test]
    fn test_layout_constants() {
        assert_eq!(MANTISSA_BITS, 52);
        assert_eq!(EXPONENT_BIAS, 1023);
        assert_eq!(BIN_COUNT, 2048);
        assert_eq!(MIN_LSB_EXPONENT, -1074);
    }

    #[test]
    fn test_signed_zeros_decode_to_zero() {
        for zero in [0.0f64, -0.0] {
            let d = decode(zero);
            assert_eq!(d.category, Category::Zero);
            assert_eq!(d.mantissa, 0);
            assert_eq!(d.biased_exponent, 0);
        }
        assert!(decode(-0.0).negative);
        assert!(!decode(0.0).negative);
    }

    #[test]
    fn test_normal_has_implicit_bit() {
        let d = decode(1.0);
        assert_eq!(d.category, Category::Normal);
        assert_eq!(d.biased_exponent, 1023);
        assert_eq!(d.mantissa, IMPLICIT_BIT);

        // 1.5 = 0b1.1
        let d = decode(-1.5);
        assert!(d.negative);
        assert_eq!(d.mantissa, IMPLICIT_BIT | (1 << 51));
    }

    #[test]
    fn test_subnormal_keeps_raw_fraction() {
        let d = decode(f64::from_bits(1));
        assert_eq!(d.category, Category::Subnormal);
        assert_eq!(d.biased_exponent, 0);
        assert_eq!(d.mantissa, 1);
    }

    #[test]
    fn test_infinities_and_nans() {
        let d = decode(f64::INFINITY);
        assert_eq!(d.category, Category::Infinite);
        assert!(!d.negative);
        assert!(decode(f64::NEG_INFINITY).negative);

        assert_eq!(decode(f64::NAN).category, Category::Nan);
        // Signaling NaN: quiet bit clear, payload non-zero.
        let snan = f64::from_bits(0x7ff0_0000_0000_0001);
        assert_eq!(decode(snan).category, Category::Nan);
        assert!(!decode(snan).is_finite());
    }

    #[test]
    fn test_decoded_value_reconstructs_input() {
        for v in [1.0f64, -3.25, 1e300, -7e-200, f64::MAX] {
            let d = decode(v);
            let scaled = d.mantissa as f64 * 2f64.powi(lsb_exponent(d.biased_exponent) as i32);
            assert_eq!(if d.negative { -scaled } else { scaled }, v);
        }
    }

    #[test]
    fn test_bin_zero_shares_scale_with_bin_one() {
        assert_eq!(lsb_exponent(0), lsb_exponent(1));
        assert_eq!(lsb_exponent(1023), -52);
    }
}
