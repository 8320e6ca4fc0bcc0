//! Decimal digits to float bits.
//!
//! The digits are split at the decimal point. The integer part is built
//! exactly in a [`BigInt`]; if it already carries more bits than the target
//! can hold, or there is no fraction, it is assembled directly. Otherwise the
//! fraction becomes `numerator / 10^k` and long division supplies the missing
//! low bits plus one extra bit for rounding.

use crate::assemble::{assemble, assemble_from_bigint};
use crate::bigint::{BigInt, CapacityExceeded, SMALL_POWERS_OF_TEN};
use crate::digits::Digits;
use crate::error::RangeError;
use crate::layout::FloatLayout;

/// Accumulates decimal digits into `value` nine at a time, in base 10^9.
fn accumulate(digits: &[u8], value: &mut BigInt) -> Result<(), CapacityExceeded> {
    for chunk in digits.chunks(9) {
        let chunk_value = chunk
            .iter()
            .fold(0_u32, |acc, &digit| acc * 10 + u32::from(digit));

        value.mul_small(SMALL_POWERS_OF_TEN[chunk.len() - 1])?;
        value.add_small(chunk_value)?;
    }
    Ok(())
}

pub(crate) fn convert(layout: &FloatLayout, digits: &Digits) -> Result<u64, RangeError> {
    let negative = digits.negative;
    let overflow = |_: CapacityExceeded| RangeError::Overflow;
    let underflow = |_: CapacityExceeded| RangeError::Underflow;

    // One bit beyond the mantissa decides rounding.
    let required_bits = layout.mantissa_bits + 1;

    let mantissa = digits.mantissa();
    let positive_exponent = digits.exponent.max(0).unsigned_abs() as usize;
    let integer_len = positive_exponent.min(mantissa.len());
    let integer_missing = positive_exponent - integer_len;
    let (integer_digits, fraction_digits) = mantissa.split_at(integer_len);

    let mut integer = BigInt::new();
    accumulate(integer_digits, &mut integer).map_err(overflow)?;
    if integer_missing > 0 {
        integer
            .mul_pow10(integer_missing as u32)
            .map_err(overflow)?;
    }

    let integer_bits = integer.bit_len();
    let zero_fraction = fraction_digits.is_empty() && digits.zero_tail;

    if integer_bits >= required_bits || zero_fraction {
        return assemble_from_bigint(layout, &integer, integer_bits, negative, !zero_fraction);
    }

    let mut numerator = BigInt::new();
    accumulate(fraction_digits, &mut numerator).map_err(underflow)?;

    let denominator_exponent =
        fraction_digits.len() as u32 + digits.exponent.min(0).unsigned_abs();
    let mut denominator = BigInt::one();
    denominator
        .mul_pow10(denominator_exponent)
        .map_err(underflow)?;

    // Line the numerator's top bit up with the denominator's, so each further
    // bit of left shift yields one bit of quotient.
    let fraction_shift = denominator.bit_len().saturating_sub(numerator.bit_len());
    numerator.shift_left(fraction_shift).map_err(underflow)?;

    let required_fraction_bits = required_bits - integer_bits;
    let mut remaining_bits = required_fraction_bits;

    if integer_bits > 0 {
        // The fraction starts too far right to contribute bits; it only
        // makes the tail inexact. At equality it may still break a tie.
        if fraction_shift > remaining_bits {
            return assemble_from_bigint(layout, &integer, integer_bits, negative, true);
        }
        remaining_bits -= fraction_shift;
    }

    // Power of two that brings the fraction into [1, 2).
    let fraction_exponent = if numerator < denominator {
        fraction_shift + 1
    } else {
        fraction_shift
    };

    numerator.shift_left(remaining_bits).map_err(underflow)?;
    let mut fraction = numerator.divide(&denominator);
    let mut exact_tail = digits.zero_tail && numerator.is_zero();

    // The quotient can carry one bit more than asked for.
    let fraction_len = u64::BITS - fraction.leading_zeros();
    if fraction_len > required_fraction_bits {
        let excess = fraction_len - required_fraction_bits;
        exact_tail = exact_tail && fraction & ((1_u64 << excess) - 1) == 0;
        fraction >>= excess;
    }

    let complete = (integer.low_u64() << required_fraction_bits) + fraction;
    let exponent = if integer_bits > 0 {
        integer_bits as i32 - 2
    } else {
        -(fraction_exponent as i32) - 1
    };

    assemble(layout, complete, exponent, negative, exact_tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{FLOAT32, FLOAT64};

    fn to_f64(digits: &str, exponent: i32) -> Result<f64, RangeError> {
        convert(&FLOAT64, &Digits::from_text(false, digits, exponent)).map(f64::from_bits)
    }

    fn to_f32(digits: &str, exponent: i32) -> Result<f32, RangeError> {
        convert(&FLOAT32, &Digits::from_text(false, digits, exponent))
            .map(|bits| f32::from_bits(bits as u32))
    }

    #[test]
    fn test_accumulate() {
        let mut value = BigInt::new();
        accumulate(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 0, 1, 2], &mut value).unwrap();
        assert_eq!(value.low_u64(), 123_456_789_012);
    }

    #[test]
    fn test_integers() {
        assert_eq!(to_f64("123", 3), Ok(123.0));
        assert_eq!(to_f64("1", 5), Ok(10000.0));
        assert_eq!(to_f64("18446744073709551616", 20), Ok(18446744073709551616.0));
        assert_eq!(to_f64("17976931348623157", 309), Ok(f64::MAX));
        assert_eq!(to_f32("16777216", 8), Ok(16777216.0));
    }

    #[test]
    fn test_ties_to_even() {
        assert_eq!(to_f64("9007199254740993", 16), Ok(9007199254740992.0));
        assert_eq!(to_f64("9007199254740995", 16), Ok(9007199254740996.0));
        assert_eq!(to_f32("16777217", 8), Ok(16777216.0));

        // A nonzero digit past the buffer breaks the tie upwards.
        let mut digits = Digits::from_text(false, "9007199254740993", 16);
        digits.zero_tail = false;
        let bits = convert(&FLOAT64, &digits).map(f64::from_bits);
        assert_eq!(bits, Ok(9007199254740994.0));
    }

    #[test]
    fn test_tie_decided_by_fraction() {
        // Any fraction past the halfway integer rounds up.
        assert_eq!(to_f64("90071992547409935", 16), Ok(9007199254740994.0));
        assert_eq!(to_f64("900719925474099300001", 16), Ok(9007199254740994.0));
        assert_eq!(to_f64("90071992547409925", 16), Ok(9007199254740992.0));
    }

    #[test]
    fn test_fractions() {
        let cases = [
            ("1", 0, "0.1"),
            ("15", 1, "1.5"),
            ("3", -5, "0.000003"),
            ("12345678901234567890123", 5, "12345.678901234567890123"),
            ("314159265358979323846264338327950288", 1, "3.14159265358979323846264338327950288"),
            ("22250738585072014", -307, "2.2250738585072014e-308"),
            ("22250738585072011", -307, "2.2250738585072011e-308"),
            ("5", -323, "5e-324"),
        ];
        for (digits, exponent, text) in cases {
            let expected: f64 = text.parse().unwrap();
            assert_eq!(to_f64(digits, exponent), Ok(expected), "{text}");
        }
    }

    #[test]
    fn test_subnormal_boundary() {
        let min = to_f64("49406564584124654", -323).map(f64::to_bits);
        assert_eq!(min, Ok(1));
        assert_eq!(to_f64("24703282292062327", -323), Err(RangeError::Underflow));
        assert_eq!(
            to_f64("24703282292062328", -323).map(f64::to_bits),
            Ok(1)
        );
    }

    #[test]
    fn test_range_errors() {
        assert_eq!(to_f64("2", 309), Err(RangeError::Overflow));
        assert_eq!(to_f64("1", 1001), Err(RangeError::Overflow));
        assert_eq!(to_f64("1", -999), Err(RangeError::Underflow));
        assert_eq!(to_f32("35", 39), Err(RangeError::Overflow));
        assert_eq!(to_f32("1", -50), Err(RangeError::Underflow));
    }

    #[test]
    fn test_fraction_at_last_bit() {
        // A 53-bit integer leaves one bit to fill; a fraction in [0.25, 1)
        // lines up exactly with it and decides the rounding.
        assert_eq!(to_f64("90071992547409905", 16), Ok(9007199254740990.0));
        assert_eq!(to_f64("900719925474099050000001", 16), Ok(9007199254740991.0));
        assert_eq!(to_f64("90071992547409904", 16), Ok(9007199254740990.0));
        assert_eq!(to_f64("90071992547409915", 16), Ok(9007199254740992.0));
        assert_eq!(to_f64("90071992547409914", 16), Ok(9007199254740991.0));

        // Further right, the fraction only makes the tail inexact.
        assert_eq!(to_f64("900719925474099004", 16), Ok(9007199254740990.0));
    }

    #[test]
    fn test_capacity_exceeded() {
        // 10^4999 and 10^5001 do not fit the big integer at all.
        assert_eq!(to_f64("1", 5000), Err(RangeError::Overflow));
        assert_eq!(to_f64("1", -5000), Err(RangeError::Underflow));
        assert_eq!(to_f32("1", 5000), Err(RangeError::Overflow));
        assert_eq!(to_f32("1", -5000), Err(RangeError::Underflow));

        let digits = Digits::from_text(true, "25", 5000);
        assert_eq!(convert(&FLOAT64, &digits), Err(RangeError::Overflow));
    }

    #[test]
    fn test_negative() {
        let digits = Digits::from_text(true, "25", 0);
        assert_eq!(convert(&FLOAT64, &digits).map(f64::from_bits), Ok(-0.25));
    }
}
