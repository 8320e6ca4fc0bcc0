//! Hexadecimal digits to float bits.
//!
//! Every hex digit is exactly four bits, so no big integer is needed: digits
//! are shifted into a `u64` until it holds more bits than the target
//! mantissa, and any leftover digits only matter for rounding.

use crate::assemble::assemble;
use crate::digits::Digits;
use crate::error::RangeError;
use crate::layout::FloatLayout;

pub(crate) fn convert(layout: &FloatLayout, digits: &Digits) -> Result<u64, RangeError> {
    let hexits = digits.mantissa();

    let mut mantissa = 0_u64;
    let mut exponent = digits.exponent + layout.mantissa_bits as i32 - 1;
    let mut used = 0;

    for &hexit in hexits {
        if mantissa > layout.normal_mantissa_mask {
            break;
        }
        mantissa = mantissa * 16 + u64::from(hexit);
        exponent -= 4;
        used += 1;
    }

    let exact_tail = digits.zero_tail && hexits[used..].iter().all(|&hexit| hexit == 0);

    assemble(layout, mantissa, exponent, digits.negative, exact_tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{FLOAT32, FLOAT64};

    fn to_f64(hexits: &str, exponent: i32) -> Result<f64, RangeError> {
        convert(&FLOAT64, &Digits::from_text(false, hexits, exponent)).map(f64::from_bits)
    }

    #[test]
    fn test_simple() {
        // 0x1.8p+1, one integer hexit moves the exponent by four.
        assert_eq!(to_f64("18", 1 + 4), Ok(3.0));
        assert_eq!(to_f64("1", 4), Ok(1.0));
        assert_eq!(to_f64("a", 4), Ok(10.0));
        assert_eq!(to_f64("8", 0), Ok(0.5));
        assert_eq!(to_f64("1", -1074 + 4), Ok(f64::from_bits(1)));
    }

    #[test]
    fn test_long_mantissa_rounds() {
        // 0x1.00000000000008p+0 is halfway above 1.0 and ties to even.
        assert_eq!(to_f64("100000000000008", 4), Ok(1.0));
        // A later nonzero hexit breaks the tie.
        assert_eq!(to_f64("1000000000000080001", 4), Ok(1.0 + f64::EPSILON));
        assert_eq!(to_f64("100000000000018", 4), Ok(1.0 + 2.0 * f64::EPSILON));
    }

    #[test]
    fn test_wide_mantissa_subnormal_promotion() {
        // 0x0.fffffffffffffffp-1022 rounds up to the smallest normal.
        let value = to_f64("fffffffffffffff", -1022);
        assert_eq!(value, Ok(f64::MIN_POSITIVE));
    }

    #[test]
    fn test_range() {
        assert_eq!(to_f64("1", 1024 + 4), Err(RangeError::Overflow));
        assert_eq!(to_f64("1", -1076 + 4), Err(RangeError::Underflow));
        assert_eq!(to_f64("1fffffffffffff", 1023 + 4), Ok(f64::MAX));
        assert_eq!(to_f64("1fffffffffffff8", 1023 + 4), Err(RangeError::Overflow));

        let bits = convert(&FLOAT32, &Digits::from_text(true, "1", 128 + 4));
        assert_eq!(bits, Err(RangeError::Overflow));
    }
}
