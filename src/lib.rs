//! Correctly rounded conversion of decimal and hexadecimal text to `f32` and
//! `f64`.
//!
//! [`from_chars`] reads the longest numeral at the start of a byte slice and
//! returns the nearest representable value, rounding halfway cases to even.
//! It never rounds twice: the decimal digits are scaled exactly with a
//! fixed-size big integer before the single rounding step, so inputs such as
//! `9007199254740993` or `2.4703282292062328e-324` come out right.
//!
//! Two convenience traits sit on top:
//! - [`FromChars`] parses a whole `&str` to `f32`/`f64`
//! - [`ToHexChars`] formats a float as hex text that [`CharsFormat::Hex`]
//!   reads back exactly
//!
//! # Examples
//!
//! ```
//! use fchars::{from_chars, CharsFormat, FromChars, RangeError, ToHexChars};
//!
//! // Longest match, with the number of bytes consumed
//! let parsed = from_chars::<f64>(b"1.25e2 apples", CharsFormat::General).unwrap();
//! assert_eq!(parsed.value, 125.0);
//! assert_eq!(parsed.consumed, 6);
//!
//! // Out-of-range values still consume the numeral and clamp
//! let parsed = from_chars::<f32>(b"1e39", CharsFormat::General).unwrap();
//! assert_eq!(parsed.value, f32::INFINITY);
//! assert_eq!(parsed.range_error, Some(RangeError::Overflow));
//!
//! // Whole-string parsing
//! assert_eq!(f64::from_chars("0.1"), Ok(0.1));
//! assert!(f64::from_chars("0.1 ").is_err());
//!
//! // Hex round trip
//! let hex = std::f64::consts::PI.to_hex_chars();
//! assert_eq!(hex, "1.921fb54442d18p+1");
//! let parsed = f64::from_chars_format(&hex, CharsFormat::Hex).unwrap();
//! assert_eq!(parsed, std::f64::consts::PI);
//! ```
//!
//! # Format
//!
//! A numeral is an optional `-` (never `+`) followed by one of:
//! - digits with an optional `.` and at least one digit overall, then an
//!   optional exponent: `e` and a signed decimal power of ten, or for
//!   [`CharsFormat::Hex`] `p` and a signed decimal power of two
//! - `inf` or `infinity`, in any case
//! - `nan`, in any case, optionally followed by `(tag)` where the tag is
//!   letters, digits and `_`; `nan(snan)` is signalling and `nan(ind)` is the
//!   negative quiet NaN
//!
//! Hexadecimal numerals have no `0x` prefix. An exponent marker that is not
//! followed by digits is not part of the numeral.
//!
//! # Panics
//!
//! The float conversions never panic. The integer conversions panic if the
//! radix is outside `2..=36`.

mod assemble;
mod bigint;
mod decimal;
mod digits;
mod error;
mod format;
mod hex;
mod layout;
mod lexer;
mod radix;

pub use error::{Error, RangeError, Result};
pub use format::to_chars_hex;
pub use layout::{FloatLayout, RawFloat, FLOAT32, FLOAT64};
pub use lexer::CharsFormat;
pub use radix::{digit_value, int_from_chars, int_to_chars, write_unsigned, RadixInt};

/// A value read from the start of some text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parsed<T> {
    /// The value, clamped when out of range
    pub value: T,
    /// Bytes of input that make up the numeral
    pub consumed: usize,
    /// Set when the numeral does not fit `T`
    pub range_error: Option<RangeError>,
}

impl<T> Parsed<T> {
    /// The value, or [`Error::OutOfRange`] if it was clamped.
    pub fn into_result(self) -> Result<T> {
        match self.range_error {
            Some(error) => Err(error.into()),
            None => Ok(self.value),
        }
    }
}

/// Parses the longest numeral at the start of `text`.
///
/// Fails only with [`Error::InvalidArgument`], when no numeral of the given
/// format starts the text. A well-formed numeral that is too large or too
/// small for `F` yields signed infinity or signed zero with
/// [`Parsed::range_error`] set.
///
/// ```
/// use fchars::{from_chars, CharsFormat, Error};
///
/// let parsed = from_chars::<f64>(b"-nan(ind)", CharsFormat::General).unwrap();
/// assert!(parsed.value.is_nan() && parsed.value.is_sign_negative());
///
/// let parsed = from_chars::<f64>(b"1e", CharsFormat::General).unwrap();
/// assert_eq!((parsed.value, parsed.consumed), (1.0, 1));
///
/// assert_eq!(from_chars::<f64>(b"1e", CharsFormat::Scientific), Err(Error::InvalidArgument));
/// ```
pub fn from_chars<F: RawFloat>(text: &[u8], format: CharsFormat) -> Result<Parsed<F>> {
    let lexeme = lexer::parse(&F::LAYOUT, text, format)?;
    Ok(Parsed {
        value: F::from_raw(lexeme.bits),
        consumed: lexeme.consumed,
        range_error: lexeme.range_error,
    })
}

/// Trait for parsing a whole string as a float.
///
/// Unlike [`from_chars`], the numeral must span the entire string and must be
/// in range.
///
/// # Examples
///
/// ```
/// use fchars::{CharsFormat, Error, FromChars, RangeError};
///
/// assert_eq!(f64::from_chars("9007199254740993"), Ok(9007199254740992.0));
/// assert_eq!(f32::from_chars("-0.5"), Ok(-0.5));
/// assert_eq!(f64::from_chars_format("-1.4p3", CharsFormat::Hex), Ok(-10.0));
/// assert_eq!(f64::from_chars("12px"), Err(Error::TrailingInput(2)));
/// assert_eq!(f64::from_chars("1e999"), Err(Error::OutOfRange(RangeError::Overflow)));
/// ```
pub trait FromChars: Sized {
    /// Parses `s` as a [`CharsFormat::General`] numeral.
    fn from_chars(s: &str) -> Result<Self> {
        Self::from_chars_format(s, CharsFormat::General)
    }

    /// Parses `s` as a numeral of the given format.
    fn from_chars_format(s: &str, format: CharsFormat) -> Result<Self>;
}

impl<F: RawFloat> FromChars for F {
    fn from_chars_format(s: &str, format: CharsFormat) -> Result<Self> {
        let parsed = from_chars::<F>(s.as_bytes(), format)?;
        if parsed.consumed != s.len() {
            return Err(Error::TrailingInput(parsed.consumed));
        }
        parsed.into_result()
    }
}

/// Trait for formatting a float as hexadecimal text.
///
/// The output has no `0x` prefix and is read back bit-exactly by
/// [`CharsFormat::Hex`].
///
/// # Examples
///
/// ```
/// use fchars::ToHexChars;
///
/// assert_eq!(1.0_f32.to_hex_chars(), "1p+0");
/// assert_eq!((-3.5_f64).to_hex_chars(), "-1.cp+1");
/// assert_eq!(f64::from_bits(1).to_hex_chars(), "1p-1074");
/// assert_eq!(f64::INFINITY.to_hex_chars(), "inf");
/// ```
pub trait ToHexChars {
    /// Converts the float to a hexadecimal string.
    #[must_use]
    fn to_hex_chars(self) -> String;
}

impl<F: RawFloat> ToHexChars for F {
    fn to_hex_chars(self) -> String {
        format::format_hex(&F::LAYOUT, self.to_raw()).as_str().to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn general<F: RawFloat>(text: &str) -> Parsed<F> {
        from_chars::<F>(text.as_bytes(), CharsFormat::General).unwrap()
    }

    #[test]
    fn test_ties_to_even() {
        assert_eq!(general::<f64>("9007199254740993").value, 9007199254740992.0);
        assert_eq!(general::<f64>("9007199254740993.0000000001").value, 9007199254740994.0);
        assert_eq!(general::<f32>("16777217").value, 16777216.0);
        assert_eq!(general::<f32>("16777219").value, 16777220.0);
    }

    #[test]
    fn test_range_errors() {
        let parsed = general::<f64>("1e-1000");
        assert_eq!(parsed.value.to_bits(), 0);
        assert_eq!(parsed.range_error, Some(RangeError::Underflow));
        assert_eq!(parsed.consumed, 7);

        let parsed = general::<f64>("1e+1000");
        assert_eq!(parsed.value, f64::INFINITY);
        assert_eq!(parsed.range_error, Some(RangeError::Overflow));
        assert_eq!(parsed.consumed, 7);

        let parsed = general::<f64>("-1e+1000");
        assert_eq!(parsed.value, f64::NEG_INFINITY);
        assert_eq!(parsed.into_result(), Err(Error::OutOfRange(RangeError::Overflow)));
    }

    #[test]
    fn test_subnormal_boundary() {
        let parsed = general::<f64>("4.9406564584124654e-324");
        assert_eq!(parsed.value.to_bits(), 1);
        assert_eq!(parsed.range_error, None);

        let parsed = general::<f64>("2.4703282292062327e-324");
        assert_eq!(parsed.value.to_bits(), 0);
        assert_eq!(parsed.range_error, Some(RangeError::Underflow));

        assert_eq!(general::<f64>("2.4703282292062328e-324").value.to_bits(), 1);
        assert_eq!(general::<f64>("2.2250738585072011e-308").value, 2.2250738585072011e-308);
        assert_eq!(general::<f32>("1.4e-45").value.to_bits(), 1);
    }

    #[test]
    fn test_specials() {
        let parsed = general::<f64>("-0.0");
        assert_eq!(parsed.value.to_bits(), 0x8000_0000_0000_0000);

        for text in ["nan(ind)", "-nan(ind)"] {
            let parsed = general::<f64>(text);
            assert_eq!(parsed.value.to_bits(), 0xfff8_0000_0000_0000, "{text}");
            assert_eq!(parsed.consumed, text.len());
        }

        let parsed = general::<f64>("nan(snan)");
        assert_eq!(parsed.value.to_bits(), 0x7ff0_0000_0000_0001);

        let inf = general::<f64>("inf");
        let infinity = general::<f64>("infinity");
        assert_eq!((inf.value, inf.consumed), (f64::INFINITY, 3));
        assert_eq!((infinity.value, infinity.consumed), (f64::INFINITY, 8));
    }

    #[test]
    fn test_exponent_without_digits() {
        assert_eq!(
            from_chars::<f64>(b"1e", CharsFormat::Scientific),
            Err(Error::InvalidArgument)
        );
        let parsed = general::<f64>("1e");
        assert_eq!((parsed.value, parsed.consumed), (1.0, 1));
    }

    #[test]
    fn test_from_chars_trait() {
        assert_eq!(f64::from_chars("2.5"), Ok(2.5));
        assert_eq!(f32::from_chars("3.4028235e38"), Ok(f32::MAX));
        assert_eq!(f64::from_chars(""), Err(Error::InvalidArgument));
        assert_eq!(f64::from_chars("+1"), Err(Error::InvalidArgument));
        assert_eq!(f64::from_chars("1.5x"), Err(Error::TrailingInput(3)));
        assert_eq!(f64::from_chars("0x1p0"), Err(Error::TrailingInput(1)));
        assert_eq!(
            f64::from_chars("1e-400"),
            Err(Error::OutOfRange(RangeError::Underflow))
        );
        assert_eq!(f64::from_chars_format("1.5", CharsFormat::Scientific), Err(Error::InvalidArgument));
        assert_eq!(f64::from_chars_format("1e5", CharsFormat::Fixed), Err(Error::TrailingInput(1)));
        assert_eq!(f64::from_chars_format("1e5", CharsFormat::Hex), Ok(485.0));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::OutOfRange(RangeError::Overflow).to_string(),
            "value is too large for the target type"
        );
        assert_eq!(Error::TrailingInput(4).to_string(), "unexpected input at byte 4");
    }

    #[test]
    fn test_to_hex_chars() {
        assert_eq!(0.1_f32.to_hex_chars(), "1.99999ap-4");
        assert_eq!(0.1_f64.to_hex_chars(), "1.999999999999ap-4");
        assert_eq!((-0.0_f64).to_hex_chars(), "-0p+0");
        assert_eq!(f32::MAX.to_hex_chars(), "1.fffffep+127");
        assert_eq!(f64::from_bits(0xfff8_0000_0000_0000).to_hex_chars(), "-nan(ind)");
    }

    #[test]
    fn test_subnormal_hex_roundtrip() {
        let subnormals = [
            f64::MIN_POSITIVE / 2.0,
            f64::MIN_POSITIVE / 1024.0,
            5e-324_f64,
        ];
        for &v in &subnormals {
            let hex = v.to_hex_chars();
            let parsed = f64::from_chars_format(&hex, CharsFormat::Hex);
            assert_eq!(parsed.map(f64::to_bits), Ok(v.to_bits()), "{v} -> {hex}");
        }

        let subnormals_f32 = [f32::MIN_POSITIVE / 2.0, f32::MIN_POSITIVE / 1024.0];
        for &v in &subnormals_f32 {
            let hex = v.to_hex_chars();
            let parsed = f32::from_chars_format(&hex, CharsFormat::Hex);
            assert_eq!(parsed.map(f32::to_bits), Ok(v.to_bits()), "{v} -> {hex}");
        }
    }

    #[test]
    fn test_f64_hex_roundtrip() {
        let values = [
            0.0,
            -0.0,
            1.0,
            -1.0,
            std::f64::consts::PI,
            std::f64::consts::E,
            f64::MIN_POSITIVE,
            f64::MAX,
            f64::MIN,
            f64::INFINITY,
            f64::NEG_INFINITY,
        ];
        for &v in &values {
            let hex = v.to_hex_chars();
            let parsed = f64::from_chars_format(&hex, CharsFormat::Hex);
            assert_eq!(parsed.map(f64::to_bits), Ok(v.to_bits()), "{v} -> {hex}");
        }
    }

    #[test]
    fn test_nan_hex_roundtrip() {
        for bits in [0x7ff8_0000_0000_0000, 0xfff8_0000_0000_0000, 0x7ff0_0000_0000_0001] {
            let hex = f64::from_bits(bits).to_hex_chars();
            let parsed = f64::from_chars_format(&hex, CharsFormat::Hex).unwrap();
            assert_eq!(parsed.to_bits(), bits, "{hex}");
        }

        // Payload bits beyond the quiet bit are not carried.
        let parsed = f64::from_chars_format(&f64::from_bits(0x7ff8_0000_0000_0123).to_hex_chars(), CharsFormat::Hex);
        assert_eq!(parsed.map(f64::to_bits), Ok(0x7ff8_0000_0000_0000));
    }
}
