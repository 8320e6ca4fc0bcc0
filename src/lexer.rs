//! Scanning the longest numeral at the start of the input and handing it to
//! the right converter.

use crate::digits::Digits;
use crate::error::{Error, RangeError};
use crate::layout::FloatLayout;
use crate::radix::digit_value;
use crate::{decimal, hex};

/// Exponents are clamped here while scanning; anything beyond is out of
/// range for every supported type.
pub(crate) const MAX_EXPONENT: i32 = 5200;

/// Bound on the count of integer digits, or fraction leading zeros, that
/// move the exponent.
const MAX_ADJUSTMENT: usize = 1_000_000;

/// The numeral syntax accepted by [`from_chars`](crate::from_chars).
///
/// ```
/// use fchars::{from_chars, CharsFormat};
///
/// let parsed = from_chars::<f64>(b"1.5e3", CharsFormat::Fixed).unwrap();
/// assert_eq!((parsed.value, parsed.consumed), (1.5, 3));
///
/// let parsed = from_chars::<f64>(b"1.8p1", CharsFormat::Hex).unwrap();
/// assert_eq!(parsed.value, 3.0);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharsFormat {
    /// Decimal, with an optional `e` exponent
    #[default]
    General,
    /// Decimal, with a required `e` exponent
    Scientific,
    /// Decimal, without an exponent
    Fixed,
    /// Hexadecimal without a `0x` prefix, with an optional binary `p` exponent
    Hex,
}

impl CharsFormat {
    const fn radix(self) -> u8 {
        match self {
            CharsFormat::Hex => 16,
            _ => 10,
        }
    }

    /// Lowercase exponent marker, if an exponent may appear at all.
    const fn exponent_marker(self) -> Option<u8> {
        match self {
            CharsFormat::General | CharsFormat::Scientific => Some(b'e'),
            CharsFormat::Fixed => None,
            CharsFormat::Hex => Some(b'p'),
        }
    }
}

/// A scanned and converted numeral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Lexeme {
    pub(crate) bits: u64,
    pub(crate) consumed: usize,
    pub(crate) range_error: Option<RangeError>,
}

impl Lexeme {
    const fn new(bits: u64, consumed: usize) -> Self {
        Self {
            bits,
            consumed,
            range_error: None,
        }
    }

    fn out_of_range(layout: &FloatLayout, negative: bool, error: RangeError, consumed: usize) -> Self {
        log::trace!("{}-bit numeral of {consumed} bytes is out of range: {error}", layout.bits);
        Self {
            bits: error.clamped_bits(layout, negative),
            consumed,
            range_error: Some(error),
        }
    }
}

/// Whether `text` begins with `lowercase`, ignoring ASCII case.
fn starts_with_ignore_case(text: &[u8], lowercase: &[u8]) -> bool {
    text.get(..lowercase.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(lowercase))
}

/// Length of the run of `b'0'` at the start of `text`.
fn count_zeros(text: &[u8]) -> usize {
    text.iter().take_while(|&&byte| byte == b'0').count()
}

pub(crate) fn parse(layout: &FloatLayout, text: &[u8], format: CharsFormat) -> Result<Lexeme, Error> {
    let (negative, start) = match text.first() {
        None => return Err(Error::InvalidArgument),
        Some(b'-') => (true, 1),
        Some(_) => (false, 0),
    };

    let Some(&first) = text.get(start) else {
        return Err(Error::InvalidArgument);
    };

    // Folding in the 0x20 bit sends '.', digits and hex letters to at most
    // 'f', and both cases of 'i' and 'n' to their lowercase.
    match first | 0x20 {
        folded if folded <= b'f' => parse_ordinary(layout, text, start, negative, format),
        b'i' => parse_infinity(layout, text, start, negative),
        b'n' => parse_nan(layout, text, start, negative),
        _ => Err(Error::InvalidArgument),
    }
}

fn parse_infinity(layout: &FloatLayout, text: &[u8], start: usize, negative: bool) -> Result<Lexeme, Error> {
    if !starts_with_ignore_case(&text[start..], b"inf") {
        return Err(Error::InvalidArgument);
    }

    let mut next = start + 3;
    if starts_with_ignore_case(&text[next..], b"inity") {
        next += 5;
    }

    Ok(Lexeme::new(layout.infinity(negative), next))
}

fn parse_nan(layout: &FloatLayout, text: &[u8], start: usize, mut negative: bool) -> Result<Lexeme, Error> {
    if !starts_with_ignore_case(&text[start..], b"nan") {
        return Err(Error::InvalidArgument);
    }

    let mut next = start + 3;
    let mut quiet = true;

    // nan(tag): only consumed when the tag is well formed and closed.
    if text.get(next) == Some(&b'(') {
        let tag_start = next + 1;
        for (offset, &byte) in text[tag_start..].iter().enumerate() {
            if byte == b')' {
                let tag = &text[tag_start..tag_start + offset];
                next = tag_start + offset + 1;

                if tag.eq_ignore_ascii_case(b"ind") {
                    negative = true;
                } else if tag.eq_ignore_ascii_case(b"snan") {
                    quiet = false;
                }
                break;
            }
            if byte != b'_' && !byte.is_ascii_alphanumeric() {
                break;
            }
        }
    }

    Ok(Lexeme::new(layout.nan(negative, quiet), next))
}

fn parse_ordinary(
    layout: &FloatLayout,
    text: &[u8],
    start: usize,
    negative: bool,
    format: CharsFormat,
) -> Result<Lexeme, Error> {
    let radix = format.radix();
    let digit_at = |index: usize| {
        text.get(index)
            .map(|&byte| digit_value(byte))
            .filter(|&digit| digit < radix)
    };

    let mut digits = Digits::new(negative);
    let mut next = start;

    // Integer part; leading zeros are not significant.
    let whole_begin = next;
    next += count_zeros(&text[next..]);
    let leading_zeros_end = next;

    while let Some(digit) = digit_at(next) {
        digits.push(digit);
        next += 1;
    }
    let whole_end = next;

    // Digits before the radix point, or minus the zeros right after it.
    let mut adjustment = (whole_end - leading_zeros_end).min(MAX_ADJUSTMENT) as i32;

    if text.get(next) == Some(&b'.') {
        next += 1;
    }
    let dot_end = next;

    if adjustment == 0 {
        next += count_zeros(&text[next..]);
        adjustment = -((next - dot_end).min(MAX_ADJUSTMENT) as i32);
    }

    while let Some(digit) = digit_at(next) {
        digits.push(digit);
        next += 1;
    }
    let fraction_end = next;

    if whole_begin == whole_end && dot_end == fraction_end {
        return Err(Error::InvalidArgument);
    }

    let mut exponent = 0_i32;
    if let Some(marker) = format.exponent_marker() {
        if text.get(next).is_some_and(|&byte| byte | 0x20 == marker) {
            let mut unread = next + 1;
            let mut exponent_negative = false;

            if let Some(&sign @ (b'+' | b'-')) = text.get(unread) {
                exponent_negative = sign == b'-';
                unread += 1;
            }

            // A marker with no digits after it is not part of the numeral.
            while let Some(&byte) = text.get(unread).filter(|byte| byte.is_ascii_digit()) {
                if exponent <= MAX_EXPONENT {
                    exponent = exponent * 10 + i32::from(byte - b'0');
                }
                unread += 1;
                next = unread;
            }

            if exponent_negative {
                exponent = -exponent;
            }
        }
    }

    if format == CharsFormat::Scientific && next == fraction_end {
        return Err(Error::InvalidArgument);
    }

    digits.trim_trailing_zeros();

    // Zero whatever the exponent says.
    if digits.mantissa().is_empty() {
        return Ok(Lexeme::new(layout.zero(negative), next));
    }

    let scale = if format == CharsFormat::Hex { 4 } else { 1 };
    for candidate in [exponent, exponent + adjustment * scale] {
        if candidate > MAX_EXPONENT {
            return Ok(Lexeme::out_of_range(layout, negative, RangeError::Overflow, next));
        }
        if candidate < -MAX_EXPONENT {
            return Ok(Lexeme::out_of_range(layout, negative, RangeError::Underflow, next));
        }
    }
    digits.exponent = exponent + adjustment * scale;

    let converted = match format {
        CharsFormat::Hex => hex::convert(layout, &digits),
        _ => decimal::convert(layout, &digits),
    };

    Ok(match converted {
        Ok(bits) => Lexeme::new(bits, next),
        Err(error) => Lexeme::out_of_range(layout, negative, error, next),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{FLOAT32, FLOAT64};

    fn lex(text: &str, format: CharsFormat) -> Result<(f64, usize, Option<RangeError>), Error> {
        parse(&FLOAT64, text.as_bytes(), format)
            .map(|lexeme| (f64::from_bits(lexeme.bits), lexeme.consumed, lexeme.range_error))
    }

    fn general(text: &str) -> Result<(f64, usize, Option<RangeError>), Error> {
        lex(text, CharsFormat::General)
    }

    #[test]
    fn test_invalid() {
        for text in ["", "-", "+1", "x", ".", "-.", ".e5", "--1", " 1", "in", "na", "-i"] {
            assert_eq!(general(text), Err(Error::InvalidArgument), "{text:?}");
        }
    }

    #[test]
    fn test_general() {
        let cases = [
            ("0", 0.0, 1),
            ("1", 1.0, 1),
            ("1.5e3xyz", 1500.0, 5),
            ("1e", 1.0, 1),
            ("1e+", 1.0, 1),
            ("1E-2", 0.01, 4),
            (".5", 0.5, 2),
            ("5.", 5.0, 2),
            ("-2.5", -2.5, 4),
            ("0001.2500", 1.25, 9),
            ("0.000123", 0.000123, 8),
            ("1e0000000000000000000000000002", 100.0, 30),
            ("123abc", 123.0, 3),
            ("1.2.3", 1.2, 3),
        ];
        for (text, value, consumed) in cases {
            assert_eq!(general(text), Ok((value, consumed, None)), "{text}");
        }
    }

    #[test]
    fn test_scientific_requires_exponent() {
        let format = CharsFormat::Scientific;
        assert_eq!(lex("1e", format), Err(Error::InvalidArgument));
        assert_eq!(lex("1.5", format), Err(Error::InvalidArgument));
        assert_eq!(lex("1.5e2", format), Ok((150.0, 5, None)));
    }

    #[test]
    fn test_fixed_ignores_exponent() {
        assert_eq!(lex("1e5", CharsFormat::Fixed), Ok((1.0, 1, None)));
        assert_eq!(lex("2.5E5", CharsFormat::Fixed), Ok((2.5, 3, None)));
    }

    #[test]
    fn test_hex() {
        let format = CharsFormat::Hex;
        assert_eq!(lex("1.8p1", format), Ok((3.0, 5, None)));
        assert_eq!(lex("-a.bP-3", format), Ok((-10.6875 / 8.0, 7, None)));
        assert_eq!(lex("1p", format), Ok((1.0, 1, None)));
        assert_eq!(lex("ff", format), Ok((255.0, 2, None)));
        assert_eq!(lex(".8", format), Ok((0.5, 2, None)));
        assert_eq!(lex("0.001p0", format), Ok((1.0 / 4096.0, 7, None)));
        // No prefix is accepted.
        assert_eq!(lex("0x1p0", format), Ok((0.0, 1, None)));
        assert_eq!(lex("1e5", format), Ok((485.0, 3, None)));
    }

    #[test]
    fn test_signed_zero() {
        let (value, consumed, range_error) = general("-0.0e99999").unwrap();
        assert_eq!(value.to_bits(), (-0.0_f64).to_bits());
        assert_eq!((consumed, range_error), (10, None));

        let (value, _, _) = general("0000").unwrap();
        assert_eq!(value.to_bits(), 0);
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(general("1e99999"), Ok((f64::INFINITY, 7, Some(RangeError::Overflow))));
        assert_eq!(general("-1e99999"), Ok((f64::NEG_INFINITY, 8, Some(RangeError::Overflow))));
        assert_eq!(general("1e-99999"), Ok((0.0, 8, Some(RangeError::Underflow))));
        assert_eq!(general("1e+1000"), Ok((f64::INFINITY, 7, Some(RangeError::Overflow))));
        assert_eq!(general("1e-1000"), Ok((0.0, 7, Some(RangeError::Underflow))));
        assert_eq!(general("10e5199"), Ok((f64::INFINITY, 7, Some(RangeError::Overflow))));
        assert_eq!(general("0.001e-5199"), Ok((0.0, 11, Some(RangeError::Underflow))));

        let (value, _, _) = general("-1e-99999").unwrap();
        assert_eq!(value.to_bits(), (-0.0_f64).to_bits());
    }

    #[test]
    fn test_long_inputs() {
        // A nonzero digit far past the buffer still breaks a tie.
        let text = format!("9007199254740993.{}1", "0".repeat(800));
        assert_eq!(general(&text), Ok((9007199254740994.0, text.len(), None)));

        let text = format!("9007199254740993.{}", "0".repeat(800));
        assert_eq!(general(&text), Ok((9007199254740992.0, text.len(), None)));

        // Many leading zeros in the fraction only move the exponent.
        let text = format!("0.{}1e400", "0".repeat(700));
        let expected: f64 = "1e-301".parse().unwrap();
        assert_eq!(general(&text), Ok((expected, text.len(), None)));
    }

    #[test]
    fn test_infinity() {
        let cases = [
            ("inf", 3),
            ("INF", 3),
            ("infinity", 8),
            ("InFiNiTy", 8),
            ("infin", 3),
            ("infx", 3),
        ];
        for (text, consumed) in cases {
            assert_eq!(general(text), Ok((f64::INFINITY, consumed, None)), "{text}");
        }
        assert_eq!(general("-inf"), Ok((f64::NEG_INFINITY, 4, None)));
        assert_eq!(lex("inf", CharsFormat::Hex), Ok((f64::INFINITY, 3, None)));
    }

    #[test]
    fn test_nan() {
        let nan = |text: &str| {
            parse(&FLOAT64, text.as_bytes(), CharsFormat::General)
                .map(|lexeme| (lexeme.bits, lexeme.consumed))
        };
        let quiet = 0x7ff8_0000_0000_0000;
        let negative_quiet = 0xfff8_0000_0000_0000;

        assert_eq!(nan("nan"), Ok((quiet, 3)));
        assert_eq!(nan("NaN"), Ok((quiet, 3)));
        assert_eq!(nan("-nan"), Ok((negative_quiet, 4)));
        assert_eq!(nan("nan(ind)"), Ok((negative_quiet, 8)));
        assert_eq!(nan("-nan(IND)"), Ok((negative_quiet, 9)));
        assert_eq!(nan("nan(snan)"), Ok((0x7ff0_0000_0000_0001, 9)));
        assert_eq!(nan("nan(abc_123)"), Ok((quiet, 12)));
        assert_eq!(nan("nan()"), Ok((quiet, 5)));
        assert_eq!(nan("nan(abc"), Ok((quiet, 3)));
        assert_eq!(nan("nan(a-b)"), Ok((quiet, 3)));
    }

    #[test]
    fn test_float32() {
        let lexeme = parse(&FLOAT32, b"nan(snan)", CharsFormat::General).unwrap();
        assert_eq!(lexeme.bits, 0x7f80_0001);

        let lexeme = parse(&FLOAT32, b"3.4028236e38", CharsFormat::General).unwrap();
        assert_eq!(lexeme.bits, FLOAT32.infinity(false));
        assert_eq!(lexeme.range_error, Some(RangeError::Overflow));

        let lexeme = parse(&FLOAT32, b"0.1", CharsFormat::General).unwrap();
        assert_eq!(f32::from_bits(lexeme.bits as u32), 0.1_f32);
    }
}
