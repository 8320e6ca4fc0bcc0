//! Integer text conversion in radix 2 through 36.
//!
//! One generic implementation covers every primitive integer type up to 64
//! bits; the types differ only in signedness and width, which [`RadixInt`]
//! exposes.

use crate::error::{Error, RangeError};
use crate::Parsed;

const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Value of an ASCII digit or letter in radix 36, or 255 if `byte` is
/// neither.
///
/// ```
/// use fchars::digit_value;
///
/// assert_eq!(digit_value(b'7'), 7);
/// assert_eq!(digit_value(b'f'), 15);
/// assert_eq!(digit_value(b'Z'), 35);
/// assert_eq!(digit_value(b'.'), 255);
/// ```
pub const fn digit_value(byte: u8) -> u8 {
    match byte {
        b'0'..=b'9' => byte - b'0',
        b'a'..=b'z' => byte - b'a' + 10,
        b'A'..=b'Z' => byte - b'A' + 10,
        _ => 255,
    }
}

fn check_radix(radix: u32) {
    assert!(
        (2..=36).contains(&radix),
        "radix must be in 2..=36, got {radix}"
    );
}

/// Writes `value` in `radix` with lowercase digits at the start of `buf` and
/// returns the number of bytes written.
///
/// Leaves `buf` untouched and returns [`Error::BufferTooSmall`] if the digits
/// do not fit.
///
/// # Panics
///
/// Panics if `radix` is not in `2..=36`.
pub fn write_unsigned(buf: &mut [u8], value: u64, radix: u32) -> Result<usize, Error> {
    check_radix(radix);
    let radix = u64::from(radix);

    // Radix 2 needs the most room: one byte per bit.
    let mut scratch = [0_u8; u64::BITS as usize];
    let mut start = scratch.len();
    let mut rest = value;
    loop {
        start -= 1;
        scratch[start] = DIGITS[(rest % radix) as usize];
        rest /= radix;
        if rest == 0 {
            break;
        }
    }

    let digits = &scratch[start..];
    let out = buf.get_mut(..digits.len()).ok_or(Error::BufferTooSmall)?;
    out.copy_from_slice(digits);
    Ok(digits.len())
}

mod private {
    pub trait Sealed {}
}

/// A primitive integer that can be converted to and from text.
///
/// Sealed; implemented for `i8` through `i64` and `u8` through `u64`.
pub trait RadixInt: Copy + private::Sealed {
    const SIGNED: bool;
    const BITS: u32;

    /// Splits into sign and magnitude.
    fn to_parts(self) -> (bool, u64);

    /// Joins sign and magnitude. The magnitude must be in range for the sign.
    fn from_parts(negative: bool, magnitude: u64) -> Self;
}

macro_rules! impl_radix_int {
    ($($ty:ty => $signed:expr),* $(,)?) => {
        $(
            impl private::Sealed for $ty {}

            impl RadixInt for $ty {
                const SIGNED: bool = $signed;
                const BITS: u32 = <$ty>::BITS;

                fn to_parts(self) -> (bool, u64) {
                    let wide = self as i128;
                    (wide < 0, wide.unsigned_abs() as u64)
                }

                fn from_parts(negative: bool, magnitude: u64) -> Self {
                    let wide = i128::from(magnitude);
                    (if negative { -wide } else { wide }) as $ty
                }
            }
        )*
    };
}

impl_radix_int! {
    i8 => true,
    i16 => true,
    i32 => true,
    i64 => true,
    u8 => false,
    u16 => false,
    u32 => false,
    u64 => false,
}

/// Writes `value` in `radix`, with a leading `-` when negative, and returns
/// the number of bytes written.
///
/// ```
/// use fchars::int_to_chars;
///
/// let mut buf = [0_u8; 8];
/// let len = int_to_chars(&mut buf, -255_i16, 16).unwrap();
/// assert_eq!(&buf[..len], b"-ff");
/// ```
///
/// # Panics
///
/// Panics if `radix` is not in `2..=36`.
pub fn int_to_chars<T: RadixInt>(buf: &mut [u8], value: T, radix: u32) -> Result<usize, Error> {
    let (negative, magnitude) = value.to_parts();
    if !negative {
        return write_unsigned(buf, magnitude, radix);
    }

    let (sign, rest) = buf.split_first_mut().ok_or(Error::BufferTooSmall)?;
    let written = write_unsigned(rest, magnitude, radix)?;
    *sign = b'-';
    Ok(written + 1)
}

/// Parses an integer in `radix` from the start of `text`.
///
/// Signed types accept a leading `-`; no type accepts `+`. A value too large
/// for `T` still consumes all of its digits, with `range_error` set. Its
/// `value` is then the bound in the parsed direction, `T::MAX` or `T::MIN`,
/// rather than a partial result, so callers that ignore the range error get
/// a clamped value.
///
/// ```
/// use fchars::{int_from_chars, RangeError};
///
/// let parsed = int_from_chars::<u8>(b"ff;", 16).unwrap();
/// assert_eq!((parsed.value, parsed.consumed), (255, 2));
///
/// let parsed = int_from_chars::<u8>(b"256", 10).unwrap();
/// assert_eq!(parsed.range_error, Some(RangeError::Overflow));
/// assert_eq!((parsed.value, parsed.consumed), (u8::MAX, 3));
///
/// let parsed = int_from_chars::<i8>(b"-1000", 10).unwrap();
/// assert_eq!((parsed.value, parsed.consumed), (i8::MIN, 5));
/// ```
///
/// # Panics
///
/// Panics if `radix` is not in `2..=36`.
pub fn int_from_chars<T: RadixInt>(text: &[u8], radix: u32) -> Result<Parsed<T>, Error> {
    check_radix(radix);

    let negative = T::SIGNED && text.first() == Some(&b'-');
    let start = usize::from(negative);

    let unsigned_max = u64::MAX >> (u64::BITS - T::BITS);
    let limit = match (T::SIGNED, negative) {
        (false, _) => unsigned_max,
        (true, false) => unsigned_max >> 1,
        (true, true) => (unsigned_max >> 1) + 1,
    };

    // Below `risky` another digit always fits; at `risky` only digits up to
    // `max_digit` do.
    let radix = u64::from(radix);
    let risky = limit / radix;
    let max_digit = limit % radix;

    let mut value = 0_u64;
    let mut overflowed = false;
    let mut next = start;

    while let Some(digit) = text
        .get(next)
        .map(|&byte| u64::from(digit_value(byte)))
        .filter(|&digit| digit < radix)
    {
        if value < risky || (value == risky && digit <= max_digit) {
            value = value * radix + digit;
        } else {
            overflowed = true;
        }
        next += 1;
    }

    if next == start {
        return Err(Error::InvalidArgument);
    }

    if overflowed {
        log::trace!("integer of {} bits overflowed after {} bytes", T::BITS, next);
        return Ok(Parsed {
            value: T::from_parts(negative, limit),
            consumed: next,
            range_error: Some(RangeError::Overflow),
        });
    }

    Ok(Parsed {
        value: T::from_parts(negative, value),
        consumed: next,
        range_error: None,
    })
}
