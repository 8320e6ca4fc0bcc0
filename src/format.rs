//! Shortest exact hexadecimal text for a float, in the form read back by
//! [`CharsFormat::Hex`](crate::CharsFormat::Hex).
//!
//! Values are written as `±h.hhhp±d`: a leading `1` (or `0` for zero), the
//! stored mantissa in hex with trailing zero nybbles dropped, and the binary
//! exponent in decimal. Subnormals are normalized, so the smallest `f64` is
//! `1p-1074`. There is no `0x` prefix.
//!
//! Special values are `inf`, `nan`, `nan(snan)` for a NaN without the quiet
//! bit, and `-nan(ind)` for the negative quiet NaN with no payload.

use crate::error::Error;
use crate::layout::{FloatLayout, RawFloat};
use crate::radix::write_unsigned;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Longest output: `-1.fffffffffffffp-1022` plus room to spare.
const MAX_LEN: usize = 32;

/// Fixed buffer the text is built in before it is copied out.
pub(crate) struct HexText {
    bytes: [u8; MAX_LEN],
    len: usize,
}

impl HexText {
    const fn new() -> Self {
        Self {
            bytes: [0; MAX_LEN],
            len: 0,
        }
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub(crate) fn as_str(&self) -> &str {
        // Only ASCII is ever pushed.
        std::str::from_utf8(self.as_bytes()).unwrap_or_default()
    }

    fn push(&mut self, byte: u8) {
        self.bytes[self.len] = byte;
        self.len += 1;
    }

    fn push_str(&mut self, bytes: &[u8]) {
        self.bytes[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
    }

    fn push_exponent(&mut self, exponent: i32) {
        self.push(b'p');
        self.push(if exponent < 0 { b'-' } else { b'+' });
        let magnitude = u64::from(exponent.unsigned_abs());
        let written = write_unsigned(&mut self.bytes[self.len..], magnitude, 10);
        debug_assert!(written.is_ok(), "MAX_LEN leaves room for any exponent");
        self.len += written.unwrap_or(0);
    }
}

/// Formats raw float bits laid out as `layout`.
pub(crate) fn format_hex(layout: &FloatLayout, bits: u64) -> HexText {
    let mut text = HexText::new();

    let negative = bits & layout.shifted_sign_mask != 0;
    let biased = (bits >> layout.exponent_shift) & layout.exponent_mask;
    let mut mantissa = bits & layout.denormal_mantissa_mask;

    if negative {
        text.push(b'-');
    }

    if biased == layout.exponent_mask {
        write_special(&mut text, layout, negative, mantissa);
        return text;
    }

    if biased == 0 && mantissa == 0 {
        text.push_str(b"0p+0");
        return text;
    }

    let stored_bits = layout.exponent_shift;
    let exponent = if biased == 0 {
        // Subnormal: move the top set bit up to the hidden bit and drop it.
        let shift = mantissa.leading_zeros() - (u64::BITS - 1 - stored_bits);
        mantissa = (mantissa << shift) & layout.denormal_mantissa_mask;
        layout.min_binary_exponent - shift as i32
    } else {
        biased as i32 - layout.exponent_bias
    };

    text.push(b'1');

    // Pad the fraction out to whole nybbles.
    let padding = (4 - stored_bits % 4) % 4;
    let mut fraction = mantissa << padding;
    let mut nybbles = (stored_bits + padding) / 4;
    while nybbles > 0 && fraction & 0xf == 0 {
        fraction >>= 4;
        nybbles -= 1;
    }

    if nybbles > 0 {
        text.push(b'.');
        for index in (0..nybbles).rev() {
            let nybble = (fraction >> (4 * index)) & 0xf;
            text.push(HEX_DIGITS[nybble as usize]);
        }
    }

    text.push_exponent(exponent);
    text
}

fn write_special(text: &mut HexText, layout: &FloatLayout, negative: bool, mantissa: u64) {
    if mantissa == 0 {
        text.push_str(b"inf");
    } else if mantissa & layout.quiet_nan_mask == 0 {
        text.push_str(b"nan(snan)");
    } else if negative && mantissa == layout.quiet_nan_mask {
        text.push_str(b"nan(ind)");
    } else {
        text.push_str(b"nan");
    }
}

/// Writes the hexadecimal form of `value` to the start of `buf` and returns
/// the number of bytes written.
///
/// Leaves `buf` untouched and returns [`Error::BufferTooSmall`] if the text
/// does not fit.
///
/// ```
/// use fchars::to_chars_hex;
///
/// let mut buf = [0_u8; 32];
/// let len = to_chars_hex(&mut buf, -3.5_f64).unwrap();
/// assert_eq!(&buf[..len], b"-1.cp+1");
/// ```
pub fn to_chars_hex<F: RawFloat>(buf: &mut [u8], value: F) -> Result<usize, Error> {
    let text = format_hex(&F::LAYOUT, value.to_raw());
    let bytes = text.as_bytes();
    buf.get_mut(..bytes.len())
        .ok_or(Error::BufferTooSmall)?
        .copy_from_slice(bytes);
    Ok(bytes.len())
}
