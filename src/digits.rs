//! The mantissa digits of a scanned numeral.

/// Significant digits kept per numeral. Beyond this only whether the dropped
/// digits were all zero is remembered.
pub(crate) const MAX_DIGITS: usize = 768;

/// A numeral reduced to sign, significant digits and exponent.
///
/// The value is `0.d1 d2 d3 ... * radix^exponent` for decimal numerals. For
/// hexadecimal numerals `exponent` is a power of two and the digits are read
/// as a hexadecimal fraction.
pub(crate) struct Digits {
    pub(crate) negative: bool,
    pub(crate) exponent: i32,
    /// Whether every digit dropped past [`MAX_DIGITS`] was zero
    pub(crate) zero_tail: bool,
    count: usize,
    buffer: [u8; MAX_DIGITS],
}

impl Digits {
    pub(crate) const fn new(negative: bool) -> Self {
        Self {
            negative,
            exponent: 0,
            zero_tail: true,
            count: 0,
            buffer: [0; MAX_DIGITS],
        }
    }

    /// Appends a digit value, or records it in the tail flag once full.
    pub(crate) fn push(&mut self, digit: u8) {
        if self.count < MAX_DIGITS {
            self.buffer[self.count] = digit;
            self.count += 1;
        } else if digit != 0 {
            self.zero_tail = false;
        }
    }

    pub(crate) fn trim_trailing_zeros(&mut self) {
        while self.count > 0 && self.buffer[self.count - 1] == 0 {
            self.count -= 1;
        }
    }

    pub(crate) fn mantissa(&self) -> &[u8] {
        &self.buffer[..self.count]
    }
}

#[cfg(test)]
impl Digits {
    /// Builds digits from a string of decimal or hex digits.
    pub(crate) fn from_text(negative: bool, digits: &str, exponent: i32) -> Self {
        let mut result = Self::new(negative);
        for ch in digits.chars() {
            result.push(ch.to_digit(16).unwrap() as u8);
        }
        result.exponent = exponent;
        result
    }
}
