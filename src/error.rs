//! Error types for the float and integer conversions.

use crate::layout::FloatLayout;

/// A numeral that is well formed but not representable in the target type.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeError {
    #[error("value is too large for the target type")]
    Overflow,
    #[error("value is too small for the target type")]
    Underflow,
}

impl RangeError {
    /// The best-effort value stored for an out-of-range float: signed infinity
    /// on overflow, signed zero on underflow.
    pub const fn clamped_bits(self, layout: &FloatLayout, negative: bool) -> u64 {
        match self {
            RangeError::Overflow => layout.infinity(negative),
            RangeError::Underflow => layout.zero(negative),
        }
    }
}

/// Errors returned by the conversions in this crate.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The input does not start with a numeral of the requested format.
    #[error("no numeral at the start of the input")]
    InvalidArgument,
    /// The numeral parsed but its value does not fit the target type.
    #[error(transparent)]
    OutOfRange(#[from] RangeError),
    /// Whole-string parsing stopped before the end; holds the byte offset.
    #[error("unexpected input at byte {0}")]
    TrailingInput(usize),
    #[error("output buffer too small")]
    BufferTooSmall,
}

/// `Result` with [`Error`] as the default error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;
