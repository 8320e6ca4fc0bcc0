//! Packing a mantissa and binary exponent into the bits of a float, with
//! round-to-nearest-even.
//!
//! The exponent passed in is the exponent of the mantissa's top bit when the
//! mantissa is read as having exactly `mantissa_bits` bits. Callers should
//! supply at least one bit more than the target precision and never round
//! beforehand; every rounding decision happens here.

use crate::bigint::BigInt;
use crate::error::RangeError;
use crate::layout::FloatLayout;

/// Round-half-even: round up iff the round bit is set and either something
/// below it is set or the result would otherwise be odd.
const fn should_round_up(lsb: bool, round: bool, tail: bool) -> bool {
    round && (tail || lsb)
}

/// `value / 2^shift`, rounded to nearest even. `exact_tail` says whether all
/// bits already discarded by the caller were zero.
fn shift_right_rounded(value: u64, shift: u32, exact_tail: bool) -> u64 {
    debug_assert!(shift > 0);
    if shift > u64::BITS {
        return 0;
    }

    // Widen so that a shift of exactly 64 still sees its round bit.
    let wide = u128::from(value);
    let lsb = (wide >> shift) & 1 != 0;
    let round = (wide >> (shift - 1)) & 1 != 0;
    let tail = !exact_tail || wide & ((1_u128 << (shift - 1)) - 1) != 0;

    (value.checked_shr(shift).unwrap_or(0)) + u64::from(should_round_up(lsb, round, tail))
}

/// Builds the bits of `(-1)^negative * mantissa * 2^(exponent - mantissa_bits + 1)`.
pub(crate) fn assemble(
    layout: &FloatLayout,
    mantissa: u64,
    exponent: i32,
    negative: bool,
    exact_tail: bool,
) -> Result<u64, RangeError> {
    let mantissa_len = u64::BITS - mantissa.leading_zeros();
    let normal_shift = layout.mantissa_bits as i32 - mantissa_len as i32;
    let normal_exponent = exponent - normal_shift;

    if normal_exponent > layout.max_binary_exponent {
        return Err(RangeError::Overflow);
    }

    let mut mantissa = mantissa;
    let mut exponent = normal_exponent;

    if normal_exponent < layout.min_binary_exponent {
        // Subnormal: one fewer bit is available since the hidden bit is gone.
        let denormal_shift = normal_shift + normal_exponent + layout.exponent_bias - 1;
        exponent = -layout.exponent_bias;

        if denormal_shift < 0 {
            mantissa = shift_right_rounded(mantissa, denormal_shift.unsigned_abs(), exact_tail);
            if mantissa == 0 {
                return Err(RangeError::Underflow);
            }

            // Rounding carried into the hidden bit: the smallest normal.
            if mantissa > layout.denormal_mantissa_mask {
                exponent = layout.min_binary_exponent;
            }
        } else {
            mantissa <<= denormal_shift;
        }
    } else if normal_shift < 0 {
        mantissa = shift_right_rounded(mantissa, normal_shift.unsigned_abs(), exact_tail);

        // Rounding produced one bit too many.
        if mantissa > layout.normal_mantissa_mask {
            mantissa >>= 1;
            exponent += 1;

            if exponent > layout.max_binary_exponent {
                return Err(RangeError::Overflow);
            }
        }
    } else if normal_shift > 0 {
        mantissa <<= normal_shift;
    }

    mantissa &= layout.denormal_mantissa_mask;

    let biased = (exponent + layout.exponent_bias) as u64;
    Ok(layout.zero(negative) | (biased << layout.exponent_shift) | mantissa)
}

/// Assembles an integer held in a [`BigInt`] whose highest set bit is at
/// `bit_len - 1`. Only the top 64 bits feed the mantissa; the rest, and
/// `has_nonzero_fraction`, decide stickiness.
pub(crate) fn assemble_from_bigint(
    layout: &FloatLayout,
    value: &BigInt,
    bit_len: u32,
    negative: bool,
    has_nonzero_fraction: bool,
) -> Result<u64, RangeError> {
    let base_exponent = layout.mantissa_bits as i32 - 1;

    if bit_len <= 64 {
        return assemble(
            layout,
            value.low_u64(),
            base_exponent,
            negative,
            !has_nonzero_fraction,
        );
    }

    let words = value.words();
    let top_bits = bit_len % 32;
    let top_index = (bit_len / 32) as usize;
    let middle_index = top_index - 1;
    let bottom_index = top_index - 2;

    let lower_words_zero = || words[..bottom_index].iter().all(|&word| word == 0);

    if top_bits == 0 {
        // The top 64 bits are exactly two words.
        let exponent = base_exponent + bottom_index as i32 * 32;
        let mantissa = u64::from(words[bottom_index]) | (u64::from(words[middle_index]) << 32);
        let exact_tail = !has_nonzero_fraction && lower_words_zero();

        return assemble(layout, mantissa, exponent, negative, exact_tail);
    }

    // The top 64 bits straddle three words.
    let top_mask = (1_u32 << top_bits) - 1;
    let top_shift = 64 - top_bits;
    let middle_shift = top_shift - 32;
    let bottom_mask = !top_mask;
    let bottom_shift = top_bits;

    let exponent = base_exponent + bottom_index as i32 * 32 + top_bits as i32;
    let mantissa = (u64::from(words[top_index] & top_mask) << top_shift)
        | (u64::from(words[middle_index]) << middle_shift)
        | (u64::from(words[bottom_index] & bottom_mask) >> bottom_shift);

    let exact_tail =
        !has_nonzero_fraction && words[bottom_index] & top_mask == 0 && lower_words_zero();

    assemble(layout, mantissa, exponent, negative, exact_tail)
}
