//! IEEE 754 bit layouts for `f32` and `f64`.

/// IEEE 754 binary format parameters.
///
/// Captures the bit layout of `f32`/`f64` for assembling a value from its sign,
/// exponent and mantissa, and for taking one apart again. Built with a `const fn`
/// so both [`FLOAT32`] and [`FLOAT64`] are compile-time constants. All masks are
/// held in a `u64` regardless of the width of the format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatLayout {
    /// Total bits in the format (32 or 64)
    pub bits: u32,
    /// Bits of precision, including the hidden bit (24 or 53)
    pub mantissa_bits: u32,
    /// Bits in the biased exponent field (8 or 11)
    pub exponent_bits: u32,
    /// Exponent bias (127 or 1023)
    pub exponent_bias: i32,
    /// Largest unbiased exponent of a finite value
    pub max_binary_exponent: i32,
    /// Smallest unbiased exponent of a normal value
    pub min_binary_exponent: i32,
    /// Bit position of the sign bit
    pub sign_shift: u32,
    /// Bit position of the lowest exponent bit
    pub exponent_shift: u32,
    /// Mask of the exponent field before shifting
    pub exponent_mask: u64,
    /// Mask covering the mantissa including the hidden bit
    pub normal_mantissa_mask: u64,
    /// Mask covering the stored mantissa bits
    pub denormal_mantissa_mask: u64,
    /// The quiet bit of a NaN
    pub quiet_nan_mask: u64,
    /// The sign bit in place
    pub shifted_sign_mask: u64,
    /// The exponent field in place; also the bits of positive infinity
    pub shifted_exponent_mask: u64,
}

impl FloatLayout {
    const fn new(bits: u32, sig_bits: u32) -> Self {
        let mantissa_bits = sig_bits + 1;
        let exponent_bits = bits - mantissa_bits;
        let exponent_mask = (1_u64 << exponent_bits) - 1;
        let max_binary_exponent = (1_i32 << (exponent_bits - 1)) - 1;
        let min_binary_exponent = 1 - max_binary_exponent;
        let sign_shift = bits - 1;

        Self {
            bits,
            mantissa_bits,
            exponent_bits,
            exponent_bias: max_binary_exponent,
            max_binary_exponent,
            min_binary_exponent,
            sign_shift,
            exponent_shift: sig_bits,
            exponent_mask,
            normal_mantissa_mask: (1_u64 << mantissa_bits) - 1,
            denormal_mantissa_mask: (1_u64 << sig_bits) - 1,
            quiet_nan_mask: 1_u64 << (sig_bits - 1),
            shifted_sign_mask: 1_u64 << sign_shift,
            shifted_exponent_mask: exponent_mask << sig_bits,
        }
    }

    /// Bits of a signed zero.
    pub const fn zero(&self, negative: bool) -> u64 {
        (negative as u64) << self.sign_shift
    }

    /// Bits of a signed infinity.
    pub const fn infinity(&self, negative: bool) -> u64 {
        self.zero(negative) | self.shifted_exponent_mask
    }

    /// Bits of a NaN. A quiet NaN carries only the quiet bit; a signalling NaN
    /// carries only the lowest mantissa bit.
    pub const fn nan(&self, negative: bool, quiet: bool) -> u64 {
        let payload = if quiet { self.quiet_nan_mask } else { 1 };
        self.infinity(negative) | payload
    }
}

/// Layout of `f32`: IEEE 754 binary32.
pub const FLOAT32: FloatLayout = FloatLayout::new(32, 23);
/// Layout of `f64`: IEEE 754 binary64.
pub const FLOAT64: FloatLayout = FloatLayout::new(64, 52);

mod private {
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// A binary floating-point type the conversions can produce.
///
/// This trait is sealed; it is implemented for `f32` and `f64` only.
pub trait RawFloat: Copy + private::Sealed {
    /// The bit layout of the type.
    const LAYOUT: FloatLayout;

    /// Builds a value from its raw bits, held in the low bits of a `u64`.
    fn from_raw(bits: u64) -> Self;

    /// Returns the raw bits of the value, zero-extended to a `u64`.
    fn to_raw(self) -> u64;
}

impl RawFloat for f32 {
    const LAYOUT: FloatLayout = FLOAT32;

    fn from_raw(bits: u64) -> Self {
        f32::from_bits(bits as u32)
    }

    fn to_raw(self) -> u64 {
        u64::from(self.to_bits())
    }
}

impl RawFloat for f64 {
    const LAYOUT: FloatLayout = FLOAT64;

    fn from_raw(bits: u64) -> Self {
        f64::from_bits(bits)
    }

    fn to_raw(self) -> u64 {
        self.to_bits()
    }
}
