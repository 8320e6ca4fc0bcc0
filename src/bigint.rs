//! Fixed-capacity unsigned big integer used for exact decimal scaling.
//!
//! Values are stored little-endian in 32-bit words with an explicit used
//! count. The capacity is sized for the largest intermediate value the decimal
//! conversion produces: 1074 bits for 2^1074, 2552 bits for 10^768, and 54
//! bits of shift space. Nothing ever grows past it; an operation that would
//! overflow resets the value to zero and returns [`CapacityExceeded`].

use std::cmp::Ordering;

const WORD_BITS: u32 = 32;
const MAX_BITS: u32 = 1074 + 2552 + 54;
pub(crate) const WORD_COUNT: usize = MAX_BITS.div_ceil(WORD_BITS) as usize;

/// Powers of ten that fit in a single word, 10^1 through 10^9.
pub(crate) const SMALL_POWERS_OF_TEN: [u32; 9] = [
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
];

/// An operation needed more than [`WORD_COUNT`] words.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("big integer capacity exceeded")]
pub(crate) struct CapacityExceeded;

/// Where a packed power of ten lives in [`LARGE_POWER_DATA`].
struct Unpack {
    /// Offset of the first stored word
    offset: u16,
    /// Number of omitted low zero words
    zeroes: u8,
    /// Number of stored words
    size: u8,
}

impl Unpack {
    const fn new(offset: u16, zeroes: u8, size: u8) -> Self {
        Self {
            offset,
            zeroes,
            size,
        }
    }
}

/// 10^10, 10^20, ..., 10^380 with their low zero words stripped.
#[rustfmt::skip]
const LARGE_POWER_DATA: [u32; 578] = [
    0x540be400, 0x00000002, 0x63100000, 0x6bc75e2d, 0x00000005, 0x40000000,
    0x4674edea, 0x9f2c9cd0, 0x0000000c, 0xb9f56100, 0x5ca4bfab, 0x6329f1c3,
    0x0000001d, 0xb5640000, 0xc40534fd, 0x926687d2, 0x6c3b15f9, 0x00000044,
    0x10000000, 0x946590d9, 0xd762422c, 0x9a224501, 0x4f272617, 0x0000009f,
    0x07950240, 0x245689c1, 0xc5faa71c, 0x73c86d67, 0xebad6ddc, 0x00000172,
    0xcec10000, 0x63a22764, 0xefa418ca, 0xcdd17b25, 0x6bdfef70, 0x9dea3e1f,
    0x0000035f, 0xe4000000, 0xcdc3fe6e, 0x66bc0c6a, 0x2e391f32, 0x5a450203,
    0x71d2f825, 0xc3c24a56, 0x000007da, 0xa82e8f10, 0xaab24308, 0x8e211a7c,
    0xf38ace40, 0x84c4ce0b, 0x7ceb0b27, 0xad2594c3, 0x00001249, 0xdd1a4000,
    0xcc9f54da, 0xdc5961bf, 0xc75cabab, 0xf505440c, 0xd1bc1667, 0xfbb7af52,
    0x608f8d29, 0x00002a94, 0x21000000, 0x17bb8a0c, 0x56af8ea4, 0x06479fa9,
    0x5d4bb236, 0x80dc5fe0, 0xf0feaa0a, 0xa88ed940, 0x6b1a80d0, 0x00006323,
    0x324c3864, 0x8357c796, 0xe44a42d5, 0xd9a92261, 0xbd3c103d, 0x91e5f372,
    0xc0591574, 0xec1da60d, 0x102ad96c, 0x0000e6d3, 0x1e851000, 0x6e4f615b,
    0x187b2a69, 0x0450e21c, 0x2fdd342b, 0x635027ee, 0xa6c97199, 0x8e4ae916,
    0x17082e28, 0x1a496e6f, 0x0002196e, 0x32400000, 0x04ad4026, 0xf91e7250,
    0x2994d1d5, 0x665bcdbb, 0xa23b2e96, 0x65fa7ddb, 0x77de53ac, 0xb020a29b,
    0xc6bff953, 0x4b9425ab, 0x0004e34d, 0xfbc32d81, 0x5222d0f4, 0xb70f2850,
    0x5713f2f3, 0xdc421413, 0xd6395d7d, 0xf8591999, 0x0092381c, 0x86b314d6,
    0x7aa577b9, 0x12b7fe61, 0x000b616a, 0x1d11e400, 0x56c3678d, 0x3a941f20,
    0x9b09368b, 0xbd706908, 0x207665be, 0x9b26c4eb, 0x1567e89d, 0x9d15096e,
    0x7132f22b, 0xbe485113, 0x45e5a2ce, 0x001a7f52, 0xbb100000, 0x02f79478,
    0x8c1b74c0, 0xb0f05d00, 0xa9dbc675, 0xe2d9b914, 0x650f72df, 0x77284b4c,
    0x6df6e016, 0x514391c2, 0x2795c9cf, 0xd6e2ab55, 0x9ca8e627, 0x003db1a6,
    0x40000000, 0xf4ecd04a, 0x7f2388f0, 0x580a6dc5, 0x43bf046f, 0xf82d5dc3,
    0xee110848, 0xfaa0591c, 0xcdf4f028, 0x192ea53f, 0xbcd671a0, 0x7d694487,
    0x10f96e01, 0x791a569d, 0x008fa475, 0xb9b2e100, 0x8288753c, 0xcd3f1693,
    0x89b43a6b, 0x089e87de, 0x684d4546, 0xfddba60c, 0xdf249391, 0x3068ec13,
    0x99b44427, 0xb68141ee, 0x5802cac3, 0xd96851f1, 0x7d7625a2, 0x014e718d,
    0xfb640000, 0xf25a83e6, 0x9457ad0f, 0x0080b511, 0x2029b566, 0xd7c5d2cf,
    0xa53f6d7d, 0xcdb74d1c, 0xda9d70de, 0xb716413d, 0x71d0ca4e, 0xd7e41398,
    0x4f403a90, 0xf9ab3fe2, 0x264d776f, 0x030aafe6, 0x10000000, 0x09ab5531,
    0xa60c58d2, 0x566126cb, 0x6a1c8387, 0x7587f4c1, 0x2c44e876, 0x41a047cf,
    0xc908059e, 0xa0ba063e, 0xe7cfc8e8, 0xe1fac055, 0xef0144b2, 0x24207eb0,
    0xd1722573, 0xe4b8f981, 0x071505ae, 0x7a3b6240, 0xcea45d4f, 0x4fe24133,
    0x210f6d6d, 0xe55633f2, 0x25c11356, 0x28ebd797, 0xd396eb84, 0x1e493b77,
    0x471f2dae, 0x96ad3820, 0x8afaced1, 0x4edecddb, 0x5568c086, 0xb2695da1,
    0x24123c89, 0x107d4571, 0x1c410000, 0x6e174a27, 0xec62ae57, 0xef2289aa,
    0xb6a2fbdd, 0x17e1efe4, 0x3366bdf2, 0x37b48880, 0xbfb82c3e, 0x19acde91,
    0xd4f46408, 0x35ff6a4e, 0x67566a0e, 0x40dbb914, 0x782a3bca, 0x6b329b68,
    0xf5afc5d9, 0x266469bc, 0xe4000000, 0xfb805ff4, 0xed55d1af, 0x9b4a20a8,
    0xab9757f8, 0x01aefe0a, 0x4a2ca67b, 0x1ebf9569, 0xc7c41c29, 0xd8d5d2aa,
    0xd136c776, 0x93da550c, 0x9ac79d90, 0x254bcba8, 0x0df07618, 0xf7a88809,
    0x3a1f1074, 0xe54811fc, 0x59638ead, 0x97cbe710, 0x26d769e8, 0xb4e4723e,
    0x5b90aa86, 0x9c333922, 0x4b7a0775, 0x2d47e991, 0x9a6ef977, 0x160b40e7,
    0x0c92f8c4, 0xf25ff010, 0x25c36c11, 0xc9f98b42, 0x730b919d, 0x05ff7caf,
    0xb0432d85, 0x2d2b7569, 0xa657842c, 0xd01fef10, 0xc77a4000, 0xe8b862e5,
    0x10d8886a, 0xc8cd98e5, 0x108955c5, 0xd059b655, 0x58fbbed4, 0x03b88231,
    0x034c4519, 0x194dc939, 0x1fc500ac, 0x794cc0e2, 0x3bc980a1, 0xe9b12dd1,
    0x5e6d22f8, 0x7b38899a, 0xce7919d8, 0x78c67672, 0x79e5b99f, 0xe494034e,
    0x00000001, 0xa1000000, 0x6c5cd4e9, 0x9be47d6f, 0xf93bd9e7, 0x77626fa1,
    0xc68b3451, 0xde2b59e8, 0xcf3cde58, 0x2246ff58, 0xa8577c15, 0x26e77559,
    0x17776753, 0xebe6b763, 0xe3fd0a5f, 0x33e83969, 0xa805a035, 0xf631b987,
    0x211f0f43, 0xd85a43db, 0xab1bf596, 0x683f19a2, 0x00000004, 0xbe7dfe64,
    0x4bc9042f, 0xe1f5edb0, 0x8fa14eda, 0xe409db73, 0x674fee9c, 0xa9159f0d,
    0xf6b5b5d6, 0x7338960e, 0xeb49c291, 0x5f2b97cc, 0x0f383f95, 0x2091b3f6,
    0xd1783714, 0xc1d142df, 0x153e22de, 0x8aafdf57, 0x77f5e55f, 0xa3e7ca8b,
    0x032f525b, 0x42e74f3d, 0x0000000a, 0xf4dd1000, 0x5d450952, 0xaeb442e1,
    0xa3b3342e, 0x3fcda36f, 0xb4287a6e, 0x4bc177f7, 0x67d2c8d0, 0xaea8f8e0,
    0xadc93b67, 0x6cc856b3, 0x959d9d0b, 0x5b48c100, 0x4abe8a3d, 0x52d936f4,
    0x71dbe84d, 0xf91c21c5, 0x4a458109, 0xd7aad86a, 0x08e14c7c, 0x759ba59c,
    0xe43c8800, 0x00000017, 0x92400000, 0x04f110d4, 0x186472be, 0x8736c10c,
    0x1478abfb, 0xfc51af29, 0x25eb9739, 0x4c2b3015, 0xa1030e0b, 0x28fe3c3b,
    0x7788fcba, 0xb89e4358, 0x733de4a4, 0x7c46f2c2, 0x8f746298, 0xdb19210f,
    0x2ea3b6ae, 0xaa5014b2, 0xea39ab8d, 0x97963442, 0x01dfdfa9, 0xd2f3d3fe,
    0xa0790280, 0x00000037, 0x509c9b01, 0xc7dcadf1, 0x383dad2c, 0x73c64d37,
    0xea6d67d0, 0x519ba806, 0xc403f2f8, 0xa052e1a2, 0xd710233a, 0x448573a9,
    0xcf12d9ba, 0x70871803, 0x52dc3a9b, 0xe5b252e8, 0x0717fb4e, 0xbe4da62f,
    0x0aabd7e1, 0x8c62ed4f, 0xceb9ec7b, 0xd4664021, 0xa1158300, 0xcce375e6,
    0x842f29f2, 0x00000081, 0x7717e400, 0xd3f5fb64, 0xa0763d71, 0x7d142fe9,
    0x33f44c66, 0xf3b8f12e, 0x130f0d8e, 0x734c9469, 0x60260fa8, 0x3c011340,
    0xcc71880a, 0x37a52d21, 0x8adac9ef, 0x42bb31b4, 0xd6f94c41, 0xc88b056c,
    0xe20501b8, 0x5297ed7c, 0x62c361c4, 0x87dad8aa, 0xb833eade, 0x94f06861,
    0x13cc9abd, 0x8dc1d56a, 0x0000012d, 0x13100000, 0xc67a36e8, 0xf416299e,
    0xf3493f0a, 0x77a5a6cf, 0xa4be23a3, 0xcca25b82, 0x3510722f, 0xbe9d447f,
    0xa8c213b8, 0xc94c324e, 0xbc9e33ad, 0x76acfeba, 0x2e4c2132, 0x3e13cd32,
    0x70fe91b4, 0xbb5cd936, 0x42149785, 0x46cc1afd, 0xe638ddf8, 0x690787d2,
    0x1a02d117, 0x3eb5f1fe, 0xc3b9abae, 0x1c08ee6f, 0x000002be, 0x40000000,
    0x8140c2aa, 0x2cf877d9, 0x71e1d73d, 0xd5e72f98, 0x72516309, 0xafa819dd,
    0xd62a5a46, 0x2a02dcce, 0xce46ddfe, 0x2713248d, 0xb723d2ad, 0xc404bb19,
    0xb706cc2b, 0x47b1ebca, 0x9d094bdc, 0xc5dc02ca, 0x31e6518e, 0x8ec35680,
    0x342f58a8, 0x8b041e42, 0xfebfe514, 0x05fffc13, 0x6763790f, 0x66d536fd,
    0xb9e15076, 0x00000662, 0x67b06100, 0xd2010a1a, 0xd005e1c0, 0xdb12733b,
    0xa39f2e3f, 0x61b29de2, 0x2a63dce2, 0x942604bc, 0x6170d59b, 0xc2e32596,
    0x140b75b9, 0x1f1d2c21, 0xb8136a60, 0x89d23ba2, 0x60f17d73, 0xc6cad7df,
    0x0669df2b, 0x24b88737, 0x669306ed, 0x19496eeb, 0x938ddb6f, 0x5e748275,
    0xc56e9a36, 0x3690b731, 0xc82842c5, 0x24ae798e, 0x00000ede, 0x41640000,
    0xd5889ac1, 0xd9432c99, 0xa280e71a, 0x6bf63d2e, 0x8249793d, 0x79e7a943,
    0x22fde64a, 0xe0d6709a, 0x05cacfef, 0xbd8da4d7, 0xe364006c, 0xa54edcb3,
    0xa1a8086e, 0x748f459e, 0xfc8e54c8, 0xcc74c657, 0x42b8c3d4, 0x57d9636e,
    0x35b55bcc, 0x6c13fee9, 0x1ac45161, 0xb595badb, 0xa1f14e9d, 0xdcf9e750,
    0x07637f71, 0xde2f9f2b, 0x0000229d, 0x10000000, 0x3c5ebd89, 0xe3773756,
    0x3dcba338, 0x81d29e4f, 0xa4f79e2c, 0xc3f9c774, 0x6a1ce797, 0xac5fe438,
    0x07f38b9c, 0xd588ecfa, 0x3e5ac1ac, 0x85afccce, 0x9d1f3f70, 0xe82d6dd3,
    0x177d180c, 0x5e69946f, 0x648e2ce1, 0x95a13948, 0x340fe011, 0xb4173c58,
    0x2748f694, 0x7c2657bd, 0x758bda2e, 0x3b8090a0, 0x2ddbb613, 0x6dcf4890,
    0x24e4047e, 0x00005099,];

#[rustfmt::skip]
const LARGE_POWER_INDICES: [Unpack; 38] = [
    Unpack::new(0, 0, 2), Unpack::new(2, 0, 3), Unpack::new(5, 0, 4),
    Unpack::new(9, 1, 4), Unpack::new(13, 1, 5), Unpack::new(18, 1, 6),
    Unpack::new(24, 2, 6), Unpack::new(30, 2, 7), Unpack::new(37, 2, 8),
    Unpack::new(45, 3, 8), Unpack::new(53, 3, 9), Unpack::new(62, 3, 10),
    Unpack::new(72, 4, 10), Unpack::new(82, 4, 11), Unpack::new(93, 4, 12),
    Unpack::new(105, 5, 12), Unpack::new(117, 5, 13), Unpack::new(130, 5, 14),
    Unpack::new(144, 5, 15), Unpack::new(159, 6, 15), Unpack::new(174, 6, 16),
    Unpack::new(190, 6, 17), Unpack::new(207, 7, 17), Unpack::new(224, 7, 18),
    Unpack::new(242, 7, 19), Unpack::new(261, 8, 19), Unpack::new(280, 8, 21),
    Unpack::new(301, 8, 22), Unpack::new(323, 9, 22), Unpack::new(345, 9, 23),
    Unpack::new(368, 9, 24), Unpack::new(392, 10, 24), Unpack::new(416, 10, 25),
    Unpack::new(441, 10, 26), Unpack::new(467, 10, 27), Unpack::new(494, 11, 27),
    Unpack::new(521, 11, 28), Unpack::new(549, 11, 29),
];


/// Fixed-capacity unsigned integer.
///
/// Invariant: `words[used - 1] != 0`, or `used == 0` for the value zero. Words
/// at or above `used` are not meaningful.
#[derive(Clone)]
pub(crate) struct BigInt {
    used: usize,
    words: [u32; WORD_COUNT],
}

impl BigInt {
    pub(crate) const fn new() -> Self {
        Self {
            used: 0,
            words: [0; WORD_COUNT],
        }
    }

    pub(crate) const fn one() -> Self {
        Self::from_u32(1)
    }

    pub(crate) const fn from_u32(value: u32) -> Self {
        let mut result = Self::new();
        result.words[0] = value;
        result.used = (value != 0) as usize;
        result
    }

    #[cfg(test)]
    pub(crate) const fn from_u64(value: u64) -> Self {
        let mut result = Self::new();
        result.words[0] = value as u32;
        result.words[1] = (value >> 32) as u32;
        result.used = if result.words[1] != 0 {
            2
        } else {
            (result.words[0] != 0) as usize
        };
        result
    }

    /// The used words, least significant first.
    pub(crate) fn words(&self) -> &[u32] {
        &self.words[..self.used]
    }

    pub(crate) fn is_zero(&self) -> bool {
        self.used == 0
    }

    /// One more than the index of the highest set bit; zero for zero.
    pub(crate) fn bit_len(&self) -> u32 {
        match self.words().last() {
            Some(&top) => bit_len(top) + (self.used as u32 - 1) * WORD_BITS,
            None => 0,
        }
    }

    /// The two least significant words as a `u64`.
    pub(crate) fn low_u64(&self) -> u64 {
        let low = if self.used > 0 { self.words[0] } else { 0 };
        let high = if self.used > 1 { self.words[1] } else { 0 };
        u64::from(low) | (u64::from(high) << 32)
    }

    fn overflow(&mut self) -> CapacityExceeded {
        log::trace!("big integer overflowed {} words, resetting to zero", WORD_COUNT);
        self.used = 0;
        CapacityExceeded
    }

    fn push(&mut self, word: u32) -> Result<(), CapacityExceeded> {
        if self.used == WORD_COUNT {
            return Err(self.overflow());
        }
        self.words[self.used] = word;
        self.used += 1;
        Ok(())
    }

    /// Shifts left by `n` bits.
    pub(crate) fn shift_left(&mut self, n: u32) -> Result<(), CapacityExceeded> {
        if self.used == 0 {
            return Ok(());
        }

        let unit_shift = (n / WORD_BITS) as usize;
        let bit_shift = n % WORD_BITS;

        if self.used + unit_shift > WORD_COUNT {
            return Err(self.overflow());
        }

        if bit_shift == 0 {
            self.words.copy_within(..self.used, unit_shift);
            self.used += unit_shift;
        } else {
            // The top word spills into a new word when its free high bits
            // cannot absorb the sub-word shift.
            let spills = bit_shift > WORD_BITS - bit_len(self.words[self.used - 1]);
            let new_used = self.used + unit_shift + usize::from(spills);

            if new_used > WORD_COUNT {
                return Err(self.overflow());
            }

            // Walk downwards so every source word is read before it is overwritten.
            for dest in (unit_shift..new_used).rev() {
                let upper_index = dest - unit_shift;
                let upper = if upper_index < self.used {
                    self.words[upper_index]
                } else {
                    0
                };
                let lower = if upper_index > 0 {
                    self.words[upper_index - 1]
                } else {
                    0
                };
                self.words[dest] = (upper << bit_shift) | (lower >> (WORD_BITS - bit_shift));
            }

            self.used = new_used;
        }

        self.words[..unit_shift].fill(0);
        Ok(())
    }

    /// Adds a single word.
    pub(crate) fn add_small(&mut self, value: u32) -> Result<(), CapacityExceeded> {
        if value == 0 {
            return Ok(());
        }

        let mut carry = value;
        for word in &mut self.words[..self.used] {
            let sum = u64::from(*word) + u64::from(carry);
            *word = sum as u32;
            carry = (sum >> 32) as u32;
            if carry == 0 {
                return Ok(());
            }
        }

        self.push(carry)
    }

    /// Multiplies by a single word.
    pub(crate) fn mul_small(&mut self, multiplier: u32) -> Result<(), CapacityExceeded> {
        match multiplier {
            0 => {
                self.used = 0;
                return Ok(());
            }
            1 => return Ok(()),
            _ => {}
        }

        let mut carry = 0_u32;
        for word in &mut self.words[..self.used] {
            let product = u64::from(*word) * u64::from(multiplier) + u64::from(carry);
            *word = product as u32;
            carry = (product >> 32) as u32;
        }

        if carry != 0 {
            self.push(carry)?;
        }
        Ok(())
    }

    /// Multiplies by another big integer.
    pub(crate) fn mul(&mut self, multiplier: &BigInt) -> Result<(), CapacityExceeded> {
        if self.used == 0 {
            return Ok(());
        }
        if multiplier.used == 0 {
            self.used = 0;
            return Ok(());
        }
        if multiplier.used == 1 {
            return self.mul_small(multiplier.words[0]);
        }
        if self.used == 1 {
            let small = self.words[0];
            self.clone_from(multiplier);
            return self.mul_small(small);
        }

        // Fewer iterations on the outer loop, more on the inner one.
        let product = if multiplier.used < self.used {
            multiply_words(multiplier.words(), self.words())
        } else {
            multiply_words(self.words(), multiplier.words())
        };

        match product {
            Ok(product) => {
                *self = product;
                Ok(())
            }
            Err(_) => Err(self.overflow()),
        }
    }

    /// Multiplies by `10^power`.
    pub(crate) fn mul_pow10(&mut self, power: u32) -> Result<(), CapacityExceeded> {
        let mut large_power = power / 10;
        while large_power != 0 {
            let current = large_power.min(LARGE_POWER_INDICES.len() as u32);
            let index = &LARGE_POWER_INDICES[current as usize - 1];

            let zeroes = usize::from(index.zeroes);
            let size = usize::from(index.size);
            let offset = usize::from(index.offset);

            let mut multiplier = BigInt::new();
            multiplier.words[zeroes..zeroes + size]
                .copy_from_slice(&LARGE_POWER_DATA[offset..offset + size]);
            multiplier.used = zeroes + size;

            self.mul(&multiplier)?;
            large_power -= current;
        }

        match power % 10 {
            0 => Ok(()),
            small => self.mul_small(SMALL_POWERS_OF_TEN[small as usize - 1]),
        }
    }

    /// Divides by `denominator`, leaving the remainder in `self` and returning
    /// the low 64 bits of the quotient.
    ///
    /// The denominator must be nonzero.
    pub(crate) fn divide(&mut self, denominator: &BigInt) -> u64 {
        if self.used == 0 {
            return 0;
        }
        debug_assert!(denominator.used != 0, "division by zero");

        let mut max_numerator_index = self.used - 1;
        let max_denominator_index = denominator.used - 1;

        if max_denominator_index == 0 {
            return self.divide_small(denominator.words[0]);
        }

        if max_denominator_index > max_numerator_index {
            return 0;
        }

        let denominator_len = max_denominator_index + 1;
        let len_diff = max_numerator_index - max_denominator_index;

        // The quotient has len_diff + 1 words unless the denominator, aligned
        // under the numerator's top word, is the larger of the two.
        let mut quotient_len = len_diff + 1;
        for index in (len_diff..=max_numerator_index).rev() {
            let den = denominator.words[index - len_diff];
            let num = self.words[index];
            if den != num {
                if den > num {
                    quotient_len = len_diff;
                }
                break;
            }
        }

        if quotient_len == 0 {
            return 0;
        }

        // Top two denominator words, normalized so the high bit is set, for the
        // trial divisions.
        let mut den_high = denominator.words[denominator_len - 1];
        let mut den_next = denominator.words[denominator_len - 2];

        let shift_left = den_high.leading_zeros();
        let shift_right = WORD_BITS - shift_left;
        if shift_left > 0 {
            den_high = (den_high << shift_left) | (den_next >> shift_right);
            den_next <<= shift_left;

            if denominator_len > 2 {
                den_next |= denominator.words[denominator_len - 3] >> shift_right;
            }
        }

        let mut quotient = 0_u64;
        for position in (0..quotient_len).rev() {
            let top = position + denominator_len;
            let num_high = if top <= max_numerator_index {
                self.words[top]
            } else {
                0
            };

            let mut num = (u64::from(num_high) << 32) | u64::from(self.words[top - 1]);
            let mut num_next = self.words[top - 2];
            if shift_left > 0 {
                num = (num << shift_left) | u64::from(num_next >> shift_right);
                num_next <<= shift_left;

                if top >= 3 {
                    num_next |= self.words[top - 3] >> shift_right;
                }
            }

            let mut digit = num / u64::from(den_high);
            let mut rem = num % u64::from(den_high);

            if digit > u64::from(u32::MAX) {
                rem += u64::from(den_high) * (digit - u64::from(u32::MAX));
                digit = u64::from(u32::MAX);
            }

            while rem <= u64::from(u32::MAX)
                && digit * u64::from(den_next) > ((rem << 32) | u64::from(num_next))
            {
                digit -= 1;
                rem += u64::from(den_high);
            }

            // Multiply and subtract. The digit may still be one too large; a
            // final borrow means adding the denominator back once.
            if digit > 0 {
                let mut borrow = 0_u64;
                for (offset, &den) in denominator.words().iter().enumerate() {
                    borrow += digit * u64::from(den);
                    let sub = borrow as u32;
                    borrow >>= 32;

                    let word = &mut self.words[position + offset];
                    if *word < sub {
                        borrow += 1;
                    }
                    *word = word.wrapping_sub(sub);
                }

                if u64::from(num_high) < borrow {
                    let mut carry = 0_u32;
                    for (offset, &den) in denominator.words().iter().enumerate() {
                        let word = &mut self.words[position + offset];
                        let sum = u64::from(*word) + u64::from(den) + u64::from(carry);
                        *word = sum as u32;
                        carry = (sum >> 32) as u32;
                    }
                    digit -= 1;
                }

                max_numerator_index = top - 1;
            }

            quotient = (quotient << 32) + digit;
        }

        // Trim the remainder.
        self.words[max_numerator_index + 1..self.used].fill(0);
        let mut used = max_numerator_index + 1;
        while used != 0 && self.words[used - 1] == 0 {
            used -= 1;
        }
        self.used = used;

        quotient
    }

    fn divide_small(&mut self, denominator: u32) -> u64 {
        if denominator == 1 {
            let quotient = self.low_u64();
            self.used = 0;
            return quotient;
        }

        let denominator = u64::from(denominator);
        let mut quotient = 0_u64;
        let mut rem = 0_u64;
        for &word in self.words[..self.used].iter().rev() {
            rem = (rem << 32) | u64::from(word);
            quotient = (quotient << 32) + rem / denominator;
            rem %= denominator;
        }

        // rem < denominator, so it fits one word.
        self.words[0] = rem as u32;
        self.used = usize::from(rem != 0);
        quotient
    }
}

fn bit_len(word: u32) -> u32 {
    WORD_BITS - word.leading_zeros()
}

/// Schoolbook product of two trimmed word slices; `short` drives the outer loop.
fn multiply_words(short: &[u32], long: &[u32]) -> Result<BigInt, CapacityExceeded> {
    let mut product = BigInt::new();

    for (start, &factor) in short.iter().enumerate() {
        if factor == 0 {
            if start == product.used {
                product.words[start] = 0;
                product.used = start + 1;
            }
            continue;
        }

        let mut carry = 0_u32;
        let mut index = start;
        for &word in long {
            if index == WORD_COUNT {
                break;
            }
            if index == product.used {
                product.words[index] = 0;
                product.used = index + 1;
            }

            let sum = u64::from(factor) * u64::from(word)
                + u64::from(product.words[index])
                + u64::from(carry);
            product.words[index] = sum as u32;
            carry = (sum >> 32) as u32;
            index += 1;
        }

        while carry != 0 && index != WORD_COUNT {
            if index == product.used {
                product.words[index] = 0;
                product.used = index + 1;
            }

            let sum = u64::from(product.words[index]) + u64::from(carry);
            product.words[index] = sum as u32;
            carry = (sum >> 32) as u32;
            index += 1;
        }

        if index == WORD_COUNT {
            return Err(CapacityExceeded);
        }
    }

    Ok(product)
}

impl PartialEq for BigInt {
    fn eq(&self, other: &Self) -> bool {
        self.words() == other.words()
    }
}

impl Eq for BigInt {}

impl PartialOrd for BigInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigInt {
    fn cmp(&self, other: &Self) -> Ordering {
        self.used
            .cmp(&other.used)
            .then_with(|| self.words().iter().rev().cmp(other.words().iter().rev()))
    }
}

impl std::fmt::Debug for BigInt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.words().iter().rev().map(|w| format!("{w:08x}"))).finish()
    }
}
