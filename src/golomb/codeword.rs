// Codeword table: signed integer -> Exp-Golomb bit pattern.
//
// 0 = 1
// 1 = 010{sign}       sign: 0 = positive, 1 = negative
// 2 = 011{sign}
// 3 = 00100{sign}
// 4 = 00101{sign}
// ...
//
// For v != 0 with m = |v| + 1 and nbits = bitlength(m) - 1, a codeword is
// nbits zeros followed by the (nbits + 2)-bit value (m << 1) | sign.

use crate::config::{FAST_PATH_LIMIT, MAX_MAGNITUDE};

/// One Exp-Golomb codeword: a run of zeros followed by a binary suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codeword {
    /// Leading zero bits.
    pub zeros: u32,
    /// Suffix bits, right-aligned.
    pub suffix: u64,
    /// Width of `suffix` in bits.
    pub suffix_len: u32,
}

impl Codeword {
    const fn table(suffix: u64, suffix_len: u32) -> Self {
        Self {
            zeros: 0,
            suffix,
            suffix_len,
        }
    }

    /// Total length in bits.
    pub fn len(&self) -> u32 {
        self.zeros + self.suffix_len
    }

    /// Always false; the shortest codeword is one bit.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The whole codeword as a right-aligned `(bits, len)` pair.
    ///
    /// Leading zeros are implicit in the value, so table entries that fold
    /// the prefix into the suffix compare equal to their general form.
    pub fn pattern(&self) -> (u64, u32) {
        (self.suffix, self.len())
    }

    /// The codeword as a string of `0`/`1` characters.
    pub fn to_bit_string(&self) -> String {
        let (bits, len) = self.pattern();
        (0..len)
            .rev()
            .map(|i| if (bits >> i) & 1 == 1 { '1' } else { '0' })
            .collect()
    }
}

/// Fast-path codewords for `-2..=2`, indexed by `v + FAST_PATH_LIMIT`.
///
/// The one-zero prefix of +-1 and +-2 is folded into a 4-bit suffix.
const FAST_PATH: [Codeword; 5] = [
    Codeword::table(0b0111, 4), // -2
    Codeword::table(0b0101, 4), // -1
    Codeword::table(0b1, 1),    // 0
    Codeword::table(0b0100, 4), // 1
    Codeword::table(0b0110, 4), // 2
];

/// Whether `value` is inside the codec's input domain.
#[inline]
pub fn in_range(value: i64) -> bool {
    (-MAX_MAGNITUDE..=MAX_MAGNITUDE).contains(&value)
}

/// Codeword for `value`, using the lookup table when it covers the value.
///
/// Returns `None` when `|value| > MAX_MAGNITUDE`.
#[inline]
pub fn codeword(value: i64) -> Option<Codeword> {
    if (-FAST_PATH_LIMIT..=FAST_PATH_LIMIT).contains(&value) {
        return Some(FAST_PATH[(value + FAST_PATH_LIMIT) as usize]);
    }
    general_codeword(value)
}

/// Codeword for `value` computed without the lookup table.
///
/// Returns `None` when `|value| > MAX_MAGNITUDE`.
pub fn general_codeword(value: i64) -> Option<Codeword> {
    if !in_range(value) {
        return None;
    }
    if value == 0 {
        return Some(Codeword::table(1, 1));
    }

    let sign = u64::from(value < 0);
    let m = value.unsigned_abs() + 1;
    let nbits = u64::BITS - m.leading_zeros() - 1;

    Some(Codeword {
        zeros: nbits,
        suffix: (m << 1) | sign,
        suffix_len: nbits + 2,
    })
}

/// Length in bits of the codeword for `value`, or `None` if out of range.
pub fn codeword_len(value: i64) -> Option<u32> {
    codeword(value).map(|cw| cw.len())
}
