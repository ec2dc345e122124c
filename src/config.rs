// Codec constants and caller-facing options.
//
// The wire format has no tunable parameters: the code is order-zero and the
// accumulator word is fixed. What a caller can choose is whether the delta
// wrapper sits in front of the coder, and how many values to take back out.

/// Width of the encoder's accumulator word in bits.
pub const WORD_BITS: u32 = u64::BITS;

/// Bytes flushed to the sink per full accumulator word.
pub const WORD_BYTES: usize = (WORD_BITS / 8) as usize;

/// Largest magnitude the codec accepts: `2^31 - 2`.
///
/// `|v| + 1` must stay below `2^31` so every codeword fits the 31-bit
/// magnitude class the format was defined for.
pub const MAX_MAGNITUDE: i64 = (1 << 31) - 2;

/// Longest unary prefix an in-range codeword can carry.
///
/// `bitlength(MAX_MAGNITUDE + 1) - 1`.
pub const MAX_PREFIX_ZEROS: u32 = 30;

/// Values in `-FAST_PATH_LIMIT..=FAST_PATH_LIMIT` come from a lookup table.
pub const FAST_PATH_LIMIT: i64 = 2;

/// Output slots per `decode` call in the one-shot helpers.
pub const DECODE_CHUNK: usize = 256;

/// Buffered reader/writer capacity for file helpers (64 KiB).
pub const BUF_SIZE: usize = 64 * 1024;

/// Options shared by the file helpers and the CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodecOptions {
    /// Delta-code the values against this start (encode) / base (decode).
    /// `None` codes the values as they are.
    pub delta: Option<i64>,
    /// Stop decoding after this many values. The stream carries no length,
    /// so this is the out-of-band count.
    pub limit: Option<usize>,
}

impl CodecOptions {
    /// Plain Exp-Golomb, no delta, no limit.
    pub fn plain() -> Self {
        Self::default()
    }

    /// Delta coding against `start`.
    pub fn delta(start: i64) -> Self {
        Self {
            delta: Some(start),
            limit: None,
        }
    }

    /// Same options with a decode limit.
    pub fn with_limit(self, limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..self
        }
    }
}
