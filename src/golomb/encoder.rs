// Exp-Golomb stream encoder.
//
// Each value becomes one codeword appended to the bit accumulator; full
// 64-bit words go to the sink as they fill. `finish()` pads the last partial
// word to a byte boundary and flushes the sink.

use std::io::Write;

use thiserror::Error;

use super::bits::BitWriter;
use super::codeword::{self, Codeword};
use crate::config::MAX_MAGNITUDE;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum EncodeError {
    /// The byte sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Magnitude outside the codec's domain.
    #[error("value {value} out of range (magnitude must not exceed {max})", max = MAX_MAGNITUDE)]
    ValueOutOfRange { value: i64 },
    /// `value - previous` does not fit in an `i64`.
    #[error("delta from {previous} to {value} overflows")]
    DeltaOverflow { previous: i64, value: i64 },
}

// ---------------------------------------------------------------------------
// ExpGolombEncoder
// ---------------------------------------------------------------------------

/// Streaming Exp-Golomb encoder over any byte sink.
///
/// Writes are buffered a word at a time; wrap unbuffered sinks (files,
/// sockets) in a `BufWriter`. The encoder must be [`finish`](Self::finish)ed
/// to write the final partial word.
///
/// # Example
/// ```
/// use deltagolomb::golomb::ExpGolombEncoder;
///
/// let mut enc = ExpGolombEncoder::new(Vec::new());
/// enc.encode_many(&[0, 1, -1]).unwrap();
/// let bytes = enc.finish().unwrap();
/// // 1 0100 0101 + 7 padding zeros
/// assert_eq!(bytes, [0b1010_0010, 0b1000_0000]);
/// ```
pub struct ExpGolombEncoder<W: Write> {
    bits: BitWriter<W>,
    values_encoded: u64,
}

impl<W: Write> ExpGolombEncoder<W> {
    /// Create an encoder writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            bits: BitWriter::new(writer),
            values_encoded: 0,
        }
    }

    /// Append the codeword for `value`.
    ///
    /// Out-of-range values are rejected before anything is written.
    pub fn encode_one(&mut self, value: i64) -> Result<(), EncodeError> {
        let cw = codeword::codeword(value).ok_or(EncodeError::ValueOutOfRange { value })?;
        self.write_codeword(cw)?;
        self.values_encoded += 1;
        Ok(())
    }

    /// Append codewords for every value in order.
    pub fn encode_many(&mut self, values: &[i64]) -> Result<(), EncodeError> {
        for &value in values {
            self.encode_one(value)?;
        }
        Ok(())
    }

    /// Number of values encoded so far.
    pub fn values_encoded(&self) -> u64 {
        self.values_encoded
    }

    /// Codeword bits produced so far, excluding end padding.
    pub fn bits_written(&self) -> u64 {
        self.bits.bits_written()
    }

    /// Pad and write the final partial word, flush the sink, and return it.
    pub fn finish(self) -> Result<W, EncodeError> {
        let values = self.values_encoded;
        let bits = self.bits.bits_written();
        let writer = self.bits.finish()?;
        log::debug!(
            "exp-golomb encoder: {values} value(s), {bits} bit(s), {} byte(s)",
            bits.div_ceil(8)
        );
        Ok(writer)
    }

    fn write_codeword(&mut self, cw: Codeword) -> std::io::Result<()> {
        if cw.zeros > 0 {
            self.bits.write_zeros(u64::from(cw.zeros))?;
        }
        self.bits.write_bits(cw.suffix, cw.suffix_len)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
