// Streaming delta encoder.
//
// DeltaEncoder turns each value into its difference from the previous one
// (the first against a caller-supplied start) and codes the residuals with
// Exp-Golomb. Slowly varying sequences give small residuals, which get the
// short codewords.

use std::io::Write;

use crate::golomb::encoder::{EncodeError, ExpGolombEncoder};

// ---------------------------------------------------------------------------
// DeltaEncoder
// ---------------------------------------------------------------------------

/// Streaming delta + Exp-Golomb encoder.
///
/// # Example
/// ```
/// use deltagolomb::delta::{DeltaEncoder, delta_decode};
///
/// let mut enc = DeltaEncoder::new(Vec::new(), 100);
/// enc.encode_many(&[100, 101, 103]).unwrap();
/// let bytes = enc.finish().unwrap();
/// assert_eq!(delta_decode(100, &bytes), [100, 101, 103]);
/// ```
pub struct DeltaEncoder<W: Write> {
    inner: ExpGolombEncoder<W>,
    previous: i64,
}

impl<W: Write> DeltaEncoder<W> {
    /// Create an encoder whose first residual is taken against `start`.
    pub fn new(writer: W, start: i64) -> Self {
        Self {
            inner: ExpGolombEncoder::new(writer),
            previous: start,
        }
    }

    /// Encode `value - previous`.
    ///
    /// On error the running reference is left unchanged.
    pub fn encode_one(&mut self, value: i64) -> Result<(), EncodeError> {
        let previous = self.previous;
        let residual = value
            .checked_sub(previous)
            .ok_or(EncodeError::DeltaOverflow { previous, value })?;
        self.inner.encode_one(residual)?;
        self.previous = value;
        Ok(())
    }

    /// Encode every value in order.
    pub fn encode_many(&mut self, values: &[i64]) -> Result<(), EncodeError> {
        for &value in values {
            self.encode_one(value)?;
        }
        Ok(())
    }

    /// The reference the next value will be differenced against.
    pub fn previous(&self) -> i64 {
        self.previous
    }

    /// Number of values encoded so far.
    pub fn values_encoded(&self) -> u64 {
        self.inner.values_encoded()
    }

    /// Codeword bits produced so far, excluding end padding.
    pub fn bits_written(&self) -> u64 {
        self.inner.bits_written()
    }

    /// Finish the underlying Exp-Golomb stream and return the sink.
    pub fn finish(self) -> Result<W, EncodeError> {
        self.inner.finish()
    }
}

// ---------------------------------------------------------------------------
// Convenience function
// ---------------------------------------------------------------------------

/// Delta-encode `values` against `start` into a finished byte stream.
pub fn delta_encode(start: i64, values: &[i64]) -> Result<Vec<u8>, EncodeError> {
    let mut enc = DeltaEncoder::new(Vec::new(), start);
    enc.encode_many(values)?;
    enc.finish()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
