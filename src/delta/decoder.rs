// Streaming delta decoder.
//
// DeltaDecoder wraps ExpGolombDecoder and turns residuals back into values
// with a running sum seeded by the caller's base. The running sum wraps on
// i64 overflow; only corrupt input can get there.

use std::io::Read;

use crate::config::DECODE_CHUNK;
use crate::golomb::decoder::{DecodeError, DecodeStatus, ExpGolombDecoder};

// ---------------------------------------------------------------------------
// DeltaDecoder
// ---------------------------------------------------------------------------

/// Streaming Exp-Golomb + running-sum decoder.
pub struct DeltaDecoder<R: Read> {
    inner: ExpGolombDecoder<R>,
    current: i64,
}

impl<R: Read> DeltaDecoder<R> {
    /// Create a decoder whose first residual is added to `base`.
    pub fn new(reader: R, base: i64) -> Self {
        Self {
            inner: ExpGolombDecoder::new(reader),
            current: base,
        }
    }

    /// Decode as many values as fit in `out`; see [`ExpGolombDecoder::decode`].
    pub fn decode(&mut self, out: &mut [i64]) -> Result<(usize, DecodeStatus), DecodeError> {
        let (n, status) = self.inner.decode(out)?;
        for slot in &mut out[..n] {
            self.current = self.current.wrapping_add(*slot);
            *slot = self.current;
        }
        Ok((n, status))
    }

    /// The most recently decoded value (the base before the first value).
    pub fn current(&self) -> i64 {
        self.current
    }

    /// Whether the decoder sits exactly between codewords.
    pub fn at_boundary(&self) -> bool {
        self.inner.at_boundary()
    }

    /// Number of values decoded so far.
    pub fn values_decoded(&self) -> u64 {
        self.inner.values_decoded()
    }

    /// Number of bytes pulled from the source so far.
    pub fn bytes_read(&self) -> u64 {
        self.inner.bytes_read()
    }

    /// Mutable access to the source, e.g. to append input before resuming.
    pub fn get_mut(&mut self) -> &mut R {
        self.inner.get_mut()
    }

    /// Consume the decoder and return the source.
    pub fn into_inner(self) -> R {
        self.inner.into_inner()
    }
}

// ---------------------------------------------------------------------------
// Convenience function
// ---------------------------------------------------------------------------

/// Decode a delta-coded stream against `base`.
///
/// Returns every value fully decoded before the input ran out. A decode
/// error ends the sequence early; the values before it are still returned.
pub fn delta_decode(base: i64, data: &[u8]) -> Vec<i64> {
    let mut dec = DeltaDecoder::new(data, base);
    let mut values = Vec::new();
    let mut chunk = [0i64; DECODE_CHUNK];
    loop {
        match dec.decode(&mut chunk) {
            Ok((n, status)) => {
                values.extend_from_slice(&chunk[..n]);
                if status == DecodeStatus::Exhausted {
                    break;
                }
            }
            Err(e) => {
                log::warn!(
                    "delta decode stopped after {} value(s): {e}",
                    values.len()
                );
                break;
            }
        }
    }
    values
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
