// Exp-Golomb stream decoder.
//
// Bit-at-a-time parse state machine, MSB first within each byte:
//
//   CountingZeros --1 (zeros == 0)--> emit 0
//   CountingZeros --1 (zeros > 0)---> ShiftingBits   (value = 1, remaining = zeros)
//   ShiftingBits  --b, remaining hits 0--> ReadingSign
//   ReadingSign   --s--> emit +-(value - 1), back to CountingZeros
//
// All parse state lives in the decoder, so a codeword split across calls
// (or across a temporarily exhausted source) resumes where it stopped.

use std::io::{self, Read};

use thiserror::Error;

use crate::config::MAX_PREFIX_ZEROS;

// ---------------------------------------------------------------------------
// Errors and status
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum DecodeError {
    /// The byte source failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// A unary prefix longer than any in-range codeword.
    #[error("codeword prefix of {zeros} zero bits exceeds the maximum of {max}", max = MAX_PREFIX_ZEROS)]
    PrefixTooLong { zeros: u32 },
}

/// Why a `decode` call returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStatus {
    /// Decoding stopped before the source ran dry (normally because the
    /// output buffer is full); call again for more.
    BufferFull,
    /// The source has no more bytes right now.
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    CountingZeros,
    ShiftingBits,
    ReadingSign,
}

// ---------------------------------------------------------------------------
// ExpGolombDecoder
// ---------------------------------------------------------------------------

/// Streaming Exp-Golomb decoder over any byte source.
///
/// The source is read one byte at a time; wrap unbuffered sources in a
/// `BufReader`. Trailing zero padding never produces a value: it is an
/// unfinished zero run that simply runs out of input.
///
/// # Example
/// ```
/// use deltagolomb::golomb::{DecodeStatus, ExpGolombDecoder};
///
/// let bytes: &[u8] = &[0b1010_0010, 0b1000_0000];
/// let mut dec = ExpGolombDecoder::new(bytes);
/// let mut out = [0i64; 8];
/// let (n, status) = dec.decode(&mut out).unwrap();
/// assert_eq!(&out[..n], &[0, 1, -1]);
/// assert_eq!(status, DecodeStatus::Exhausted);
/// ```
pub struct ExpGolombDecoder<R: Read> {
    reader: R,
    /// Most recently read byte.
    byte: u8,
    /// Unconsumed bits of `byte`, `0..=8`.
    bits_left: u32,
    state: ParseState,
    /// Length of the current zero run.
    zeros: u32,
    /// Magnitude accumulator (`|v| + 1` once complete).
    value: u64,
    /// Magnitude bits still to shift in.
    remaining: u32,
    values_decoded: u64,
    bytes_read: u64,
}

impl<R: Read> ExpGolombDecoder<R> {
    /// Create a decoder reading from `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            byte: 0,
            bits_left: 0,
            state: ParseState::CountingZeros,
            zeros: 0,
            value: 0,
            remaining: 0,
            values_decoded: 0,
            bytes_read: 0,
        }
    }

    /// Decode as many values as fit in `out` from the input available now.
    ///
    /// Returns the number of slots filled and why decoding stopped. A call
    /// may fill zero slots without error, e.g. when the input ends inside a
    /// zero run. After [`DecodeStatus::Exhausted`] the decoder can be called
    /// again once the source has more bytes.
    ///
    /// A malformed codeword found after some values were produced ends the
    /// call early with those values; the error is returned by the next call.
    pub fn decode(&mut self, out: &mut [i64]) -> Result<(usize, DecodeStatus), DecodeError> {
        let mut filled = 0;
        loop {
            while self.bits_left > 0 {
                if filled == out.len() {
                    return Ok((filled, DecodeStatus::BufferFull));
                }
                let bit = (self.byte >> (self.bits_left - 1)) & 1;
                match self.step(bit) {
                    Ok(decoded) => {
                        self.bits_left -= 1;
                        if let Some(value) = decoded {
                            out[filled] = value;
                            filled += 1;
                        }
                    }
                    // The failing bit is not consumed, so the next call
                    // reports the error after these values are handed out.
                    Err(_) if filled > 0 => return Ok((filled, DecodeStatus::BufferFull)),
                    Err(e) => return Err(e),
                }
            }

            if filled == out.len() {
                return Ok((filled, DecodeStatus::BufferFull));
            }
            match self.next_byte()? {
                Some(byte) => {
                    self.byte = byte;
                    self.bits_left = 8;
                }
                None => {
                    log::debug!(
                        "exp-golomb decoder: source exhausted after {} byte(s), {} value(s)",
                        self.bytes_read,
                        self.values_decoded
                    );
                    return Ok((filled, DecodeStatus::Exhausted));
                }
            }
        }
    }

    /// Whether the decoder sits exactly between codewords.
    ///
    /// End padding leaves a short zero run pending, so a cleanly finished
    /// stream may report `false` here.
    pub fn at_boundary(&self) -> bool {
        self.state == ParseState::CountingZeros && self.zeros == 0
    }

    /// Number of values decoded so far.
    pub fn values_decoded(&self) -> u64 {
        self.values_decoded
    }

    /// Number of bytes pulled from the source so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Shared access to the source.
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Mutable access to the source, e.g. to append input before resuming.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    /// Consume the decoder and return the source. Parse state is dropped.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Advance the state machine by one bit.
    fn step(&mut self, bit: u8) -> Result<Option<i64>, DecodeError> {
        match self.state {
            ParseState::CountingZeros => {
                if bit == 0 {
                    if self.zeros == MAX_PREFIX_ZEROS {
                        return Err(DecodeError::PrefixTooLong {
                            zeros: self.zeros + 1,
                        });
                    }
                    self.zeros += 1;
                } else if self.zeros == 0 {
                    return Ok(Some(self.emit(0)));
                } else {
                    self.value = 1;
                    self.remaining = self.zeros;
                    self.state = ParseState::ShiftingBits;
                }
            }
            ParseState::ShiftingBits => {
                self.value = (self.value << 1) | u64::from(bit);
                self.remaining -= 1;
                if self.remaining == 0 {
                    self.state = ParseState::ReadingSign;
                }
            }
            ParseState::ReadingSign => {
                // value <= 2^31 - 1 given the prefix bound.
                let magnitude = (self.value - 1) as i64;
                let value = if bit == 0 { magnitude } else { -magnitude };
                self.zeros = 0;
                self.value = 0;
                self.state = ParseState::CountingZeros;
                return Ok(Some(self.emit(value)));
            }
        }
        Ok(None)
    }

    fn emit(&mut self, value: i64) -> i64 {
        self.values_decoded += 1;
        value
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.reader.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.bytes_read += 1;
                    return Ok(Some(buf[0]));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::golomb::encoder::ExpGolombEncoder;

    fn encode(values: &[i64]) -> Vec<u8> {
        let mut enc = ExpGolombEncoder::new(Vec::new());
        enc.encode_many(values).unwrap();
        enc.finish().unwrap()
    }

    fn decode_n(bytes: &[u8], n: usize) -> Vec<i64> {
        let mut dec = ExpGolombDecoder::new(bytes);
        let mut out = vec![0i64; n];
        let (count, _) = dec.decode(&mut out).unwrap();
        out.truncate(count);
        out
    }

    #[test]
    fn empty_source_is_immediately_exhausted() {
        let mut dec = ExpGolombDecoder::new(&[][..]);
        let mut out = [0i64; 4];
        assert_eq!(dec.decode(&mut out).unwrap(), (0, DecodeStatus::Exhausted));
    }

    #[test]
    fn reference_vectors_decode() {
        assert_eq!(decode_n(&[0b0100_0000], 4), [1]);
        assert_eq!(decode_n(&[0b0101_0000], 4), [-1]);
        assert_eq!(decode_n(&[0b0110_0000], 4), [2]);
        assert_eq!(decode_n(&[0b0111_0000], 4), [-2]);
        assert_eq!(decode_n(&[0b1000_0000], 4), [0]);
    }

    #[test]
    fn sign_bit_is_read_after_magnitude() {
        // 3 = 00 1 0 0 0, -3 = 00 1 0 0 1
        assert_eq!(decode_n(&[0b0010_0000, 0b1001_0000], 4), [3, -3]);
    }

    #[test]
    fn padding_does_not_emit_values() {
        // Single zero: 1 + seven padding zeros.
        let bytes = encode(&[0]);
        let mut dec = ExpGolombDecoder::new(&bytes[..]);
        let mut out = [0i64; 8];
        assert_eq!(dec.decode(&mut out).unwrap(), (1, DecodeStatus::Exhausted));
        assert!(!dec.at_boundary());
    }

    #[test]
    fn roundtrip_mixed_values() {
        let values = [0, 1, -1, 2, -2, 3, -3, 127, -128, 65_536, -1_000_000, 0, 0];
        let bytes = encode(&values);
        assert_eq!(decode_n(&bytes, 64), values);
    }

    #[test]
    fn extreme_magnitudes_roundtrip() {
        let max = crate::config::MAX_MAGNITUDE;
        let values = [max, -max, max - 1, 0, -max];
        let bytes = encode(&values);
        assert_eq!(decode_n(&bytes, 8), values);
    }

    #[test]
    fn full_buffer_stops_and_resumes() {
        let values: Vec<i64> = (-20..20).collect();
        let bytes = encode(&values);
        let mut dec = ExpGolombDecoder::new(&bytes[..]);

        let mut got = Vec::new();
        let mut out = [0i64; 3];
        loop {
            let (n, status) = dec.decode(&mut out).unwrap();
            got.extend_from_slice(&out[..n]);
            if status == DecodeStatus::Exhausted {
                break;
            }
            assert_eq!(n, 3);
        }
        assert_eq!(got, values);
        assert_eq!(dec.values_decoded(), values.len() as u64);
        assert_eq!(dec.bytes_read(), bytes.len() as u64);
    }

    #[test]
    fn empty_output_buffer_reads_nothing() {
        let bytes = encode(&[1, 2, 3]);
        let mut dec = ExpGolombDecoder::new(&bytes[..]);
        assert_eq!(dec.decode(&mut []).unwrap(), (0, DecodeStatus::BufferFull));
        assert_eq!(dec.bytes_read(), 0);
    }

    #[test]
    fn resumes_mid_codeword_when_source_grows() {
        // 1_000_000 has a 19-zero prefix, so its codeword spans 5 bytes.
        let bytes = encode(&[1_000_000, -7]);
        let mut dec = ExpGolombDecoder::new(std::io::Cursor::new(Vec::new()));
        let mut out = [0i64; 4];
        let mut got = Vec::new();

        for &b in &bytes {
            dec.get_mut().get_mut().push(b);
            let (n, status) = dec.decode(&mut out).unwrap();
            assert_eq!(status, DecodeStatus::Exhausted);
            got.extend_from_slice(&out[..n]);
        }
        assert_eq!(got, [1_000_000, -7]);
    }

    #[test]
    fn overlong_prefix_is_an_error() {
        // 40 zero bits then a one.
        let bytes = [0, 0, 0, 0, 0, 0x80];
        let mut dec = ExpGolombDecoder::new(&bytes[..]);
        let mut out = [0i64; 1];
        let err = dec.decode(&mut out).unwrap_err();
        assert!(matches!(err, DecodeError::PrefixTooLong { zeros: 31 }));
    }

    #[test]
    fn error_is_deferred_behind_decoded_values() {
        // 1 and 0, then a 32-bit zero run.
        let bytes = [0b0100_1000, 0, 0, 0, 0];
        let mut dec = ExpGolombDecoder::new(&bytes[..]);
        let mut out = [0i64; 8];
        assert_eq!(dec.decode(&mut out).unwrap(), (2, DecodeStatus::BufferFull));
        assert_eq!(&out[..2], &[1, 0]);
        assert!(matches!(
            dec.decode(&mut out),
            Err(DecodeError::PrefixTooLong { zeros: 31 })
        ));
    }

    #[test]
    fn interrupted_reads_are_retried() {
        struct Flaky<'a> {
            data: &'a [u8],
            hiccup: bool,
        }
        impl Read for Flaky<'_> {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                self.hiccup = !self.hiccup;
                if self.hiccup {
                    return Err(io::ErrorKind::Interrupted.into());
                }
                self.data.read(buf)
            }
        }

        let bytes = encode(&[9, -9, 0]);
        let mut dec = ExpGolombDecoder::new(Flaky {
            data: &bytes,
            hiccup: false,
        });
        let mut out = [0i64; 4];
        let (n, _) = dec.decode(&mut out).unwrap();
        assert_eq!(&out[..n], &[9, -9, 0]);
    }
}
