// Order-zero Exp-Golomb coding with an explicit sign bit.
//
// # Modules
//
// - `bits`:     Bit accumulator: MSB-first packing into 64-bit words
// - `codeword`: Codeword table: fast path for -2..=2, general algorithm otherwise
// - `encoder`:  Streaming encoder over `Write`
// - `decoder`:  Resumable bit-at-a-time decoder over `Read`
//
// The byte stream is the plain concatenation of codewords, zero-padded to a
// byte boundary. There is no length, magic, or checksum: a reader must know
// how many values to expect, and a single flipped bit shifts every later
// codeword boundary.

pub mod bits;
pub mod codeword;
pub mod decoder;
pub mod encoder;

pub use bits::BitWriter;
pub use codeword::{Codeword, codeword, codeword_len, general_codeword};
pub use decoder::{DecodeError, DecodeStatus, ExpGolombDecoder};
pub use encoder::{EncodeError, ExpGolombEncoder};

use crate::config::DECODE_CHUNK;

/// Encode `values` into a new byte vector.
pub fn encode_all(values: &[i64]) -> Result<Vec<u8>, EncodeError> {
    let mut enc = ExpGolombEncoder::new(Vec::new());
    enc.encode_many(values)?;
    enc.finish()
}

/// Decode every complete codeword in `data`.
pub fn decode_all(data: &[u8]) -> Result<Vec<i64>, DecodeError> {
    let mut dec = ExpGolombDecoder::new(data);
    let mut values = Vec::new();
    let mut chunk = [0i64; DECODE_CHUNK];
    loop {
        let (n, status) = dec.decode(&mut chunk)?;
        values.extend_from_slice(&chunk[..n]);
        if status == DecodeStatus::Exhausted {
            return Ok(values);
        }
    }
}
