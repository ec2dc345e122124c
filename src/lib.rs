//! Deltagolomb: order-zero Exp-Golomb integer coding with delta coding.
//!
//! The crate provides:
//! - A bit-level Exp-Golomb encoder and resumable decoder (`golomb`)
//! - A running-difference wrapper for slowly varying sequences (`delta`)
//! - Text/binary file helpers (`io`)
//! - An optional CLI (`cli` feature)
//!
//! # Codeword format
//!
//! Zero is the single bit `1`. A nonzero `v` with `m = |v| + 1` is written as
//! `bitlength(m) - 1` zero bits, then `m` in binary, then a sign bit
//! (`0` positive, `1` negative). Bits are packed MSB first; the stream is
//! zero-padded to a whole byte and carries no length or framing.
//!
//! # Quick Start
//!
//! ```
//! use deltagolomb::delta::{delta_decode, delta_encode};
//!
//! let samples = [1000, 1001, 1003, 1002, 1002];
//! let bytes = delta_encode(1000, &samples).unwrap();
//! assert_eq!(bytes.len(), 2); // 14 bits of residuals
//! assert_eq!(delta_decode(1000, &bytes), samples);
//! ```

pub mod config;
pub mod delta;
pub mod golomb;
pub mod io;

#[cfg(feature = "cli")]
pub mod cli;

pub use config::CodecOptions;
pub use delta::{delta_decode, delta_encode};
pub use golomb::{DecodeError, DecodeStatus, EncodeError, ExpGolombDecoder, ExpGolombEncoder};
