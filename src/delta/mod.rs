// Delta coding on top of Exp-Golomb.
//
// - `encoder`: DeltaEncoder: running difference, then Exp-Golomb
// - `decoder`: DeltaDecoder: Exp-Golomb, then running sum
//
// `delta_encode(start, s)` and `delta_decode(start, _)` are inverses.

pub mod decoder;
pub mod encoder;

pub use decoder::{DeltaDecoder, delta_decode};
pub use encoder::{DeltaEncoder, delta_encode};
