// Bit accumulator: packs codeword bits MSB-first into a 64-bit word and
// flushes whole words to the sink as they fill.
//
// Invariant: `bits_left` is in `1..=WORD_BITS` between calls. The word holds
// `WORD_BITS - bits_left` committed bits, left-justified; the unused low bits
// are zero.

use std::io::{self, Write};

use crate::config::{WORD_BITS, WORD_BYTES};

/// MSB-first bit writer over a byte sink.
pub struct BitWriter<W: Write> {
    writer: W,
    word: u64,
    bits_left: u32,
    /// Bits accepted so far, excluding end padding.
    bits_written: u64,
    /// Bytes handed to the sink so far.
    bytes_flushed: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            word: 0,
            bits_left: WORD_BITS,
            bits_written: 0,
            bytes_flushed: 0,
        }
    }

    /// Append the low `nbits` bits of `bits`, most significant first.
    ///
    /// `nbits` must be in `1..=64` and `bits` must not have bits set above
    /// `nbits`.
    pub fn write_bits(&mut self, bits: u64, nbits: u32) -> io::Result<()> {
        debug_assert!((1..=WORD_BITS).contains(&nbits));
        debug_assert!(nbits == WORD_BITS || bits >> nbits == 0);

        self.bits_written += u64::from(nbits);

        if nbits < self.bits_left {
            self.word |= bits << (self.bits_left - nbits);
            self.bits_left -= nbits;
            return Ok(());
        }

        // Fill the rest of the word, flush it, carry the remainder.
        let carry = nbits - self.bits_left;
        self.word |= bits >> carry;
        self.flush_word()?;

        if carry > 0 {
            self.word = bits << (WORD_BITS - carry);
            self.bits_left = WORD_BITS - carry;
        }
        Ok(())
    }

    /// Append `count` zero bits.
    ///
    /// Zeros need no shifting: only the free-bit count moves, and whole
    /// words in the middle of the run are flushed as they are.
    pub fn write_zeros(&mut self, mut count: u64) -> io::Result<()> {
        self.bits_written += count;

        if count < u64::from(self.bits_left) {
            self.bits_left -= count as u32;
            return Ok(());
        }

        count -= u64::from(self.bits_left);
        self.flush_word()?;

        while count >= u64::from(WORD_BITS) {
            self.flush_word()?;
            count -= u64::from(WORD_BITS);
        }
        self.bits_left -= count as u32;
        Ok(())
    }

    /// Bits sitting in the accumulator, not yet handed to the sink.
    pub fn pending_bits(&self) -> u32 {
        WORD_BITS - self.bits_left
    }

    /// Total bits accepted, excluding end padding.
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Total bytes handed to the sink.
    pub fn bytes_flushed(&self) -> u64 {
        self.bytes_flushed
    }

    /// Zero-pad the partial word to a byte boundary, write only the bytes it
    /// occupies, flush the sink, and return it.
    pub fn finish(mut self) -> io::Result<W> {
        let pending = self.pending_bits();
        if pending > 0 {
            let nbytes = pending.div_ceil(8) as usize;
            let bytes = self.word.to_be_bytes();
            self.writer.write_all(&bytes[..nbytes])?;
            self.bytes_flushed += nbytes as u64;
            log::trace!(
                "bit writer: final {nbytes} byte(s), {} padding bit(s)",
                nbytes as u32 * 8 - pending
            );
        }
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn flush_word(&mut self) -> io::Result<()> {
        self.writer.write_all(&self.word.to_be_bytes())?;
        self.bytes_flushed += WORD_BYTES as u64;
        self.word = 0;
        self.bits_left = WORD_BITS;
        log::trace!("bit writer: flushed word, {} bytes total", self.bytes_flushed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(f: impl FnOnce(&mut BitWriter<Vec<u8>>)) -> Vec<u8> {
        let mut bw = BitWriter::new(Vec::new());
        f(&mut bw);
        bw.finish().unwrap()
    }

    #[test]
    fn empty_writes_nothing() {
        assert!(written(|_| {}).is_empty());
    }

    #[test]
    fn single_bit_is_padded_to_a_byte() {
        let out = written(|bw| bw.write_bits(1, 1).unwrap());
        assert_eq!(out, [0x80]);
    }

    #[test]
    fn partial_word_writes_only_needed_bytes() {
        let out = written(|bw| {
            bw.write_bits(0xABC, 12).unwrap();
        });
        assert_eq!(out, [0xAB, 0xC0]);
    }

    #[test]
    fn exact_word_fill_flushes_without_padding() {
        let out = written(|bw| {
            bw.write_bits(0xDEAD_BEEF, 32).unwrap();
            bw.write_bits(0x0123_4567, 32).unwrap();
            assert_eq!(bw.pending_bits(), 0);
            assert_eq!(bw.bytes_flushed(), 8);
        });
        assert_eq!(out, [0xDE, 0xAD, 0xBE, 0xEF, 0x01, 0x23, 0x45, 0x67]);
    }

    #[test]
    fn bits_spanning_a_word_boundary_are_split() {
        let out = written(|bw| {
            bw.write_bits(0, 60).unwrap();
            bw.write_bits(0xFF, 8).unwrap();
        });
        // 60 zeros, then 1111 | 1111 across the boundary.
        assert_eq!(out.len(), 9);
        assert_eq!(&out[..7], &[0; 7]);
        assert_eq!(out[7], 0x0F);
        assert_eq!(out[8], 0xF0);
    }

    #[test]
    fn full_width_write() {
        let out = written(|bw| {
            bw.write_bits(1, 1).unwrap();
            bw.write_bits(u64::MAX, 64).unwrap();
        });
        // 65 ones: a full word of 0xFF, then one bit in the tail byte.
        assert_eq!(out.len(), 9);
        assert!(out[..8].iter().all(|&b| b == 0xFF));
        assert_eq!(out[8], 0x80);
    }

    #[test]
    fn long_zero_run_flushes_whole_words() {
        let out = written(|bw| {
            bw.write_bits(1, 1).unwrap();
            bw.write_zeros(200).unwrap();
            bw.write_bits(1, 1).unwrap();
            assert_eq!(bw.bits_written(), 202);
        });
        // 202 bits -> 26 bytes; first bit and bit 201 set.
        assert_eq!(out.len(), 26);
        assert_eq!(out[0], 0x80);
        assert!(out[1..25].iter().all(|&b| b == 0));
        assert_eq!(out[25], 0b0100_0000);
    }

    #[test]
    fn zero_run_ending_on_word_boundary() {
        let out = written(|bw| {
            bw.write_zeros(64).unwrap();
            assert_eq!(bw.pending_bits(), 0);
            bw.write_bits(0b11, 2).unwrap();
        });
        assert_eq!(out.len(), 9);
        assert_eq!(out[8], 0xC0);
    }

    #[test]
    fn sink_is_flushed_on_finish() {
        struct Probe {
            flushed: bool,
        }
        impl Write for Probe {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                Ok(buf.len())
            }
            fn flush(&mut self) -> io::Result<()> {
                self.flushed = true;
                Ok(())
            }
        }

        let bw = BitWriter::new(Probe { flushed: false });
        assert!(bw.finish().unwrap().flushed);
    }
}
