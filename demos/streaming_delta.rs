// Streams a slowly drifting signal through DeltaEncoder into a file, then
// reads it back in small chunks with DeltaDecoder.
//
// Usage:
//   cargo run --example streaming_delta

use std::fs::File;
use std::io::{BufReader, BufWriter};

use deltagolomb::delta::{DeltaDecoder, DeltaEncoder};
use deltagolomb::golomb::DecodeStatus;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let samples: Vec<i64> = (0..10_000i64)
        .map(|i| 20_000 + (i / 7) % 50 - (i / 13) % 30)
        .collect();

    let dir = std::env::temp_dir();
    let path = dir.join("deltagolomb_streaming_demo.eg");

    let mut enc = DeltaEncoder::new(BufWriter::new(File::create(&path)?), samples[0]);
    for &s in &samples {
        enc.encode_one(s)?;
    }
    let bits = enc.bits_written();
    enc.finish()?;

    let mut dec = DeltaDecoder::new(BufReader::new(File::open(&path)?), samples[0]);
    let mut chunk = [0i64; 64];
    let mut restored = Vec::with_capacity(samples.len());
    loop {
        let (n, status) = dec.decode(&mut chunk)?;
        restored.extend_from_slice(&chunk[..n]);
        if status == DecodeStatus::Exhausted {
            break;
        }
    }
    assert_eq!(restored, samples);

    println!(
        "{} samples -> {} bits ({:.2} bits/sample), {} bytes read back",
        samples.len(),
        bits,
        bits as f64 / samples.len() as f64,
        dec.bytes_read()
    );

    std::fs::remove_file(&path)?;
    Ok(())
}
