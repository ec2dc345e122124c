#![no_main]
use deltagolomb::delta::{delta_decode, delta_encode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }
    let start = data[0] as i64 - 128;
    let values: Vec<i64> = data[1..]
        .chunks_exact(2)
        .map(|c| i16::from_le_bytes([c[0], c[1]]) as i64)
        .collect();

    let bytes = delta_encode(start, &values).unwrap();
    assert_eq!(delta_decode(start, &bytes), values);
});
