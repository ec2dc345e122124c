#![no_main]
use deltagolomb::config::MAX_MAGNITUDE;
use deltagolomb::golomb;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Each 4-byte chunk becomes one value folded into the codec's range.
    let values: Vec<i64> = data
        .chunks_exact(4)
        .map(|c| {
            let raw = i32::from_le_bytes([c[0], c[1], c[2], c[3]]) as i64;
            raw % (MAX_MAGNITUDE + 1)
        })
        .collect();

    let bytes = golomb::encode_all(&values).unwrap();
    let decoded = golomb::decode_all(&bytes).unwrap();
    assert_eq!(decoded, values);
});
