#![no_main]
use deltagolomb::delta::delta_decode;
use deltagolomb::golomb::{self, DecodeStatus, ExpGolombDecoder};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must decode or fail cleanly, never panic.
    let bulk = golomb::decode_all(data);
    let _ = delta_decode(0, data);

    // A one-slot buffer must see the same values as the bulk path.
    let mut dec = ExpGolombDecoder::new(data);
    let mut out = [0i64; 1];
    let mut got = Vec::new();
    let small = loop {
        match dec.decode(&mut out) {
            Ok((n, status)) => {
                got.extend_from_slice(&out[..n]);
                if status == DecodeStatus::Exhausted {
                    break Ok(got);
                }
            }
            Err(e) => break Err(e),
        }
    };
    if let (Ok(a), Ok(b)) = (&bulk, &small) {
        assert_eq!(a, b);
    }
    assert_eq!(bulk.is_ok(), small.is_ok());
});
