use deltagolomb::golomb::{self, codeword};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let values = [0i64, 1, -1, 2, -2, 3, 100, -12345];

    let bytes = golomb::encode_all(&values)?;
    let restored = golomb::decode_all(&bytes)?;
    assert_eq!(restored, values);

    for &v in &values {
        if let Some(cw) = codeword(v) {
            println!("{v:>7} -> {}", cw.to_bit_string());
        }
    }
    println!(
        "encoded {} values -> {} bytes -> restored {} values",
        values.len(),
        bytes.len(),
        restored.len()
    );

    Ok(())
}
