// Stream and file helpers: text integer lists <-> Exp-Golomb byte streams.
//
// Text input is decimal integers separated by whitespace or commas, with `#`
// starting a comment that runs to end of line. Text output is one integer
// per line. `CodecOptions` selects plain or delta coding and an optional
// decode limit.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use thiserror::Error;

use crate::config::{BUF_SIZE, CodecOptions, DECODE_CHUNK};
use crate::delta::{DeltaDecoder, DeltaEncoder};
use crate::golomb::{DecodeError, DecodeStatus, EncodeError, ExpGolombDecoder, ExpGolombEncoder};

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Statistics returned by `encode_stream()` / `encode_file()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeStats {
    /// Integers read and encoded.
    pub values: u64,
    /// Codeword bits, excluding end padding.
    pub payload_bits: u64,
    /// Bytes written, including end padding.
    pub output_bytes: u64,
}

/// Statistics returned by `decode_stream()` / `decode_file()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeStats {
    /// Bytes pulled from the coded input.
    pub input_bytes: u64,
    /// Integers decoded and written.
    pub values: u64,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for stream and file helpers.
#[derive(Debug, Error)]
pub enum IoError {
    /// I/O error (file open, read, write).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Encoding error.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),
    /// Decoding error.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
    /// A token in the text input is not an integer.
    #[error("line {line}: not an integer: '{token}'")]
    Parse { line: usize, token: String },
}

// ---------------------------------------------------------------------------
// Text format
// ---------------------------------------------------------------------------

fn parse_line(
    line: &str,
    line_no: usize,
    mut f: impl FnMut(i64) -> Result<(), IoError>,
) -> Result<(), IoError> {
    let content = line.split('#').next().unwrap_or("");
    for token in content
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
    {
        let value = token.parse::<i64>().map_err(|_| IoError::Parse {
            line: line_no,
            token: token.to_string(),
        })?;
        f(value)?;
    }
    Ok(())
}

/// Parse every integer in a text stream.
pub fn read_integers<R: BufRead>(reader: R) -> Result<Vec<i64>, IoError> {
    let mut values = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        parse_line(&line?, i + 1, |v| {
            values.push(v);
            Ok(())
        })?;
    }
    Ok(values)
}

/// Write integers one per line.
pub fn write_integers<W: Write>(writer: &mut W, values: &[i64]) -> io::Result<()> {
    for v in values {
        writeln!(writer, "{v}")?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Plain / delta dispatch
// ---------------------------------------------------------------------------

enum Encoder<W: Write> {
    Plain(ExpGolombEncoder<W>),
    Delta(DeltaEncoder<W>),
}

impl<W: Write> Encoder<W> {
    fn new(writer: W, opts: &CodecOptions) -> Self {
        match opts.delta {
            Some(start) => Self::Delta(DeltaEncoder::new(writer, start)),
            None => Self::Plain(ExpGolombEncoder::new(writer)),
        }
    }

    fn encode_one(&mut self, value: i64) -> Result<(), EncodeError> {
        match self {
            Self::Plain(e) => e.encode_one(value),
            Self::Delta(e) => e.encode_one(value),
        }
    }

    fn stats(&self) -> (u64, u64) {
        match self {
            Self::Plain(e) => (e.values_encoded(), e.bits_written()),
            Self::Delta(e) => (e.values_encoded(), e.bits_written()),
        }
    }

    fn finish(self) -> Result<W, EncodeError> {
        match self {
            Self::Plain(e) => e.finish(),
            Self::Delta(e) => e.finish(),
        }
    }
}

enum Decoder<R: Read> {
    Plain(ExpGolombDecoder<R>),
    Delta(DeltaDecoder<R>),
}

impl<R: Read> Decoder<R> {
    fn new(reader: R, opts: &CodecOptions) -> Self {
        match opts.delta {
            Some(base) => Self::Delta(DeltaDecoder::new(reader, base)),
            None => Self::Plain(ExpGolombDecoder::new(reader)),
        }
    }

    fn decode(&mut self, out: &mut [i64]) -> Result<(usize, DecodeStatus), DecodeError> {
        match self {
            Self::Plain(d) => d.decode(out),
            Self::Delta(d) => d.decode(out),
        }
    }

    fn bytes_read(&self) -> u64 {
        match self {
            Self::Plain(d) => d.bytes_read(),
            Self::Delta(d) => d.bytes_read(),
        }
    }

    fn at_boundary(&self) -> bool {
        match self {
            Self::Plain(d) => d.at_boundary(),
            Self::Delta(d) => d.at_boundary(),
        }
    }
}

// ---------------------------------------------------------------------------
// Streams
// ---------------------------------------------------------------------------

/// Encode the integers of a text stream, writing coded bytes to `writer`.
///
/// Values are encoded as they are parsed. Returns the flushed writer.
pub fn encode_stream<R: BufRead, W: Write>(
    reader: R,
    writer: W,
    opts: &CodecOptions,
) -> Result<(W, EncodeStats), IoError> {
    let mut encoder = Encoder::new(writer, opts);
    for (i, line) in reader.lines().enumerate() {
        parse_line(&line?, i + 1, |v| Ok(encoder.encode_one(v)?))?;
    }

    let (values, payload_bits) = encoder.stats();
    let writer = encoder.finish()?;
    Ok((
        writer,
        EncodeStats {
            values,
            payload_bits,
            output_bytes: payload_bits.div_ceil(8),
        },
    ))
}

/// Decode a coded byte stream, writing one integer per line to `writer`.
///
/// Stops when the input is exhausted or `opts.limit` values were written.
pub fn decode_stream<R: Read, W: Write>(
    reader: R,
    writer: &mut W,
    opts: &CodecOptions,
) -> Result<DecodeStats, IoError> {
    let mut decoder = Decoder::new(reader, opts);
    let mut chunk = [0i64; DECODE_CHUNK];
    let mut values = 0u64;

    loop {
        let want = match opts.limit {
            Some(limit) => (limit as u64 - values).min(DECODE_CHUNK as u64) as usize,
            None => DECODE_CHUNK,
        };
        if want == 0 {
            break;
        }

        let (n, status) = decoder.decode(&mut chunk[..want])?;
        write_integers(writer, &chunk[..n])?;
        values += n as u64;

        if status == DecodeStatus::Exhausted {
            if let Some(limit) = opts.limit {
                log::warn!("expected {limit} value(s), stream held {values}");
            }
            if !decoder.at_boundary() {
                log::debug!("stream ends inside a zero run (padding or truncation)");
            }
            break;
        }
    }

    writer.flush()?;
    Ok(DecodeStats {
        input_bytes: decoder.bytes_read(),
        values,
    })
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

/// Encode the text integer list at `input_path` into `output_path`.
pub fn encode_file(
    input_path: &Path,
    output_path: &Path,
    opts: &CodecOptions,
) -> Result<EncodeStats, IoError> {
    let reader = BufReader::with_capacity(BUF_SIZE, File::open(input_path)?);
    let writer = BufWriter::with_capacity(BUF_SIZE, File::create(output_path)?);
    let (_, stats) = encode_stream(reader, writer, opts)?;
    Ok(stats)
}

/// Decode the coded file at `input_path` into a text integer list.
pub fn decode_file(
    input_path: &Path,
    output_path: &Path,
    opts: &CodecOptions,
) -> Result<DecodeStats, IoError> {
    let reader = BufReader::with_capacity(BUF_SIZE, File::open(input_path)?);
    let mut writer = BufWriter::with_capacity(BUF_SIZE, File::create(output_path)?);
    decode_stream(reader, &mut writer, opts)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parses_mixed_separators_and_comments() {
        let text = "1 2,3\n  -4\t5 # six 6\n\n# all comment\n7,";
        let values = read_integers(text.as_bytes()).unwrap();
        assert_eq!(values, [1, 2, 3, -4, 5, 7]);
    }

    #[test]
    fn parse_error_reports_line_and_token() {
        let err = read_integers("1 2\n3 x4\n".as_bytes()).unwrap_err();
        match err {
            IoError::Parse { line, token } => {
                assert_eq!(line, 2);
                assert_eq!(token, "x4");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn stream_roundtrip_plain() {
        let (bytes, stats) =
            encode_stream("0 1 -1 2 -2".as_bytes(), Vec::new(), &CodecOptions::plain()).unwrap();
        assert_eq!(stats.values, 5);
        assert_eq!(stats.payload_bits, 17);
        assert_eq!(stats.output_bytes, 3);
        assert_eq!(bytes.len(), 3);

        let mut text = Vec::new();
        let dstats = decode_stream(&bytes[..], &mut text, &CodecOptions::plain()).unwrap();
        assert_eq!(dstats.values, 5);
        assert_eq!(dstats.input_bytes, 3);
        assert_eq!(String::from_utf8(text).unwrap(), "0\n1\n-1\n2\n-2\n");
    }

    #[test]
    fn stream_roundtrip_delta() {
        let opts = CodecOptions::delta(10);
        let (bytes, _) = encode_stream("10 11 9".as_bytes(), Vec::new(), &opts).unwrap();
        assert_eq!(bytes, crate::delta::delta_encode(10, &[10, 11, 9]).unwrap());

        let mut text = Vec::new();
        decode_stream(&bytes[..], &mut text, &opts).unwrap();
        assert_eq!(read_integers(&text[..]).unwrap(), [10, 11, 9]);
    }

    #[test]
    fn limit_bounds_decoded_values() {
        let (bytes, _) =
            encode_stream("5 6 7 8".as_bytes(), Vec::new(), &CodecOptions::plain()).unwrap();
        let mut text = Vec::new();
        let stats =
            decode_stream(&bytes[..], &mut text, &CodecOptions::plain().with_limit(2)).unwrap();
        assert_eq!(stats.values, 2);
        assert_eq!(String::from_utf8(text).unwrap(), "5\n6\n");
    }

    #[test]
    fn out_of_range_input_is_an_encode_error() {
        let err = encode_stream("1 99999999999".as_bytes(), Vec::new(), &CodecOptions::plain())
            .unwrap_err();
        assert!(matches!(err, IoError::Encode(EncodeError::ValueOutOfRange { .. })));
    }

    #[test]
    fn encode_decode_file_roundtrip() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("values.txt");
        let coded = dir.path().join("values.eg");
        let output = dir.path().join("decoded.txt");

        let values: Vec<i64> = (0..5000).map(|i| 20_000 + (i % 17) - 8).collect();
        let mut text = Vec::new();
        write_integers(&mut text, &values).unwrap();
        std::fs::write(&input, &text).unwrap();

        let opts = CodecOptions::delta(20_000);
        let enc = encode_file(&input, &coded, &opts).unwrap();
        assert_eq!(enc.values, values.len() as u64);
        assert_eq!(std::fs::metadata(&coded).unwrap().len(), enc.output_bytes);

        let dec = decode_file(&coded, &output, &opts).unwrap();
        assert_eq!(dec.values, values.len() as u64);
        assert_eq!(dec.input_bytes, enc.output_bytes);

        let decoded = read_integers(BufReader::new(File::open(&output).unwrap())).unwrap();
        assert_eq!(decoded, values);
    }
}
