// Command-line front end for deltagolomb.
//
// `encode` turns a text list of integers into an Exp-Golomb byte stream,
// `decode` turns it back, `codeword` shows individual codewords, and
// `config` prints the build constants.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::config::{
    BUF_SIZE, CodecOptions, DECODE_CHUNK, FAST_PATH_LIMIT, MAX_MAGNITUDE, MAX_PREFIX_ZEROS,
    WORD_BITS,
};
use crate::golomb::codeword;
use crate::io::{decode_stream, encode_stream};

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Order-zero Exp-Golomb integer codec with optional delta coding.
#[derive(Parser, Debug)]
#[command(
    name = "deltagolomb",
    version,
    about = "Exp-Golomb integer encoder/decoder",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Force overwrite existing output files.
    #[arg(short = 'f', long, global = true)]
    force: bool,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Output stats as JSON to stderr.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Encode a text list of integers.
    Encode(EncodeArgs),
    /// Decode a coded stream into a text list of integers.
    Decode(DecodeArgs),
    /// Print the codeword for each value.
    Codeword(CodewordArgs),
    /// Print build/configuration details.
    Config,
}

#[derive(Args, Debug)]
struct EncodeArgs {
    /// Delta-code against this start value.
    #[arg(long, short = 'd', value_name = "START", allow_negative_numbers = true)]
    delta: Option<i64>,

    /// Input text file (default: stdin).
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "input_pos")]
    input: Option<PathBuf>,

    /// Output file (default: stdout).
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "output_pos")]
    output: Option<PathBuf>,

    /// Write output to stdout.
    #[arg(short = 'c', long)]
    stdout: bool,

    /// Input file (positional form).
    #[arg(value_hint = ValueHint::FilePath)]
    input_pos: Option<PathBuf>,

    /// Output file (positional form).
    #[arg(value_hint = ValueHint::FilePath)]
    output_pos: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Undo delta coding from this base value.
    #[arg(long, short = 'd', value_name = "BASE", allow_negative_numbers = true)]
    delta: Option<i64>,

    /// Stop after this many values.
    #[arg(long, short = 'n')]
    count: Option<usize>,

    /// Input coded file (default: stdin).
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "input_pos")]
    input: Option<PathBuf>,

    /// Output text file (default: stdout).
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "output_pos")]
    output: Option<PathBuf>,

    /// Write output to stdout.
    #[arg(short = 'c', long)]
    stdout: bool,

    /// Decode and count only (do not write output).
    #[arg(long = "check-only")]
    no_output: bool,

    /// Input file (positional form).
    #[arg(value_hint = ValueHint::FilePath)]
    input_pos: Option<PathBuf>,

    /// Output file (positional form).
    #[arg(value_hint = ValueHint::FilePath)]
    output_pos: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CodewordArgs {
    /// Values to show.
    #[arg(required = true, allow_negative_numbers = true)]
    values: Vec<i64>,
}

// ---------------------------------------------------------------------------
// Resolved command + options (flattened from Cli)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Encode,
    Decode,
    Codeword,
    Config,
}

#[derive(Debug)]
struct Options {
    command: Command,
    use_stdout: bool,
    force: bool,
    quiet: bool,
    verbose: u8,
    json_output: bool,
    no_output: bool,
    codec: CodecOptions,
    input_file: Option<PathBuf>,
    output_file: Option<PathBuf>,
    values: Vec<i64>,
}

impl Options {
    fn base(command: Command, cli: &Cli) -> Self {
        Self {
            command,
            use_stdout: false,
            force: cli.force,
            quiet: cli.quiet,
            verbose: cli.verbose.min(2),
            json_output: cli.json_output,
            no_output: false,
            codec: CodecOptions::default(),
            input_file: None,
            output_file: None,
            values: Vec::new(),
        }
    }
}

fn resolve_options(cli: Cli) -> Options {
    match &cli.command {
        Cmd::Encode(args) => Options {
            use_stdout: args.stdout,
            codec: CodecOptions {
                delta: args.delta,
                limit: None,
            },
            input_file: args.input.clone().or_else(|| args.input_pos.clone()),
            output_file: args.output.clone().or_else(|| args.output_pos.clone()),
            ..Options::base(Command::Encode, &cli)
        },
        Cmd::Decode(args) => Options {
            use_stdout: args.stdout,
            no_output: args.no_output,
            codec: CodecOptions {
                delta: args.delta,
                limit: args.count,
            },
            input_file: args.input.clone().or_else(|| args.input_pos.clone()),
            output_file: args.output.clone().or_else(|| args.output_pos.clone()),
            ..Options::base(Command::Decode, &cli)
        },
        Cmd::Codeword(args) => Options {
            values: args.values.clone(),
            ..Options::base(Command::Codeword, &cli)
        },
        Cmd::Config => Options::base(Command::Config, &cli),
    }
}

#[cfg(any(test, feature = "fuzzing"))]
pub fn fuzz_try_parse_args(args: &[String]) {
    let argv: Vec<String> = std::iter::once("deltagolomb".to_string())
        .chain(args.iter().cloned())
        .collect();
    if let Ok(cli) = Cli::try_parse_from(argv) {
        let _ = resolve_options(cli);
    }
}

// ---------------------------------------------------------------------------
// Input / output plumbing
// ---------------------------------------------------------------------------

fn open_input(path: Option<&Path>) -> io::Result<Box<dyn BufRead>> {
    Ok(match path {
        Some(path) => Box::new(BufReader::with_capacity(BUF_SIZE, File::open(path)?)),
        None => Box::new(BufReader::with_capacity(BUF_SIZE, io::stdin())),
    })
}

fn open_output(opts: &Options) -> Result<Box<dyn Write>, String> {
    if opts.no_output {
        return Ok(Box::new(io::sink()));
    }
    match (opts.use_stdout, &opts.output_file) {
        (true, _) | (_, None) => Ok(Box::new(BufWriter::with_capacity(
            BUF_SIZE,
            io::stdout().lock(),
        ))),
        (false, Some(path)) => {
            if path.exists() && !opts.force {
                return Err(format!(
                    "output file exists, use -f to overwrite: {}",
                    path.display()
                ));
            }
            File::create(path)
                .map(|f| Box::new(BufWriter::with_capacity(BUF_SIZE, f)) as Box<dyn Write>)
                .map_err(|e| format!("output file: {}: {e}", path.display()))
        }
    }
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => eprintln!("{s}"),
        Err(e) => log::error!("json output: {e}"),
    }
}

// ---------------------------------------------------------------------------
// Config command
// ---------------------------------------------------------------------------

fn cmd_config() -> i32 {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!("deltagolomb version {version} (Rust)");

    eprintln!("WORD_BITS={WORD_BITS}");
    eprintln!("MAX_MAGNITUDE={MAX_MAGNITUDE}");
    eprintln!("MAX_PREFIX_ZEROS={MAX_PREFIX_ZEROS}");
    eprintln!("FAST_PATH_LIMIT={FAST_PATH_LIMIT}");
    eprintln!("DECODE_CHUNK={DECODE_CHUNK}");
    eprintln!("BUF_SIZE={BUF_SIZE}");

    0
}

// ---------------------------------------------------------------------------
// Encode command
// ---------------------------------------------------------------------------

fn cmd_encode(opts: &Options) -> i32 {
    let reader = match open_input(opts.input_file.as_deref()) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("deltagolomb: input file: {e}");
            return 1;
        }
    };
    let writer = match open_output(opts) {
        Ok(w) => w,
        Err(msg) => {
            eprintln!("deltagolomb: {msg}");
            return 1;
        }
    };

    let stats = match encode_stream(reader, writer, &opts.codec) {
        Ok((_, stats)) => stats,
        Err(e) => {
            eprintln!("deltagolomb: encode error: {e}");
            return 1;
        }
    };

    log::info!(
        "encoder: values: {}, payload bits: {}, output bytes: {}",
        stats.values,
        stats.payload_bits,
        stats.output_bytes
    );

    if opts.json_output {
        print_json(&serde_json::json!({
            "command": "encode",
            "delta": opts.codec.delta,
            "values": stats.values,
            "payload_bits": stats.payload_bits,
            "output_bytes": stats.output_bytes,
        }));
    }

    0
}

// ---------------------------------------------------------------------------
// Decode command
// ---------------------------------------------------------------------------

fn cmd_decode(opts: &Options) -> i32 {
    let reader = match open_input(opts.input_file.as_deref()) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("deltagolomb: input file: {e}");
            return 1;
        }
    };
    let mut writer = match open_output(opts) {
        Ok(w) => w,
        Err(msg) => {
            eprintln!("deltagolomb: {msg}");
            return 1;
        }
    };

    let stats = match decode_stream(reader, &mut writer, &opts.codec) {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("deltagolomb: decode error: {e}");
            return 1;
        }
    };

    log::info!(
        "decoder: input bytes: {}, values: {}",
        stats.input_bytes,
        stats.values
    );
    if opts.no_output && !opts.quiet {
        eprintln!("deltagolomb: values: {}", stats.values);
    }

    if opts.json_output {
        print_json(&serde_json::json!({
            "command": "decode",
            "delta": opts.codec.delta,
            "input_bytes": stats.input_bytes,
            "values": stats.values,
        }));
    }

    0
}

// ---------------------------------------------------------------------------
// Codeword command
// ---------------------------------------------------------------------------

fn cmd_codeword(opts: &Options) -> i32 {
    let mut rows = Vec::with_capacity(opts.values.len());
    for &value in &opts.values {
        let Some(cw) = codeword::codeword(value) else {
            eprintln!("deltagolomb: value {value} out of range (max magnitude {MAX_MAGNITUDE})");
            return 1;
        };
        let bits = cw.to_bit_string();
        if !opts.quiet {
            println!("{value}\t{}\t{bits}", cw.len());
        }
        rows.push(serde_json::json!({
            "value": value,
            "bits": bits,
            "len": cw.len(),
        }));
    }

    if opts.json_output {
        print_json(&serde_json::Value::Array(rows));
    }

    0
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn log_filter(opts: &Options) -> &'static str {
    if opts.quiet {
        return "error";
    }
    match opts.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    let cli = Cli::parse();
    let mut opts = resolve_options(cli);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_filter(&opts)))
        .format_timestamp(None)
        .format_target(false)
        .init();

    // -c wins over an output filename.
    if opts.use_stdout {
        if let Some(path) = opts.output_file.take() {
            log::warn!("-c option overrides output filename: {}", path.display());
        }
    }

    let exit_code = match opts.command {
        Command::Encode => cmd_encode(&opts),
        Command::Decode => cmd_decode(&opts),
        Command::Codeword => cmd_codeword(&opts),
        Command::Config => cmd_config(),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
