// Command-line front end for the LCW and Format40 decoders.
//
// Explicit subcommands with long-form options. Exit codes: 0 success,
// 1 usage error or failed self-test, 2 read or decode error, 3 output
// write error.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};

use crate::chain::{FrameChainResolver, FrameDescriptor, ResolverOptions};
use crate::delta::{self, delta_apply};
use crate::error::DecodeError;
use crate::io::write_output;
use crate::lcw::{self, AddressingMode, lcw_decompress};

const EXIT_USAGE: i32 = 1;
const EXIT_DECODE: i32 = 2;
const EXIT_WRITE: i32 = 3;

/// Largest accepted output or canvas size: a 65535x65535 canvas.
const MAX_SIZE: usize = 0xFFFF * 0xFFFF;

// ---------------------------------------------------------------------------
// Argument value parsers
// ---------------------------------------------------------------------------

/// Parse a size as a byte count (`K`/`M` suffixes allowed) or as `WxH`
/// canvas dimensions.
fn parse_size(s: &str) -> Result<usize, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty size string".into());
    }
    if let Some((w, h)) = s.split_once(['x', 'X']) {
        let w: usize = w.trim().parse().map_err(|e| format!("invalid width '{w}': {e}"))?;
        let h: usize = h.trim().parse().map_err(|e| format!("invalid height '{h}': {e}"))?;
        let size = w
            .checked_mul(h)
            .ok_or_else(|| format!("size overflow: '{s}'"))?;
        return check_size_limit(s, size);
    }
    let (num_part, multiplier) = match s.as_bytes().last() {
        Some(b'k' | b'K') => (&s[..s.len() - 1], 1024usize),
        Some(b'm' | b'M') => (&s[..s.len() - 1], 1024 * 1024),
        _ => (s, 1usize),
    };
    let num: usize = num_part
        .trim()
        .parse()
        .map_err(|e| format!("invalid size '{s}': {e}"))?;
    let size = num
        .checked_mul(multiplier)
        .ok_or_else(|| format!("size overflow: '{s}'"))?;
    check_size_limit(s, size)
}

fn check_size_limit(s: &str, size: usize) -> Result<usize, String> {
    if size > MAX_SIZE {
        return Err(format!("size '{s}' exceeds the {MAX_SIZE}-byte limit"));
    }
    Ok(size)
}

/// Parse a hex string; ASCII whitespace is ignored.
fn parse_hex(s: &str) -> Result<Vec<u8>, String> {
    let digits: Vec<u8> = s.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    if digits.len() % 2 != 0 {
        return Err(format!("odd number of hex digits in '{s}'"));
    }
    digits
        .chunks(2)
        .map(|pair| {
            let text = std::str::from_utf8(pair).map_err(|_| format!("invalid hex in '{s}'"))?;
            u8::from_str_radix(text, 16).map_err(|_| format!("invalid hex byte '{text}'"))
        })
        .collect()
}

fn to_hex(data: &[u8]) -> String {
    data.iter().map(|b| format!("{b:02x}")).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Base,
    Delta,
}

/// One `kind:PATH` frame argument of the `chain` command.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FrameArg {
    kind: FrameKind,
    path: PathBuf,
}

fn parse_frame_arg(s: &str) -> Result<FrameArg, String> {
    let (kind, path) = s
        .split_once(':')
        .ok_or_else(|| format!("expected base:PATH or delta:PATH, got '{s}'"))?;
    let kind = match kind {
        "base" => FrameKind::Base,
        "delta" => FrameKind::Delta,
        other => return Err(format!("unknown frame kind '{other}' (use base or delta)")),
    };
    if path.is_empty() {
        return Err(format!("missing path in '{s}'"));
    }
    Ok(FrameArg {
        kind,
        path: PathBuf::from(path),
    })
}

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// LCW (Format80) and XOR-delta (Format40) decoder.
#[derive(Parser, Debug)]
#[command(
    name = "wwcodec",
    version,
    about = "LCW and XOR-delta decoder for Westwood-era assets",
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
    /// Decompress LCW/Format80 data.
    Decompress(DecompressArgs),
    /// Apply a Format40 XOR delta to a buffer.
    Format40(Format40Args),
    /// List the commands of an LCW or Format40 stream.
    Inspect(InspectArgs),
    /// Decode a sequence of base and delta frames.
    Chain(ChainArgs),
    /// Run built-in test vectors.
    Test,
    /// Print build/configuration details.
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Codec {
    Lcw,
    Delta,
}

#[derive(Args, Debug)]
struct DecompressArgs {
    /// Declared output size in bytes (K/M suffix or WxH).
    #[arg(long, short = 's', value_parser = parse_size)]
    size: usize,

    /// Interpret medium/long copy positions as relative distances.
    #[arg(long, short = 'r')]
    relative: bool,

    /// INPUT is a hex string instead of a file.
    #[arg(long)]
    hex: bool,

    /// Input file, `-` for stdin, or hex string with --hex.
    input: String,

    /// Output file (default: hex to stdout).
    #[arg(long, short = 'o', value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct Format40Args {
    /// DELTA and BUFFER are hex strings instead of files.
    #[arg(long)]
    hex: bool,

    /// Delta stream.
    delta: String,

    /// Buffer the delta is applied to.
    buffer: String,

    /// Output file (default: hex to stdout).
    #[arg(long, short = 'o', value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Stream format.
    #[arg(long, value_enum, default_value_t = Codec::Lcw)]
    codec: Codec,

    /// Relative addressing (LCW only).
    #[arg(long, short = 'r')]
    relative: bool,

    /// INPUT is a hex string instead of a file.
    #[arg(long)]
    hex: bool,

    /// Input file, `-` for stdin, or hex string with --hex.
    input: String,
}

#[derive(Args, Debug)]
struct ChainArgs {
    /// Canvas size in bytes (K/M suffix or WxH).
    #[arg(long, short = 's', value_parser = parse_size)]
    size: usize,

    /// Interpret medium/long copy positions as relative distances.
    #[arg(long, short = 'r')]
    relative: bool,

    /// Capacity of the decompressed delta buffer.
    #[arg(long = "delta-capacity", value_parser = parse_size)]
    delta_capacity: Option<usize>,

    /// Delta frame decoded after the visible frames as the loop frame.
    #[arg(long = "loop-frame", value_hint = ValueHint::FilePath)]
    loop_frame: Option<PathBuf>,

    /// Frames in file order, each `base:PATH` or `delta:PATH`.
    #[arg(value_parser = parse_frame_arg, required = true)]
    frames: Vec<FrameArg>,

    /// Directory for frame_NNNN.bin files (default: hex to stdout).
    #[arg(long = "output-dir", short = 'd', value_hint = ValueHint::DirPath)]
    output_dir: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Resolved command + options (flattened from Cli)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Decompress,
    Format40,
    Inspect,
    Chain,
    Test,
    Config,
}

struct Options {
    command: Command,
    force: bool,
    quiet: bool,
    verbose: u8,
    json_output: bool,
    hex: bool,
    codec: Codec,
    size: usize,
    mode: AddressingMode,
    delta_capacity: Option<usize>,
    inputs: Vec<String>,
    frames: Vec<FrameArg>,
    loop_frame: Option<PathBuf>,
    output: Option<PathBuf>,
}

impl Options {
    fn new(command: Command, cli: &Cli) -> Self {
        Self {
            command,
            force: cli.force,
            quiet: cli.quiet,
            verbose: cli.verbose.min(2),
            json_output: cli.json_output,
            hex: false,
            codec: Codec::Lcw,
            size: 0,
            mode: AddressingMode::Absolute,
            delta_capacity: None,
            inputs: Vec::new(),
            frames: Vec::new(),
            loop_frame: None,
            output: None,
        }
    }
}

fn addressing(relative: bool) -> AddressingMode {
    if relative {
        AddressingMode::Relative
    } else {
        AddressingMode::Absolute
    }
}

fn resolve_options(cli: Cli) -> Options {
    match &cli.command {
        Cmd::Decompress(args) => Options {
            hex: args.hex,
            size: args.size,
            mode: addressing(args.relative),
            inputs: vec![args.input.clone()],
            output: args.output.clone(),
            ..Options::new(Command::Decompress, &cli)
        },
        Cmd::Format40(args) => Options {
            hex: args.hex,
            inputs: vec![args.delta.clone(), args.buffer.clone()],
            output: args.output.clone(),
            ..Options::new(Command::Format40, &cli)
        },
        Cmd::Inspect(args) => Options {
            hex: args.hex,
            codec: args.codec,
            mode: addressing(args.relative),
            inputs: vec![args.input.clone()],
            ..Options::new(Command::Inspect, &cli)
        },
        Cmd::Chain(args) => Options {
            size: args.size,
            mode: addressing(args.relative),
            delta_capacity: args.delta_capacity,
            frames: args.frames.clone(),
            loop_frame: args.loop_frame.clone(),
            output: args.output_dir.clone(),
            ..Options::new(Command::Chain, &cli)
        },
        Cmd::Test => Options::new(Command::Test, &cli),
        Cmd::Config => Options::new(Command::Config, &cli),
    }
}

#[cfg(any(test, feature = "fuzzing"))]
pub fn fuzz_try_parse_args(args: &[String]) {
    let argv: Vec<String> = std::iter::once("wwcodec".to_string())
        .chain(args.iter().cloned())
        .collect();
    if let Ok(cli) = Cli::try_parse_from(argv) {
        let _ = resolve_options(cli);
    }
}

// ---------------------------------------------------------------------------
// Input / output helpers
// ---------------------------------------------------------------------------

/// Load an input argument. Returns the exit code on failure.
fn load_input(arg: &str, hex: bool) -> Result<Vec<u8>, i32> {
    if hex {
        return parse_hex(arg).map_err(|e| {
            eprintln!("wwcodec: error: {e}");
            EXIT_USAGE
        });
    }
    let loaded = if arg == "-" {
        let mut data = Vec::new();
        io::stdin().lock().read_to_end(&mut data).map(|_| data)
    } else {
        std::fs::read(arg)
    };
    loaded.map_err(|e| {
        eprintln!("wwcodec: error: {arg}: {e}");
        EXIT_DECODE
    })
}

/// Write `data` to `path`, or print it as hex when no path is given.
fn emit(opts: &Options, path: Option<&Path>, data: &[u8]) -> Result<Option<[u8; 32]>, i32> {
    let Some(path) = path else {
        println!("{}", to_hex(data));
        return Ok(None);
    };
    if path.exists() && !opts.force {
        eprintln!(
            "wwcodec: output file exists, use -f to overwrite: {}",
            path.display()
        );
        return Err(EXIT_USAGE);
    }
    write_output(path, data).map_err(|e| {
        eprintln!("wwcodec: error: {}: {e}", path.display());
        EXIT_WRITE
    })
}

fn report_decode_error(e: &DecodeError) -> i32 {
    eprintln!("wwcodec: error: {e}");
    EXIT_DECODE
}

fn report_stats(opts: &Options, json: serde_json::Value) {
    if opts.verbose > 0 && !opts.quiet {
        eprintln!("wwcodec: {json}");
    }
    if opts.json_output {
        eprintln!("{json:#}");
    }
}

fn digest_hex(digest: Option<[u8; 32]>) -> Option<String> {
    digest.map(|d| to_hex(&d))
}

// ---------------------------------------------------------------------------
// Config command
// ---------------------------------------------------------------------------

fn cmd_config() -> i32 {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!("wwcodec version {version} (Rust)");

    let file_io = cfg!(feature = "file-io") as u8;
    let parallel = cfg!(feature = "parallel") as u8;
    let ptr_size = std::mem::size_of::<*const ()>();

    eprintln!("FILE_IO={file_io}");
    eprintln!("PARALLEL={parallel}");
    eprintln!("LCW_END_MARKER={:#04x}", lcw::END_MARKER);
    eprintln!("LCW_RELATIVE_MARKER={:#04x}", lcw::RELATIVE_MODE_MARKER);
    eprintln!("DEFAULT_MODE={:?}", AddressingMode::default());
    eprintln!("DEFAULT_DELTA_CAPACITY=2*canvas+3");
    eprintln!("sizeof(usize)={ptr_size}");

    0
}

// ---------------------------------------------------------------------------
// Decompress / format40 commands
// ---------------------------------------------------------------------------

fn cmd_decompress(opts: &Options) -> i32 {
    let input = match load_input(&opts.inputs[0], opts.hex) {
        Ok(data) => data,
        Err(code) => return code,
    };

    let output = match lcw_decompress(&input, opts.size, opts.mode) {
        Ok(output) => output,
        Err(e) => return report_decode_error(&e),
    };

    let digest = match emit(opts, opts.output.as_deref(), &output) {
        Ok(digest) => digest,
        Err(code) => return code,
    };

    report_stats(
        opts,
        serde_json::json!({
            "command": "decompress",
            "input_size": input.len(),
            "output_size": output.len(),
            "capacity": opts.size,
            "mode": format!("{:?}", opts.mode),
            "sha256": digest_hex(digest),
        }),
    );
    0
}

fn cmd_format40(opts: &Options) -> i32 {
    let delta = match load_input(&opts.inputs[0], opts.hex) {
        Ok(data) => data,
        Err(code) => return code,
    };
    let mut buffer = match load_input(&opts.inputs[1], opts.hex) {
        Ok(data) => data,
        Err(code) => return code,
    };

    if let Err(e) = delta_apply(&delta, &mut buffer) {
        return report_decode_error(&e);
    }

    let digest = match emit(opts, opts.output.as_deref(), &buffer) {
        Ok(digest) => digest,
        Err(code) => return code,
    };

    report_stats(
        opts,
        serde_json::json!({
            "command": "format40",
            "delta_size": delta.len(),
            "buffer_size": buffer.len(),
            "sha256": digest_hex(digest),
        }),
    );
    0
}

// ---------------------------------------------------------------------------
// Inspect command
// ---------------------------------------------------------------------------

fn describe_lcw(command: &lcw::Command<'_>) -> String {
    match *command {
        lcw::Command::ShortCopy { count, distance } => {
            format!("short-copy  count={count} distance={distance}")
        }
        lcw::Command::MediumCopy { count, position } => {
            format!("medium-copy count={count} position={position}")
        }
        lcw::Command::LongCopy { count, position } => {
            format!("long-copy   count={count} position={position}")
        }
        lcw::Command::Transfer { bytes } => {
            format!("transfer    count={} data={}", bytes.len(), to_hex(bytes))
        }
        lcw::Command::Fill { count, value } => format!("fill        count={count} value={value:#04x}"),
        lcw::Command::End => "end".to_string(),
    }
}

fn describe_delta(command: &delta::Command<'_>) -> String {
    match *command {
        delta::Command::Skip { count } => format!("skip          count={count}"),
        delta::Command::LongSkip { count } => format!("long-skip     count={count}"),
        delta::Command::Xor { bytes } => {
            format!("xor           count={} data={}", bytes.len(), to_hex(bytes))
        }
        delta::Command::LongXor { bytes } => {
            format!("long-xor      count={} data={}", bytes.len(), to_hex(bytes))
        }
        delta::Command::FillXor { count, value } => {
            format!("fill-xor      count={count} value={value:#04x}")
        }
        delta::Command::LongFillXor { count, value } => {
            format!("long-fill-xor count={count} value={value:#04x}")
        }
        delta::Command::End => "end".to_string(),
    }
}

fn cmd_inspect(opts: &Options) -> i32 {
    let input = match load_input(&opts.inputs[0], opts.hex) {
        Ok(data) => data,
        Err(code) => return code,
    };

    let out = io::stdout();
    let mut out = out.lock();
    let mut commands = 0usize;
    let mut output_bytes = 0usize;

    let result = match opts.codec {
        Codec::Lcw => {
            let mut iter = lcw::Commands::new(&input, opts.mode);
            let _ = writeln!(out, "mode: {:?}", iter.mode());
            iter.try_for_each(|item| {
                let (offset, command) = item?;
                commands += 1;
                output_bytes += command.count();
                let _ = writeln!(out, "{offset:08x}  {}", describe_lcw(&command));
                Ok::<(), DecodeError>(())
            })
        }
        Codec::Delta => delta::Commands::new(&input).try_for_each(|item| {
            let (offset, command) = item?;
            commands += 1;
            output_bytes += command.count();
            let _ = writeln!(out, "{offset:08x}  {}", describe_delta(&command));
            Ok::<(), DecodeError>(())
        }),
    };

    if let Err(e) = result {
        let _ = out.flush();
        return report_decode_error(&e);
    }

    report_stats(
        opts,
        serde_json::json!({
            "command": "inspect",
            "codec": format!("{:?}", opts.codec),
            "input_size": input.len(),
            "commands": commands,
            "covered_bytes": output_bytes,
        }),
    );
    0
}

// ---------------------------------------------------------------------------
// Chain command
// ---------------------------------------------------------------------------

fn frame_output_path(dir: Option<&Path>, name: &str) -> Option<PathBuf> {
    dir.map(|d| d.join(name))
}

fn cmd_chain(opts: &Options) -> i32 {
    let mut sources = Vec::with_capacity(opts.frames.len());
    for frame in &opts.frames {
        match std::fs::read(&frame.path) {
            Ok(data) => sources.push(data),
            Err(e) => {
                eprintln!("wwcodec: error: {}: {e}", frame.path.display());
                return EXIT_DECODE;
            }
        }
    }
    let loop_source = match &opts.loop_frame {
        Some(path) => match std::fs::read(path) {
            Ok(data) => Some(data),
            Err(e) => {
                eprintln!("wwcodec: error: {}: {e}", path.display());
                return EXIT_DECODE;
            }
        },
        None => None,
    };

    let dir = opts.output.as_deref();
    if let Some(dir) = dir
        && let Err(e) = std::fs::create_dir_all(dir)
    {
        eprintln!("wwcodec: error: {}: {e}", dir.display());
        return EXIT_WRITE;
    }

    let options = ResolverOptions {
        mode: opts.mode,
        delta_capacity: opts.delta_capacity,
    };
    let mut resolver = FrameChainResolver::with_options(opts.size, options);

    for (index, (frame, data)) in opts.frames.iter().zip(&sources).enumerate() {
        let descriptor = match frame.kind {
            FrameKind::Base => FrameDescriptor::base(data),
            FrameKind::Delta => FrameDescriptor::delta(data),
        };
        let canvas = match resolver.decode_next_frame(descriptor) {
            Ok(canvas) => canvas,
            Err(e) => {
                eprintln!("wwcodec: frame {index}: {e}");
                return EXIT_DECODE;
            }
        };
        let path = frame_output_path(dir, &format!("frame_{index:04}.bin"));
        if let Err(code) = emit(opts, path.as_deref(), canvas) {
            return code;
        }
    }

    if let Some(data) = &loop_source {
        if let Err(e) = resolver.decode_next_frame(FrameDescriptor::delta(data).as_loop()) {
            eprintln!("wwcodec: loop frame: {e}");
            return EXIT_DECODE;
        }
        if let Some(canvas) = resolver.loop_frame() {
            let path = frame_output_path(dir, "loop.bin");
            if let Err(code) = emit(opts, path.as_deref(), canvas) {
                return code;
            }
        }
    }

    let finished = resolver.finish();
    report_stats(
        opts,
        serde_json::json!({
            "command": "chain",
            "canvas_size": opts.size,
            "frames": finished.frames_decoded,
            "loop_frame": finished.loop_frame.is_some(),
        }),
    );
    0
}

// ---------------------------------------------------------------------------
// Test command (built-in vectors)
// ---------------------------------------------------------------------------

struct TestVector {
    name: &'static str,
    input_hex: &'static str,
    output_size: usize,
    expected_hex: &'static str,
}

const LCW_VECTORS: &[TestVector] = &[
    TestVector {
        name: "empty (end marker)",
        input_hex: "80",
        output_size: 0,
        expected_hex: "",
    },
    TestVector {
        name: "literal 3 bytes",
        input_hex: "83414243 80",
        output_size: 3,
        expected_hex: "414243",
    },
    TestVector {
        name: "literal then short copy",
        input_hex: "83414243 0003 80",
        output_size: 6,
        expected_hex: "414243414243",
    },
    TestVector {
        name: "fill 5 bytes with 0x55",
        input_hex: "fe0500 55 80",
        output_size: 5,
        expected_hex: "5555555555",
    },
    TestVector {
        name: "literal then fill",
        input_hex: "824142 fe0300 43 80",
        output_size: 5,
        expected_hex: "4142434343",
    },
    TestVector {
        name: "long copy absolute",
        input_hex: "854142434445 ff0500 0000 80",
        output_size: 10,
        expected_hex: "41424344454142434445",
    },
    TestVector {
        name: "overlapping short copy",
        input_hex: "8141 2001 80",
        output_size: 6,
        expected_hex: "414141414141",
    },
];

// Format40 vectors are applied to the buffer "ABCD".
const FORMAT40_VECTORS: &[TestVector] = &[
    TestVector {
        name: "empty delta",
        input_hex: "800000",
        output_size: 4,
        expected_hex: "41424344",
    },
    TestVector {
        name: "xor 2 bytes",
        input_hex: "02 0102 800000",
        output_size: 4,
        expected_hex: "40404344",
    },
    TestVector {
        name: "xor fill",
        input_hex: "00 03 ff 800000",
        output_size: 4,
        expected_hex: "bebdbc44",
    },
    TestVector {
        name: "skip 2 then xor",
        input_hex: "82 01 01 800000",
        output_size: 4,
        expected_hex: "41424244",
    },
    TestVector {
        name: "long skip then xor",
        input_hex: "80 0200 01ff 800000",
        output_size: 4,
        expected_hex: "4142bc44",
    },
    TestVector {
        name: "long xor",
        input_hex: "80 0280 ffff 800000",
        output_size: 4,
        expected_hex: "bebd4344",
    },
];

const FORMAT40_BUFFER: &[u8] = b"ABCD";

fn run_vector(vector: &TestVector, format40: bool) -> Result<Vec<u8>, String> {
    let input = parse_hex(vector.input_hex)?;
    if format40 {
        let mut buffer = FORMAT40_BUFFER.to_vec();
        buffer.truncate(vector.output_size);
        delta_apply(&input, &mut buffer).map_err(|e| e.to_string())?;
        Ok(buffer)
    } else {
        lcw_decompress(&input, vector.output_size, AddressingMode::Absolute)
            .map_err(|e| e.to_string())
    }
}

/// Run every built-in vector, returning `(passed, failed)`.
fn run_builtin_vectors(verbose: bool) -> (usize, usize) {
    let mut passed = 0;
    let mut failed = 0;

    for (title, vectors, format40) in [
        ("LCW decompression tests:", LCW_VECTORS, false),
        ("Format40 XOR delta tests:", FORMAT40_VECTORS, true),
    ] {
        if verbose {
            eprintln!("{title}");
        }
        for vector in vectors {
            let expected = parse_hex(vector.expected_hex).unwrap_or_default();
            match run_vector(vector, format40) {
                Ok(got) if got == expected => {
                    if verbose {
                        eprintln!("  PASS: {}", vector.name);
                    }
                    passed += 1;
                }
                Ok(got) => {
                    eprintln!("  FAIL: {}", vector.name);
                    eprintln!("    expected: {}", vector.expected_hex);
                    eprintln!("    got:      {}", to_hex(&got));
                    failed += 1;
                }
                Err(e) => {
                    eprintln!("  FAIL: {}", vector.name);
                    eprintln!("    error: {e}");
                    failed += 1;
                }
            }
        }
    }

    (passed, failed)
}

fn cmd_test(opts: &Options) -> i32 {
    let verbose = opts.verbose > 0 && !opts.quiet;
    let (passed, failed) = run_builtin_vectors(verbose);
    if verbose || failed > 0 {
        eprintln!("\nTotal: {passed} passed, {failed} failed");
    }
    if opts.json_output {
        eprintln!(
            "{:#}",
            serde_json::json!({ "command": "test", "passed": passed, "failed": failed })
        );
    }
    if failed > 0 { EXIT_USAGE } else { 0 }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            process::exit(if e.use_stderr() { EXIT_USAGE } else { 0 });
        }
    };
    let opts = resolve_options(cli);

    let default_filter = match opts.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let exit_code = match opts.command {
        Command::Decompress => cmd_decompress(&opts),
        Command::Format40 => cmd_format40(&opts),
        Command::Inspect => cmd_inspect(&opts),
        Command::Chain => cmd_chain(&opts),
        Command::Test => cmd_test(&opts),
        Command::Config => cmd_config(),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
