// Command-line front end for fossil-delta.
//
// Explicit subcommands with long-form options. Errors are reported on stderr
// as `fossil-delta: ...` and turn into exit status 1.

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::engine::{self, DecodeOptions, EncodeOptions};
use crate::format::command::{Commands, DeltaStats};
use crate::hash::config::{DEFAULT_CHAIN_LIMIT, NHASH};
use crate::io::{decode_file, encode_file};

const BUF_SIZE: usize = 64 * 1024;

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Fossil delta encoder/decoder.
#[derive(Parser, Debug)]
#[command(
    name = "fossil-delta",
    version,
    about = "Fossil delta encoder/decoder",
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
    /// Create a delta that turns the source into the target.
    Encode(EncodeArgs),
    /// Apply a delta to the source.
    Decode(DecodeArgs),
    /// Print the target size declared by a delta.
    Size(PrintArgs),
    /// Print every command of a delta.
    Print(PrintArgs),
    /// Print build/configuration details.
    Config,
}

#[derive(Args, Debug)]
struct EncodeArgs {
    /// Source file to copy from.
    #[arg(long, short = 's', value_hint = ValueHint::FilePath)]
    source: PathBuf,

    /// Candidate source blocks examined per target position.
    #[arg(long = "chain-limit", default_value_t = DEFAULT_CHAIN_LIMIT)]
    chain_limit: usize,

    /// Write output to stdout.
    #[arg(short = 'c', long)]
    stdout: bool,

    /// Target file.
    #[arg(value_hint = ValueHint::FilePath)]
    target: PathBuf,

    /// Delta output file (default: stdout).
    #[arg(value_hint = ValueHint::FilePath)]
    delta: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Source file to copy from.
    #[arg(long, short = 's', value_hint = ValueHint::FilePath)]
    source: PathBuf,

    /// Skip checksum verification (the declared size is still enforced).
    #[arg(long = "no-checksum")]
    no_checksum: bool,

    /// Write output to stdout.
    #[arg(short = 'c', long)]
    stdout: bool,

    /// Delta file.
    #[arg(value_hint = ValueHint::FilePath)]
    delta: PathBuf,

    /// Output file (default: stdout).
    #[arg(value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PrintArgs {
    /// Delta file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,
}

// ---------------------------------------------------------------------------
// Resolved command + options (flattened from Cli)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Encode,
    Decode,
    Size,
    Print,
    Config,
}

#[derive(Debug)]
struct Options {
    command: Command,
    use_stdout: bool,
    force: bool,
    quiet: bool,
    verbose: u8,
    chain_limit: usize,
    no_checksum: bool,
    source_file: Option<PathBuf>,
    input_file: Option<PathBuf>,
    output_file: Option<PathBuf>,
    json_output: bool,
}

impl Options {
    fn base(command: Command, cli: &Cli) -> Self {
        Self {
            command,
            use_stdout: false,
            force: cli.force,
            quiet: cli.quiet,
            verbose: cli.verbose.min(2),
            chain_limit: DEFAULT_CHAIN_LIMIT,
            no_checksum: false,
            source_file: None,
            input_file: None,
            output_file: None,
            json_output: cli.json_output,
        }
    }
}

fn resolve_options(cli: Cli) -> Options {
    match &cli.command {
        Cmd::Encode(args) => Options {
            use_stdout: args.stdout,
            chain_limit: args.chain_limit,
            source_file: Some(args.source.clone()),
            input_file: Some(args.target.clone()),
            output_file: args.delta.clone(),
            ..Options::base(Command::Encode, &cli)
        },
        Cmd::Decode(args) => Options {
            use_stdout: args.stdout,
            no_checksum: args.no_checksum,
            source_file: Some(args.source.clone()),
            input_file: Some(args.delta.clone()),
            output_file: args.output.clone(),
            ..Options::base(Command::Decode, &cli)
        },
        Cmd::Size(args) => Options {
            input_file: Some(args.input.clone()),
            ..Options::base(Command::Size, &cli)
        },
        Cmd::Print(args) => Options {
            input_file: Some(args.input.clone()),
            ..Options::base(Command::Print, &cli)
        },
        Cmd::Config => Options::base(Command::Config, &cli),
    }
}

#[cfg(any(test, feature = "fuzzing"))]
pub fn fuzz_try_parse_args(args: &[String]) {
    let argv: Vec<String> = std::iter::once("fossil-delta".to_string())
        .chain(args.iter().cloned())
        .collect();
    if let Ok(cli) = Cli::try_parse_from(argv) {
        let _ = resolve_options(cli);
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn read_input(what: &str, path: Option<&Path>) -> Option<Vec<u8>> {
    let Some(path) = path else {
        eprintln!("fossil-delta: missing {what} file");
        return None;
    };
    match std::fs::read(path) {
        Ok(data) => Some(data),
        Err(e) => {
            eprintln!("fossil-delta: {what} file: {}: {e}", path.display());
            None
        }
    }
}

/// Refuse to clobber an existing file unless `--force` was given.
fn check_overwrite(opts: &Options, path: &Path) -> bool {
    if path.exists() && !opts.force {
        eprintln!(
            "fossil-delta: output file exists, use -f to overwrite: {}",
            path.display()
        );
        return false;
    }
    true
}

fn write_stdout(data: &[u8]) -> io::Result<()> {
    let mut out = BufWriter::with_capacity(BUF_SIZE, io::stdout().lock());
    out.write_all(data)?;
    out.flush()
}

fn hex(digest: &[u8; 32]) -> String {
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

fn opt_hex(digest: Option<&[u8; 32]>) -> serde_json::Value {
    digest.map_or(serde_json::Value::Null, |d| hex(d).into())
}

// ---------------------------------------------------------------------------
// Config command
// ---------------------------------------------------------------------------

fn cmd_config() -> i32 {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!("fossil-delta version {version} (Rust)");

    let file_io = cfg!(feature = "file-io") as u8;
    let ptr_size = std::mem::size_of::<*const ()>();

    eprintln!("FILE_IO={file_io}");
    eprintln!("NHASH={NHASH}");
    eprintln!("DEFAULT_CHAIN_LIMIT={DEFAULT_CHAIN_LIMIT}");
    eprintln!("sizeof(usize)={ptr_size}");

    0
}

// ---------------------------------------------------------------------------
// Encode command
// ---------------------------------------------------------------------------

fn cmd_encode(opts: &Options) -> i32 {
    let enc_opts = EncodeOptions {
        chain_limit: opts.chain_limit,
    };

    match (&opts.source_file, &opts.input_file, &opts.output_file) {
        (Some(source), Some(target), Some(delta)) if !opts.use_stdout => {
            if !check_overwrite(opts, delta) {
                return 1;
            }
            let stats = match encode_file(source, target, delta, &enc_opts) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("fossil-delta: encode error: {e}");
                    return 1;
                }
            };
            if opts.verbose > 0 && !opts.quiet {
                eprintln!(
                    "fossil-delta: encoder: source size: {}, target size: {}, delta size: {}, \
                     inserts: {}, copies: {}",
                    stats.source_size,
                    stats.target_size,
                    stats.delta_size,
                    stats.inserts,
                    stats.copies
                );
            }
            if opts.json_output {
                let json = serde_json::json!({
                    "command": "encode",
                    "source_size": stats.source_size,
                    "target_size": stats.target_size,
                    "delta_size": stats.delta_size,
                    "inserts": stats.inserts,
                    "copies": stats.copies,
                    "chain_limit": opts.chain_limit,
                    "source_sha256": opt_hex(stats.source_sha256.as_ref()),
                    "target_sha256": opt_hex(stats.target_sha256.as_ref()),
                });
                eprintln!("{json:#}");
            }
            0
        }
        (source, target, _) => {
            let Some(source) = read_input("source", source.as_deref()) else {
                return 1;
            };
            let Some(target) = read_input("target", target.as_deref()) else {
                return 1;
            };
            let delta = engine::create_delta_with_options(&source, &target, &enc_opts);
            if let Err(e) = write_stdout(&delta) {
                eprintln!("fossil-delta: write error: {e}");
                return 1;
            }
            if opts.json_output {
                let json = serde_json::json!({
                    "command": "encode",
                    "source_size": source.len(),
                    "target_size": target.len(),
                    "delta_size": delta.len(),
                    "chain_limit": opts.chain_limit,
                });
                eprintln!("{json:#}");
            }
            0
        }
    }
}

// ---------------------------------------------------------------------------
// Decode command
// ---------------------------------------------------------------------------

fn cmd_decode(opts: &Options) -> i32 {
    let dec_opts = DecodeOptions {
        verify_checksum: !opts.no_checksum,
    };

    match (&opts.source_file, &opts.input_file, &opts.output_file) {
        (Some(source), Some(delta), Some(output)) if !opts.use_stdout => {
            if !check_overwrite(opts, output) {
                return 1;
            }
            let stats = match decode_file(source, delta, output, &dec_opts) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("fossil-delta: decode error: {e}");
                    return 1;
                }
            };
            if opts.verbose > 0 && !opts.quiet {
                eprintln!(
                    "fossil-delta: decoder: source size: {}, delta size: {}, output size: {}",
                    stats.source_size, stats.delta_size, stats.output_size
                );
            }
            if opts.json_output {
                let json = serde_json::json!({
                    "command": "decode",
                    "source_size": stats.source_size,
                    "delta_size": stats.delta_size,
                    "output_size": stats.output_size,
                    "output_sha256": opt_hex(stats.output_sha256.as_ref()),
                });
                eprintln!("{json:#}");
            }
            0
        }
        (source, delta, _) => {
            let Some(source) = read_input("source", source.as_deref()) else {
                return 1;
            };
            let Some(delta) = read_input("delta", delta.as_deref()) else {
                return 1;
            };
            let output = match engine::apply_delta_with_options(&source, &delta, &dec_opts) {
                Ok(out) => out,
                Err(e) => {
                    eprintln!("fossil-delta: decode error: {e}");
                    return 1;
                }
            };
            if let Err(e) = write_stdout(&output) {
                eprintln!("fossil-delta: write error: {e}");
                return 1;
            }
            if opts.json_output {
                let json = serde_json::json!({
                    "command": "decode",
                    "source_size": source.len(),
                    "delta_size": delta.len(),
                    "output_size": output.len(),
                });
                eprintln!("{json:#}");
            }
            0
        }
    }
}

// ---------------------------------------------------------------------------
// Size command
// ---------------------------------------------------------------------------

fn cmd_size(opts: &Options) -> i32 {
    let Some(delta) = read_input("delta", opts.input_file.as_deref()) else {
        return 1;
    };
    match engine::delta_target_size(&delta) {
        Ok(size) => {
            if opts.json_output {
                let json = serde_json::json!({
                    "command": "size",
                    "target_size": size,
                });
                eprintln!("{json:#}");
            }
            println!("{size}");
            0
        }
        Err(e) => {
            eprintln!("fossil-delta: invalid delta: {e}");
            1
        }
    }
}

// ---------------------------------------------------------------------------
// Print command
// ---------------------------------------------------------------------------

fn cmd_print(opts: &Options) -> i32 {
    let Some(delta) = read_input("delta", opts.input_file.as_deref()) else {
        return 1;
    };
    let commands = match Commands::new(&delta) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("fossil-delta: invalid delta: {e}");
            return 1;
        }
    };

    let mut out = BufWriter::with_capacity(BUF_SIZE, io::stdout().lock());
    let result = print_commands(&mut out, commands).and_then(|()| out.flush());
    match result {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::InvalidData => {
            eprintln!("fossil-delta: invalid delta: {e}");
            return 1;
        }
        Err(e) => {
            eprintln!("fossil-delta: write error: {e}");
            return 1;
        }
    }

    if opts.verbose > 0 || opts.json_output {
        // The command stream was already validated above.
        let Ok(stats) = DeltaStats::from_delta(&delta) else {
            return 1;
        };
        if opts.verbose > 0 && !opts.quiet {
            eprintln!(
                "fossil-delta: {} inserts ({} bytes), {} copies ({} bytes)",
                stats.inserts, stats.literal_bytes, stats.copies, stats.copied_bytes
            );
        }
        if opts.json_output {
            let json = serde_json::json!({
                "command": "print",
                "target_size": stats.target_len,
                "delta_size": stats.delta_len,
                "inserts": stats.inserts,
                "copies": stats.copies,
                "literal_bytes": stats.literal_bytes,
                "copied_bytes": stats.copied_bytes,
                "checksum": stats.checksum,
            });
            eprintln!("{json:#}");
        }
    }

    0
}

fn print_commands(out: &mut impl Write, mut commands: Commands<'_>) -> io::Result<()> {
    writeln!(out, "TARGET {}", commands.target_len())?;
    loop {
        let pos = commands.position();
        match commands.next() {
            Some(Ok(cmd)) => writeln!(out, "{pos:>8}  {cmd}")?,
            Some(Err(e)) => return Err(io::Error::new(io::ErrorKind::InvalidData, e)),
            None => return Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    let cli = Cli::parse();
    let mut opts = resolve_options(cli);

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_filter(opts.verbose)),
    )
    .format_timestamp(None)
    .format_target(false)
    .init();

    // Warn if -c overrides output filename.
    if opts.use_stdout
        && let Some(path) = opts.output_file.take()
        && !opts.quiet
    {
        eprintln!(
            "fossil-delta: warning: -c option overrides output filename: {}",
            path.display()
        );
    }

    let exit_code = match opts.command {
        Command::Encode => cmd_encode(&opts),
        Command::Decode => cmd_decode(&opts),
        Command::Size => cmd_size(&opts),
        Command::Print => cmd_print(&opts),
        Command::Config => cmd_config(),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
