use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand};
use static_huffman::{compress_file, expand_file, CodecConfig, EofMode, HuffmanError, Phase};

#[derive(Parser)]
#[command(name = "shuff", about = "Order-0 static Huffman compressor", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Use byte 254 as the end-of-stream symbol; a 254 in the data ends expansion
    #[arg(long, global = true)]
    legacy_eof: bool,

    /// Fail instead of emitting codes longer than this many bits (1-64)
    #[arg(long, global = true, default_value_t = 64)]
    max_code_len: u8,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file
    Compress { input: PathBuf, output: PathBuf },

    /// Expand a compressed file
    Expand { input: PathBuf, output: PathBuf },

    /// Compress and expand through a scratch directory, then compare
    Roundtrip { input: PathBuf },
}

fn init_tracing(cli: &Cli) {
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into())
    } else {
        tracing_subscriber::EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn file_kib(path: &Path) -> f64 {
    std::fs::metadata(path)
        .map(|m| m.len() as f64 / 1024.0)
        .unwrap_or(0.0)
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

fn run(cli: &Cli) -> Result<bool, HuffmanError> {
    let eof_mode = if cli.legacy_eof {
        EofMode::Legacy
    } else {
        EofMode::Extended
    };
    let config = CodecConfig::new()
        .with_eof_mode(eof_mode)
        .with_max_code_len(cli.max_code_len);

    match &cli.command {
        Commands::Compress { input, output } => {
            let start = Instant::now();
            let report = compress_file(input, output, &config)?;
            if !cli.quiet {
                println!(
                    "compressed {} -> {} bytes ({:.1}%) in {:.3} ms",
                    report.input_bytes,
                    report.output_bytes,
                    report.ratio() * 100.0,
                    elapsed_ms(start)
                );
            }
            Ok(true)
        }
        Commands::Expand { input, output } => {
            let start = Instant::now();
            let report = expand_file(input, output, &config)?;
            if !cli.quiet {
                println!(
                    "expanded {} -> {} bytes in {:.3} ms",
                    report.input_bytes,
                    report.output_bytes,
                    elapsed_ms(start)
                );
            }
            Ok(true)
        }
        Commands::Roundtrip { input } => {
            let scratch = tempfile::tempdir().map_err(|e| HuffmanError::io(Phase::Output, e))?;
            let packed = scratch.path().join("packed.huf");
            let unpacked = scratch.path().join("unpacked.out");

            let start = Instant::now();
            compress_file(input, &packed, &config)?;
            let compress_ms = elapsed_ms(start);

            let start = Instant::now();
            expand_file(&packed, &unpacked, &config)?;
            let expand_ms = elapsed_ms(start);

            let original = std::fs::read(input).map_err(|e| HuffmanError::open(input, e))?;
            let restored = std::fs::read(&unpacked).map_err(|e| HuffmanError::open(&unpacked, e))?;
            let matches = original == restored;

            if !cli.quiet {
                println!("compression time = {:.3} ms", compress_ms);
                println!("expansion time   = {:.3} ms", expand_ms);
                println!("original size    = {:.1}kb", file_kib(input));
                println!("compressed size  = {:.1}kb", file_kib(&packed));
                println!("expanded size    = {:.1}kb", file_kib(&unpacked));
                println!("round trip       = {}", if matches { "ok" } else { "MISMATCH" });
            }
            Ok(matches)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
