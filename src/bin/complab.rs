use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use complab::{
    decode_file, encode_file, parse_block_size, Algorithm, CodecConfig, DEFAULT_BLOCK_SIZE,
};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "complab")]
#[command(about = "Compress and decompress files with Huffman, LZ77 or RLE")]
#[command(version)]
struct Args {
    /// Algorithm: huffman, lz77 or rle (or 1, 2, 3)
    #[arg(short, long)]
    algorithm: Algorithm,

    /// Input file
    #[arg(short, long)]
    input: PathBuf,

    /// Output file (default: <input>.<ext>, or <input>.out with -d)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Decompress instead of compress
    #[arg(short, long)]
    decompress: bool,

    /// Huffman block size in bytes (invalid values fall back to 65536)
    #[arg(long)]
    block_size: Option<String>,

    /// Number of threads for Huffman (0 = auto, 1 = single-threaded)
    #[arg(short = 't', long, default_value = "1")]
    threads: usize,

    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,
}

const EXIT_OK: u8 = 0;
const EXIT_CORRUPT: u8 = 1;
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    match run() {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run() -> Result<u8, Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if !args.input.is_file() {
        return Err(format!("cannot open input file {}", args.input.display()).into());
    }

    let config = CodecConfig {
        block_size: args.block_size.as_deref().map_or(DEFAULT_BLOCK_SIZE, parse_block_size),
        num_threads: args.threads,
        ..Default::default()
    };

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.input, args.algorithm, args.decompress));

    let start = Instant::now();
    let stats = if args.decompress {
        decode_file(args.algorithm, &config, &args.input, &output_path)?
    } else {
        encode_file(args.algorithm, &config, &args.input, &output_path)?
    };
    let elapsed = start.elapsed();

    let (original, result) = if args.decompress {
        (stats.output_bytes, stats.input_bytes)
    } else {
        (stats.input_bytes, stats.output_bytes)
    };

    eprintln!(
        "{} {} complete:",
        args.algorithm,
        if args.decompress { "decompression" } else { "compression" }
    );
    eprintln!("  Output file:      {}", output_path.display());
    eprintln!("  Original size:    {} bytes", original);
    eprintln!("  Compressed size:  {} bytes", result);
    if args.algorithm == Algorithm::Huffman {
        eprintln!("  Blocks:           {}", stats.blocks);
    }
    eprintln!("  Time:             {:.2?}", elapsed);
    eprintln!("  Ratio:            {:.3}", ratio(original, result));
    eprintln!("  Space saving:     {:.2}%", space_saving(original, result));

    if let Some(corruption) = &stats.corruption {
        eprintln!("Warning: input is corrupt ({}), output is partial", corruption);
        return Ok(EXIT_CORRUPT);
    }

    Ok(EXIT_OK)
}

fn default_output(input: &Path, algorithm: Algorithm, decompress: bool) -> PathBuf {
    let suffix = if decompress { "out" } else { algorithm.extension() };
    let mut name = input.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

fn ratio(original: u64, compressed: u64) -> f64 {
    if compressed == 0 {
        return 0.0;
    }
    original as f64 / compressed as f64
}

fn space_saving(original: u64, compressed: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }
    (1.0 - compressed as f64 / original as f64) * 100.0
}
