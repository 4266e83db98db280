pub mod bits;
pub mod codec;
pub mod error;
pub mod huffman;
pub mod lz77;
pub mod rle;

pub use codec::{
    decode_file, decode_stream, encode_file, encode_stream, HuffmanCodec, Lz77Codec,
    ParallelHuffmanCodec, RleCodec,
};
pub use error::{Corruption, Decoded, Error, Result};
pub use lz77::Token;

use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;

use tracing::warn;

/// Huffman block size used when none (or an invalid one) is given
pub const DEFAULT_BLOCK_SIZE: usize = 65536;

/// Largest Huffman block whose bit count always fits in 32 bits.
///
/// A Huffman code never averages more than 8 bits per byte.
pub const MAX_BLOCK_SIZE: usize = (u32::MAX / 8) as usize;

/// Codec selection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Huffman,
    Lz77,
    Rle,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Huffman, Algorithm::Lz77, Algorithm::Rle];

    /// Lowercase name, as accepted by [`FromStr`]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Huffman => "huffman",
            Self::Lz77 => "lz77",
            Self::Rle => "rle",
        }
    }

    /// File extension appended to compressed output
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Huffman => "huff",
            Self::Lz77 => "lz77",
            Self::Rle => "rle",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    /// Accepts names, short names and the menu numbers 1-3
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "huffman" | "huff" | "1" => Ok(Self::Huffman),
            "lz77" | "lz" | "2" => Ok(Self::Lz77),
            "rle" | "3" => Ok(Self::Rle),
            _ => Err(Error::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Parse a Huffman block size leniently.
///
/// Empty, unparsable, zero or negative text falls back to
/// [`DEFAULT_BLOCK_SIZE`] instead of failing.
pub fn parse_block_size(text: &str) -> usize {
    let text = text.trim();
    match text.parse::<i64>() {
        Ok(n) if n > 0 => {
            CodecConfig::sanitize_block_size(usize::try_from(n).unwrap_or(MAX_BLOCK_SIZE))
        }
        _ => {
            if !text.is_empty() {
                warn!(value = text, default = DEFAULT_BLOCK_SIZE, "invalid block size");
            }
            DEFAULT_BLOCK_SIZE
        }
    }
}

/// Configuration for the stream codecs
#[derive(Clone, Debug)]
pub struct CodecConfig {
    /// Huffman block size in bytes (default: 65536)
    pub block_size: usize,
    /// Threads for Huffman blocks (0 = auto, 1 = sequential)
    pub num_threads: usize,
    /// Buffer size for I/O operations
    pub buffer_size: usize,
}

impl CodecConfig {
    /// Block size actually used: zero falls back to the default, anything
    /// above [`MAX_BLOCK_SIZE`] is clamped
    pub fn effective_block_size(&self) -> usize {
        Self::sanitize_block_size(self.block_size)
    }

    pub fn sanitize_block_size(block_size: usize) -> usize {
        if block_size == 0 {
            warn!(default = DEFAULT_BLOCK_SIZE, "block size 0, using default");
            DEFAULT_BLOCK_SIZE
        } else if block_size > MAX_BLOCK_SIZE {
            warn!(requested = block_size, max = MAX_BLOCK_SIZE, "block size clamped");
            MAX_BLOCK_SIZE
        } else {
            block_size
        }
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self { block_size: DEFAULT_BLOCK_SIZE, num_threads: 1, buffer_size: 128 * 1024 }
    }
}

/// Statistics from an encode or decode
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodecStats {
    pub input_bytes: u64,
    pub output_bytes: u64,
    /// Huffman blocks processed (0 for LZ77 and RLE)
    pub blocks: u64,
    /// Set when a decode stopped early on corrupt input
    pub corruption: Option<Corruption>,
}

impl CodecStats {
    pub fn is_complete(&self) -> bool {
        self.corruption.is_none()
    }

    /// Input size over output size
    pub fn ratio(&self) -> f64 {
        if self.output_bytes == 0 {
            return 0.0;
        }
        self.input_bytes as f64 / self.output_bytes as f64
    }

    /// Percentage of the input saved by the output
    pub fn space_saving(&self) -> f64 {
        if self.input_bytes == 0 {
            return 0.0;
        }
        (1.0 - self.output_bytes as f64 / self.input_bytes as f64) * 100.0
    }
}

/// A codec over byte streams
pub trait Codec {
    /// Encode all of `input` into `output`
    fn encode<R: Read, W: Write>(&mut self, input: R, output: W) -> Result<CodecStats>;

    /// Decode `input` into `output`.
    ///
    /// Corrupt input is not an error: whatever decoded cleanly is written
    /// and the problem is reported in [`CodecStats::corruption`].
    fn decode<R: Read, W: Write>(&mut self, input: R, output: W) -> Result<CodecStats>;
}
