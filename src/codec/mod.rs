//! Stream codecs and algorithm dispatch.

pub mod huffman;
pub mod lz77;
pub mod parallel;
pub mod rle;

pub use huffman::HuffmanCodec;
pub use lz77::Lz77Codec;
pub use parallel::ParallelHuffmanCodec;
pub use rle::RleCodec;

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::{Algorithm, Codec, CodecConfig, CodecStats};

/// Encode `input` into `output` with the chosen algorithm
pub fn encode_stream<R: Read, W: Write>(
    algorithm: Algorithm,
    config: &CodecConfig,
    input: R,
    output: W,
) -> Result<CodecStats> {
    let config = config.clone();
    match algorithm {
        Algorithm::Huffman if config.num_threads == 1 => {
            HuffmanCodec::new(config).encode(input, output)
        }
        Algorithm::Huffman => ParallelHuffmanCodec::new(config).encode(input, output),
        Algorithm::Lz77 => Lz77Codec::new(config).encode(input, output),
        Algorithm::Rle => RleCodec::new(config).encode(input, output),
    }
}

/// Decode `input` into `output` with the chosen algorithm
pub fn decode_stream<R: Read, W: Write>(
    algorithm: Algorithm,
    config: &CodecConfig,
    input: R,
    output: W,
) -> Result<CodecStats> {
    let config = config.clone();
    match algorithm {
        Algorithm::Huffman if config.num_threads == 1 => {
            HuffmanCodec::new(config).decode(input, output)
        }
        Algorithm::Huffman => ParallelHuffmanCodec::new(config).decode(input, output),
        Algorithm::Lz77 => Lz77Codec::new(config).decode(input, output),
        Algorithm::Rle => RleCodec::new(config).decode(input, output),
    }
}

/// Encode the file at `input` into a new file at `output`
pub fn encode_file(
    algorithm: Algorithm,
    config: &CodecConfig,
    input: &Path,
    output: &Path,
) -> Result<CodecStats> {
    let reader = File::open(input)?;
    let writer = File::create(output)?;
    let stats = encode_stream(algorithm, config, reader, writer)?;
    info!(%algorithm, input = %input.display(), output = %output.display(), "encoded file");
    Ok(stats)
}

/// Decode the file at `input` into a new file at `output`.
///
/// The output file holds everything recovered even when the input is corrupt.
pub fn decode_file(
    algorithm: Algorithm,
    config: &CodecConfig,
    input: &Path,
    output: &Path,
) -> Result<CodecStats> {
    let reader = File::open(input)?;
    let writer = File::create(output)?;
    let stats = decode_stream(algorithm, config, reader, writer)?;
    info!(%algorithm, input = %input.display(), output = %output.display(), "decoded file");
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_dispatch_roundtrip_all_algorithms() {
        let data = b"abracadabra abracadabra!!!!!!!! \xff\xff".repeat(50);
        for num_threads in [1, 3] {
            let config = CodecConfig { block_size: 512, num_threads, ..Default::default() };
            for algorithm in Algorithm::ALL {
                let mut encoded = Vec::new();
                encode_stream(algorithm, &config, Cursor::new(&data), &mut encoded).unwrap();
                let mut decoded = Vec::new();
                let stats =
                    decode_stream(algorithm, &config, Cursor::new(&encoded), &mut decoded).unwrap();
                assert!(stats.is_complete(), "{}", algorithm);
                assert_eq!(decoded, data, "{}", algorithm);
            }
        }
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let original = dir.path().join("input.txt");
        let encoded = dir.path().join("input.txt.huff");
        let restored = dir.path().join("input.txt.out");
        let data = b"hello hello hello file codec".repeat(100);
        std::fs::write(&original, &data).unwrap();

        let config = CodecConfig::default();
        let stats = encode_file(Algorithm::Huffman, &config, &original, &encoded).unwrap();
        assert_eq!(stats.input_bytes, data.len() as u64);
        assert_eq!(stats.output_bytes, std::fs::metadata(&encoded).unwrap().len());

        decode_file(Algorithm::Huffman, &config, &encoded, &restored).unwrap();
        assert_eq!(std::fs::read(&restored).unwrap(), data);
    }

    #[test]
    fn test_missing_input_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = encode_file(
            Algorithm::Rle,
            &CodecConfig::default(),
            &dir.path().join("missing"),
            &dir.path().join("out"),
        );
        assert!(matches!(result, Err(crate::Error::Io(_))));
    }
}
