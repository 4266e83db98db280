//! Block-based canonical Huffman coding.
//!
//! Input is cut into fixed-size blocks. Each block carries its own code
//! table, stored as `(symbol, length)` pairs only, and a bit count so the
//! zero padding of its last byte is never mistaken for data.

pub mod canonical;
pub mod decoder;
pub mod encoder;
pub mod tree;

pub use canonical::{CanonicalCode, CanonicalCodeTable};
pub use decoder::{decode_block, read_block, BlockFrame, DecodingTrie};
pub use encoder::{encode_block, EncodedBlock};
pub use tree::{FrequencyTable, HuffmanTree};

use crate::error::{Decoded, Result};

/// Encode `data` as a sequence of independent blocks of at most `block_size` bytes
pub fn compress(data: &[u8], block_size: usize) -> Result<Vec<u8>> {
    let block_size = crate::CodecConfig::sanitize_block_size(block_size);
    let mut out = Vec::with_capacity(data.len() / 2 + 16);
    for chunk in data.chunks(block_size) {
        let block = encode_block(chunk)?;
        block.write_to(&mut out)?;
    }
    Ok(out)
}

/// Decode every block of `data`, stopping at the first corrupt one
pub fn decompress(mut data: &[u8]) -> Result<Decoded> {
    let mut out = Vec::new();
    loop {
        match read_block(&mut data)? {
            BlockFrame::End => return Ok(Decoded::complete(out)),
            BlockFrame::Corrupt(corruption) => return Ok(Decoded::partial(out, corruption)),
            BlockFrame::Block(block) => {
                let decoded = block.decode();
                out.extend_from_slice(&decoded.data);
                if let Some(corruption) = decoded.corruption {
                    return Ok(Decoded::partial(out, corruption));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_multiple_blocks() {
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8 ^ (i / 97) as u8).collect();
        for block_size in [1, 7, 256, 4096, 65536] {
            let encoded = compress(&data, block_size).unwrap();
            let decoded = decompress(&encoded).unwrap();
            assert!(decoded.is_complete(), "block size {}", block_size);
            assert_eq!(decoded.data, data, "block size {}", block_size);
        }
    }

    #[test]
    fn test_empty_input() {
        let encoded = compress(&[], 65536).unwrap();
        assert!(encoded.is_empty());
        assert_eq!(decompress(&encoded).unwrap(), Decoded::complete(Vec::new()));
    }

    #[test]
    fn test_zero_block_size_falls_back() {
        let data = vec![3u8; 70_000];
        assert_eq!(compress(&data, 0).unwrap(), compress(&data, 65536).unwrap());
    }

    #[test]
    fn test_blocks_are_independent() {
        let mut data = vec![b'a'; 100];
        data.extend(vec![b'b'; 100]);
        let encoded = compress(&data, 100).unwrap();
        // Two single-symbol blocks: 4 + 2 + 2 + 13 bytes each
        assert_eq!(encoded.len(), 2 * 21);
    }

    #[test]
    fn test_truncated_stream_keeps_prefix() {
        let data = vec![b'q'; 300];
        let encoded = compress(&data, 100).unwrap();
        let decoded = decompress(&encoded[..encoded.len() - 5]).unwrap();
        assert!(!decoded.is_complete());
        assert_eq!(decoded.data.len(), 200 + 64);
        assert!(decoded.data.iter().all(|&b| b == b'q'));
    }
}
