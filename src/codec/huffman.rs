use std::io::{BufReader, BufWriter, Read, Write};

use tracing::{debug, warn};

use crate::error::Result;
use crate::huffman::{encode_block, read_block, BlockFrame};
use crate::{Codec, CodecConfig, CodecStats};

/// Sequential Huffman codec: one block in memory at a time
pub struct HuffmanCodec {
    config: CodecConfig,
}

impl HuffmanCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }
}

impl Codec for HuffmanCodec {
    fn encode<R: Read, W: Write>(&mut self, input: R, output: W) -> Result<CodecStats> {
        let block_size = self.config.effective_block_size();
        let mut reader = BufReader::with_capacity(self.config.buffer_size, input);
        let mut writer = BufWriter::with_capacity(self.config.buffer_size, output);

        let mut stats = CodecStats::default();
        let mut block = Vec::with_capacity(block_size.min(1 << 20));

        loop {
            block.clear();
            reader.by_ref().take(block_size as u64).read_to_end(&mut block)?;
            if block.is_empty() {
                break;
            }

            let encoded = encode_block(&block)?;
            stats.output_bytes += encoded.write_to(&mut writer)? as u64;
            stats.input_bytes += block.len() as u64;
            stats.blocks += 1;

            debug!(block = stats.blocks, bytes = block.len(), "wrote Huffman block");

            if block.len() < block_size {
                break;
            }
        }

        writer.flush()?;
        Ok(stats)
    }

    fn decode<R: Read, W: Write>(&mut self, input: R, output: W) -> Result<CodecStats> {
        let mut reader = BufReader::with_capacity(self.config.buffer_size, input);
        let mut writer = BufWriter::with_capacity(self.config.buffer_size, output);

        let mut stats = CodecStats::default();

        loop {
            match read_block(&mut reader)? {
                BlockFrame::End => break,
                BlockFrame::Corrupt(corruption) => {
                    warn!(block = stats.blocks, %corruption, "unreadable Huffman block header");
                    stats.corruption = Some(corruption);
                    break;
                }
                BlockFrame::Block(block) => {
                    stats.input_bytes += block.encoded_len() as u64;
                    let decoded = block.decode();
                    writer.write_all(&decoded.data)?;
                    stats.output_bytes += decoded.data.len() as u64;
                    stats.blocks += 1;

                    if decoded.corruption.is_some() {
                        stats.corruption = decoded.corruption;
                        break;
                    }
                }
            }
        }

        writer.flush()?;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Corruption;
    use crate::huffman;
    use std::io::Cursor;

    fn encode(data: &[u8], block_size: usize) -> (Vec<u8>, CodecStats) {
        let config = CodecConfig { block_size, ..Default::default() };
        let mut output = Vec::new();
        let stats = HuffmanCodec::new(config).encode(Cursor::new(data), &mut output).unwrap();
        (output, stats)
    }

    #[test]
    fn test_stream_matches_in_memory() {
        let data: Vec<u8> =
            b"stream and slice must agree ".iter().cycle().take(5000).copied().collect();
        let (output, stats) = encode(&data, 1024);
        assert_eq!(output, huffman::compress(&data, 1024).unwrap());
        assert_eq!(stats.blocks, 5);
        assert_eq!(stats.input_bytes, 5000);
        assert_eq!(stats.output_bytes, output.len() as u64);
    }

    #[test]
    fn test_roundtrip() {
        let data: Vec<u8> = (0..20_000u32).map(|i| (i * 7 % 13) as u8).collect();
        let (encoded, _) = encode(&data, 3000);

        let mut decoded = Vec::new();
        let stats = HuffmanCodec::new(CodecConfig::default())
            .decode(Cursor::new(&encoded), &mut decoded)
            .unwrap();
        assert!(stats.is_complete());
        assert_eq!(stats.blocks, 7);
        assert_eq!(stats.input_bytes, encoded.len() as u64);
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_exact_multiple_of_block_size() {
        let (_, stats) = encode(&[1u8; 4096], 1024);
        assert_eq!(stats.blocks, 4);
    }

    #[test]
    fn test_empty_stream() {
        let (encoded, stats) = encode(&[], 1024);
        assert!(encoded.is_empty());
        assert_eq!(stats.blocks, 0);
    }

    #[test]
    fn test_decode_truncated_header() {
        let (mut encoded, _) = encode(&[9u8; 2000], 1000);
        let first_block_len = encoded.len() / 2;
        encoded.truncate(first_block_len + 3);

        let mut decoded = Vec::new();
        let stats = HuffmanCodec::new(CodecConfig::default())
            .decode(Cursor::new(&encoded), &mut decoded)
            .unwrap();
        assert_eq!(decoded, vec![9u8; 1000]);
        assert!(matches!(stats.corruption, Some(Corruption::TruncatedHeader { .. })));
    }
}
