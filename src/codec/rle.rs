use std::io::{Read, Write};

use tracing::debug;

use crate::error::Result;
use crate::rle;
use crate::{Codec, CodecConfig, CodecStats};

/// Escape-byte RLE over a whole stream
pub struct RleCodec {
    config: CodecConfig,
}

impl RleCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }
}

impl Codec for RleCodec {
    fn encode<R: Read, W: Write>(&mut self, mut input: R, mut output: W) -> Result<CodecStats> {
        let mut data = Vec::with_capacity(self.config.buffer_size);
        input.read_to_end(&mut data)?;

        let encoded = rle::encode(&data);
        output.write_all(&encoded)?;
        output.flush()?;

        debug!(input = data.len(), output = encoded.len(), "RLE encoded");
        Ok(CodecStats {
            input_bytes: data.len() as u64,
            output_bytes: encoded.len() as u64,
            ..Default::default()
        })
    }

    fn decode<R: Read, W: Write>(&mut self, mut input: R, mut output: W) -> Result<CodecStats> {
        let mut data = Vec::with_capacity(self.config.buffer_size);
        input.read_to_end(&mut data)?;

        let decoded = rle::decode(&data);
        output.write_all(&decoded.data)?;
        output.flush()?;

        Ok(CodecStats {
            input_bytes: data.len() as u64,
            output_bytes: decoded.data.len() as u64,
            blocks: 0,
            corruption: decoded.corruption,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Corruption;
    use std::io::Cursor;

    #[test]
    fn test_stream_encode() {
        let mut encoded = Vec::new();
        let stats = RleCodec::new(CodecConfig::default())
            .encode(Cursor::new(b"AAAAAAAABBBBCCCC"), &mut encoded)
            .unwrap();
        assert_eq!(encoded, vec![0xFF, 8, b'A', 0xFF, 4, b'B', 0xFF, 4, b'C']);
        assert_eq!(stats.output_bytes, 9);
        assert!((stats.space_saving() - 43.75).abs() < 1e-9);
    }

    #[test]
    fn test_dangling_escape_keeps_prefix() {
        let mut decoded = Vec::new();
        let stats = RleCodec::new(CodecConfig::default())
            .decode(Cursor::new([b'x', b'y', 0xFF]), &mut decoded)
            .unwrap();
        assert_eq!(decoded, b"xy".to_vec());
        assert!(matches!(stats.corruption, Some(Corruption::DanglingEscape { .. })));
    }
}
