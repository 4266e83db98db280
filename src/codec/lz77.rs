use std::io::{Read, Write};

use tracing::debug;

use crate::error::Result;
use crate::lz77;
use crate::{Codec, CodecConfig, CodecStats};

/// LZ77 over a whole stream.
///
/// The token count sits in front of the tokens, so the stream is buffered
/// in full before anything is written.
pub struct Lz77Codec {
    config: CodecConfig,
}

impl Lz77Codec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }
}

impl Codec for Lz77Codec {
    fn encode<R: Read, W: Write>(&mut self, mut input: R, mut output: W) -> Result<CodecStats> {
        let mut data = Vec::with_capacity(self.config.buffer_size);
        input.read_to_end(&mut data)?;

        let encoded = lz77::compress(&data);
        output.write_all(&encoded)?;
        output.flush()?;

        debug!(input = data.len(), output = encoded.len(), "LZ77 encoded");
        Ok(CodecStats {
            input_bytes: data.len() as u64,
            output_bytes: encoded.len() as u64,
            ..Default::default()
        })
    }

    fn decode<R: Read, W: Write>(&mut self, mut input: R, mut output: W) -> Result<CodecStats> {
        let mut data = Vec::with_capacity(self.config.buffer_size);
        input.read_to_end(&mut data)?;

        let decoded = lz77::decompress(&data);
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
