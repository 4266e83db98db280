use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Encoding errors
    #[error("Huffman block too large: {bits} coded bits exceed the 32-bit bit count")]
    BlockTooLarge { bits: u64 },

    // Dispatch errors
    #[error("Unknown algorithm: {0} (expected huffman, lz77 or rle)")]
    UnknownAlgorithm(String),

    // Internal errors
    #[error("Unexpected end of input")]
    UnexpectedEof,

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Malformed or truncated framing found while decoding.
///
/// Decoders never fail on corrupt input. They stop at the first problem and
/// hand back everything decoded before it, tagged with one of these.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum Corruption {
    #[error("Truncated {context}: needed {needed} bytes, found {available}")]
    TruncatedHeader { context: &'static str, needed: usize, available: usize },

    #[error("Truncated bitstream: {expected_bits} bits declared, {available_bits} present")]
    TruncatedBitstream { expected_bits: u64, available_bits: u64 },

    #[error("Invalid Huffman code table: {reason}")]
    InvalidCodeTable { reason: &'static str },

    #[error("Huffman bit path at bit {bit_offset} leads to no symbol")]
    InvalidCodePath { bit_offset: u64 },

    #[error("Truncated token stream: {declared} tokens declared, {parsed} present")]
    TruncatedTokenStream { declared: u32, parsed: u32 },

    #[error("Invalid token flag 0x{flag:02x} at token {index}")]
    InvalidTokenFlag { index: u32, flag: u8 },

    #[error("Match at token {index} reaches {offset} bytes back, only {available} decoded")]
    InvalidMatch { index: usize, offset: u16, available: usize },

    #[error("Stream ends after escape byte at offset {offset}")]
    DanglingEscape { offset: usize },

    #[error("Stream ends before run value at offset {offset}")]
    MissingRunValue { offset: usize },
}

/// Output of an in-memory decode: the bytes recovered plus the corruption
/// that cut decoding short, if any.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Decoded {
    pub data: Vec<u8>,
    pub corruption: Option<Corruption>,
}

impl Decoded {
    pub fn complete(data: Vec<u8>) -> Self {
        Self { data, corruption: None }
    }

    pub fn partial(data: Vec<u8>, corruption: Corruption) -> Self {
        tracing::warn!(recovered = data.len(), %corruption, "decode stopped early");
        Self { data, corruption: Some(corruption) }
    }

    /// True when the whole input decoded without hitting corrupt framing
    pub fn is_complete(&self) -> bool {
        self.corruption.is_none()
    }

    /// Returns the data only if decoding was clean
    pub fn into_complete(self) -> std::result::Result<Vec<u8>, Corruption> {
        match self.corruption {
            None => Ok(self.data),
            Some(c) => Err(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoded_complete() {
        let decoded = Decoded::complete(vec![1, 2, 3]);
        assert!(decoded.is_complete());
        assert_eq!(decoded.into_complete().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_decoded_partial() {
        let decoded = Decoded::partial(vec![7], Corruption::DanglingEscape { offset: 1 });
        assert!(!decoded.is_complete());
        assert_eq!(decoded.data, vec![7]);
        assert_eq!(decoded.into_complete(), Err(Corruption::DanglingEscape { offset: 1 }));
    }

    #[test]
    fn test_corruption_display() {
        let c = Corruption::TruncatedTokenStream { declared: 10, parsed: 4 };
        assert_eq!(c.to_string(), "Truncated token stream: 10 tokens declared, 4 present");
    }
}
