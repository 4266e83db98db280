//! Wire format: `[count: u32 LE]` then, per token, a flag byte followed by
//! `[offset: u16 LE][length: u8]` for a match or the raw byte for a literal.

use std::io::Write;

use tracing::debug;

use super::tokens::Token;
use crate::error::{Corruption, Result};

/// Size of the leading token count
pub const COUNT_SIZE: usize = 4;

const FLAG_LITERAL: u8 = 0;
const FLAG_MATCH: u8 = 1;

/// Tokens recovered from a stream, plus what stopped parsing early
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenStream {
    pub tokens: Vec<Token>,
    pub corruption: Option<Corruption>,
}

/// Exact serialized size of `tokens`
pub fn serialized_len(tokens: &[Token]) -> usize {
    COUNT_SIZE + tokens.iter().map(Token::encoded_size).sum::<usize>()
}

pub fn serialize(tokens: &[Token]) -> Vec<u8> {
    let mut out = Vec::with_capacity(serialized_len(tokens));
    out.extend_from_slice(&(tokens.len() as u32).to_le_bytes());
    for token in tokens {
        match *token {
            Token::Literal(byte) => {
                out.push(FLAG_LITERAL);
                out.push(byte);
            }
            Token::Match { offset, length } => {
                out.push(FLAG_MATCH);
                out.extend_from_slice(&offset.to_le_bytes());
                out.push(length);
            }
        }
    }
    out
}

/// Serialize straight into `writer`, returning the bytes written
pub fn write_tokens<W: Write>(tokens: &[Token], writer: &mut W) -> Result<usize> {
    let bytes = serialize(tokens);
    writer.write_all(&bytes)?;
    Ok(bytes.len())
}

/// Parse a token stream, keeping every token read before any truncation
pub fn parse(data: &[u8]) -> TokenStream {
    if data.len() < COUNT_SIZE {
        return TokenStream {
            tokens: Vec::new(),
            corruption: Some(Corruption::TruncatedHeader {
                context: "token count",
                needed: COUNT_SIZE,
                available: data.len(),
            }),
        };
    }

    let declared = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    // Every token takes at least two bytes
    let capacity = (declared as usize).min((data.len() - COUNT_SIZE) / 2);
    let mut tokens = Vec::with_capacity(capacity);
    let mut pos = COUNT_SIZE;

    let truncated = |parsed: usize| Corruption::TruncatedTokenStream {
        declared,
        parsed: parsed as u32,
    };

    for index in 0..declared {
        let Some(&flag) = data.get(pos) else {
            return TokenStream { corruption: Some(truncated(tokens.len())), tokens };
        };
        match flag {
            FLAG_LITERAL => {
                let Some(&byte) = data.get(pos + 1) else {
                    return TokenStream { corruption: Some(truncated(tokens.len())), tokens };
                };
                tokens.push(Token::Literal(byte));
                pos += 2;
            }
            FLAG_MATCH => {
                let Some(body) = data.get(pos + 1..pos + 4) else {
                    return TokenStream { corruption: Some(truncated(tokens.len())), tokens };
                };
                tokens.push(Token::Match {
                    offset: u16::from_le_bytes([body[0], body[1]]),
                    length: body[2],
                });
                pos += 4;
            }
            flag => {
                return TokenStream {
                    tokens,
                    corruption: Some(Corruption::InvalidTokenFlag { index, flag }),
                };
            }
        }
    }

    if pos < data.len() {
        debug!(trailing = data.len() - pos, "ignoring bytes after last declared token");
    }

    TokenStream { tokens, corruption: None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let tokens = [Token::Literal(0x41), Token::Match { offset: 0x0102, length: 7 }];
        let bytes = serialize(&tokens);
        assert_eq!(bytes, vec![2, 0, 0, 0, 0, 0x41, 1, 0x02, 0x01, 7]);
        assert_eq!(bytes.len(), serialized_len(&tokens));
        assert_eq!(parse(&bytes), TokenStream { tokens: tokens.to_vec(), corruption: None });
    }

    #[test]
    fn test_empty_stream() {
        let bytes = serialize(&[]);
        assert_eq!(bytes, vec![0, 0, 0, 0]);
        assert_eq!(parse(&bytes), TokenStream::default());
    }

    #[test]
    fn test_missing_count() {
        let parsed = parse(&[1, 0]);
        assert!(parsed.tokens.is_empty());
        assert_eq!(
            parsed.corruption,
            Some(Corruption::TruncatedHeader { context: "token count", needed: 4, available: 2 })
        );
    }

    #[test]
    fn test_declared_count_exceeds_tokens() {
        let mut bytes = serialize(&[Token::Literal(1), Token::Literal(2)]);
        bytes[0] = 5;
        let parsed = parse(&bytes);
        assert_eq!(parsed.tokens, vec![Token::Literal(1), Token::Literal(2)]);
        assert_eq!(
            parsed.corruption,
            Some(Corruption::TruncatedTokenStream { declared: 5, parsed: 2 })
        );
    }

    #[test]
    fn test_cut_inside_match() {
        let bytes = serialize(&[Token::Literal(9), Token::Match { offset: 1, length: 3 }]);
        let parsed = parse(&bytes[..bytes.len() - 1]);
        assert_eq!(parsed.tokens, vec![Token::Literal(9)]);
        assert!(matches!(parsed.corruption, Some(Corruption::TruncatedTokenStream { .. })));
    }

    #[test]
    fn test_bad_flag() {
        let parsed = parse(&[1, 0, 0, 0, 7, 0]);
        assert_eq!(parsed.corruption, Some(Corruption::InvalidTokenFlag { index: 0, flag: 7 }));
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let mut bytes = serialize(&[Token::Literal(b'k')]);
        bytes.extend_from_slice(&[0xAA, 0xBB]);
        let parsed = parse(&bytes);
        assert_eq!(parsed.tokens, vec![Token::Literal(b'k')]);
        assert!(parsed.corruption.is_none());
    }

    #[test]
    fn test_write_tokens() {
        let tokens = [Token::Literal(3)];
        let mut out = Vec::new();
        assert_eq!(write_tokens(&tokens, &mut out).unwrap(), 6);
        assert_eq!(out, serialize(&tokens));
    }
}
