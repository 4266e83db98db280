use super::tokens::Token;
use crate::error::{Corruption, Decoded};

/// Replay tokens in order.
///
/// Matches copy one byte at a time so that an offset shorter than the
/// length reads bytes written earlier by the same match. A match reaching
/// before the start of the output stops decoding.
pub fn decode(tokens: &[Token]) -> Decoded {
    let mut out = Vec::with_capacity(tokens.len() * 2);

    for (index, token) in tokens.iter().enumerate() {
        match *token {
            Token::Literal(byte) => out.push(byte),
            Token::Match { offset, length } => {
                let distance = offset as usize;
                if distance == 0 || distance > out.len() {
                    let available = out.len();
                    return Decoded::partial(
                        out,
                        Corruption::InvalidMatch { index, offset, available },
                    );
                }
                let start = out.len() - distance;
                for i in 0..length as usize {
                    let byte = out[start + i];
                    out.push(byte);
                }
            }
        }
    }

    Decoded::complete(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literals_and_match() {
        let tokens = [
            Token::Literal(b'a'),
            Token::Literal(b'b'),
            Token::Match { offset: 2, length: 4 },
            Token::Literal(b'!'),
        ];
        assert_eq!(decode(&tokens), Decoded::complete(b"ababab!".to_vec()));
    }

    #[test]
    fn test_self_overlapping_copy() {
        let tokens = [Token::Literal(b'z'), Token::Match { offset: 1, length: 18 }];
        assert_eq!(decode(&tokens).data, vec![b'z'; 19]);
    }

    #[test]
    fn test_offset_before_start() {
        let tokens = [Token::Literal(b'a'), Token::Match { offset: 5, length: 3 }];
        let decoded = decode(&tokens);
        assert_eq!(decoded.data, b"a".to_vec());
        assert_eq!(
            decoded.corruption,
            Some(Corruption::InvalidMatch { index: 1, offset: 5, available: 1 })
        );
    }

    #[test]
    fn test_zero_offset() {
        let decoded = decode(&[Token::Literal(1), Token::Match { offset: 0, length: 3 }]);
        assert!(matches!(decoded.corruption, Some(Corruption::InvalidMatch { offset: 0, .. })));
    }

    #[test]
    fn test_empty() {
        assert_eq!(decode(&[]), Decoded::complete(Vec::new()));
    }
}
