/// One unit of LZ77 output
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    /// A literal byte
    Literal(u8),
    /// Copy `length` bytes starting `offset` bytes behind the output cursor
    Match { offset: u16, length: u8 },
}

impl Token {
    /// Returns the uncompressed size this token represents
    pub fn uncompressed_size(&self) -> usize {
        match self {
            Token::Literal(_) => 1,
            Token::Match { length, .. } => *length as usize,
        }
    }

    /// Bytes the token occupies on the wire, flag included
    pub fn encoded_size(&self) -> usize {
        match self {
            Token::Literal(_) => 2,
            Token::Match { .. } => 4,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Token::Match { .. })
    }
}

/// Total uncompressed size of a token sequence
pub fn uncompressed_size(tokens: &[Token]) -> usize {
    tokens.iter().map(Token::uncompressed_size).sum()
}
