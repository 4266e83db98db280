use tracing::debug;

use super::tokens::Token;
use super::{LOOKAHEAD, MIN_MATCH, WINDOW_SIZE};

/// Longest match for the lookahead at `pos`, as `(offset, length)`.
///
/// Every start in the window is tried left to right and only a strictly
/// longer match replaces the current best, so among equal lengths the
/// earliest start wins. Candidates that differ on the first byte cannot
/// match at all and are skipped with `memchr`.
pub fn find_longest_match(data: &[u8], pos: usize) -> Option<(usize, usize)> {
    let max_len = LOOKAHEAD.min(data.len().saturating_sub(pos));
    if max_len < MIN_MATCH {
        return None;
    }

    let window_start = pos.saturating_sub(WINDOW_SIZE);
    let lookahead = &data[pos..pos + max_len];

    let mut best_len = 0;
    let mut best_start = 0;

    for rel in memchr::memchr_iter(lookahead[0], &data[window_start..pos]) {
        let start = window_start + rel;
        // The candidate may run on into the lookahead itself
        let len = data[start..]
            .iter()
            .zip(lookahead)
            .take_while(|(a, b)| a == b)
            .count();

        if len > best_len {
            best_len = len;
            best_start = start;
            if len == max_len {
                break;
            }
        }
    }

    (best_len >= MIN_MATCH).then(|| (pos - best_start, best_len))
}

/// Greedy single-pass tokenization
pub fn encode(data: &[u8]) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(data.len() / 2 + 1);
    let mut pos = 0;

    while pos < data.len() {
        match find_longest_match(data, pos) {
            Some((offset, length)) => {
                tokens.push(Token::Match { offset: offset as u16, length: length as u8 });
                pos += length;
            }
            None => {
                tokens.push(Token::Literal(data[pos]));
                pos += 1;
            }
        }
    }

    debug!(
        input_bytes = data.len(),
        tokens = tokens.len(),
        matches = tokens.iter().filter(|t| t.is_match()).count(),
        "LZ77 encoded"
    );
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_match_in_fresh_data() {
        assert_eq!(find_longest_match(b"abcdef", 3), None);
        assert_eq!(
            encode(b"abc"),
            vec![Token::Literal(b'a'), Token::Literal(b'b'), Token::Literal(b'c')]
        );
    }

    #[test]
    fn test_simple_repeat() {
        let tokens = encode(b"abcabcabc");
        assert_eq!(
            tokens,
            vec![
                Token::Literal(b'a'),
                Token::Literal(b'b'),
                Token::Literal(b'c'),
                Token::Match { offset: 3, length: 6 },
            ]
        );
    }

    #[test]
    fn test_overlapping_run() {
        let tokens = encode(&[b'x'; 10]);
        assert_eq!(tokens, vec![Token::Literal(b'x'), Token::Match { offset: 1, length: 9 }]);
    }

    #[test]
    fn test_earliest_start_wins_ties() {
        // "abc" occurs at 0 and 4; both give length 3, the one at 0 is found first
        let data = b"abcXabcYabc";
        assert_eq!(find_longest_match(data, 8), Some((8, 3)));
    }

    #[test]
    fn test_longer_later_match_replaces_earlier() {
        let data = b"abcdXabcdeYabcde";
        assert_eq!(find_longest_match(data, 11), Some((6, 5)));
    }

    #[test]
    fn test_lookahead_cap() {
        let tokens = encode(&[0u8; 100]);
        assert!(tokens
            .iter()
            .all(|t| matches!(t, Token::Literal(0) | Token::Match { offset: 1, length: 3..=18 })));
        assert_eq!(super::super::tokens::uncompressed_size(&tokens), 100);
    }

    #[test]
    fn test_window_limit() {
        // Repeat of a prefix that has slid out of the window
        let mut data: Vec<u8> = b"0123456789".to_vec();
        let mut state = 1u32;
        for _ in 0..WINDOW_SIZE {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12345);
            data.push(b'a' + (state >> 16) as u8 % 26);
        }
        let pos = data.len();
        data.extend_from_slice(b"0123456789");
        if let Some((offset, _)) = find_longest_match(&data, pos) {
            assert!(offset <= WINDOW_SIZE);
        }
    }

    #[test]
    fn test_short_tail_is_literal() {
        let data = b"abab";
        // Only two bytes of lookahead remain at pos 2
        assert_eq!(find_longest_match(data, 2), None);
    }
}
