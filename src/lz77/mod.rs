//! Greedy sliding-window LZ77.
//!
//! The window is never stored on its own: the encoder looks back into its
//! input and the decoder into its output.

pub mod decoder;
pub mod encoder;
pub mod format;
pub mod tokens;

pub use decoder::decode;
pub use encoder::{encode, find_longest_match};
pub use format::{parse, serialize, TokenStream};
pub use tokens::Token;

use crate::error::Decoded;

/// Largest backward offset a match may use
pub const WINDOW_SIZE: usize = 4096;

/// Longest match
pub const LOOKAHEAD: usize = 18;

/// Shortest match worth a match token
pub const MIN_MATCH: usize = 3;

/// Tokenize and serialize
pub fn compress(data: &[u8]) -> Vec<u8> {
    serialize(&encode(data))
}

/// Parse and replay. Corruption in either step ends decoding with the
/// bytes recovered so far.
pub fn decompress(data: &[u8]) -> Decoded {
    let TokenStream { tokens, corruption } = parse(data);
    let decoded = decode(&tokens);
    match corruption {
        // A bad match comes first in the output, so it wins
        Some(c) if decoded.is_complete() => Decoded::partial(decoded.data, c),
        _ => decoded,
    }
}
