//! Canonical code assignment and the serialized `(symbol, length)` table.

use crate::error::Corruption;

/// Longest code the table can represent
pub const MAX_CODE_LENGTH: u8 = 64;

/// One canonical code
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CanonicalCode {
    pub symbol: u8,
    pub length: u8,
    pub code: u64,
}

/// Canonical Huffman code table for one block
///
/// Fully determined by the `(symbol, length)` pairs: symbols are sorted by
/// (length, symbol) and receive consecutive integers, the running value being
/// shifted left by the length difference whenever the length grows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanonicalCodeTable {
    /// Codes in canonical order
    entries: Vec<CanonicalCode>,
    /// Index into `entries` per symbol
    index: [Option<u8>; 256],
}

impl CanonicalCodeTable {
    /// Build from per-symbol lengths (0 = symbol unused)
    pub fn from_code_lengths(lengths: &[u8; 256]) -> Result<Self, Corruption> {
        let pairs: Vec<(u8, u8)> = lengths
            .iter()
            .enumerate()
            .filter(|(_, &len)| len > 0)
            .map(|(sym, &len)| (sym as u8, len))
            .collect();
        Self::from_pairs(&pairs)
    }

    /// Build from `(symbol, length)` pairs in any order
    pub fn from_pairs(pairs: &[(u8, u8)]) -> Result<Self, Corruption> {
        let mut sorted = pairs.to_vec();
        sorted.sort_by_key(|&(sym, len)| (len, sym));

        let mut entries = Vec::with_capacity(sorted.len());
        let mut index = [None; 256];

        // u128 so that an oversubscribed 64-bit length is caught, not wrapped
        let mut code = 0u128;
        let mut prev_len = 0u8;

        for (i, &(symbol, length)) in sorted.iter().enumerate() {
            if length == 0 {
                return Err(Corruption::InvalidCodeTable { reason: "zero code length" });
            }
            if length > MAX_CODE_LENGTH {
                return Err(Corruption::InvalidCodeTable { reason: "code length exceeds 64 bits" });
            }
            if index[symbol as usize].is_some() {
                return Err(Corruption::InvalidCodeTable { reason: "duplicate symbol" });
            }

            code <<= length - prev_len;
            if code >> length != 0 {
                return Err(Corruption::InvalidCodeTable { reason: "oversubscribed code lengths" });
            }

            entries.push(CanonicalCode { symbol, length, code: code as u64 });
            index[symbol as usize] = Some(i as u8);

            code += 1;
            prev_len = length;
        }

        Ok(Self { entries, index })
    }

    /// Parse the serialized pairs (`2 * count` bytes, `[symbol][length]` each)
    pub fn from_serialized(pairs: &[u8]) -> Result<Self, Corruption> {
        let pairs: Vec<(u8, u8)> = pairs.chunks_exact(2).map(|p| (p[0], p[1])).collect();
        Self::from_pairs(&pairs)
    }

    /// Append `[count: u16 LE]` followed by the pairs in canonical order
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&(self.entries.len() as u16).to_le_bytes());
        for entry in &self.entries {
            out.push(entry.symbol);
            out.push(entry.length);
        }
    }

    /// Bytes taken by [`write_to`](Self::write_to)
    pub fn serialized_len(&self) -> usize {
        2 + 2 * self.entries.len()
    }

    /// `(code, length)` for `symbol`, if present
    #[inline]
    pub fn code(&self, symbol: u8) -> Option<(u64, u8)> {
        self.index[symbol as usize].map(|i| {
            let entry = &self.entries[i as usize];
            (entry.code, entry.length)
        })
    }

    /// Codes in canonical order
    pub fn entries(&self) -> &[CanonicalCode] {
        &self.entries
    }

    pub fn max_length(&self) -> u8 {
        self.entries.last().map(|e| e.length).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
