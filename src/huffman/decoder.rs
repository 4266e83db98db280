use std::io::Read;

use super::canonical::CanonicalCodeTable;
use super::encoder::{EncodedBlock, BIT_COUNT_SIZE};
use crate::bits::BitReader;
use crate::error::{Corruption, Decoded, Result};

const ROOT: u32 = 0;

#[derive(Clone, Copy, Debug, Default)]
struct TrieNode {
    children: [Option<u32>; 2],
    symbol: Option<u8>,
}

/// Binary trie rebuilt from a canonical table, nodes addressed by index
pub struct DecodingTrie {
    nodes: Vec<TrieNode>,
}

impl DecodingTrie {
    /// Walk each code bit by bit from the root, creating nodes on demand
    pub fn from_table(table: &CanonicalCodeTable) -> Self {
        let mut nodes = vec![TrieNode::default()];

        for entry in table.entries() {
            let mut node = ROOT;
            for i in (0..entry.length).rev() {
                let bit = ((entry.code >> i) & 1) as usize;
                node = match nodes[node as usize].children[bit] {
                    Some(child) => child,
                    None => {
                        let child = nodes.len() as u32;
                        nodes.push(TrieNode::default());
                        nodes[node as usize].children[bit] = Some(child);
                        child
                    }
                };
            }
            nodes[node as usize].symbol = Some(entry.symbol);
        }

        Self { nodes }
    }

    #[inline]
    fn step(&self, node: u32, bit: bool) -> Option<u32> {
        self.nodes[node as usize].children[bit as usize]
    }

    #[inline]
    fn symbol(&self, node: u32) -> Option<u8> {
        self.nodes[node as usize].symbol
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Decode exactly `bit_length` bits of `bitstream`; trailing padding is never read.
///
/// A bitstream shorter than `bit_length` yields the symbols it does hold,
/// flagged as [`Corruption::TruncatedBitstream`].
pub fn decode_block(table: &CanonicalCodeTable, bit_length: u32, bitstream: &[u8]) -> Decoded {
    let expected_bits = bit_length as u64;
    if expected_bits == 0 {
        return Decoded::complete(Vec::new());
    }
    if table.is_empty() {
        return Decoded::partial(
            Vec::new(),
            Corruption::InvalidCodeTable { reason: "no symbols for a non-empty payload" },
        );
    }

    let available_bits = bitstream.len() as u64 * 8;
    let bits_to_read = expected_bits.min(available_bits);

    let trie = DecodingTrie::from_table(table);
    let mut reader = BitReader::new(bitstream);
    let mut out = Vec::with_capacity((bits_to_read / table.max_length().max(1) as u64) as usize);
    let mut node = ROOT;

    for bit_offset in 0..bits_to_read {
        let Ok(bit) = reader.read_bit() else {
            break;
        };
        let Some(next) = trie.step(node, bit) else {
            return Decoded::partial(out, Corruption::InvalidCodePath { bit_offset });
        };
        match trie.symbol(next) {
            Some(symbol) => {
                out.push(symbol);
                node = ROOT;
            }
            None => node = next,
        }
    }

    if reader.bits_read() < expected_bits {
        return Decoded::partial(
            out,
            Corruption::TruncatedBitstream { expected_bits, available_bits },
        );
    }
    if node != ROOT {
        // Declared bits end in the middle of a code
        return Decoded::partial(out, Corruption::InvalidCodePath { bit_offset: expected_bits });
    }

    Decoded::complete(out)
}

impl EncodedBlock {
    pub fn decode(&self) -> Decoded {
        decode_block(&self.table, self.bit_length, &self.payload)
    }
}

/// Result of pulling one framed block off a stream
#[derive(Debug)]
pub enum BlockFrame {
    /// Clean end of stream
    End,
    /// Header and table read; the payload may be short
    Block(EncodedBlock),
    /// Header or table unusable
    Corrupt(Corruption),
}

/// Read up to `len` bytes, stopping early only at end of stream
fn read_up_to<R: Read>(reader: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(len.min(1 << 20));
    reader.by_ref().take(len as u64).read_to_end(&mut buf)?;
    Ok(buf)
}

/// Read the next `[bit_length][table][payload]` frame
pub fn read_block<R: Read>(reader: &mut R) -> Result<BlockFrame> {
    let header = read_up_to(reader, BIT_COUNT_SIZE)?;
    if header.is_empty() {
        return Ok(BlockFrame::End);
    }
    if header.len() < BIT_COUNT_SIZE {
        return Ok(BlockFrame::Corrupt(Corruption::TruncatedHeader {
            context: "block bit count",
            needed: BIT_COUNT_SIZE,
            available: header.len(),
        }));
    }
    let bit_length = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);

    let size = read_up_to(reader, 2)?;
    if size.len() < 2 {
        return Ok(BlockFrame::Corrupt(Corruption::TruncatedHeader {
            context: "code table size",
            needed: 2,
            available: size.len(),
        }));
    }
    let symbols = u16::from_le_bytes([size[0], size[1]]) as usize;
    if symbols > 256 {
        return Ok(BlockFrame::Corrupt(Corruption::InvalidCodeTable {
            reason: "more than 256 symbols",
        }));
    }

    let pairs = read_up_to(reader, symbols * 2)?;
    if pairs.len() < symbols * 2 {
        return Ok(BlockFrame::Corrupt(Corruption::TruncatedHeader {
            context: "code table",
            needed: symbols * 2,
            available: pairs.len(),
        }));
    }
    let table = match CanonicalCodeTable::from_serialized(&pairs) {
        Ok(table) => table,
        Err(corruption) => return Ok(BlockFrame::Corrupt(corruption)),
    };

    let payload = read_up_to(reader, (bit_length as u64).div_ceil(8) as usize)?;

    Ok(BlockFrame::Block(EncodedBlock { bit_length, table, payload }))
}
