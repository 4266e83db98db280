use std::io::Write;

use tracing::debug;

use super::canonical::CanonicalCodeTable;
use super::tree::{FrequencyTable, HuffmanTree};
use crate::bits::BitWriter;
use crate::error::{Error, Result};

/// Size of the bit count field that opens every block
pub const BIT_COUNT_SIZE: usize = 4;

/// One self-describing Huffman block
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedBlock {
    /// Meaningful bits in `payload`; the rest of the last byte is padding
    pub bit_length: u32,
    pub table: CanonicalCodeTable,
    /// Codes packed MSB-first
    pub payload: Vec<u8>,
}

impl EncodedBlock {
    /// Size of the block on the wire
    pub fn encoded_len(&self) -> usize {
        BIT_COUNT_SIZE + self.table.serialized_len() + self.payload.len()
    }

    /// `[bit_length: u32 LE][table][payload]`
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        out.extend_from_slice(&self.bit_length.to_le_bytes());
        self.table.write_to(&mut out);
        out.extend_from_slice(&self.payload);
        out
    }

    /// Write the framed block, returning the number of bytes written
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<usize> {
        let mut header = Vec::with_capacity(BIT_COUNT_SIZE + self.table.serialized_len());
        header.extend_from_slice(&self.bit_length.to_le_bytes());
        self.table.write_to(&mut header);
        writer.write_all(&header)?;
        writer.write_all(&self.payload)?;
        Ok(header.len() + self.payload.len())
    }
}

/// Encode one block with its own frequency table, tree and canonical codes
pub fn encode_block(block: &[u8]) -> Result<EncodedBlock> {
    let frequencies = FrequencyTable::from_bytes(block);

    let Some(tree) = HuffmanTree::build(&frequencies) else {
        return Ok(EncodedBlock {
            bit_length: 0,
            table: CanonicalCodeTable::from_pairs(&[])
                .map_err(|c| Error::Internal(c.to_string()))?,
            payload: Vec::new(),
        });
    };

    let table = CanonicalCodeTable::from_code_lengths(&tree.code_lengths())
        .map_err(|c| Error::Internal(format!("tree produced bad lengths: {c}")))?;

    let bits: u64 = frequencies
        .symbols()
        .map(|(symbol, count)| {
            let length = table.code(symbol).map(|(_, len)| len).unwrap_or(0);
            count as u64 * length as u64
        })
        .sum();
    let bit_length = u32::try_from(bits).map_err(|_| Error::BlockTooLarge { bits })?;

    // Flat lookup keeps the per-byte loop free of Option handling
    let mut codes = [(0u64, 0u8); 256];
    for entry in table.entries() {
        codes[entry.symbol as usize] = (entry.code, entry.length);
    }

    let mut writer = BitWriter::with_capacity(bits.div_ceil(8) as usize);
    for &byte in block {
        let (code, length) = codes[byte as usize];
        writer.write_bits(code, length);
    }
    debug_assert_eq!(writer.bit_len(), bits);

    debug!(
        input_bytes = block.len(),
        symbols = table.len(),
        max_code_length = table.max_length(),
        bit_length,
        "encoded Huffman block"
    );

    Ok(EncodedBlock { bit_length, table, payload: writer.finish() })
}
