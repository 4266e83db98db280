//! Frequency counting and greedy Huffman tree construction.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Occurrence count of every byte value within one block
#[derive(Clone, Debug)]
pub struct FrequencyTable {
    counts: [u32; 256],
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self { counts: [0; 256] }
    }

    /// Count every byte of `block`
    pub fn from_bytes(block: &[u8]) -> Self {
        let mut table = Self::new();
        for &byte in block {
            table.counts[byte as usize] += 1;
        }
        table
    }

    pub fn count(&self, symbol: u8) -> u32 {
        self.counts[symbol as usize]
    }

    /// Symbols that occur at least once, ascending, with their counts
    pub fn symbols(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.counts.iter().enumerate().filter(|(_, &c)| c > 0).map(|(s, &c)| (s as u8, c))
    }

    pub fn distinct_symbols(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Huffman tree owned top-down by its root
///
/// Internal nodes always carry a `zero` child. The `one` child is missing
/// only on the synthetic root that gives a lone symbol a 1-bit code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HuffmanTree {
    Leaf { symbol: u8, weight: u64 },
    Internal { weight: u64, zero: Box<HuffmanTree>, one: Option<Box<HuffmanTree>> },
}

/// Merge queue entry, ordered by weight then creation order
struct QueueEntry {
    weight: u64,
    seq: u32,
    node: HuffmanTree,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.seq == other.seq
    }
}
impl Eq for QueueEntry {}
impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight.cmp(&other.weight).then(self.seq.cmp(&other.seq))
    }
}

impl HuffmanTree {
    /// Build the tree by repeatedly merging the two lightest nodes.
    ///
    /// Ties go to the node created first: leaves in ascending symbol order,
    /// then internal nodes in the order they were merged. The first node
    /// popped becomes the `zero` child. Returns `None` for an empty table.
    pub fn build(frequencies: &FrequencyTable) -> Option<Self> {
        let mut seq = 0u32;
        let mut heap: BinaryHeap<Reverse<QueueEntry>> = frequencies
            .symbols()
            .map(|(symbol, count)| {
                let weight = count as u64;
                let entry = QueueEntry { weight, seq, node: HuffmanTree::Leaf { symbol, weight } };
                seq += 1;
                Reverse(entry)
            })
            .collect();

        if heap.len() == 1 {
            let Reverse(only) = heap.pop()?;
            return Some(HuffmanTree::Internal {
                weight: only.weight,
                zero: Box::new(only.node),
                one: None,
            });
        }

        while heap.len() > 1 {
            let (Some(Reverse(zero)), Some(Reverse(one))) = (heap.pop(), heap.pop()) else {
                break;
            };
            let weight = zero.weight + one.weight;
            heap.push(Reverse(QueueEntry {
                weight,
                seq,
                node: HuffmanTree::Internal {
                    weight,
                    zero: Box::new(zero.node),
                    one: Some(Box::new(one.node)),
                },
            }));
            seq += 1;
        }

        heap.pop().map(|Reverse(root)| root.node)
    }

    pub fn weight(&self) -> u64 {
        match self {
            HuffmanTree::Leaf { weight, .. } | HuffmanTree::Internal { weight, .. } => *weight,
        }
    }

    /// Raw prefix codes as `(symbol, code, length)`, found by walking the tree
    ///
    /// Only the lengths survive canonicalization.
    pub fn raw_codes(&self) -> Vec<(u8, u64, u8)> {
        fn walk(node: &HuffmanTree, code: u64, depth: u8, out: &mut Vec<(u8, u64, u8)>) {
            match node {
                HuffmanTree::Leaf { symbol, .. } => out.push((*symbol, code, depth.max(1))),
                HuffmanTree::Internal { zero, one, .. } => {
                    walk(zero, code << 1, depth + 1, out);
                    if let Some(one) = one {
                        walk(one, (code << 1) | 1, depth + 1, out);
                    }
                }
            }
        }

        let mut codes = Vec::new();
        walk(self, 0, 0, &mut codes);
        codes
    }

    /// Code length of every symbol, 0 for symbols not in the tree
    pub fn code_lengths(&self) -> [u8; 256] {
        let mut lengths = [0u8; 256];
        for (symbol, _, length) in self.raw_codes() {
            lengths[symbol as usize] = length;
        }
        lengths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_table() {
        let table = FrequencyTable::from_bytes(b"abracadabra");
        assert_eq!(table.count(b'a'), 5);
        assert_eq!(table.count(b'b'), 2);
        assert_eq!(table.count(b'z'), 0);
        assert_eq!(table.distinct_symbols(), 5);
        let symbols: Vec<u8> = table.symbols().map(|(s, _)| s).collect();
        assert_eq!(symbols, b"abcdr".to_vec());
    }

    #[test]
    fn test_empty_table_has_no_tree() {
        assert!(FrequencyTable::new().is_empty());
        assert!(HuffmanTree::build(&FrequencyTable::new()).is_none());
    }

    #[test]
    fn test_single_symbol_gets_one_bit() {
        let table = FrequencyTable::from_bytes(&[0x41; 1000]);
        let tree = HuffmanTree::build(&table).unwrap();
        assert_eq!(tree.weight(), 1000);
        let lengths = tree.code_lengths();
        assert_eq!(lengths[0x41], 1);
        assert_eq!(lengths.iter().filter(|&&l| l > 0).count(), 1);
    }

    #[test]
    fn test_skewed_lengths() {
        // a:5 b:2 r:2 c:1 d:1
        let tree = HuffmanTree::build(&FrequencyTable::from_bytes(b"abracadabra")).unwrap();
        let lengths = tree.code_lengths();
        assert_eq!(tree.weight(), 11);
        assert_eq!(lengths[b'a' as usize], 1);
        assert!(lengths[b'c' as usize] >= lengths[b'b' as usize]);
        assert!(lengths[b'd' as usize] >= lengths[b'r' as usize]);
    }

    #[test]
    fn test_equal_weights_are_balanced() {
        let data: Vec<u8> = (0..=255u8).collect();
        let tree = HuffmanTree::build(&FrequencyTable::from_bytes(&data)).unwrap();
        assert!(tree.code_lengths().iter().all(|&l| l == 8));
    }

    #[test]
    fn test_raw_codes_are_prefix_free() {
        let tree = HuffmanTree::build(&FrequencyTable::from_bytes(b"mississippi river")).unwrap();
        let codes = tree.raw_codes();
        for (i, &(_, a, la)) in codes.iter().enumerate() {
            for &(_, b, lb) in &codes[i + 1..] {
                let (short, ls, long, ll) = if la <= lb { (a, la, b, lb) } else { (b, lb, a, la) };
                assert_ne!(long >> (ll - ls), short, "one code prefixes another");
            }
        }
    }

    #[test]
    fn test_build_is_deterministic() {
        let table = FrequencyTable::from_bytes(b"the quick brown fox jumps over the lazy dog");
        let a = HuffmanTree::build(&table).unwrap();
        let b = HuffmanTree::build(&table).unwrap();
        assert_eq!(a, b);
    }
}
