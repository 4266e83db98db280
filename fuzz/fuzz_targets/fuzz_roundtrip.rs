#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // First byte picks the Huffman block size so small blocks get coverage too
    let (block_size, payload) = match data.split_first() {
        Some((&first, rest)) => (first as usize * 16 + 1, rest),
        None => (1, data),
    };

    let encoded = complab::huffman::compress(payload, block_size).unwrap();
    let decoded = complab::huffman::decompress(&encoded).unwrap();
    assert!(decoded.is_complete());
    assert_eq!(decoded.data, payload);

    let decoded = complab::lz77::decompress(&complab::lz77::compress(payload));
    assert!(decoded.is_complete());
    assert_eq!(decoded.data, payload);

    let decoded = complab::rle::decode(&complab::rle::encode(payload));
    assert!(decoded.is_complete());
    assert_eq!(decoded.data, payload);
});
