#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes may be corrupt; we're looking for panics, not errors
    let _ = complab::huffman::decompress(data);
    let _ = complab::lz77::decompress(data);
    let _ = complab::rle::decode(data);
});
