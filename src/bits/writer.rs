/// Bit-level writer for Huffman payloads
///
/// Writes bits MSB-first: the first bit written lands in the most significant
/// bit of the first byte. The final byte is padded with zero bits.
pub struct BitWriter {
    /// Accumulated output bytes
    output: Vec<u8>,
    /// Current byte being built
    current_byte: u8,
    /// Bits written to current byte (0-7)
    bits_in_byte: u8,
    /// Total bits written, padding excluded
    bit_len: u64,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::with_capacity(65536)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { output: Vec::with_capacity(capacity), current_byte: 0, bits_in_byte: 0, bit_len: 0 }
    }

    /// Write the low `n` bits (0-64) of `value`, most significant first
    pub fn write_bits(&mut self, value: u64, n: u8) {
        debug_assert!(n <= 64);

        let mut remaining = n;
        while remaining > 0 {
            let space = 8 - self.bits_in_byte;
            let to_write = remaining.min(space);

            let chunk = (value >> (remaining - to_write)) & ((1u64 << to_write) - 1);
            self.current_byte |= (chunk as u8) << (space - to_write);

            self.bits_in_byte += to_write;
            remaining -= to_write;

            if self.bits_in_byte == 8 {
                self.output.push(self.current_byte);
                self.current_byte = 0;
                self.bits_in_byte = 0;
            }
        }
        self.bit_len += n as u64;
    }

    /// Write a single bit
    #[inline]
    pub fn write_bit(&mut self, bit: bool) {
        self.write_bits(bit as u64, 1);
    }

    /// Pad to byte boundary with zero bits
    pub fn align_to_byte(&mut self) {
        if self.bits_in_byte > 0 {
            self.output.push(self.current_byte);
            self.current_byte = 0;
            self.bits_in_byte = 0;
        }
    }

    /// Finish and return the output bytes
    pub fn finish(mut self) -> Vec<u8> {
        self.align_to_byte();
        self.output
    }

    /// Number of meaningful bits written so far
    pub fn bit_len(&self) -> u64 {
        self.bit_len
    }

    /// Get current output length in bytes (including partial byte)
    pub fn len(&self) -> usize {
        self.output.len() + if self.bits_in_byte > 0 { 1 } else { 0 }
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.bit_len == 0
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_bits_msb_first() {
        let mut writer = BitWriter::new();
        writer.write_bits(0b101, 3);
        writer.write_bits(0b10011, 5);
        assert_eq!(writer.bit_len(), 8);
        assert_eq!(writer.finish(), vec![0b1011_0011]);
    }

    #[test]
    fn test_write_cross_byte() {
        let mut writer = BitWriter::new();
        writer.write_bits(0xFFF, 12);
        assert_eq!(writer.len(), 2);
        assert_eq!(writer.finish(), vec![0xFF, 0xF0]);
    }

    #[test]
    fn test_padding_is_zero() {
        let mut writer = BitWriter::new();
        writer.write_bit(true);
        assert_eq!(writer.bit_len(), 1);
        assert_eq!(writer.finish(), vec![0x80]);
    }

    #[test]
    fn test_long_code() {
        let mut writer = BitWriter::new();
        writer.write_bits(u64::MAX, 64);
        writer.write_bits(0, 4);
        assert_eq!(writer.bit_len(), 68);
        let out = writer.finish();
        assert_eq!(out.len(), 9);
        assert!(out[..8].iter().all(|&b| b == 0xFF));
        assert_eq!(out[8], 0x00);
    }

    #[test]
    fn test_empty() {
        let writer = BitWriter::new();
        assert!(writer.is_empty());
        assert!(writer.finish().is_empty());
    }
}
