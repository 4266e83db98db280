use crate::error::{Error, Result};
use std::io::Read;

/// Bit-level reader for Huffman payloads
///
/// Reads bits MSB-first, the mirror of [`BitWriter`](super::BitWriter).
pub struct BitReader<R: Read> {
    reader: R,
    /// Low `bits_available` bits are pending, the highest of them is next
    buffer: u64,
    /// Number of valid bits in buffer (0-64)
    bits_available: u8,
    /// Total bits consumed
    bits_read: u64,
}

impl<R: Read> BitReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, buffer: 0, bits_available: 0, bits_read: 0 }
    }

    /// Ensure at least `n` bits are available in buffer
    ///
    /// Refills up to 7 bytes at once so single-bit reads stay cheap.
    fn fill_buffer(&mut self, n: u8) -> Result<()> {
        debug_assert!(n <= 57, "Cannot request more than 57 bits at once");

        if self.bits_available >= n {
            return Ok(());
        }

        if self.bits_available <= 56 {
            let bytes_to_read = ((64 - self.bits_available) / 8) as usize;
            let mut bulk_buf = [0u8; 8];

            match self.reader.read(&mut bulk_buf[..bytes_to_read]) {
                Ok(0) => {}
                Ok(bytes_read) => {
                    for &byte in &bulk_buf[..bytes_read] {
                        self.buffer = (self.buffer << 8) | byte as u64;
                        self.bits_available += 8;
                    }
                    if self.bits_available >= n {
                        return Ok(());
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(e) => return Err(Error::Io(e)),
            }
        }

        // Byte-by-byte for the remainder and EOF detection
        while self.bits_available < n {
            let mut byte = [0u8; 1];
            match self.reader.read_exact(&mut byte) {
                Ok(()) => {
                    self.buffer = (self.buffer << 8) | byte[0] as u64;
                    self.bits_available += 8;
                }
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    return Err(Error::UnexpectedEof);
                }
                Err(e) => return Err(Error::Io(e)),
            }
        }
        Ok(())
    }

    /// Read `n` bits (0-32), first bit read becomes the most significant
    pub fn read_bits(&mut self, n: u8) -> Result<u32> {
        debug_assert!(n <= 32, "Cannot read more than 32 bits at once");

        if n == 0 {
            return Ok(0);
        }

        self.fill_buffer(n)?;

        let shift = self.bits_available - n;
        let result = ((self.buffer >> shift) & ((1u64 << n) - 1)) as u32;
        self.bits_available -= n;
        self.bits_read += n as u64;

        Ok(result)
    }

    /// Read a single bit
    #[inline]
    pub fn read_bit(&mut self) -> Result<bool> {
        Ok(self.read_bits(1)? != 0)
    }

    /// Total bits consumed so far
    pub fn bits_read(&self) -> u64 {
        self.bits_read
    }

    /// Get the inner reader (consumes self)
    pub fn into_inner(self) -> R {
        self.reader
    }
}
