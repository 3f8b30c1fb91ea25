use thiserror::Error;

use crate::config::DEFAULT_MEMORY_SIZE;

/// Contents of the first bytes of memory when no image is supplied
pub const SEED_PATTERN: [u8; 80] = [
    0xde, 0xad, 0xbe, 0xef, 0xba, 0xda, 0xca, 0xfe,
    0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef,
    0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77,
    0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff,
    b'h', b'e', b'l', b'l', b'o', b' ', b'w', b'o',
    b'r', b'l', b'd', b'!', 0x89, 0xab, 0xcd, 0xef,
    0x50, 0x52, 0x54, 0x56, 0x58, 0x5a, 0x5c, 0x5e,
    0x60, 0x62, 0x64, 0x66, 0x68, 0x6a, 0x6c, 0x6e,
    0x70, 0x72, 0x74, 0x76, 0x78, 0x7a, 0x7c, 0x7e,
    0x80, 0x82, 0x84, 0x86, 0x88, 0x8a, 0x8c, 0x8e,
];

/// An access which would fall outside main memory
#[derive(Debug, Error, Eq, PartialEq)]
#[error("access of {len} bytes at {addr:#010x} is outside the {memory_size} byte memory")]
pub struct AddressRangeError {
    pub addr: u32,
    pub len: u32,
    pub memory_size: usize,
}

/// Byte addressable main memory backing the cache.
///
/// The cache only ever moves whole blocks in and out; word access is the cache's business
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MainMemory {
    bytes: Vec<u8>,
}

impl MainMemory {
    /// Zero filled memory of `size` bytes
    pub fn new(size: usize) -> Self {
        Self {
            bytes: vec![0; size],
        }
    }

    /// Memory of `size` bytes starting with `image`, zero filled after it
    ///
    /// Returns None if the image doesn't fit
    pub fn with_image(size: usize, image: &[u8]) -> Option<Self> {
        if image.len() > size {
            return None;
        }
        let mut memory = Self::new(size);
        memory.bytes[..image.len()].copy_from_slice(image);
        Some(memory)
    }

    /// Memory of `size` bytes starting with [`SEED_PATTERN`], truncated if `size` is smaller
    pub fn seeded(size: usize) -> Self {
        let mut memory = Self::new(size);
        let len = SEED_PATTERN.len().min(size);
        memory.bytes[..len].copy_from_slice(&SEED_PATTERN[..len]);
        memory
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Checks that `len` bytes from `addr` lie inside memory, without touching anything
    pub fn check_range(&self, addr: u32, len: u32) -> Result<(), AddressRangeError> {
        if addr as u64 + len as u64 > self.bytes.len() as u64 {
            return Err(AddressRangeError {
                addr,
                len,
                memory_size: self.bytes.len(),
            });
        }
        Ok(())
    }

    /// Borrows `len` bytes starting at `addr`
    pub fn read(&self, addr: u32, len: u32) -> Result<&[u8], AddressRangeError> {
        self.check_range(addr, len)?;
        let start = addr as usize;
        Ok(&self.bytes[start..start + len as usize])
    }

    /// Copies a block out of memory into `block`. The block's length decides how much is read
    pub fn read_block(&self, base: u32, block: &mut [u8]) -> Result<(), AddressRangeError> {
        block.copy_from_slice(self.read(base, block.len() as u32)?);
        Ok(())
    }

    /// Writes a whole block back to memory at `base`
    pub fn write_block(&mut self, base: u32, block: &[u8]) -> Result<(), AddressRangeError> {
        self.check_range(base, block.len() as u32)?;
        let start = base as usize;
        self.bytes[start..start + block.len()].copy_from_slice(block);
        Ok(())
    }
}

impl Default for MainMemory {
    fn default() -> Self {
        Self::seeded(DEFAULT_MEMORY_SIZE)
    }
}
