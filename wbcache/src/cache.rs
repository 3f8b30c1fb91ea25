use serde::Serialize;

use crate::config::CacheGeometry;
use crate::replacement_policies::ReplacementPolicy;

/// One cache line.
///
/// An invalid block is never dirty, and `data` keeps the block size it was allocated with
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct CacheBlock {
    pub valid: bool,
    pub dirty: bool,
    pub tag: u32,
    /// Logical clock value of the last hit or refill, not wall time
    pub timestamp: u64,
    pub data: Vec<u8>,
}

impl CacheBlock {
    /// An invalid, clean, zero filled block
    pub fn new(block_size: u32) -> Self {
        Self {
            valid: false,
            dirty: false,
            tag: 0,
            timestamp: 0,
            data: vec![0; block_size as usize],
        }
    }

    /// Reads the big-endian word starting at `offset`. The offset is rounded down to a word
    pub fn word(&self, offset: u32) -> u32 {
        let start = word_start(offset);
        let mut bytes = [0; 4];
        bytes.copy_from_slice(&self.data[start..start + 4]);
        u32::from_be_bytes(bytes)
    }

    /// Overwrites the word containing `offset` with `value`, big-endian
    pub fn set_word(&mut self, offset: u32, value: u32) {
        let start = word_start(offset);
        self.data[start..start + 4].copy_from_slice(&value.to_be_bytes());
    }
}

fn word_start(offset: u32) -> usize {
    (offset & !3) as usize
}

/// The blocks of a cache, partitioned into sets, parameterised by a replacement policy
///
/// Set `i` is the `nr_ways` contiguous blocks starting at `i * nr_ways`
#[derive(Debug)]
pub struct CacheStore<R: ReplacementPolicy> {
    geometry: CacheGeometry,
    blocks: Vec<CacheBlock>,
    replacement_policy: R,
}

impl<R: ReplacementPolicy> CacheStore<R> {
    /// Allocates every block of `geometry` invalid and zero filled
    pub fn new(geometry: CacheGeometry, policy: R) -> Self {
        Self {
            blocks: vec![CacheBlock::new(geometry.block_size()); geometry.nr_blocks() as usize],
            geometry,
            replacement_policy: policy,
        }
    }

    pub fn geometry(&self) -> &CacheGeometry {
        &self.geometry
    }

    /// Index of the first block of `set_index` in the global block array
    fn set_lower_bound(&self, set_index: u32) -> usize {
        set_index as usize * self.geometry.nr_ways() as usize
    }

    /// The blocks making up one set
    pub fn set(&self, set_index: u32) -> &[CacheBlock] {
        let lower = self.set_lower_bound(set_index);
        &self.blocks[lower..lower + self.geometry.nr_ways() as usize]
    }

    /// Scans only the relevant set for a valid block holding `tag`, returning its global index
    pub fn lookup(&self, set_index: u32, tag: u32) -> Option<usize> {
        let lower = self.set_lower_bound(set_index);
        self.set(set_index)
            .iter()
            .position(|block| block.valid && block.tag == tag)
            .map(|way| lower + way)
    }

    /// Global index of the block the replacement policy gives up in `set_index`
    pub fn victim(&self, set_index: u32) -> usize {
        self.set_lower_bound(set_index) + self.replacement_policy.select_victim(self.set(set_index))
    }

    /// Marks a block as just used
    pub fn touch(&mut self, index: usize, now: u64) {
        self.replacement_policy.touch(&mut self.blocks[index], now);
    }

    pub fn block(&self, index: usize) -> &CacheBlock {
        &self.blocks[index]
    }

    pub fn block_mut(&mut self, index: usize) -> &mut CacheBlock {
        &mut self.blocks[index]
    }

    /// Every block, in index order
    pub fn blocks(&self) -> &[CacheBlock] {
        &self.blocks
    }

    /// Gets the number of blocks never filled. Useful for analysing cache performance or
    /// debugging
    pub fn invalid_block_count(&self) -> usize {
        self.blocks.iter().filter(|block| !block.valid).count()
    }
}
