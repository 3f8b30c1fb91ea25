use log::{debug, trace};
use thiserror::Error;

use crate::cache::{CacheBlock, CacheStore};
use crate::config::{CacheGeometry, ConfigError, TimingConfig};
use crate::memory::{AddressRangeError, MainMemory};
use crate::replacement_policies::LeastRecentlyUsed;
use crate::stats::{Counters, CycleAccountant, Outcome};
use crate::write_back;

/// Reasons a load or store can't be carried out. No state changes when one is returned
#[derive(Debug, Error, Eq, PartialEq)]
pub enum AccessError {
    #[error("the cache has not been initialised")]
    Uninitialised,
    #[error(transparent)]
    AddressRange(#[from] AddressRangeError),
}

/// The simulator owns the cache, main memory and the counters of one simulated core.
///
/// It is built uninitialised around a memory, then `init` fixes the cache geometry once. Every
/// access after that goes through `load_word` or `store_word`; the remaining methods only observe
#[derive(Debug)]
pub struct Simulator {
    cache: Option<CacheStore<LeastRecentlyUsed>>,
    memory: MainMemory,
    accountant: CycleAccountant,
    // Logical time for LRU, one tick per access
    clock: u64,
}

impl Simulator {
    /// Creates a simulator over `memory`, charging cycles according to `timing`
    pub fn new(memory: MainMemory, timing: TimingConfig) -> Self {
        Self {
            cache: None,
            memory,
            accountant: CycleAccountant::new(timing),
            clock: 0,
        }
    }

    /// Fixes the cache geometry and allocates the blocks, all invalid, clean and zero filled
    ///
    /// # Arguments
    ///
    /// * `words_per_block`: Words per block, a positive power of two
    /// * `nr_blocks`: Total number of blocks
    /// * `nr_ways`: Associativity
    ///
    /// returns: Result<(), ConfigError>. On error the simulator stays uninitialised
    pub fn init(&mut self, words_per_block: u32, nr_blocks: u32, nr_ways: u32) -> Result<(), ConfigError> {
        if self.cache.is_some() {
            return Err(ConfigError::AlreadyInitialised);
        }
        let geometry = CacheGeometry::new(words_per_block, nr_blocks, nr_ways)?;
        debug!(
            "initialised {} sets of {} ways, {} byte blocks, tag/index/offset bits {}/{}/{}",
            geometry.nr_sets(),
            geometry.nr_ways(),
            geometry.block_size(),
            geometry.tag_bits(),
            geometry.index_bits(),
            geometry.offset_bits()
        );
        self.cache = Some(CacheStore::new(geometry, LeastRecentlyUsed));
        Ok(())
    }

    /// Simulates a `lw` of the word at `addr`
    pub fn load_word(&mut self, addr: u32) -> Result<Outcome, AccessError> {
        self.access(addr, None)
    }

    /// Simulates a `sw` of `value` to the word at `addr`. Write-back, write-allocate
    pub fn store_word(&mut self, addr: u32, value: u32) -> Result<Outcome, AccessError> {
        self.access(addr, Some(value))
    }

    fn access(&mut self, addr: u32, store: Option<u32>) -> Result<Outcome, AccessError> {
        let cache = self.cache.as_mut().ok_or(AccessError::Uninitialised)?;
        let geometry = *cache.geometry();
        let decoded = geometry.decode(addr);
        let base = geometry.align(addr);
        // Checked up front so a bad address leaves everything untouched
        self.memory.check_range(base, geometry.block_size())?;

        let (index, outcome) = match cache.lookup(decoded.set_index, decoded.tag) {
            Some(index) => (index, Outcome::Hit),
            None => {
                let index = cache.victim(decoded.set_index);
                let victim = cache.block_mut(index);
                write_back::flush(victim, decoded.set_index, &geometry, &mut self.memory)?;
                write_back::refill(victim, base, decoded.tag, &self.memory)?;
                (index, Outcome::Miss)
            }
        };
        self.clock += 1;
        cache.touch(index, self.clock);
        if let Some(value) = store {
            let block = cache.block_mut(index);
            block.set_word(decoded.offset, value);
            block.dirty = true;
        }
        self.accountant.record(outcome);
        trace!(
            "{} {addr:#010x} -> {outcome:?} (set {}, block {index})",
            if store.is_some() { "sw" } else { "lw" },
            decoded.set_index
        );
        Ok(outcome)
    }

    /// Every cache block in index order. Empty before `init`
    pub fn snapshot(&self) -> &[CacheBlock] {
        match &self.cache {
            Some(cache) => cache.blocks(),
            None => &[],
        }
    }

    /// Current hit, miss and cycle totals
    pub fn counters(&self) -> Counters {
        self.accountant.counters()
    }

    /// Reads main memory directly, bypassing the cache
    pub fn memory_read(&self, addr: u32, len: u32) -> Result<&[u8], AddressRangeError> {
        self.memory.read(addr, len)
    }

    /// The geometry fixed by `init`, if it has run
    pub fn geometry(&self) -> Option<&CacheGeometry> {
        self.cache.as_ref().map(|cache| cache.geometry())
    }

    /// Gets the number of blocks never filled, zero before `init`
    pub fn invalid_block_count(&self) -> usize {
        self.cache.as_ref().map_or(0, |cache| cache.invalid_block_count())
    }

    pub fn memory(&self) -> &MainMemory {
        &self.memory
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new(MainMemory::default(), TimingConfig::default())
    }
}
