use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bytes in a word. The simulated machine is 32 bit
pub const BYTES_PER_WORD: u32 = 4;

/// Default size of main memory, 8 KiB
pub const DEFAULT_MEMORY_SIZE: usize = 8 << 10;

/// Cycles charged for a cache hit when no timing is configured
pub const DEFAULT_CYCLES_HIT: u64 = 1;

/// Cycles charged for a cache miss when no timing is configured
pub const DEFAULT_CYCLES_MISS: u64 = 100;

/// Top level configuration, usually parsed from JSON. Every section may be omitted
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SimulatorConfig {
    /// The cache geometry. When absent the driver reads it from the head of its input
    #[serde(default)]
    pub cache: Option<CacheConfig>,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub timing: TimingConfig,
}

/// The three parameters a cache is built from
#[derive(Debug, Copy, Clone, Deserialize, Serialize, Eq, PartialEq)]
pub struct CacheConfig {
    pub words_per_block: u32,
    pub nr_blocks: u32,
    pub nr_ways: u32,
}

/// Main memory parameters
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MemoryConfig {
    #[serde(default = "MemoryConfig::default_size")]
    pub size: usize,
    /// Raw binary file copied into the start of memory instead of the default seed
    #[serde(default)]
    pub image: Option<String>,
}

impl MemoryConfig {
    fn default_size() -> usize {
        DEFAULT_MEMORY_SIZE
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_MEMORY_SIZE,
            image: None,
        }
    }
}

/// Cycle costs charged by the accountant
#[derive(Debug, Copy, Clone, Deserialize, Serialize, Eq, PartialEq)]
pub struct TimingConfig {
    #[serde(default = "TimingConfig::default_hit")]
    pub hit: u64,
    #[serde(default = "TimingConfig::default_miss")]
    pub miss: u64,
}

impl TimingConfig {
    fn default_hit() -> u64 {
        DEFAULT_CYCLES_HIT
    }

    fn default_miss() -> u64 {
        DEFAULT_CYCLES_MISS
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            hit: DEFAULT_CYCLES_HIT,
            miss: DEFAULT_CYCLES_MISS,
        }
    }
}

/// Reasons a cache geometry can be rejected
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    #[error("the number of ways must be at least 1")]
    NoWays,
    #[error("{nr_blocks} blocks cannot be split evenly into {nr_ways}-way sets")]
    UnevenSets { nr_blocks: u32, nr_ways: u32 },
    #[error("words per block must be a positive power of two, got {0}")]
    WordsPerBlock(u32),
    #[error("the number of sets must be a power of two, got {0}")]
    SetCount(u32),
    #[error("offset and index need {0} bits, leaving no tag bits in a 32-bit address")]
    NoTagBits(u32),
    #[error("the simulator has already been initialised")]
    AlreadyInitialised,
}

/// An address split into its three fields
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DecodedAddress {
    pub tag: u32,
    pub set_index: u32,
    pub offset: u32,
}

/// The validated, immutable shape of a cache, with the derived bit widths used for decoding.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
pub struct CacheGeometry {
    nr_blocks: u32,
    nr_ways: u32,
    nr_sets: u32,
    block_size: u32,
    offset_bits: u32,
    index_bits: u32,
}

impl CacheGeometry {
    /// Validates the parameters and derives the rest of the geometry
    ///
    /// # Arguments
    ///
    /// * `words_per_block`: Words held by each block, a positive power of two
    /// * `nr_blocks`: Total blocks in the cache
    /// * `nr_ways`: Blocks per set. 1 is direct mapped, `nr_blocks` is fully associative
    ///
    /// returns: Result<CacheGeometry, ConfigError>
    pub fn new(words_per_block: u32, nr_blocks: u32, nr_ways: u32) -> Result<Self, ConfigError> {
        if nr_ways < 1 {
            return Err(ConfigError::NoWays);
        }
        if nr_blocks % nr_ways != 0 {
            return Err(ConfigError::UnevenSets { nr_blocks, nr_ways });
        }
        if !words_per_block.is_power_of_two() {
            return Err(ConfigError::WordsPerBlock(words_per_block));
        }
        let nr_sets = nr_blocks / nr_ways;
        if !nr_sets.is_power_of_two() {
            return Err(ConfigError::SetCount(nr_sets));
        }
        let offset_bits = words_per_block.trailing_zeros() + BYTES_PER_WORD.trailing_zeros();
        let index_bits = nr_sets.trailing_zeros();
        if offset_bits + index_bits >= u32::BITS {
            return Err(ConfigError::NoTagBits(offset_bits + index_bits));
        }
        Ok(Self {
            nr_blocks,
            nr_ways,
            nr_sets,
            block_size: 1 << offset_bits,
            offset_bits,
            index_bits,
        })
    }

    /// Splits an address into tag, set index and block offset
    ///
    /// The shifts are done on 64-bit values so a width of 32 never overflows the shift
    ///
    /// # Examples
    ///
    /// ```
    /// use wbcache::config::CacheGeometry;
    /// let geometry = CacheGeometry::new(4, 16, 2).unwrap();
    /// let decoded = geometry.decode(0x1234);
    /// assert_eq!((decoded.tag, decoded.set_index, decoded.offset), (0x24, 3, 4));
    /// ```
    pub fn decode(&self, addr: u32) -> DecodedAddress {
        let addr = addr as u64;
        DecodedAddress {
            tag: (addr >> (self.offset_bits + self.index_bits)) as u32,
            set_index: ((addr >> self.offset_bits) & (self.nr_sets as u64 - 1)) as u32,
            offset: (addr & (self.block_size as u64 - 1)) as u32,
        }
    }

    /// Rebuilds the base address of the block holding `tag` in set `set_index`.
    pub fn block_base(&self, tag: u32, set_index: u32) -> u32 {
        let base = ((tag as u64) << (self.offset_bits + self.index_bits))
            | ((set_index as u64) << self.offset_bits);
        base as u32
    }

    /// Rounds an address down to the start of its block
    pub fn align(&self, addr: u32) -> u32 {
        addr & !(self.block_size - 1)
    }

    pub fn nr_blocks(&self) -> u32 {
        self.nr_blocks
    }

    pub fn nr_ways(&self) -> u32 {
        self.nr_ways
    }

    pub fn nr_sets(&self) -> u32 {
        self.nr_sets
    }

    /// Block size in bytes
    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    pub fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    pub fn index_bits(&self) -> u32 {
        self.index_bits
    }

    pub fn tag_bits(&self) -> u32 {
        u32::BITS - self.offset_bits - self.index_bits
    }
}
