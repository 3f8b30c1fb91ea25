use crate::cache::CacheBlock;

/// A generic trait for replacement policies. Can be used to parameterise a CacheStore.
///
/// Recency is kept on the blocks themselves as a logical timestamp, so a policy only has to
/// decide which block of a set to give up
pub trait ReplacementPolicy {
    /// Updates a block when it is hit or refilled
    ///
    /// # Arguments
    ///
    /// * `block`: The block which was used
    /// * `now`: The current value of the logical clock
    ///
    /// returns: ()
    fn touch(&mut self, block: &mut CacheBlock, now: u64) {
        block.timestamp = now;
    }

    /// Picks the way of `set` to replace on a miss
    ///
    /// # Arguments
    ///
    /// * `set`: The blocks of one set, in way order
    ///
    /// returns: usize, the way index within the set
    fn select_victim(&self, set: &[CacheBlock]) -> usize;
}

/// Least Recently Used replacement policy
///
/// Invalid blocks are always taken first, lowest way first. Otherwise the block with the oldest
/// timestamp goes, with ties going to the lowest way
#[derive(Debug, Default, Copy, Clone)]
pub struct LeastRecentlyUsed;

impl ReplacementPolicy for LeastRecentlyUsed {
    fn select_victim(&self, set: &[CacheBlock]) -> usize {
        if let Some(way) = set.iter().position(|block| !block.valid) {
            return way;
        }
        let mut min_value = u64::MAX;
        let mut min_way = 0;
        let mut way = 0;
        // Strict comparison keeps the lowest way on ties
        while way < set.len() {
            if set[way].timestamp < min_value {
                min_value = set[way].timestamp;
                min_way = way;
            }
            way += 1;
        }
        min_way
    }
}
