use log::debug;

use crate::cache::CacheBlock;
use crate::config::CacheGeometry;
use crate::memory::{AddressRangeError, MainMemory};

/// Flushes `victim` to memory if it holds modified data, leaving it clean.
///
/// The block is written to the base address rebuilt from its own tag and `set_index`, never to
/// the address whose miss caused the eviction
///
/// # Arguments
///
/// * `victim`: The block about to be reused
/// * `set_index`: The set the victim lives in
/// * `geometry`: The cache geometry, for rebuilding the address
/// * `memory`: Main memory
///
/// returns: Result<Option<u32>, AddressRangeError>, the address written to if a write-back happened
pub fn flush(
    victim: &mut CacheBlock,
    set_index: u32,
    geometry: &CacheGeometry,
    memory: &mut MainMemory,
) -> Result<Option<u32>, AddressRangeError> {
    if !(victim.valid && victim.dirty) {
        return Ok(None);
    }
    let base = geometry.block_base(victim.tag, set_index);
    memory.write_block(base, &victim.data)?;
    victim.dirty = false;
    debug!("wrote back block with tag {:#x} from set {set_index} to {base:#010x}", victim.tag);
    Ok(Some(base))
}

/// Loads the whole block at `base` into `block` and marks it valid and clean for `tag`
pub fn refill(
    block: &mut CacheBlock,
    base: u32,
    tag: u32,
    memory: &MainMemory,
) -> Result<(), AddressRangeError> {
    memory.read_block(base, &mut block.data)?;
    block.valid = true;
    block.dirty = false;
    block.tag = tag;
    Ok(())
}
