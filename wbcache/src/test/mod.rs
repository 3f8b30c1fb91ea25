mod command;
mod tests;

use crate::memory::MainMemory;
use crate::simulator::Simulator;
use crate::config::TimingConfig;

pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A simulator over the default seeded 8 KiB memory, initialised with the given geometry
pub(crate) fn initialised(words_per_block: u32, nr_blocks: u32, nr_ways: u32) -> Simulator {
    init_logger();
    let mut sim = Simulator::new(MainMemory::default(), TimingConfig::default());
    sim.init(words_per_block, nr_blocks, nr_ways).unwrap();
    sim
}
