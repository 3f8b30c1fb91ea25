//! # WbCache
//!
//! WbCache simulates a single level, set associative cache in front of a byte addressable main
//! memory, as used for teaching how caches work
//!
//! The cache is write-back and write-allocate with least recently used replacement. Hits and
//! misses are counted and charged a fixed number of cycles. The [`simulator::Simulator`] owns
//! all of the state, so independent instances can be run side by side

/// Contains the cache blocks and the set-partitioned store holding them
pub mod cache;

/// Contains the parser for the textual driver commands, carrying them out, and scripts of them
pub mod command;

/// Contains the text listings of the cache, memory and counters shown by the driver
pub mod display;

/// Contains the configuration, both the JSON input format and the validated cache geometry used
/// for address decoding
pub mod config;

/// Contains loading main memory from an image file
pub mod io;

/// Contains main memory
pub mod memory;

/// Contains the replacement policies, with a trait for implementing custom replacement policies
pub mod replacement_policies;

/// Contains the simulator, which ties the cache, memory and counters together
pub mod simulator;

/// Contains the outcome of an access and the cycle accounting
pub mod stats;

/// Contains writing dirty blocks back to memory and refilling blocks from it
pub mod write_back;

#[cfg(test)]
mod test;

/// Contains utilities for running scenario tests and benchmarks.
pub mod util;
