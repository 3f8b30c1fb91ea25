use serde::{Deserialize, Serialize};

use crate::config::TimingConfig;

/// Whether an access found its block resident. A miss is a normal result, not an error
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Hit,
    Miss,
}

/// Hit and miss totals with the elapsed cycles. Can be serialised for output
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Counters {
    pub hits: u64,
    pub misses: u64,
    pub cycles: u64,
}

/// Charges cycles for each completed access
#[derive(Debug, Default)]
pub struct CycleAccountant {
    timing: TimingConfig,
    counters: Counters,
}

impl CycleAccountant {
    pub fn new(timing: TimingConfig) -> Self {
        Self {
            timing,
            counters: Counters::default(),
        }
    }

    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Hit => {
                self.counters.hits += 1;
                self.counters.cycles += self.timing.hit;
            }
            Outcome::Miss => {
                self.counters.misses += 1;
                self.counters.cycles += self.timing.miss;
            }
        }
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }
}
