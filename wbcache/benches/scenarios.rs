use std::fs;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use wbcache::command::Script;
use wbcache::simulator::Simulator;
use wbcache::util::get_scenarios;

/// Replays every scenario script
pub fn scenario_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Scenarios");

    get_scenarios()
        .unwrap()
        .iter()
        .for_each(|case| {
            let script = Script::parse(&fs::read_to_string(&case.script).unwrap(), true).unwrap();
            let header = script.header.unwrap();
            group.bench_with_input(BenchmarkId::new("Scenario", case.name.clone()), &script, |bench, script| {
                bench.iter(|| {
                    let mut simulator = Simulator::default();
                    simulator.init(header.words_per_block, header.nr_blocks, header.nr_ways).unwrap();
                    script.run(&mut simulator)
                });
            });
        });
}

/// Streams loads and stores over the whole of memory, for several associativities
pub fn streaming_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Streaming");

    for ways in [1u32, 2, 4, 16, 64] {
        group.bench_with_input(BenchmarkId::new("Ways", ways), &ways, |bench, &ways| {
            bench.iter(|| {
                let mut simulator = Simulator::default();
                simulator.init(4, 64, ways).unwrap();
                let mut addr = 0u32;
                for i in 0..10_000u32 {
                    if i % 4 == 0 {
                        simulator.store_word(addr, i).unwrap();
                    } else {
                        simulator.load_word(addr).unwrap();
                    }
                    // A prime stride keeps the sets busy
                    addr = (addr + 4 * 37) % 8192;
                }
                simulator.counters()
            });
        });
    }
}

criterion_group!(
    name = benches;
    config = Criterion::default().significance_level(0.1).sample_size(10);
    targets = scenario_benchmark, streaming_benchmark
);
criterion_main!(benches);
