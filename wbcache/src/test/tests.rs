use std::error::Error;
use std::fs::{self, File};
use std::io::BufReader;
use pretty_assertions::assert_eq;
use crate::command::Script;
use crate::simulator::Simulator;
use crate::util::{get_scenarios, ScenarioResult};

#[test]
fn run_all_scenarios() -> Result<(), Box<dyn Error>> {
    super::init_logger();
    let scenarios = get_scenarios()?;
    assert!(!scenarios.is_empty(), "no scenarios found");
    for test in scenarios {
        println!("Running scenario {}", test.name);
        let script = Script::parse(&fs::read_to_string(&test.script)?, true)?;
        let expected_file = File::open(&test.expected)?;
        let expected: ScenarioResult = serde_json::from_reader(BufReader::new(expected_file))?;
        let header = script.header.ok_or("scenario has no header")?;
        let mut simulator = Simulator::default();
        simulator.init(header.words_per_block, header.nr_blocks, header.nr_ways)?;
        let report = script.run(&mut simulator);
        let result = ScenarioResult {
            outcomes: report.outcomes,
            counters: simulator.counters(),
            errors: report.errors,
        };
        assert_eq!(result, expected, "scenario {}", test.name);
    }
    Ok(())
}

#[test]
fn write_back_scenario_leaves_stores_in_memory() -> Result<(), Box<dyn Error>> {
    let path = format!("{}/write_back.script", crate::util::SCENARIOS_PATH);
    let script = Script::parse(&fs::read_to_string(path)?, true)?;
    let mut simulator = Simulator::default();
    simulator.init(4, 4, 1)?;
    assert!(script.run(&mut simulator).errors.is_empty());
    // The block at 0 went out dirty when 0x40 came in
    assert_eq!(
        simulator.memory_read(0, 16)?,
        &[0xde, 0xad, 0xbe, 0xef, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x89, 0xab, 0xcd, 0xef]
    );
    Ok(())
}
