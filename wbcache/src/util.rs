use std::error::Error;
use std::fs;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::stats::{Counters, Outcome};

pub const SCENARIOS_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/scenarios");

pub struct ScenarioPaths {
    pub name: String,
    pub script: String,
    pub expected: String,
}

/// What a scenario must produce. Can be deserialised from the expected output files
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct ScenarioResult {
    pub outcomes: Vec<Outcome>,
    pub counters: Counters,
    /// Messages for lines that were rejected, in input order
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Finds every `expected-<name>.json` in the scenarios directory with its `<name>.script`
pub fn get_scenarios() -> Result<Vec<ScenarioPaths>, Box<dyn Error>> {
    let mut out = Vec::new();
    let expected_pattern = Regex::new(r"^expected-(?P<name>[0-9a-zA-Z_]+)\.json$")?;
    let mut files = fs::read_dir(SCENARIOS_PATH)?
        .map(|entry| entry.map(|e| e.file_name()))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .filter_map(|name| name.into_string().ok())
        .filter(|name| expected_pattern.is_match(name))
        .collect::<Vec<_>>();
    files.sort();
    for file_name in files {
        let tokens = expected_pattern.captures(&file_name).ok_or("Couldn't parse the file name".to_string())?;
        let name = tokens.name("name").ok_or("Couldn't get the scenario name from the file name".to_string())?.as_str();
        out.push(ScenarioPaths {
            name: name.to_string(),
            script: format!("{SCENARIOS_PATH}/{name}.script"),
            expected: format!("{SCENARIOS_PATH}/{file_name}"),
        })
    }
    Ok(out)
}
