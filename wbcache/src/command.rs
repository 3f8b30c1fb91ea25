use thiserror::Error;

use crate::config::CacheConfig;
use crate::display;
use crate::simulator::{AccessError, Simulator};
use crate::stats::Outcome;

/// A single line of driver input
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Command {
    Show,
    /// Memory dump from an address, already rounded down to a word
    Dump(u32),
    Cycles,
    Load(u32),
    Store(u32, u32),
    Help,
    Quit,
}

#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum CommandError {
    #[error("Wrong input for lw\nUsage: lw <address to load>")]
    LoadUsage,
    #[error("Wrong input for sw\nUsage: sw <address to store> <word-size value to store>")]
    StoreUsage,
    #[error("{0:?} is not a number")]
    Number(String),
    #[error("expected words per block, number of blocks and number of ways, got {0} values")]
    Header(usize),
}

/// Splits a line on whitespace, dropping everything from a `//` or `#` token onwards
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split_whitespace()
        .take_while(|token| *token != "//" && *token != "#")
        .collect()
}

/// Parses an integer the way C's `strtoimax(.., 0)` picks its base: `0x` for hex, a leading `0`
/// for octal, decimal otherwise. A leading `-` wraps, so `-1` is `0xffffffff`
pub fn parse_number(token: &str) -> Result<u32, CommandError> {
    let invalid = || CommandError::Number(token.to_string());
    let (negative, digits) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token.strip_prefix('+').unwrap_or(token)),
    };
    let (radix, digits) = if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        (16, hex)
    } else if digits.len() > 1 && digits.starts_with('0') {
        (8, &digits[1..])
    } else {
        (10, digits)
    };
    // from_str_radix accepts its own sign, which would allow "--1"
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return Err(invalid());
    }
    let magnitude = u32::from_str_radix(digits, radix).map_err(|_| invalid())?;
    Ok(if negative { magnitude.wrapping_neg() } else { magnitude })
}

/// Parses one line of driver input
///
/// returns: Ok(None) for blank lines, comments and unknown commands, which the driver ignores
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let tokens = tokenize(line);
    let Some(first) = tokens.first() else {
        return Ok(None);
    };
    let command = match *first {
        "quit" => Command::Quit,
        "show" => Command::Show,
        "dump" => {
            let addr = match tokens.get(1) {
                Some(token) => parse_number(token)?,
                None => 0,
            };
            Command::Dump(addr & !3)
        }
        "cycles" => Command::Cycles,
        "lw" => {
            let token = tokens.get(1).ok_or(CommandError::LoadUsage)?;
            Command::Load(parse_number(token)?)
        }
        "sw" => {
            if tokens.len() != 3 {
                return Err(CommandError::StoreUsage);
            }
            Command::Store(parse_number(tokens[1])?, parse_number(tokens[2])?)
        }
        "help" => Command::Help,
        _ => return Ok(None),
    };
    Ok(Some(command))
}

/// Builds a cache configuration from the three header values: words per block, blocks, ways
pub fn parse_header(tokens: &[&str]) -> Result<CacheConfig, CommandError> {
    if tokens.len() != 3 {
        return Err(CommandError::Header(tokens.len()));
    }
    Ok(CacheConfig {
        words_per_block: parse_number(tokens[0])?,
        nr_blocks: parse_number(tokens[1])?,
        nr_ways: parse_number(tokens[2])?,
    })
}

/// Collects the three geometry values from the head of the input, a line at a time
///
/// Values may share a line or be spread over several; the rest of the line holding the last one
/// is dropped
#[derive(Debug, Default)]
pub struct HeaderReader {
    values: Vec<String>,
}

impl HeaderReader {
    /// Which value is wanted next: 0 words per block, 1 blocks, 2 ways
    pub fn next_index(&self) -> usize {
        self.values.len()
    }

    pub fn is_complete(&self) -> bool {
        self.values.len() == 3
    }

    pub fn feed(&mut self, line: &str) {
        let wanted = 3 - self.values.len();
        self.values.extend(tokenize(line).into_iter().take(wanted).map(str::to_string));
    }

    pub fn finish(&self) -> Result<CacheConfig, CommandError> {
        let tokens: Vec<&str> = self.values.iter().map(String::as_str).collect();
        parse_header(&tokens)
    }
}

/// What carrying out one command produced
#[derive(Debug, Eq, PartialEq)]
pub enum Response {
    /// A load or store completed
    Access(Outcome),
    /// A load, store or dump was refused. Nothing changed
    Rejected(AccessError),
    /// Cache, memory and cycle listings, which go to the diagnostic stream
    Diagnostic(String),
    Message(String),
    Quit,
}

/// Carries out one command against `simulator`. Only loads and stores change state
pub fn execute(simulator: &mut Simulator, command: Command) -> Response {
    let access = |result: Result<Outcome, AccessError>| match result {
        Ok(outcome) => Response::Access(outcome),
        Err(e) => Response::Rejected(e),
    };
    match command {
        Command::Quit => Response::Quit,
        Command::Show => Response::Diagnostic(display::render_cache(simulator)),
        Command::Dump(addr) => match display::render_dump(simulator, addr) {
            Ok(text) => Response::Diagnostic(text),
            Err(e) => Response::Rejected(e.into()),
        },
        Command::Cycles => Response::Diagnostic(display::render_cycles(simulator.counters())),
        Command::Help => Response::Message(display::HELP.to_string()),
        Command::Load(addr) => access(simulator.load_word(addr)),
        Command::Store(addr, value) => access(simulator.store_word(addr, value)),
    }
}

/// The outcomes of a replayed script, and the messages the driver would have printed for lines
/// it couldn't carry out, in input order
#[derive(Debug, Default, Eq, PartialEq)]
pub struct ScriptReport {
    pub outcomes: Vec<Outcome>,
    pub errors: Vec<String>,
}

/// A whole driver input, parsed ahead of time so it can be replayed
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Script {
    /// Geometry from the head of the input, if it was read from there
    pub header: Option<CacheConfig>,
    /// Every non-blank, known command line, or why it couldn't be parsed
    pub commands: Vec<Result<Command, CommandError>>,
}

impl Script {
    /// Parses a script
    ///
    /// A malformed command line is kept as its error, as the driver reports it and carries on;
    /// only a bad header fails the whole script
    ///
    /// # Arguments
    ///
    /// * `text`: The script
    /// * `read_header`: Whether the first three values are the cache geometry
    ///
    /// returns: Result<Script, CommandError>
    pub fn parse(text: &str, read_header: bool) -> Result<Self, CommandError> {
        let mut lines = text.lines();
        let mut header = None;
        if read_header {
            let mut reader = HeaderReader::default();
            for line in lines.by_ref() {
                reader.feed(line);
                if reader.is_complete() {
                    break;
                }
            }
            header = Some(reader.finish()?);
        }
        let commands = lines.filter_map(|line| parse_command(line).transpose()).collect();
        Ok(Self { header, commands })
    }

    /// Replays the script on `simulator` up to the first `quit`, the way the driver does
    ///
    /// Listings are discarded. Malformed lines and refused accesses are recorded and the replay
    /// carries on
    pub fn run(&self, simulator: &mut Simulator) -> ScriptReport {
        let mut report = ScriptReport::default();
        for command in &self.commands {
            let command = match command {
                Ok(command) => *command,
                Err(e) => {
                    report.errors.push(e.to_string());
                    continue;
                }
            };
            match execute(simulator, command) {
                Response::Access(outcome) => report.outcomes.push(outcome),
                Response::Rejected(e) => report.errors.push(e.to_string()),
                Response::Quit => break,
                Response::Diagnostic(_) | Response::Message(_) => {}
            }
        }
        report
    }
}
