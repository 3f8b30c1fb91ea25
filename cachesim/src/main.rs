use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use clap::Parser;
use env_logger::Env;
use log::{info, warn};
use wbcache::command::{execute, parse_command, HeaderReader, Response};
use wbcache::config::{CacheConfig, SimulatorConfig};
use wbcache::io::load_memory_image;
use wbcache::memory::MainMemory;
use wbcache::simulator::Simulator;

const BANNER: &str = r"*****************************************************
*                    _                              *
*      ___ __ _  ___| |__   ___                     *
*     / __/ _` |/ __| '_ \ / _ \                    *
*    | (_| (_| | (__| | | |  __/                    *
*     \___\__,_|\___|_| |_|\___|                    *
*          _                 _       _              *
*     ___(_)_ __ ___  _   _| | __ _| |_ ___  _ __   *
*    / __| | '_ ` _ \| | | | |/ _` | __/ _ \| '__|  *
*    \__ \ | | | | | | |_| | | (_| | || (_) | |     *
*    |___/_|_| |_| |_|\__,_|_|\__,_|\__\___/|_|     *
*                                                   *
*****************************************************
";

const HEADER_PROMPTS: [&str; 3] = ["- words per block:  ", "- number of blocks: ", "- number of ways:   "];

#[derive(Parser, Debug)]
#[command(about = String::from("Write-back, write-allocate LRU cache simulator"))]
struct Args {
    /// File of commands, headed by the cache geometry unless the config gives one. Reads stdin
    /// interactively when omitted
    input: Option<String>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Raw image loaded into the start of main memory, overriding the config
    #[arg(short, long)]
    memory_image: Option<String>,

    /// Print the final counters as JSON on exit
    #[arg(short, long)]
    json: bool,

    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<(), String> {
    let env = Env::default()
        .filter_or("CACHESIM_LOG", "warn")
        .write_style_or("CACHESIM_LOG_STYLE", "auto");
    env_logger::init_from_env(env);

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => {
            let config_file = File::open(path).map_err(|e| format!("Couldn't open the config file at path {path}: {e}"))?;
            serde_json::from_reader(BufReader::new(config_file)).map_err(|e| format!("Couldn't parse the config file: {e}"))?
        }
        None => SimulatorConfig::default(),
    };
    let memory = load_memory(&args, &config)?;

    let interactive = args.input.is_none();
    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => {
            let input_file = File::open(path).map_err(|e| format!("Couldn't open the input file at path {path}: {e}"))?;
            Box::new(BufReader::new(input_file))
        }
        None => Box::new(io::stdin().lock()),
    };
    let mut lines = reader.lines();

    if interactive {
        println!("{BANNER}");
    }
    let cache_config = match config.cache {
        Some(cache_config) => cache_config,
        None => read_header(&mut lines, interactive)?,
    };
    let mut simulator = Simulator::new(memory, config.timing);
    simulator
        .init(cache_config.words_per_block, cache_config.nr_blocks, cache_config.nr_ways)
        .map_err(|e| format!("Invalid cache configuration {cache_config:?}: {e}"))?;
    if args.debug {
        println!("Parsed input configuration: {config:?}");
        println!("Cache geometry: {:?}", simulator.geometry());
    }

    loop {
        if interactive {
            prompt(">> ");
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.map_err(|e| format!("Couldn't read the input: {e}"))?;
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };
        match execute(&mut simulator, command) {
            Response::Quit => break,
            Response::Access(_) => {}
            Response::Rejected(e) => {
                warn!("access rejected: {e}");
                println!("{e}");
            }
            Response::Diagnostic(text) => eprint!("{text}"),
            Response::Message(text) => println!("{text}"),
        }
    }

    let counters = simulator.counters();
    info!("finished after {} hits, {} misses, {} cycles", counters.hits, counters.misses, counters.cycles);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&counters).map_err(|e| format!("Couldn't serialise the output {e}"))?);
    }
    if args.debug {
        println!("Blocks never filled: {}", simulator.invalid_block_count());
    }
    Ok(())
}

/// Main memory from the image named on the command line or in the config, or the default seed
fn load_memory(args: &Args, config: &SimulatorConfig) -> Result<MainMemory, String> {
    match args.memory_image.as_ref().or(config.memory.image.as_ref()) {
        Some(path) => {
            let image_file = File::open(path).map_err(|e| format!("Couldn't open the memory image at path {path}: {e}"))?;
            load_memory_image(&image_file, config.memory.size)
        }
        None => Ok(MainMemory::seeded(config.memory.size)),
    }
}

/// Reads words per block, blocks and ways from the head of the input, prompting when interactive
fn read_header(lines: &mut impl Iterator<Item = io::Result<String>>, interactive: bool) -> Result<CacheConfig, String> {
    let mut reader = HeaderReader::default();
    while !reader.is_complete() {
        if interactive {
            prompt(HEADER_PROMPTS[reader.next_index()]);
        }
        let line = lines
            .next()
            .ok_or("The input ended before the cache configuration")?
            .map_err(|e| format!("Couldn't read the input: {e}"))?;
        reader.feed(&line);
    }
    reader.finish().map_err(|e| format!("Couldn't parse the cache configuration: {e}"))
}

fn prompt(text: &str) {
    print!("{text}");
    // A failed flush only loses the prompt
    let _ = io::stdout().flush();
}
