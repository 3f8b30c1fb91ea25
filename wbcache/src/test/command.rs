use crate::command::{execute, parse_command, parse_number, tokenize, Command, CommandError, HeaderReader, Response, Script};
use crate::config::CacheConfig;
use crate::display::HELP;
use crate::memory::AddressRangeError;
use crate::simulator::{AccessError, Simulator};
use crate::stats::{Counters, Outcome};

#[test]
fn numbers_follow_c_base_rules() {
    assert_eq!(parse_number("42"), Ok(42));
    assert_eq!(parse_number("0x2A"), Ok(42));
    assert_eq!(parse_number("0XdeadBEEF"), Ok(0xdead_beef));
    assert_eq!(parse_number("052"), Ok(42));
    assert_eq!(parse_number("0"), Ok(0));
    assert_eq!(parse_number("-1"), Ok(0xffff_ffff));
    assert_eq!(parse_number("+7"), Ok(7));
    for bad in ["", "0x", "12ab", "--1", "-+1", "09", "0x1_0000_0000", "4294967296"] {
        assert_eq!(parse_number(bad), Err(CommandError::Number(bad.to_string())), "{bad}");
    }
}

#[test]
fn comments_end_the_line() {
    assert_eq!(tokenize("  lw   0x10 // load it"), vec!["lw", "0x10"]);
    assert_eq!(tokenize("# whole line"), Vec::<&str>::new());
    assert_eq!(tokenize("sw 4 5 # store"), vec!["sw", "4", "5"]);
}

#[test]
fn parses_commands() {
    assert_eq!(parse_command("lw 0x40"), Ok(Some(Command::Load(0x40))));
    assert_eq!(parse_command("sw 0x40 0xdeadbeef"), Ok(Some(Command::Store(0x40, 0xdead_beef))));
    assert_eq!(parse_command("dump"), Ok(Some(Command::Dump(0))));
    assert_eq!(parse_command("dump 0x43"), Ok(Some(Command::Dump(0x40))));
    assert_eq!(parse_command("show"), Ok(Some(Command::Show)));
    assert_eq!(parse_command("cycles"), Ok(Some(Command::Cycles)));
    assert_eq!(parse_command("help"), Ok(Some(Command::Help)));
    assert_eq!(parse_command("quit"), Ok(Some(Command::Quit)));
    assert_eq!(parse_command(""), Ok(None));
    assert_eq!(parse_command("frobnicate 1 2"), Ok(None));
}

#[test]
fn malformed_accesses_report_usage() {
    assert_eq!(parse_command("lw"), Err(CommandError::LoadUsage));
    assert_eq!(parse_command("sw 0x40"), Err(CommandError::StoreUsage));
    assert_eq!(parse_command("sw 0x40 1 2"), Err(CommandError::StoreUsage));
    assert_eq!(parse_command("lw banana"), Err(CommandError::Number("banana".to_string())));
}

#[test]
fn script_reads_header_across_lines() {
    let script = Script::parse("4\n16 // blocks\n2\nlw 0\nshow\nsw 0 1\n", true).unwrap();
    assert_eq!(script.header, Some(CacheConfig { words_per_block: 4, nr_blocks: 16, nr_ways: 2 }));
    assert_eq!(script.commands, vec![Ok(Command::Load(0)), Ok(Command::Show), Ok(Command::Store(0, 1))]);

    let script = Script::parse("lw 0\n", false).unwrap();
    assert_eq!(script.header, None);
    assert_eq!(script.commands, vec![Ok(Command::Load(0))]);

    assert_eq!(Script::parse("4 16\n", true), Err(CommandError::Header(2)));
}

#[test]
fn header_reader_takes_values_from_any_split() {
    let mut reader = HeaderReader::default();
    assert_eq!(reader.next_index(), 0);
    reader.feed("   // nothing yet");
    assert_eq!(reader.next_index(), 0);
    reader.feed("8 32");
    assert_eq!(reader.next_index(), 2);
    assert!(!reader.is_complete());
    reader.feed("4 lw 0");
    assert!(reader.is_complete());
    assert_eq!(reader.finish(), Ok(CacheConfig { words_per_block: 8, nr_blocks: 32, nr_ways: 4 }));

    let mut reader = HeaderReader::default();
    reader.feed("4 sixteen 2");
    assert_eq!(reader.finish(), Err(CommandError::Number("sixteen".to_string())));
}

#[test]
fn script_keeps_malformed_lines_in_order() {
    let script = Script::parse("1 2 1\nlw 0\nlw\nsw 1 x\nfrobnicate\nshow\n", true).unwrap();
    assert_eq!(
        script.commands,
        vec![
            Ok(Command::Load(0)),
            Err(CommandError::LoadUsage),
            Err(CommandError::Number("x".to_string())),
            Ok(Command::Show),
        ]
    );
}

#[test]
fn script_run_stops_at_quit() {
    let script = Script::parse("1 2 1\nlw 0\nlw 0\ncycles\nquit\nlw 8\n", true).unwrap();
    let mut simulator = Simulator::default();
    simulator.init(1, 2, 1).unwrap();
    let report = script.run(&mut simulator);
    assert_eq!(report.outcomes, vec![Outcome::Miss, Outcome::Hit]);
    assert!(report.errors.is_empty());
    assert_eq!(simulator.counters().cycles, 101);
}

#[test]
fn script_run_carries_on_after_rejections() {
    let script = Script::parse("1 2 1\nlw 0\nlw\nlw 0x2000\ndump 0x3000\nlw 0\n", true).unwrap();
    let mut simulator = Simulator::default();
    simulator.init(1, 2, 1).unwrap();
    let report = script.run(&mut simulator);
    assert_eq!(report.outcomes, vec![Outcome::Miss, Outcome::Hit]);
    assert_eq!(
        report.errors,
        vec![
            "Wrong input for lw\nUsage: lw <address to load>".to_string(),
            "access of 4 bytes at 0x00002000 is outside the 8192 byte memory".to_string(),
            "access of 64 bytes at 0x00003000 is outside the 8192 byte memory".to_string(),
        ]
    );
    assert_eq!(simulator.counters(), Counters { hits: 1, misses: 1, cycles: 101 });

    let mut uninitialised = Simulator::default();
    let report = script.run(&mut uninitialised);
    assert!(report.outcomes.is_empty());
    assert_eq!(report.errors[0], "the cache has not been initialised");
    assert_eq!(report.errors[1], "Wrong input for lw\nUsage: lw <address to load>");
    assert_eq!(report.errors.len(), 5);
}

#[test]
fn execute_routes_each_command() {
    let mut simulator = Simulator::default();
    simulator.init(1, 2, 1).unwrap();
    assert_eq!(execute(&mut simulator, Command::Load(4)), Response::Access(Outcome::Miss));
    assert_eq!(execute(&mut simulator, Command::Store(4, 7)), Response::Access(Outcome::Hit));
    assert_eq!(
        execute(&mut simulator, Command::Load(0x4000)),
        Response::Rejected(AccessError::AddressRange(AddressRangeError { addr: 0x4000, len: 4, memory_size: 8192 }))
    );
    assert_eq!(execute(&mut simulator, Command::Cycles), Response::Diagnostic("  1   1   101\n".to_string()));
    assert_eq!(execute(&mut simulator, Command::Help), Response::Message(HELP.to_string()));
    assert_eq!(execute(&mut simulator, Command::Quit), Response::Quit);
    assert!(matches!(execute(&mut simulator, Command::Show), Response::Diagnostic(_)));
    assert!(matches!(execute(&mut simulator, Command::Dump(0)), Response::Diagnostic(_)));
    // Listings leave the counters alone
    assert_eq!(simulator.counters(), Counters { hits: 1, misses: 1, cycles: 101 });
}
