use crate::memory::AddressRangeError;
use crate::simulator::Simulator;
use crate::stats::Counters;

/// Bytes shown by a `dump`
pub const DUMP_LENGTH: u32 = 64;

pub const HELP: &str = "- show         : Show cache
- dump [addr]  : Dump memory from @addr to @addr+64
- cycles       : Show elapsed cycles

- lw <addr>    : Simulate loading a word at @addr
- sw <addr> <value>
               : Simulate storing @value at @addr
";

fn push_words(out: &mut String, bytes: &[u8]) {
    for word in bytes.chunks(4) {
        for byte in word {
            out.push_str(&format!("{byte:02x}"));
        }
        out.push(' ');
    }
}

/// Lists every block as `[idx] vd tag timestamp | data`, with a blank line after each set of a
/// set associative cache
pub fn render_cache(simulator: &Simulator) -> String {
    let nr_ways = simulator.geometry().map_or(1, |geometry| geometry.nr_ways() as usize);
    let mut out = String::new();
    for (i, block) in simulator.snapshot().iter().enumerate() {
        out.push_str(&format!(
            "[{i:3}] {}{} {:8x} {:8} | ",
            if block.valid { 'v' } else { ' ' },
            if block.dirty { 'd' } else { ' ' },
            block.tag,
            block.timestamp
        ));
        push_words(&mut out, &block.data);
        out.push('\n');
        if nr_ways > 1 && (i + 1) % nr_ways == 0 {
            out.push('\n');
        }
    }
    out
}

/// Lists [`DUMP_LENGTH`] bytes of memory from `start`, four bytes to a group
///
/// Rows break on 16 byte boundaries and only a row starting on one is labelled with its address,
/// so a dump from the middle of a row begins with an unlabelled partial row
pub fn render_dump(simulator: &Simulator, start: u32) -> Result<String, AddressRangeError> {
    let bytes = simulator.memory_read(start, DUMP_LENGTH)?;
    let mut out = String::new();
    for (addr, byte) in (start as u64..).zip(bytes) {
        if addr % 16 == 0 {
            out.push_str(&format!("[{addr:#010x}] "));
        }
        out.push_str(&format!("{byte:02x}"));
        if (addr + 1) % 4 == 0 {
            out.push(' ');
        }
        if (addr + 1) % 16 == 0 {
            out.push('\n');
        }
    }
    if !out.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}

/// `hits misses   cycles`
pub fn render_cycles(counters: Counters) -> String {
    format!("{:3} {:3}   {}\n", counters.hits, counters.misses, counters.cycles)
}
