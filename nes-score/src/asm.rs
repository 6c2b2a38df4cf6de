//! Assembler text output
//!
//! Renders a compiled score as `.db`/`.dw` directives for the driver's
//! assembler: pattern blocks, the pattern table, then the song header and
//! order lists.

use std::io::{self, Write};

use crate::assembler::{HeaderSlot, NesScore};
use crate::opcodes::{ORDER_LOOP, UNUSED_CHANNEL};

/// Bytes per `.db` line in pattern blocks
pub const BYTES_PER_LINE: usize = 16;

/// Write `score` as assembler source
///
/// An empty score writes nothing.
pub fn write_asm<W: Write>(score: &NesScore, out: &mut W) -> io::Result<()> {
    if score.is_empty() {
        return Ok(());
    }

    for channel in &score.channels {
        for (index, data) in channel.patterns.iter().enumerate() {
            writeln!(out, "{}:", score.pattern_label(channel.channel, index))?;
            write_bytes(out, data)?;
        }
    }

    let prefix = &score.label_prefix;
    writeln!(out, "{prefix}pattern_table:")?;
    for (channel, index) in score.pattern_table() {
        writeln!(out, ".dw {}", score.pattern_label(channel, index))?;
    }

    writeln!(out, "{prefix}song:")?;
    for slot in &score.header {
        match slot {
            HeaderSlot::Unused => writeln!(out, ".db ${UNUSED_CHANNEL:02X}")?,
            HeaderSlot::Used {
                order_offset,
                tempo,
            } => writeln!(out, ".db {order_offset},{tempo}")?,
        }
    }
    writeln!(out, ".dw {prefix}pattern_table")?;

    for channel in &score.channels {
        let mut line: Vec<String> = channel.order.iter().map(u8::to_string).collect();
        line.push(format!("${ORDER_LOOP:02X}"));
        line.push(channel.loop_target.to_string());
        writeln!(out, ".db {}", line.join(","))?;
    }

    Ok(())
}

/// Render `score` to a string
pub fn to_asm_string(score: &NesScore) -> String {
    let mut buf = Vec::new();
    // Writing to a Vec never fails
    let _ = write_asm(score, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Write `data` as hex `.db` lines
pub fn write_bytes<W: Write>(out: &mut W, data: &[u8]) -> io::Result<()> {
    for line in data.chunks(BYTES_PER_LINE) {
        let hex: Vec<String> = line.iter().map(|b| format!("${b:02X}")).collect();
        writeln!(out, ".db {}", hex.join(","))?;
    }
    Ok(())
}
