//! crates/logging-sink/src/hexdump.rs
//! Hex table rendering for binary buffers.
//!
//! The layout is kept byte-identical to the long-standing C formatter so
//! existing golden files keep matching:
//!
//! - the label goes on its own line;
//! - every row starts with the zero-padded eight-digit offset and a space;
//! - each byte is `xx ` and an extra space precedes slots 0 and 8;
//! - rows followed by another row end with one space and the printable
//!   rendering, the last row ends with two spaces and the printable rendering;
//! - a short last row is padded with `   ` per missing slot, and the extra
//!   separator before slot 8 is only emitted while padding the first row.
//!
//! An empty buffer therefore renders as the label followed by a line holding
//! two spaces.

use std::fmt::Write as _;
use std::io::{self, Write};

/// Number of bytes rendered per row.
pub const BYTES_PER_ROW: usize = 16;

/// Writes `label` and the hex table for `bytes` into `writer`, then flushes it.
///
/// ```
/// use logging_sink::dump;
///
/// let mut out = Vec::new();
/// dump(&mut out, "sample", &[0x41, 0x42, 0x0a, 0x00]).unwrap();
///
/// let text = String::from_utf8(out).unwrap();
/// let mut lines = text.lines();
/// assert_eq!(lines.next(), Some("sample"));
/// let row = lines.next().unwrap();
/// assert!(row.starts_with("00000000  41 42 0a 00 "));
/// assert!(row.ends_with("  AB.."));
/// ```
pub fn dump<W>(writer: &mut W, label: &str, bytes: &[u8]) -> io::Result<()>
where
    W: Write + ?Sized,
{
    writeln!(writer, "{label}")?;

    let mut row = String::with_capacity(80);
    let mut printable = String::with_capacity(BYTES_PER_ROW);

    for (idx, &byte) in bytes.iter().enumerate() {
        if idx != 0 && idx % BYTES_PER_ROW == 0 {
            row.push(' ');
            row.push_str(&printable);
            writeln!(writer, "{row}")?;
            row.clear();
            printable.clear();
        }
        if idx % BYTES_PER_ROW == 0 {
            // Offsets wrap at 32 bits, as they always have.
            let _ = write!(row, "{:08x} ", idx as u32);
        }
        if idx % 8 == 0 {
            row.push(' ');
        }
        let _ = write!(row, "{byte:02x} ");
        printable.push(printable_char(byte));
    }

    let mut idx = bytes.len();
    while idx % BYTES_PER_ROW != 0 {
        if idx == 8 {
            row.push(' ');
        }
        row.push_str("   ");
        idx += 1;
    }

    row.push_str("  ");
    row.push_str(&printable);
    writeln!(writer, "{row}")?;
    writer.flush()
}

const fn printable_char(byte: u8) -> char {
    if byte.is_ascii_graphic() || byte == b' ' {
        byte as char
    } else {
        '.'
    }
}
