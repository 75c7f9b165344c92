//! crates/logging-sink/src/location.rs
//! Call-site locations and the located line layout.

use std::fmt;

/// Call-site information attached to a located log line.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct SourceLocation<'a> {
    /// Source file as reported by `file!()`.
    pub file: &'a str,
    /// Line number within [`file`](Self::file).
    pub line: u32,
    /// Name of the enclosing function.
    pub function: &'a str,
}

impl<'a> SourceLocation<'a> {
    /// Creates a location from its three components.
    #[must_use]
    pub const fn new(file: &'a str, line: u32, function: &'a str) -> Self {
        Self {
            file,
            line,
            function,
        }
    }
}

/// Renders `<file>:<line>:<func>: *<LEVEL>*: <message>` into `out`.
///
/// The line number is right-aligned in four columns so that consecutive
/// entries from the same file line up in a terminal.
pub fn write_located<W>(
    out: &mut W,
    location: SourceLocation<'_>,
    level_name: &str,
    message: &str,
) -> fmt::Result
where
    W: fmt::Write + ?Sized,
{
    write!(
        out,
        "{}:{:4}:{}: *{}*: {}",
        location.file, location.line, location.function, level_name, message
    )
}
