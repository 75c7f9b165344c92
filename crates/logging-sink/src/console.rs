//! crates/logging-sink/src/console.rs
//! Timestamped console sink.

use std::io::{self, Write};

use time::OffsetDateTime;

use crate::line_mode::LineMode;
use crate::location::{SourceLocation, write_located};
use crate::timestamp::{now, write_timestamp_prefix};

/// Console destination for rendered log entries.
///
/// Every entry starts with the `[YYYY-MM-DD HH:MM:SS.ffffff] ` prefix. Located
/// entries continue with `<file>:<line>:<func>: *<LEVEL>*: `; entries without a
/// location carry the bare message. The whole entry is assembled in memory and
/// handed to the writer in one `write_all` call so concurrent writers sharing
/// stderr do not interleave inside a line.
///
/// ```
/// use logging_sink::{ConsoleSink, LineMode};
///
/// let mut sink = ConsoleSink::with_line_mode(Vec::new(), LineMode::WithoutNewline);
/// sink.write_message(None, "ready").unwrap();
/// assert!(sink.into_inner().ends_with(b"] ready"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ConsoleSink<W> {
    writer: W,
    line_mode: LineMode,
}

impl<W> ConsoleSink<W> {
    /// Creates a sink that appends a newline after each entry.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self::with_line_mode(writer, LineMode::WithNewline)
    }

    /// Creates a sink with an explicit [`LineMode`].
    #[must_use]
    pub const fn with_line_mode(writer: W, line_mode: LineMode) -> Self {
        Self { writer, line_mode }
    }

    /// Returns the current [`LineMode`].
    #[must_use]
    pub const fn line_mode(&self) -> LineMode {
        self.line_mode
    }

    /// Updates the [`LineMode`] used for subsequent entries.
    pub fn set_line_mode(&mut self, line_mode: LineMode) {
        self.line_mode = line_mode;
    }

    /// Borrows the underlying writer.
    #[must_use]
    pub const fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Mutably borrows the underlying writer.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Consumes the sink and returns the wrapped writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> ConsoleSink<W>
where
    W: Write,
{
    /// Writes an entry stamped with the current time.
    pub fn write_message(
        &mut self,
        header: Option<(SourceLocation<'_>, &str)>,
        message: &str,
    ) -> io::Result<()> {
        self.write_message_at(now(), header, message)
    }

    /// Writes an entry stamped with `at`.
    ///
    /// `header` carries the call site and the display name of the level; pass
    /// `None` to emit the bare message after the timestamp.
    pub fn write_message_at(
        &mut self,
        at: OffsetDateTime,
        header: Option<(SourceLocation<'_>, &str)>,
        message: &str,
    ) -> io::Result<()> {
        let mut entry = Vec::with_capacity(message.len() + 96);
        write_timestamp_prefix(&mut entry, at)?;

        match header {
            Some((location, level_name)) => {
                let mut line = String::with_capacity(message.len() + 64);
                write_located(&mut line, location, level_name, message)
                    .map_err(|_| io::Error::other("failed to render log line"))?;
                entry.extend_from_slice(line.as_bytes());
            }
            None => entry.extend_from_slice(message.as_bytes()),
        }

        if self.line_mode.append_newline() {
            entry.push(b'\n');
        }

        self.writer.write_all(&entry)
    }

    /// Writes pre-rendered text verbatim, without timestamp or newline handling.
    ///
    /// Used for continuation output such as backtrace blocks and fallback
    /// diagnostics that follow a console entry.
    pub fn write_raw(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes())
    }

    /// Flushes the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
