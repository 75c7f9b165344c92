//! crates/logging-sink/src/timestamp.rs
//! Timestamp prefix for console lines.

use std::io::{self, Write};

use time::OffsetDateTime;
use time::format_description::FormatItem;
use time::macros::format_description;

/// Layout of the date inside the `[...] ` console prefix.
pub const TIMESTAMP_FORMAT: &[FormatItem<'static>] = format_description!(
    "[year]-[month padding:zero]-[day padding:zero] [hour padding:zero]:[minute padding:zero]:[second padding:zero].[subsecond digits:6]"
);

/// Returns the current wall-clock time in the local offset.
///
/// Determining the local offset can fail on multi-threaded unix processes;
/// the helper then reports UTC instead of refusing to log.
#[must_use]
pub fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// Writes `[YYYY-MM-DD HH:MM:SS.ffffff] ` for `at` into `writer`.
pub fn write_timestamp_prefix<W>(writer: &mut W, at: OffsetDateTime) -> io::Result<()>
where
    W: Write + ?Sized,
{
    let date = at.format(TIMESTAMP_FORMAT).map_err(io::Error::other)?;
    write!(writer, "[{date}] ")
}
