//! crates/logging/src/record.rs
//! Per-call log records and the override sink seam.

use std::fmt;

use logging_sink::SourceLocation;
use time::OffsetDateTime;

use crate::level::LogLevel;

/// Everything a single log call carries.
///
/// Records borrow from the call site and live only for the duration of the
/// call. Override sinks that need to keep one must copy what they need, as
/// [`RecordingSink`](crate::RecordingSink) does.
#[derive(Clone, Copy, Debug)]
pub struct LogRecord<'a> {
    level: LogLevel,
    location: Option<SourceLocation<'a>>,
    format: &'a str,
    args: fmt::Arguments<'a>,
    timestamp: Option<OffsetDateTime>,
}

impl<'a> LogRecord<'a> {
    /// Builds an unstamped record. The console takes the current time when
    /// it renders the line, so filtered and overridden calls never read the
    /// clock.
    ///
    /// `format` is the format string as written at the call site; `args` is
    /// the same string with its arguments bound.
    pub const fn new(
        level: LogLevel,
        location: Option<SourceLocation<'a>>,
        format: &'a str,
        args: fmt::Arguments<'a>,
    ) -> Self {
        Self {
            level,
            location,
            format,
            args,
            timestamp: None,
        }
    }

    /// Builds a record with an explicit timestamp.
    pub const fn with_timestamp(
        level: LogLevel,
        location: Option<SourceLocation<'a>>,
        format: &'a str,
        args: fmt::Arguments<'a>,
        timestamp: OffsetDateTime,
    ) -> Self {
        Self {
            level,
            location,
            format,
            args,
            timestamp: Some(timestamp),
        }
    }

    /// Severity of the call.
    pub const fn level(&self) -> LogLevel {
        self.level
    }

    /// Call site, or `None` for location-less messages.
    pub const fn location(&self) -> Option<SourceLocation<'a>> {
        self.location
    }

    /// Source file of the call site.
    pub fn file(&self) -> Option<&'a str> {
        self.location.map(|location| location.file)
    }

    /// Line of the call site, `0` when no location was given.
    pub fn line(&self) -> u32 {
        self.location.map_or(0, |location| location.line)
    }

    /// Enclosing function of the call site.
    pub fn function(&self) -> Option<&'a str> {
        self.location.map(|location| location.function)
    }

    /// Unexpanded format string.
    pub const fn format(&self) -> &'a str {
        self.format
    }

    /// Bound format arguments.
    pub const fn args(&self) -> fmt::Arguments<'a> {
        self.args
    }

    /// Explicit timestamp, if the record was built with one.
    pub const fn timestamp(&self) -> Option<OffsetDateTime> {
        self.timestamp
    }
}

/// Receiver that replaces the built-in console and persistent routing.
///
/// Once installed with [`LogContext::open`](crate::LogContext::open) it sees
/// every call, including those the thresholds would have filtered.
///
/// Closures taking a `&LogRecord` implement this trait:
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// use logging::{LogContext, LogLevel, LogRecord};
///
/// let seen = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&seen);
/// let ctx = LogContext::builder().build();
/// ctx.open(Some(Arc::new(move |_record: &LogRecord<'_>| {
///     counter.fetch_add(1, Ordering::SeqCst);
/// })));
///
/// ctx.log(LogLevel::Debug, None, "hidden", format_args!("hidden"));
/// assert_eq!(seen.load(Ordering::SeqCst), 1);
/// ```
pub trait OverrideSink: Send + Sync {
    /// Receives one log call.
    fn log(&self, record: &LogRecord<'_>);
}

impl<F> OverrideSink for F
where
    F: Fn(&LogRecord<'_>) + Send + Sync,
{
    fn log(&self, record: &LogRecord<'_>) {
        self(record);
    }
}
