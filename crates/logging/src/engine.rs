//! crates/logging/src/engine.rs
//!
//! The dispatcher behind every log call.
//!
//! [`LogContext`] owns the thresholds, the flag registry and the sinks. A log
//! call either goes verbatim to an installed override sink, or is rendered once
//! into a bounded buffer and written to whichever of the console and the
//! persistent channel its level passes.

use std::borrow::Cow;
use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use logging_sink::{
    ConsoleSink, LineMode, PersistentLog, SourceLocation, Syslog, SyslogConfig, write_located,
};

use crate::buffer::{FORMAT_FAILURE_MESSAGE, MessageBuffer};
use crate::error::ContractViolation;
use crate::flags::{FlagRegistry, LogFlag};
use crate::level::LogLevel;
use crate::record::{LogRecord, OverrideSink};
use crate::stack;
use crate::state::LevelState;

/// Flag that gates the engine's own lifecycle messages.
pub const LOG_COMPONENT_FLAG: &str = "log";

type ConsoleWriter = Box<dyn Write + Send>;

/// Process-wide logging state and the sinks it routes to.
///
/// Most programs use the lazily built [`global`](crate::global) context;
/// tests and embedders with their own lifecycle build one explicitly:
///
/// ```
/// use logging::{CaptureBuffer, LogContext, LogLevel, NullPersistentLog};
/// use logging_sink::SourceLocation;
///
/// let console = CaptureBuffer::new();
/// let ctx = LogContext::builder()
///     .console(console.clone())
///     .persistent(NullPersistentLog)
///     .build();
///
/// let here = SourceLocation::new("qp.rs", 7, "create");
/// ctx.log(LogLevel::Warn, Some(here), "queue full", format_args!("queue full"));
/// ctx.log(LogLevel::Info, Some(here), "filtered", format_args!("filtered"));
///
/// let text = console.text();
/// assert!(text.ends_with("qp.rs:   7:create: *WARNING*: queue full\n"));
/// assert!(!text.contains("filtered"));
/// ```
pub struct LogContext {
    levels: LevelState,
    flags: FlagRegistry,
    override_sink: RwLock<Option<Arc<dyn OverrideSink>>>,
    console: Mutex<ConsoleSink<ConsoleWriter>>,
    persistent: Mutex<Box<dyn PersistentLog>>,
    syslog: SyslogConfig,
}

impl LogContext {
    /// Starts building a context. Defaults: stderr console with newlines,
    /// syslog persistent backend, default [`SyslogConfig`].
    pub fn builder() -> LogContextBuilder {
        LogContextBuilder::new()
    }

    /// Threshold state.
    pub const fn levels(&self) -> &LevelState {
        &self.levels
    }

    /// Flag registry.
    pub const fn flags(&self) -> &FlagRegistry {
        &self.flags
    }

    /// Identity and facility used when the persistent channel opens.
    pub const fn syslog_config(&self) -> &SyslogConfig {
        &self.syslog
    }

    /// Registers a named debug flag. See [`FlagRegistry::register`].
    pub fn register_flag(&self, name: &str) -> Result<Arc<LogFlag>, ContractViolation> {
        self.flags.register(name)
    }

    /// Installs `sink` as the override, or opens the persistent channel when
    /// `sink` is `None`.
    ///
    /// An installed override receives every subsequent call unfiltered and
    /// the built-in sinks are bypassed until [`close`](Self::close).
    pub fn open(&self, sink: Option<Arc<dyn OverrideSink>>) {
        match sink {
            Some(sink) => {
                *self
                    .override_sink
                    .write()
                    .unwrap_or_else(PoisonError::into_inner) = Some(sink);
            }
            None => {
                self.persistent
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .open(&self.syslog);

                if self.flags.get(LOG_COMPONENT_FLAG) {
                    self.log(
                        LogLevel::Info,
                        Some(SourceLocation::new(file!(), line!(), "open")),
                        "persistent log opened as {} on {}",
                        format_args!(
                            "persistent log opened as {} on {}",
                            self.syslog.ident(),
                            self.syslog.facility()
                        ),
                    );
                }
            }
        }
    }

    /// Removes the override sink if one is installed, otherwise closes the
    /// persistent channel. Safe to call without a preceding `open`.
    pub fn close(&self) {
        let previous = self
            .override_sink
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if previous.is_none() {
            self.persistent
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .close();
        }
    }

    /// Whether an override sink currently replaces the built-in routing.
    pub fn has_override(&self) -> bool {
        self.override_sink
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Logs one message. `format` is the format string of `args` as written at
    /// the call site and is only consulted by override sinks.
    pub fn log(
        &self,
        level: LogLevel,
        location: Option<SourceLocation<'_>>,
        format: &str,
        args: fmt::Arguments<'_>,
    ) {
        self.log_record(&LogRecord::new(level, location, format, args));
    }

    /// Routes a prepared record.
    pub fn log_record(&self, record: &LogRecord<'_>) {
        let sink = self
            .override_sink
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(sink) = sink {
            sink.log(record);
            return;
        }

        let level = record.level();
        if level == LogLevel::Disabled || self.levels.filters_out(level) {
            return;
        }

        let Ok(message) = MessageBuffer::render(record.args()) else {
            let mut console = self.console.lock().unwrap_or_else(PoisonError::into_inner);
            let _ = console.write_raw(FORMAT_FAILURE_MESSAGE);
            let _ = console.flush();
            return;
        };

        if level.passes(self.levels.print_level()) {
            self.emit_console(record, message.as_str());
        }
        if level.passes(self.levels.log_level()) {
            self.emit_persistent(record, message.as_str());
        }
    }

    fn emit_console(&self, record: &LogRecord<'_>, message: &str) {
        let level = record.level();
        let header = record.location().map(|location| (location, level.name()));
        let timestamp = record.timestamp().unwrap_or_else(logging_sink::now);
        let mut console = self.console.lock().unwrap_or_else(PoisonError::into_inner);

        if console
            .write_message_at(timestamp, header, message)
            .is_err()
        {
            return;
        }
        if header.is_some() && level.passes(self.levels.backtrace_level()) {
            let _ = stack::emit(console.get_mut(), level);
        }
        let _ = console.flush();
    }

    fn emit_persistent(&self, record: &LogRecord<'_>, message: &str) {
        let level = record.level();
        let Some(priority) = level.syslog_priority() else {
            return;
        };

        let text = match record.location() {
            Some(location) => {
                let mut line = String::with_capacity(message.len() + 64);
                if write_located(&mut line, location, level.name(), message).is_err() {
                    return;
                }
                Cow::Owned(line)
            }
            None => Cow::Borrowed(message),
        };

        self.persistent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .write(priority, &text);
    }

    /// Hex-dumps `bytes` under `label` to the console writer.
    ///
    /// Thresholds are not consulted; callers decide whether dumping is wanted.
    pub fn dump(&self, label: &str, bytes: &[u8]) -> io::Result<()> {
        let mut console = self.console.lock().unwrap_or_else(PoisonError::into_inner);
        logging_sink::dump(console.get_mut(), label, bytes)
    }

    /// Writes the `--logflag` help line. See [`FlagRegistry::usage`].
    pub fn usage<W>(&self, writer: &mut W, option_label: &str) -> io::Result<()>
    where
        W: Write + ?Sized,
    {
        self.flags.usage(writer, option_label)
    }
}

impl Default for LogContext {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Debug for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogContext")
            .field("levels", &self.levels)
            .field("flags", &self.flags)
            .field("override", &self.has_override())
            .field("syslog", &self.syslog)
            .finish_non_exhaustive()
    }
}

/// Builder for [`LogContext`].
pub struct LogContextBuilder {
    console: Option<ConsoleWriter>,
    line_mode: LineMode,
    persistent: Option<Box<dyn PersistentLog>>,
    syslog: SyslogConfig,
}

impl LogContextBuilder {
    fn new() -> Self {
        Self {
            console: None,
            line_mode: LineMode::WithNewline,
            persistent: None,
            syslog: SyslogConfig::default(),
        }
    }

    /// Replaces stderr as the console writer.
    #[must_use]
    pub fn console<W>(mut self, writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        self.console = Some(Box::new(writer));
        self
    }

    /// Chooses whether console entries end with a newline.
    #[must_use]
    pub fn line_mode(mut self, line_mode: LineMode) -> Self {
        self.line_mode = line_mode;
        self
    }

    /// Replaces syslog as the persistent backend.
    #[must_use]
    pub fn persistent<P>(mut self, backend: P) -> Self
    where
        P: PersistentLog + 'static,
    {
        self.persistent = Some(Box::new(backend));
        self
    }

    /// Sets the identity and facility used by `open`.
    #[must_use]
    pub fn syslog(mut self, config: SyslogConfig) -> Self {
        self.syslog = config;
        self
    }

    /// Builds a context with start-up thresholds and an empty flag registry.
    pub fn build(self) -> LogContext {
        let console = self
            .console
            .unwrap_or_else(|| Box::new(io::stderr()));
        let persistent = self
            .persistent
            .unwrap_or_else(|| Box::new(Syslog::new()));

        LogContext {
            levels: LevelState::new(),
            flags: FlagRegistry::new(),
            override_sink: RwLock::new(None),
            console: Mutex::new(ConsoleSink::with_line_mode(console, self.line_mode)),
            persistent: Mutex::new(persistent),
            syslog: self.syslog,
        }
    }
}

impl fmt::Debug for LogContextBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogContextBuilder")
            .field("line_mode", &self.line_mode)
            .field("persistent", &self.persistent)
            .field("syslog", &self.syslog)
            .finish_non_exhaustive()
    }
}
