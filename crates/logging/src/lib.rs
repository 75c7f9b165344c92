#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` is a small leveled-logging facility meant to be embedded in a
//! library. Messages carry one of five severities and are routed to the
//! console (stderr), to the persistent channel (syslog), to both or to
//! neither, according to two independent thresholds. A third threshold
//! decides when a stack trace follows a console line. Named debug flags gate
//! fine-grained output at the call site.
//!
//! # Design
//!
//! - [`LogContext`] is the engine. It owns a [`LevelState`], a
//!   [`FlagRegistry`] and the sinks from [`logging_sink`]. A message is
//!   rendered once into a bounded buffer and then written to each sink whose
//!   threshold it passes.
//! - An [`OverrideSink`] installed with [`LogContext::open`] takes over all
//!   routing and sees every call, filtered or not.
//! - [`global`] returns the process-wide context, built on first use with the
//!   `log` component flag registered. [`init_global`] installs an explicitly
//!   built context instead.
//! - The macros ([`log_at!`], [`error_log!`], [`info_log!`], [`debug_log!`], ...)
//!   record `file!()`, `line!()` and the enclosing function.
//!
//! # Invariants
//!
//! - A message at level `L` reaches a sink with threshold `T` iff
//!   `L != Disabled` and `L <= T`.
//! - Flags stay sorted by name, ignoring ASCII case, and names are unique
//!   under that comparison.
//! - Messages longer than [`MESSAGE_CAPACITY`] bytes are truncated, never
//!   rejected.
//!
//! # Errors
//!
//! Misuse of the API, such as an out-of-range threshold or a duplicate flag,
//! is a [`ContractViolation`]. Methods on [`LogContext`] return it; the free
//! functions in this module operate on the global context and abort the
//! process after reporting it. Enabling an unknown flag is a recoverable
//! [`FlagError`].
//!
//! # Examples
//!
//! ```
//! use logging::{CaptureBuffer, LogContext, LogLevel, RecordingPersistentLog};
//!
//! let console = CaptureBuffer::new();
//! let ctx = LogContext::builder()
//!     .console(console.clone())
//!     .persistent(RecordingPersistentLog::new())
//!     .build();
//!
//! let conn = ctx.register_flag("conn").unwrap();
//! ctx.levels().set_print_level(LogLevel::Info);
//!
//! logging::info_log!(ctx: ctx, conn, "hidden until enabled");
//! ctx.flags().set("conn").unwrap();
//! logging::info_log!(ctx: ctx, conn, "connected to {}", "10.0.0.2");
//!
//! let text = console.text();
//! assert!(!text.contains("hidden"));
//! assert!(text.contains("*INFO*: connected to 10.0.0.2"));
//! ```

use std::io::{self, Write};
use std::sync::{Arc, OnceLock};

mod buffer;
mod capture;
mod config;
mod engine;
mod error;
mod fatal;
mod flags;
mod level;
mod macros;
mod record;
mod stack;
mod state;
#[cfg(feature = "tracing")]
mod tracing_bridge;

pub use buffer::{FORMAT_FAILURE_MESSAGE, MESSAGE_CAPACITY, MessageBuffer};
pub use capture::{
    CaptureBuffer, CapturedRecord, PersistentEntry, RecordingPersistentLog, RecordingSink,
};
pub use config::LogConfig;
pub use engine::{LOG_COMPONENT_FLAG, LogContext, LogContextBuilder};
pub use error::{ContractViolation, FlagError, flag_status};
pub use fatal::{OrAbort, report, report_and_abort};
pub use flags::{ALL_FLAGS, FlagRegistry, LogFlag, compare_names};
pub use level::{InvalidLevel, LogLevel, ParseLevelError, Threshold};
pub use logging_sink::{
    LineMode, NullPersistentLog, PersistentLog, SourceLocation, Syslog, SyslogConfig,
    SyslogFacility, SyslogPriority, dump,
};
pub use record::{LogRecord, OverrideSink};
#[cfg(feature = "backtrace")]
pub use stack::capture as capture_backtrace;
pub use stack::{FrameInfo, render_backtrace};
pub use state::LevelState;
#[cfg(feature = "tracing")]
pub use tracing_bridge::{EngineLayer, init_tracing, init_tracing_with_filter};

/// Whether named debug flags were compiled in.
pub const DEBUG_FLAGS: bool = cfg!(feature = "debug-flags");

static GLOBAL: OnceLock<LogContext> = OnceLock::new();

/// The process-wide context, built on first use.
///
/// The default context writes to stderr and syslog, starts with the default
/// thresholds and has the `log` component flag registered.
pub fn global() -> &'static LogContext {
    GLOBAL.get_or_init(|| {
        let ctx = LogContext::default();
        // The registry is empty, so registration cannot collide.
        let _ = ctx.register_flag(LOG_COMPONENT_FLAG);
        ctx
    })
}

/// Installs `ctx` as the process-wide context.
///
/// Must run before anything calls [`global`]; afterwards the context is fixed
/// and `ctx` is handed back.
pub fn init_global(ctx: LogContext) -> Result<&'static LogContext, LogContext> {
    GLOBAL.set(ctx)?;
    Ok(global())
}

/// Installs an override sink on the global context, or opens syslog when
/// `sink` is `None`.
pub fn open(sink: Option<Arc<dyn OverrideSink>>) {
    global().open(sink);
}

/// Closes the global context. See [`LogContext::close`].
pub fn close() {
    global().close();
}

/// Sets the global persistent-log threshold.
pub fn set_level(level: LogLevel) {
    global().levels().set_log_level(level);
}

/// Sets the global persistent-log threshold from a raw value, aborting the
/// process if it is outside `-1..=4`.
#[track_caller]
pub fn set_level_raw(value: i32) {
    global()
        .levels()
        .set_raw(Threshold::Persistent, value)
        .or_abort("set_level");
}

/// Global persistent-log threshold.
pub fn get_level() -> LogLevel {
    global().levels().log_level()
}

/// Sets the global console threshold.
pub fn set_print_level(level: LogLevel) {
    global().levels().set_print_level(level);
}

/// Sets the global console threshold from a raw value, aborting the process
/// if it is outside `-1..=4`.
#[track_caller]
pub fn set_print_level_raw(value: i32) {
    global()
        .levels()
        .set_raw(Threshold::Print, value)
        .or_abort("set_print_level");
}

/// Global console threshold.
pub fn get_print_level() -> LogLevel {
    global().levels().print_level()
}

/// Sets the global backtrace threshold.
pub fn set_backtrace_level(level: LogLevel) {
    global().levels().set_backtrace_level(level);
}

/// Sets the global backtrace threshold from a raw value, aborting the process
/// if it is outside `-1..=4`.
#[track_caller]
pub fn set_backtrace_level_raw(value: i32) {
    global()
        .levels()
        .set_raw(Threshold::Backtrace, value)
        .or_abort("set_backtrace_level");
}

/// Global backtrace threshold.
pub fn get_backtrace_level() -> LogLevel {
    global().levels().backtrace_level()
}

/// Registers a flag on the global context, aborting the process on an empty,
/// reserved or duplicate name.
#[track_caller]
pub fn register_flag(name: &str) -> Arc<LogFlag> {
    global().register_flag(name).or_abort("register_flag")
}

/// Whether the named global flag exists and is enabled.
pub fn get_flag(name: &str) -> bool {
    global().flags().get(name)
}

/// Enables a global flag, or all of them for `all`.
pub fn set_flag(name: &str) -> Result<(), FlagError> {
    global().flags().set(name)
}

/// Disables a global flag, or all of them for `all`.
pub fn clear_flag(name: &str) -> Result<(), FlagError> {
    global().flags().clear(name)
}

/// Writes the `--logflag` help line listing the global flags.
pub fn usage<W>(writer: &mut W, option_label: &str) -> io::Result<()>
where
    W: Write + ?Sized,
{
    global().usage(writer, option_label)
}

/// Logs one message through the global context.
pub fn log(
    level: LogLevel,
    location: Option<SourceLocation<'_>>,
    format: &str,
    args: std::fmt::Arguments<'_>,
) {
    global().log(level, location, format, args);
}
