//! crates/logging-sink/src/persistent.rs
//! Backends for the persistent log channel.

use std::fmt;

use crate::syslog::{SyslogConfig, SyslogPriority};

/// Destination for entries that must outlive the console, normally syslog.
///
/// The engine opens the backend once, writes rendered lines at a severity
/// derived from the log level, and closes it again. Implementations must
/// tolerate `write` and `close` without a preceding `open`.
pub trait PersistentLog: Send + fmt::Debug {
    /// Opens the channel under the configured identity and facility.
    fn open(&mut self, config: &SyslogConfig);

    /// Sends one rendered entry.
    fn write(&mut self, priority: SyslogPriority, message: &str);

    /// Closes the channel.
    fn close(&mut self);
}

/// [`PersistentLog`] backed by the process-wide syslog(3) connection.
///
/// On non-unix targets every call is a no-op.
#[derive(Debug, Default)]
pub struct Syslog {
    open: bool,
}

impl Syslog {
    /// Creates a closed backend.
    #[must_use]
    pub const fn new() -> Self {
        Self { open: false }
    }

    /// Reports whether `open` was called without a matching `close`.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }
}

impl PersistentLog for Syslog {
    fn open(&mut self, config: &SyslogConfig) {
        #[cfg(unix)]
        crate::syslog::sys::open(config);
        #[cfg(not(unix))]
        let _ = config;
        self.open = true;
    }

    fn write(&mut self, priority: SyslogPriority, message: &str) {
        #[cfg(unix)]
        crate::syslog::sys::write(priority, message);
        #[cfg(not(unix))]
        let _ = (priority, message);
    }

    fn close(&mut self) {
        // closelog(3) is harmless when nothing was opened.
        #[cfg(unix)]
        crate::syslog::sys::close();
        self.open = false;
    }
}

/// [`PersistentLog`] that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPersistentLog;

impl PersistentLog for NullPersistentLog {
    fn open(&mut self, _config: &SyslogConfig) {}

    fn write(&mut self, _priority: SyslogPriority, _message: &str) {}

    fn close(&mut self) {}
}
