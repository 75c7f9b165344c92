//! crates/logging/src/level.rs
//! Severity levels and the thresholds that gate them.

use std::fmt;
use std::str::FromStr;

use logging_sink::SyslogPriority;
use thiserror::Error;

/// Severity of a log message, ordered from "never emitted" to most verbose.
///
/// A message at level `L` passes a threshold `T` when `L != Disabled` and
/// `L <= T`. Lowering a threshold therefore makes its sink quieter, and a
/// threshold of [`LogLevel::Disabled`] silences the sink entirely.
///
/// ```
/// use logging::LogLevel;
///
/// assert!(LogLevel::Error < LogLevel::Debug);
/// assert!(LogLevel::Warn.passes(LogLevel::Notice));
/// assert!(!LogLevel::Info.passes(LogLevel::Notice));
/// assert!(!LogLevel::Disabled.passes(LogLevel::Debug));
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(i32)]
pub enum LogLevel {
    /// Sentinel that never matches any threshold.
    Disabled = -1,
    /// Failures the caller cannot recover from locally.
    Error = 0,
    /// Unexpected conditions that do not stop the operation.
    Warn = 1,
    /// Significant but normal events. The default threshold.
    #[default]
    Notice = 2,
    /// Progress information.
    Info = 3,
    /// Developer diagnostics.
    Debug = 4,
}

impl LogLevel {
    /// Every level, in ascending order.
    pub const ALL: [Self; 6] = [
        Self::Disabled,
        Self::Error,
        Self::Warn,
        Self::Notice,
        Self::Info,
        Self::Debug,
    ];

    /// Returns the numeric value of the level.
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Converts a raw value back into a level.
    pub const fn from_i32(value: i32) -> Option<Self> {
        match value {
            -1 => Some(Self::Disabled),
            0 => Some(Self::Error),
            1 => Some(Self::Warn),
            2 => Some(Self::Notice),
            3 => Some(Self::Info),
            4 => Some(Self::Debug),
            _ => None,
        }
    }

    /// Name printed between asterisks in located lines.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Disabled => "DISABLED",
            Self::Error => "ERROR",
            Self::Warn => "WARNING",
            Self::Notice => "NOTICE",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
        }
    }

    /// Severity used when the message reaches the persistent channel.
    ///
    /// Info and Debug share `LOG_INFO` so debug output is not dropped by
    /// syslog daemons that filter `LOG_DEBUG`.
    pub const fn syslog_priority(self) -> Option<SyslogPriority> {
        match self {
            Self::Disabled => None,
            Self::Error => Some(SyslogPriority::Error),
            Self::Warn => Some(SyslogPriority::Warning),
            Self::Notice => Some(SyslogPriority::Notice),
            Self::Info | Self::Debug => Some(SyslogPriority::Info),
        }
    }

    /// Reports whether a message at this level passes `threshold`.
    pub fn passes(self, threshold: Self) -> bool {
        self != Self::Disabled && self <= threshold
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a raw value does not name a [`LogLevel`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
#[error("log level {value} is outside -1..=4")]
pub struct InvalidLevel {
    /// The rejected value.
    pub value: i32,
}

impl TryFrom<i32> for LogLevel {
    type Error = InvalidLevel;

    fn try_from(value: i32) -> Result<Self, InvalidLevel> {
        Self::from_i32(value).ok_or(InvalidLevel { value })
    }
}

impl From<LogLevel> for i32 {
    fn from(level: LogLevel) -> Self {
        level.as_i32()
    }
}

/// Error returned when parsing a [`LogLevel`] from text fails.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("unknown log level '{input}'")]
pub struct ParseLevelError {
    input: String,
}

impl ParseLevelError {
    /// Returns the text that failed to parse.
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl FromStr for LogLevel {
    type Err = ParseLevelError;

    /// Accepts level names in any case, and the numeric values `-1..=4`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let level = match trimmed.to_ascii_lowercase().as_str() {
            "disabled" | "none" | "off" => Some(Self::Disabled),
            "error" | "err" => Some(Self::Error),
            "warn" | "warning" => Some(Self::Warn),
            "notice" => Some(Self::Notice),
            "info" => Some(Self::Info),
            "debug" => Some(Self::Debug),
            other => other.parse::<i32>().ok().and_then(Self::from_i32),
        };

        level.ok_or_else(|| ParseLevelError {
            input: trimmed.to_owned(),
        })
    }
}

/// One of the three independent thresholds held by [`LevelState`](crate::LevelState).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Threshold {
    /// Gate for the console (stderr) sink.
    Print,
    /// Gate for the persistent (syslog) sink.
    Persistent,
    /// Gate for stack dumps after console lines.
    Backtrace,
}

impl Threshold {
    /// Human-readable name used in diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Print => "print level",
            Self::Persistent => "log level",
            Self::Backtrace => "backtrace level",
        }
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
