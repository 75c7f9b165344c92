//! crates/logging-sink/src/syslog.rs
//! Syslog facility, priority and configuration types plus the raw libc calls.
//!
//! The persistent channel uses libc `openlog`/`syslog`/`closelog` directly
//! rather than pulling in a dedicated syslog crate. Facility and priority codes
//! are spelled out numerically so the types exist on every platform; on unix
//! they are checked against libc in the tests below.

use std::fmt;

/// Syslog facility codes matching the POSIX syslog(3) constants.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(i32)]
pub enum SyslogFacility {
    /// Kernel messages (LOG_KERN).
    Kern = 0,
    /// User-level messages (LOG_USER).
    User = 1 << 3,
    /// Mail system (LOG_MAIL).
    Mail = 2 << 3,
    /// System daemons (LOG_DAEMON).
    Daemon = 3 << 3,
    /// Security/authorization messages (LOG_AUTH).
    Auth = 4 << 3,
    /// Messages generated internally by syslogd (LOG_SYSLOG).
    Syslog = 5 << 3,
    /// Line printer subsystem (LOG_LPR).
    Lpr = 6 << 3,
    /// Network news subsystem (LOG_NEWS).
    News = 7 << 3,
    /// UUCP subsystem (LOG_UUCP).
    Uucp = 8 << 3,
    /// Clock daemon (LOG_CRON).
    Cron = 9 << 3,
    /// Reserved for local use (LOG_LOCAL0).
    Local0 = 16 << 3,
    /// Reserved for local use (LOG_LOCAL1).
    Local1 = 17 << 3,
    /// Reserved for local use (LOG_LOCAL2).
    Local2 = 18 << 3,
    /// Reserved for local use (LOG_LOCAL3).
    Local3 = 19 << 3,
    /// Reserved for local use (LOG_LOCAL4).
    Local4 = 20 << 3,
    /// Reserved for local use (LOG_LOCAL5).
    Local5 = 21 << 3,
    /// Reserved for local use (LOG_LOCAL6).
    Local6 = 22 << 3,
    /// Reserved for local use (LOG_LOCAL7). The facility the library logs under.
    #[default]
    Local7 = 23 << 3,
}

impl SyslogFacility {
    /// Parses a facility name, ignoring ASCII case.
    ///
    /// ```
    /// use logging_sink::SyslogFacility;
    ///
    /// assert_eq!(SyslogFacility::from_name("LOCAL7"), Some(SyslogFacility::Local7));
    /// assert_eq!(SyslogFacility::from_name("daemon"), Some(SyslogFacility::Daemon));
    /// assert_eq!(SyslogFacility::from_name("local8"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "kern" => Some(Self::Kern),
            "user" => Some(Self::User),
            "mail" => Some(Self::Mail),
            "daemon" => Some(Self::Daemon),
            "auth" => Some(Self::Auth),
            "syslog" => Some(Self::Syslog),
            "lpr" => Some(Self::Lpr),
            "news" => Some(Self::News),
            "uucp" => Some(Self::Uucp),
            "cron" => Some(Self::Cron),
            "local0" => Some(Self::Local0),
            "local1" => Some(Self::Local1),
            "local2" => Some(Self::Local2),
            "local3" => Some(Self::Local3),
            "local4" => Some(Self::Local4),
            "local5" => Some(Self::Local5),
            "local6" => Some(Self::Local6),
            "local7" => Some(Self::Local7),
            _ => None,
        }
    }

    /// Returns the lowercase facility name accepted by [`from_name`](Self::from_name).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kern => "kern",
            Self::User => "user",
            Self::Mail => "mail",
            Self::Daemon => "daemon",
            Self::Auth => "auth",
            Self::Syslog => "syslog",
            Self::Lpr => "lpr",
            Self::News => "news",
            Self::Uucp => "uucp",
            Self::Cron => "cron",
            Self::Local0 => "local0",
            Self::Local1 => "local1",
            Self::Local2 => "local2",
            Self::Local3 => "local3",
            Self::Local4 => "local4",
            Self::Local5 => "local5",
            Self::Local6 => "local6",
            Self::Local7 => "local7",
        }
    }

    /// Returns the raw facility code passed to `openlog(3)`.
    pub const fn code(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for SyslogFacility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity the persistent channel is opened under unless configured otherwise.
pub const DEFAULT_SYSLOG_IDENT: &str = "embedlog";

/// Identity and facility for the persistent channel.
///
/// Constructing a [`SyslogConfig`] does not open anything; it is handed to
/// [`PersistentLog::open`](crate::PersistentLog::open).
///
/// ```
/// use logging_sink::{SyslogConfig, SyslogFacility};
///
/// let config = SyslogConfig::default();
/// assert_eq!(config.facility(), SyslogFacility::Local7);
/// assert_eq!(config.ident(), "embedlog");
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SyslogConfig {
    facility: SyslogFacility,
    ident: String,
}

impl SyslogConfig {
    /// Creates a configuration with the given facility and identity.
    pub fn new(facility: SyslogFacility, ident: impl Into<String>) -> Self {
        Self {
            facility,
            ident: ident.into(),
        }
    }

    /// Returns the configured facility.
    pub const fn facility(&self) -> SyslogFacility {
        self.facility
    }

    /// Returns the identity prefixed to every syslog entry.
    pub fn ident(&self) -> &str {
        &self.ident
    }
}

impl Default for SyslogConfig {
    fn default() -> Self {
        Self::new(SyslogFacility::default(), DEFAULT_SYSLOG_IDENT)
    }
}

/// Syslog severities matching the POSIX syslog(3) constants.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(i32)]
pub enum SyslogPriority {
    /// System is unusable (LOG_EMERG).
    Emergency = 0,
    /// Action must be taken immediately (LOG_ALERT).
    Alert = 1,
    /// Critical conditions (LOG_CRIT).
    Critical = 2,
    /// Error conditions (LOG_ERR).
    Error = 3,
    /// Warning conditions (LOG_WARNING).
    Warning = 4,
    /// Normal but significant condition (LOG_NOTICE).
    Notice = 5,
    /// Informational messages (LOG_INFO).
    Info = 6,
    /// Debug-level messages (LOG_DEBUG).
    Debug = 7,
}

#[cfg(unix)]
pub(crate) mod sys {
    use std::ffi::CString;
    use std::sync::Mutex;

    use super::{DEFAULT_SYSLOG_IDENT, SyslogConfig, SyslogPriority};

    // openlog(3) keeps the ident pointer, so the string must stay alive until
    // the next openlog call replaces it.
    static IDENT: Mutex<Option<CString>> = Mutex::new(None);

    pub(crate) fn open(config: &SyslogConfig) {
        let ident = CString::new(config.ident()).unwrap_or_else(|_| {
            CString::new(DEFAULT_SYSLOG_IDENT).unwrap_or_default()
        });

        let mut slot = IDENT.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let ptr = slot.insert(ident).as_ptr();

        // SAFETY: `ptr` points into the CString stored in `IDENT`, which is only
        // replaced while holding the lock during a later openlog call.
        unsafe {
            libc::openlog(ptr, libc::LOG_PID, config.facility().code());
        }
    }

    pub(crate) fn write(priority: SyslogPriority, message: &str) {
        let Ok(message) = CString::new(message) else {
            return;
        };

        // "%s" keeps `%` sequences in the message from being interpreted.
        // SAFETY: both pointers are valid NUL-terminated strings for the call.
        unsafe {
            libc::syslog(priority as libc::c_int, c"%s".as_ptr(), message.as_ptr());
        }
    }

    pub(crate) fn close() {
        // SAFETY: closelog has no preconditions.
        unsafe {
            libc::closelog();
        }
    }
}
