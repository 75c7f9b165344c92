//! crates/logging/src/capture.rs
//! In-memory sinks for tests and embedders that inspect log output.

use std::fmt::Write as _;
use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use logging_sink::{PersistentLog, SyslogConfig, SyslogFacility, SyslogPriority};

use crate::level::LogLevel;
use crate::record::{LogRecord, OverrideSink};

/// Owned copy of a [`LogRecord`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CapturedRecord {
    /// Severity of the call.
    pub level: LogLevel,
    /// Source file, when the call carried a location.
    pub file: Option<String>,
    /// Source line, `0` without a location.
    pub line: u32,
    /// Enclosing function, when the call carried a location.
    pub function: Option<String>,
    /// The unexpanded format string.
    pub format: String,
    /// The rendered message.
    pub message: String,
}

impl CapturedRecord {
    /// Copies the parts of `record` that outlive the call.
    ///
    /// A message whose arguments fail to render keeps whatever text was
    /// produced before the failure.
    pub fn from_record(record: &LogRecord<'_>) -> Self {
        let mut message = String::new();
        let _ = message.write_fmt(record.args());

        Self {
            level: record.level(),
            file: record.file().map(str::to_owned),
            line: record.line(),
            function: record.function().map(str::to_owned),
            format: record.format().to_owned(),
            message,
        }
    }
}

/// Override sink that keeps every record it receives.
///
/// ```
/// use std::sync::Arc;
///
/// use logging::{LogContext, LogLevel, RecordingSink};
///
/// let sink = Arc::new(RecordingSink::new());
/// let ctx = LogContext::builder().build();
/// ctx.open(Some(sink.clone()));
///
/// ctx.log(LogLevel::Info, None, "ready", format_args!("ready"));
///
/// let records = sink.records();
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].message, "ready");
/// ```
#[derive(Debug, Default)]
pub struct RecordingSink {
    records: Mutex<Vec<CapturedRecord>>,
}

impl RecordingSink {
    /// Creates an empty sink.
    pub const fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    /// Copies of the records received so far, oldest first.
    pub fn records(&self) -> Vec<CapturedRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Removes and returns the records received so far.
    pub fn take(&self) -> Vec<CapturedRecord> {
        std::mem::take(&mut *self.records.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Number of records received.
    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether nothing has been received.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OverrideSink for RecordingSink {
    fn log(&self, record: &LogRecord<'_>) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(CapturedRecord::from_record(record));
    }
}

/// Shared byte buffer usable as the console writer.
///
/// Clones share storage, so a test keeps one handle and gives the other to
/// [`LogContextBuilder::console`](crate::LogContextBuilder::console).
#[derive(Clone, Debug, Default)]
pub struct CaptureBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl CaptureBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything written so far.
    pub fn contents(&self) -> Vec<u8> {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Everything written so far, decoded lossily as UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.contents()).into_owned()
    }

    /// Discards everything written so far.
    pub fn clear(&self) {
        self.bytes.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl io::Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// One call observed by [`RecordingPersistentLog`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PersistentEntry {
    /// The channel was opened.
    Open {
        /// Identity passed to `open`.
        ident: String,
        /// Facility passed to `open`.
        facility: SyslogFacility,
    },
    /// An entry was written.
    Write {
        /// Severity of the entry.
        priority: SyslogPriority,
        /// Rendered text.
        message: String,
    },
    /// The channel was closed.
    Close,
}

/// Persistent backend that records calls instead of reaching syslog.
///
/// Clones share the call log.
#[derive(Clone, Debug, Default)]
pub struct RecordingPersistentLog {
    entries: Arc<Mutex<Vec<PersistentEntry>>>,
}

impl RecordingPersistentLog {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call observed so far, oldest first.
    pub fn entries(&self) -> Vec<PersistentEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Only the written entries, as `(priority, message)` pairs.
    pub fn writes(&self) -> Vec<(SyslogPriority, String)> {
        self.entries()
            .into_iter()
            .filter_map(|entry| match entry {
                PersistentEntry::Write { priority, message } => Some((priority, message)),
                PersistentEntry::Open { .. } | PersistentEntry::Close => None,
            })
            .collect()
    }

    fn push(&self, entry: PersistentEntry) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }
}

impl PersistentLog for RecordingPersistentLog {
    fn open(&mut self, config: &SyslogConfig) {
        self.push(PersistentEntry::Open {
            ident: config.ident().to_owned(),
            facility: config.facility(),
        });
    }

    fn write(&mut self, priority: SyslogPriority, message: &str) {
        self.push(PersistentEntry::Write {
            priority,
            message: message.to_owned(),
        });
    }

    fn close(&mut self) {
        self.push(PersistentEntry::Close);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;
    use std::io::Write;

    use logging_sink::SourceLocation;

    struct Broken;

    impl fmt::Display for Broken {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("part")?;
            Err(fmt::Error)
        }
    }

    #[test]
    fn recording_sink_copies_every_field() {
        let sink = RecordingSink::new();
        let location = SourceLocation::new("qp.rs", 88, "post");
        sink.log(&LogRecord::new(
            LogLevel::Debug,
            Some(location),
            "wr_id {}",
            format_args!("wr_id {}", 7),
        ));

        assert_eq!(
            sink.take(),
            vec![CapturedRecord {
                level: LogLevel::Debug,
                file: Some("qp.rs".into()),
                line: 88,
                function: Some("post".into()),
                format: "wr_id {}".into(),
                message: "wr_id 7".into(),
            }]
        );
        assert!(sink.is_empty());
    }

    #[test]
    fn failed_rendering_keeps_partial_text() {
        let sink = RecordingSink::new();
        sink.log(&LogRecord::new(
            LogLevel::Error,
            None,
            "{}",
            format_args!("{}", Broken),
        ));
        assert_eq!(sink.records()[0].message, "part");
    }

    #[test]
    fn capture_buffer_clones_share_storage() {
        let buffer = CaptureBuffer::new();
        let mut writer = buffer.clone();
        writer.write_all(b"hello ").unwrap();
        writer.write_all(b"world").unwrap();

        assert_eq!(buffer.text(), "hello world");
        buffer.clear();
        assert!(buffer.contents().is_empty());
    }

    #[test]
    fn recording_backend_logs_calls_in_order() {
        let recorder = RecordingPersistentLog::new();
        let mut backend = recorder.clone();
        backend.open(&SyslogConfig::default());
        backend.write(SyslogPriority::Error, "bad");
        backend.close();

        assert_eq!(
            recorder.entries(),
            vec![
                PersistentEntry::Open {
                    ident: "embedlog".into(),
                    facility: SyslogFacility::Local7,
                },
                PersistentEntry::Write {
                    priority: SyslogPriority::Error,
                    message: "bad".into(),
                },
                PersistentEntry::Close,
            ]
        );
        assert_eq!(recorder.writes(), vec![(SyslogPriority::Error, "bad".into())]);
    }
}
