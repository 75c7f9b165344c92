#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! crates/logging-sink/src/lib.rs
//!
//! # Overview
//!
//! `logging-sink` holds the destinations the leveled-logging engine writes to.
//! Nothing in this crate knows about thresholds or flags; every function here
//! renders text it is handed and pushes it to a writer or to the system log.
//!
//! # Design
//!
//! - [`ConsoleSink`] wraps an [`std::io::Write`] implementor (stderr in
//!   production, a `Vec<u8>` in tests) and renders the timestamped console
//!   line. Callers select whether a newline is appended with [`LineMode`].
//! - [`PersistentLog`] is the seam for the persistent channel. [`Syslog`] is the
//!   libc implementation; tests substitute their own backend.
//! - [`dump`] renders a byte buffer as a hex table whose layout is reproduced
//!   byte for byte so golden files stay stable.
//!
//! # Invariants
//!
//! - Located lines always read `<file>:<line>:<func>: *<LEVEL>*: <message>`, with
//!   the line number right-aligned in four columns.
//! - Timestamps use local time when the offset can be determined and fall back
//!   to UTC otherwise.
//!
//! # Examples
//!
//! ```
//! use logging_sink::{ConsoleSink, LineMode, SourceLocation};
//!
//! let mut sink = ConsoleSink::with_line_mode(Vec::new(), LineMode::WithNewline);
//! let location = SourceLocation::new("conn.rs", 42, "connect");
//! sink.write_message(Some((location, "ERROR")), "refused").unwrap();
//!
//! let output = String::from_utf8(sink.into_inner()).unwrap();
//! assert!(output.ends_with("conn.rs:  42:connect: *ERROR*: refused\n"));
//! ```

mod console;
mod hexdump;
mod line_mode;
mod location;
mod persistent;
pub mod syslog;
mod timestamp;

pub use console::ConsoleSink;
pub use hexdump::{BYTES_PER_ROW, dump};
pub use line_mode::LineMode;
pub use location::{SourceLocation, write_located};
pub use persistent::{NullPersistentLog, PersistentLog, Syslog};
pub use syslog::{SyslogConfig, SyslogFacility, SyslogPriority};
pub use timestamp::{TIMESTAMP_FORMAT, now, write_timestamp_prefix};
