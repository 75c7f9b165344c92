//! crates/logging/src/stack.rs
//!
//! Stack dumps appended after console lines.
//!
//! Rendering and capture are separate: [`render_backtrace`] turns a list of
//! [`FrameInfo`] into text and is always available, while [`capture`] walks the
//! live stack and exists only with the `backtrace` feature.

use std::io::{self, Write};

use crate::level::LogLevel;

/// One resolved stack frame.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FrameInfo {
    /// Demangled function name without the trailing hash.
    pub function: String,
    /// Instruction pointer of the frame.
    pub ip: usize,
}

impl FrameInfo {
    /// Creates a frame record.
    pub fn new(function: impl Into<String>, ip: usize) -> Self {
        Self {
            function: function.into(),
            ip,
        }
    }
}

/// Writes the marker-bracketed backtrace block for a message at `level`.
///
/// Frames are numbered from 1 and indented by one space per level of depth:
///
/// ```
/// use logging::{FrameInfo, LogLevel, render_backtrace};
///
/// let frames = [FrameInfo::new("connect", 0x4010), FrameInfo::new("run", 0x4200)];
/// let mut out = Vec::new();
/// render_backtrace(&mut out, LogLevel::Error, &frames).unwrap();
///
/// assert_eq!(
///     String::from_utf8(out).unwrap(),
///     "*ERROR*: === BACKTRACE START ===\n\
///      *ERROR*:   1: connect() at 0x4010\n\
///      *ERROR*:   2:  run() at 0x4200\n\
///      *ERROR*: === BACKTRACE END ===\n"
/// );
/// ```
pub fn render_backtrace<W>(writer: &mut W, level: LogLevel, frames: &[FrameInfo]) -> io::Result<()>
where
    W: Write + ?Sized,
{
    let name = level.name();
    writeln!(writer, "*{name}*: === BACKTRACE START ===")?;
    for (index, frame) in frames.iter().enumerate() {
        let number = index + 1;
        writeln!(
            writer,
            "*{name}*: {number:3}: {:indent$}{}() at {:#x}",
            "",
            frame.function,
            frame.ip,
            indent = index,
        )?;
    }
    writeln!(writer, "*{name}*: === BACKTRACE END ===")
}

/// Frames belonging to the capture and dispatch code are not reported.
#[cfg_attr(not(feature = "backtrace"), allow(dead_code))]
fn is_machinery(function: &str) -> bool {
    let function = function.trim_start_matches('<');
    function.starts_with("backtrace::") || function.starts_with("logging::")
}

#[cfg_attr(not(feature = "backtrace"), allow(dead_code))]
fn is_entry_point(function: &str) -> bool {
    function == "main" || function.ends_with("::main")
}

/// Walks the current stack, starting at the first frame outside the logging
/// machinery.
///
/// The walk stops at the first frame whose symbol cannot be resolved and at
/// the program's `main`, which is not included.
#[cfg(feature = "backtrace")]
pub fn capture() -> Vec<FrameInfo> {
    let mut frames = Vec::new();
    let mut skipping = true;

    ::backtrace::trace(|frame| {
        let mut function = None;
        ::backtrace::resolve_frame(frame, |symbol| {
            if function.is_none() {
                function = symbol.name().map(|name| format!("{name:#}"));
            }
        });

        let Some(function) = function else {
            return false;
        };
        if skipping && is_machinery(&function) {
            return true;
        }
        skipping = false;
        if is_entry_point(&function) {
            return false;
        }

        frames.push(FrameInfo::new(function, frame.ip() as usize));
        true
    });

    frames
}

/// Writes the backtrace block for `level` when stack capture is compiled in.
pub(crate) fn emit<W>(writer: &mut W, level: LogLevel) -> io::Result<()>
where
    W: Write + ?Sized,
{
    #[cfg(feature = "backtrace")]
    {
        render_backtrace(writer, level, &capture())
    }
    #[cfg(not(feature = "backtrace"))]
    {
        let _ = (writer, level);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(level: LogLevel, frames: &[FrameInfo]) -> String {
        let mut out = Vec::new();
        render_backtrace(&mut out, level, frames).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn empty_walk_prints_only_markers() {
        assert_eq!(
            render(LogLevel::Warn, &[]),
            "*WARNING*: === BACKTRACE START ===\n*WARNING*: === BACKTRACE END ===\n"
        );
    }

    #[test]
    fn indentation_grows_with_depth() {
        let frames: Vec<_> = (0..4)
            .map(|i| FrameInfo::new(format!("f{i}"), 0x1000 + i))
            .collect();
        let text = render(LogLevel::Debug, &frames);
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[1], "*DEBUG*:   1: f0() at 0x1000");
        assert_eq!(lines[4], "*DEBUG*:   4:    f3() at 0x1003");
    }

    #[test]
    fn frame_numbers_pad_to_three_columns() {
        let frames: Vec<_> = (0..12).map(|i| FrameInfo::new("f", i)).collect();
        let text = render(LogLevel::Error, &frames);
        let twelfth = text.lines().nth(12).unwrap();
        assert!(twelfth.starts_with("*ERROR*:  12: "));
    }

    #[test]
    fn machinery_frames_are_recognised() {
        assert!(is_machinery("logging::engine::LogContext::log_record"));
        assert!(is_machinery("<logging::capture::RecordingSink as logging::OverrideSink>::log"));
        assert!(is_machinery("backtrace::backtrace::trace"));
        assert!(!is_machinery("embedlog::run"));
    }

    #[test]
    fn entry_point_detection() {
        assert!(is_entry_point("main"));
        assert!(is_entry_point("embedlog::main"));
        assert!(!is_entry_point("embedlog::domain"));
    }

    #[cfg(feature = "backtrace")]
    #[test]
    fn capture_skips_logging_frames() {
        let frames = capture();
        assert!(frames.iter().all(|frame| !is_entry_point(&frame.function)));
        if let Some(first) = frames.first() {
            assert!(!first.function.starts_with("backtrace::"));
        }
    }
}
