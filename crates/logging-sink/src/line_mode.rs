//! crates/logging-sink/src/line_mode.rs
//! Line termination policy for console output.

/// Controls whether a [`ConsoleSink`](crate::ConsoleSink) terminates each entry with a newline.
///
/// Callers of the logging macros write messages without a trailing newline,
/// so the console sink appends one by default. Embedders that forward
/// pre-terminated text (for example, lines produced by a C-style formatter)
/// select [`LineMode::WithoutNewline`] to avoid blank lines.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LineMode {
    /// Append a newline terminator after each entry.
    #[default]
    WithNewline,
    /// Emit the entry exactly as rendered.
    WithoutNewline,
}

impl LineMode {
    /// Reports whether the mode appends a trailing newline.
    ///
    /// ```
    /// use logging_sink::LineMode;
    ///
    /// assert!(LineMode::WithNewline.append_newline());
    /// assert!(!LineMode::WithoutNewline.append_newline());
    /// ```
    #[must_use]
    pub const fn append_newline(self) -> bool {
        matches!(self, Self::WithNewline)
    }
}

impl From<bool> for LineMode {
    fn from(append_newline: bool) -> Self {
        if append_newline {
            Self::WithNewline
        } else {
            Self::WithoutNewline
        }
    }
}
