//! crates/logging/src/buffer.rs
//! Bounded rendering of log messages.

use std::fmt::{self, Write as _};

/// Largest rendered message, in bytes. Longer messages are cut short.
pub const MESSAGE_CAPACITY: usize = 1024;

/// Console text emitted in place of a message whose arguments failed to render.
pub const FORMAT_FAILURE_MESSAGE: &str = "error while formatting the log message\n";

/// Fixed-capacity message buffer.
///
/// Writes past [`MESSAGE_CAPACITY`] are dropped silently. Truncation lands on a
/// UTF-8 character boundary, so the buffer always holds valid text.
#[derive(Debug)]
pub struct MessageBuffer {
    text: String,
    truncated: bool,
}

impl MessageBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self {
            text: String::with_capacity(MESSAGE_CAPACITY),
            truncated: false,
        }
    }

    /// Renders `args` into a fresh buffer.
    ///
    /// Fails only when one of the arguments' formatting impls returns an
    /// error. Running out of room is not a failure.
    pub fn render(args: fmt::Arguments<'_>) -> Result<Self, fmt::Error> {
        let mut buffer = Self::new();
        buffer.write_fmt(args)?;
        Ok(buffer)
    }

    /// The rendered text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether any input was discarded.
    pub const fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Consumes the buffer, returning the rendered text.
    pub fn into_string(self) -> String {
        self.text
    }
}

impl Default for MessageBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Write for MessageBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.truncated {
            return Ok(());
        }

        let room = MESSAGE_CAPACITY - self.text.len();
        if s.len() <= room {
            self.text.push_str(s);
            return Ok(());
        }

        let mut end = room;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        self.text.push_str(&s[..end]);
        self.truncated = true;
        Ok(())
    }
}

impl fmt::Display for MessageBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
