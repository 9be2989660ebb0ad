//! Paginated say-buffer.

/// Sentences queued about the current topic, served one per turn.
///
/// The cursor always lies in `0..=len`. A buffer can only be built through
/// [`SayBuffer::new`], which starts the cursor at zero, so replacing the
/// session's buffer always resets pagination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SayBuffer {
    lines: Vec<String>,
    cursor: usize,
}

impl SayBuffer {
    /// Creates a buffer positioned at its first line.
    #[must_use]
    pub const fn new(lines: Vec<String>) -> Self {
        Self { lines, cursor: 0 }
    }

    /// Returns the line at the cursor and advances, or `None` once exhausted.
    pub fn next_line(&mut self) -> Option<&str> {
        let line = self.lines.get(self.cursor)?;
        self.cursor += 1;
        Some(line.as_str())
    }

    /// Index of the next line to serve.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of lines in the buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if the buffer has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns true if every line has been served.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.lines.len()
    }

    /// All lines, served or not.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serves_lines_in_order_then_stops() {
        let mut buffer = SayBuffer::new(vec!["a".into(), "b".into()]);
        assert_eq!(buffer.next_line(), Some("a"));
        assert_eq!(buffer.next_line(), Some("b"));
        assert!(buffer.is_exhausted());
        assert_eq!(buffer.next_line(), None);
        assert_eq!(buffer.cursor(), 2);
    }

    #[test]
    fn test_empty_buffer_is_exhausted() {
        let mut buffer = SayBuffer::default();
        assert!(buffer.is_empty());
        assert!(buffer.is_exhausted());
        assert_eq!(buffer.next_line(), None);
        assert_eq!(buffer.cursor(), 0);
    }
}
