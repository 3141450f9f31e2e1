//! Text buffer - the host-side text the engine highlights
//!
//! The buffer owns the text; the highlighter only reads it. Every mutation
//! hands back the [`Edit`] that describes it so the caller can forward it
//! to the edit consumer.

use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{HighlightError, Result};
use crate::syntax::{line_end, line_start, Edit};

/// Identity of a text buffer, unique per process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(u64);

impl BufferId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        BufferId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A text buffer with an optional selection
#[derive(Debug)]
pub struct TextBuffer {
    id: BufferId,
    /// Full UTF-8 text
    text: String,
    /// Associated file path (None for unnamed buffers)
    filename: Option<PathBuf>,
    /// Selected byte range
    selection: Option<Range<usize>>,
}

impl TextBuffer {
    /// Create a new empty buffer
    pub fn new() -> Self {
        Self::from_text(String::new())
    }

    /// Create a buffer holding `text`
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            id: BufferId::next(),
            text: text.into(),
            filename: None,
            selection: None,
        }
    }

    /// Create a buffer from file contents
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut buffer = Self::from_text(content);
        buffer.filename = Some(path.to_path_buf());
        Ok(buffer)
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Get filename if set
    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    /// Start of the line holding `pos`
    pub fn line_start(&self, pos: usize) -> usize {
        line_start(&self.text, pos)
    }

    /// End of the line holding `pos`, past its newline
    pub fn line_end(&self, pos: usize) -> usize {
        line_end(&self.text, pos)
    }

    /// Insert a string at byte position
    pub fn insert(&mut self, pos: usize, s: &str) -> Result<Edit> {
        self.replace(pos..pos, s)
    }

    /// Delete a range of bytes
    pub fn delete(&mut self, range: Range<usize>) -> Result<Edit> {
        self.replace(range, "")
    }

    /// Replace a range of bytes with `s`
    pub fn replace(&mut self, range: Range<usize>, s: &str) -> Result<Edit> {
        self.check(range.start)?;
        self.check(range.end)?;
        if range.start > range.end {
            return Err(HighlightError::OutOfRange {
                position: range.start,
                len: self.text.len(),
            });
        }

        self.text.replace_range(range.clone(), s);
        let edit = Edit::new(range.start, s.len(), range.end - range.start);
        self.selection = self.selection.take().and_then(|sel| edit.shift(sel));
        Ok(edit)
    }

    /// Select a byte range
    ///
    /// Selection changes are reported as a no-op edit, the same way a
    /// display widget hears about them.
    pub fn select(&mut self, range: Range<usize>) -> Result<Edit> {
        self.check(range.start)?;
        self.check(range.end)?;
        self.selection = (range.start < range.end).then_some(range.clone());
        Ok(Edit::new(range.start, 0, 0))
    }

    pub fn unselect(&mut self) -> Edit {
        self.selection = None;
        Edit::new(0, 0, 0)
    }

    pub fn selection(&self) -> Option<Range<usize>> {
        self.selection.clone()
    }

    fn check(&self, pos: usize) -> Result<()> {
        if pos <= self.text.len() && self.text.is_char_boundary(pos) {
            Ok(())
        } else {
            Err(HighlightError::OutOfRange {
                position: pos,
                len: self.text.len(),
            })
        }
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}
