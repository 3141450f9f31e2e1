//! Editor glue between a text buffer, the highlighter and a display

use std::ops::Range;
use std::path::Path;

use tracing::trace;

use crate::buffer::TextBuffer;
use crate::config::ConfigSource;
use crate::error::{HighlightError, Result};
use crate::syntax::{Edit, HighlightManager, LoadReport, RepaintFlags, RepaintState};

/// Display surface that repaints ranges of the text on request
pub trait Redisplay {
    /// Redraw the byte range `range` of the current buffer
    fn redisplay(&mut self, range: Range<usize>);
}

/// Owns the buffer being edited and keeps its highlighting current
pub struct HighlightEditor<D: Redisplay> {
    buffer: TextBuffer,
    highlighter: HighlightManager,
    config: Box<dyn ConfigSource>,
    display: D,
}

impl<D: Redisplay> HighlightEditor<D> {
    /// Create an editor on an empty buffer
    ///
    /// Nothing is loaded until the first [`repaint`](Self::repaint) or
    /// [`set_buffer`](Self::set_buffer).
    pub fn new(config: Box<dyn ConfigSource>, display: D) -> Self {
        Self {
            buffer: TextBuffer::new(),
            highlighter: HighlightManager::new(),
            config,
            display,
        }
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn highlighter(&self) -> &HighlightManager {
        &self.highlighter
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Borrow the display alongside what it draws from
    pub fn parts_mut(&mut self) -> (&TextBuffer, &HighlightManager, &mut D) {
        (&self.buffer, &self.highlighter, &mut self.display)
    }

    /// Open a file into a fresh buffer
    pub fn open_file(&mut self, path: &Path) -> Result<LoadReport> {
        let buffer = TextBuffer::from_file(path)?;
        Ok(self.set_buffer(buffer))
    }

    /// Replace the current buffer and highlight it
    ///
    /// Declarations are loaded on first use.
    pub fn set_buffer(&mut self, buffer: TextBuffer) -> LoadReport {
        self.buffer = buffer;
        let report = if self.highlighter.state() == RepaintState::Uninitialized {
            self.highlighter.repaint(
                RepaintFlags::CONTEXT_CHANGED | RepaintFlags::STYLE_CHANGED,
                self.config.as_ref(),
                Some(&self.buffer),
            )
        } else {
            self.highlighter.attach(&self.buffer);
            LoadReport::default()
        };
        self.display.redisplay(0..self.buffer.len());
        report
    }

    /// Swap the declaration source; takes effect on the next repaint
    pub fn set_config(&mut self, config: Box<dyn ConfigSource>) {
        self.config = config;
    }

    /// Reload what `flags` name and redraw everything
    pub fn repaint(&mut self, flags: RepaintFlags) -> LoadReport {
        let report = self
            .highlighter
            .repaint(flags, self.config.as_ref(), Some(&self.buffer));
        self.display.redisplay(0..self.buffer.len());
        report
    }

    pub fn insert(&mut self, pos: usize, s: &str) -> Result<()> {
        let edit = self.buffer.insert(pos, s)?;
        self.forward(edit)
    }

    pub fn delete(&mut self, range: Range<usize>) -> Result<()> {
        let edit = self.buffer.delete(range)?;
        self.forward(edit)
    }

    pub fn replace(&mut self, range: Range<usize>, s: &str) -> Result<()> {
        let edit = self.buffer.replace(range, s)?;
        self.forward(edit)
    }

    /// Select a range and highlight it
    pub fn select(&mut self, range: Range<usize>) -> Result<()> {
        let edit = self.buffer.select(range.clone())?;
        self.forward(edit)?;
        if !range.is_empty() {
            self.highlighter.highlight_selection(range.clone());
            self.display.redisplay(range);
        }
        Ok(())
    }

    pub fn unselect(&mut self) -> Result<()> {
        let edit = self.buffer.unselect();
        self.forward(edit)
    }

    /// Hand an edit to the highlighter and redraw what it invalidated
    fn forward(&mut self, edit: Edit) -> Result<()> {
        let selected = self.highlighter.style_buffer().selection();
        match self.highlighter.on_edit(&self.buffer, edit) {
            Ok(Some(hit)) => self.display.redisplay(hit.range),
            Ok(None) => {
                if let Some(range) = selected {
                    self.display.redisplay(range);
                }
            }
            Err(HighlightError::NotRegistered) => {
                // no rules yet; the next full pass picks the text up
                trace!(?edit, "edit before registration ignored");
            }
            Err(err) => return Err(err),
        }
        Ok(())
    }
}
