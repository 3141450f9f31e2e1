//! Terminal output using crossterm
//!
//! Paints highlighted text with each style's RGB color. Redraw requests
//! from the editor are collected and drawn on [`Terminal::render`].

use std::io::{self, Write};
use std::ops::Range;

use crossterm::{
    queue,
    style::{Attribute, Color as TermColor, Print, ResetColor, SetAttribute, SetForegroundColor},
};

use crate::buffer::TextBuffer;
use crate::editor::Redisplay;
use crate::error::Result;
use crate::syntax::{Color, HighlightManager, Marker, DEFAULT_FONT};

/// Terminal painter over any writer
pub struct Terminal<W: Write> {
    out: W,
    /// Union of the ranges waiting to be drawn
    pending: Option<Range<usize>>,
}

impl Terminal<io::Stdout> {
    /// Painter writing to standard output
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Terminal<W> {
    pub fn new(out: W) -> Self {
        Self { out, pending: None }
    }

    /// Range that the next render will draw
    pub fn pending(&self) -> Option<Range<usize>> {
        self.pending.clone()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Draw the pending range, widened to whole lines
    pub fn render(&mut self, buffer: &TextBuffer, highlighter: &HighlightManager) -> Result<()> {
        let Some(range) = self.pending.take() else {
            return Ok(());
        };
        let start = buffer.line_start(range.start);
        let end = if range.end > range.start {
            buffer.line_end(range.end - 1)
        } else {
            buffer.line_end(range.end)
        };
        self.paint(buffer, highlighter, start..end)
    }

    /// Write `range` of the buffer, one color run at a time
    fn paint(
        &mut self,
        buffer: &TextBuffer,
        highlighter: &HighlightManager,
        range: Range<usize>,
    ) -> Result<()> {
        let text = buffer.text();
        let style = highlighter.style_buffer();
        let selection = style.selection().unwrap_or(0..0);

        let mut run_start = range.start;
        let mut current = None;
        for (offset, _) in text[range.clone()].char_indices() {
            let pos = range.start + offset;
            let key = (
                style.marker_at(pos).unwrap_or(Marker::PLAIN),
                selection.contains(&pos),
            );
            if current != Some(key) {
                if let Some(prev) = current {
                    self.paint_run(&text[run_start..pos], highlighter, prev)?;
                }
                run_start = pos;
                current = Some(key);
            }
        }
        if let Some(last) = current {
            self.paint_run(&text[run_start..range.end], highlighter, last)?;
        }

        queue!(self.out, ResetColor, SetAttribute(Attribute::Reset))?;
        self.out.flush()?;
        Ok(())
    }

    fn paint_run(
        &mut self,
        text: &str,
        highlighter: &HighlightManager,
        (marker, selected): (Marker, bool),
    ) -> Result<()> {
        let style = highlighter.style_of(marker);
        queue!(
            self.out,
            SetAttribute(Attribute::Reset),
            SetForegroundColor(term_color(style.color))
        )?;
        if style.font > DEFAULT_FONT {
            queue!(self.out, SetAttribute(Attribute::Bold))?;
        }
        if selected {
            queue!(self.out, SetAttribute(Attribute::Reverse))?;
        }
        queue!(self.out, Print(text))?;
        Ok(())
    }
}

impl<W: Write> Redisplay for Terminal<W> {
    fn redisplay(&mut self, range: Range<usize>) {
        self.pending = Some(match self.pending.take() {
            Some(pending) => pending.start.min(range.start)..pending.end.max(range.end),
            None => range,
        });
    }
}

fn term_color(color: Color) -> TermColor {
    TermColor::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

/// Print the style table and the style buffer in text form
pub fn write_dump(out: &mut impl Write, highlighter: &HighlightManager) -> Result<()> {
    writeln!(out, "marker font size color")?;
    for entry in highlighter.dump_style_table() {
        writeln!(
            out,
            "{:<6} {:<4} {:<4} #{:06x}",
            entry.marker,
            entry.font,
            entry.size,
            entry.color.to_u32()
        )?;
    }
    writeln!(out)?;
    writeln!(out, "{}", highlighter.dump_style_buffer())?;
    Ok(())
}
