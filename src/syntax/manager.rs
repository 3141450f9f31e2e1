//! Highlighting manager
//!
//! This module provides the HighlightManager that owns the rule and style
//! tables, the style buffer of the attached text buffer, and the repaint
//! state machine that ties them together.

use bitflags::bitflags;
use tracing::{debug, warn};

use super::decl::{FaceDecl, RuleDecl};
use super::faces::resolve_faces;
use super::matcher::restyle;
use super::rules::RuleTable;
use super::style::{Color, StyleRecord, StyleTable};
use super::style_buffer::{Marker, StyleBuffer};
use super::updater::{apply_edit, Edit, Invalidated};
use crate::buffer::{BufferId, TextBuffer};
use crate::config::ConfigSource;
use crate::error::{HighlightError, Result};

bitflags! {
    /// What changed since the last repaint
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RepaintFlags: u8 {
        /// Rule declarations changed
        const CONTEXT_CHANGED = 0b01;
        /// Face declarations changed
        const STYLE_CHANGED = 0b10;
    }
}

/// Progress of the repaint state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RepaintState {
    Uninitialized,
    ContextLoaded,
    StylesLoaded,
    /// A full pass ran and edits are being consumed
    Active,
}

/// Outcome of loading declarations
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Declarations that made it into a table
    pub accepted: usize,
    /// Sentinel declarations skipped on purpose
    pub ignored: usize,
    /// Everything that was dropped, and why
    pub diagnostics: Vec<HighlightError>,
}

impl LoadReport {
    fn absorb(&mut self, other: LoadReport) {
        self.accepted += other.accepted;
        self.ignored += other.ignored;
        self.diagnostics.extend(other.diagnostics);
    }

    fn report(&mut self, err: HighlightError) {
        warn!("{err}");
        self.diagnostics.push(err);
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// One row of the style table dump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleEntry {
    pub font: u32,
    pub size: u32,
    pub color: Color,
    pub marker: char,
}

/// Rule-driven highlighter for one attached text buffer at a time
///
/// Rule and style tables belong to the manager and survive buffer swaps.
#[derive(Debug)]
pub struct HighlightManager {
    rules: RuleTable,
    styles: StyleTable,
    /// Last face declarations, replayed whenever the rules are rebuilt
    faces: Vec<FaceDecl>,
    style_buffer: StyleBuffer,
    state: RepaintState,
    styles_loaded: bool,
    /// Buffer the style buffer belongs to
    attached: Option<BufferId>,
    /// Buffer whose edits are being consumed
    consumer: Option<BufferId>,
}

impl HighlightManager {
    /// Create a manager with empty tables
    pub fn new() -> Self {
        Self {
            rules: RuleTable::new(),
            styles: StyleTable::new(),
            faces: Vec::new(),
            style_buffer: StyleBuffer::default(),
            state: RepaintState::Uninitialized,
            styles_loaded: false,
            attached: None,
            consumer: None,
        }
    }

    pub fn state(&self) -> RepaintState {
        self.state
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn styles(&self) -> &StyleTable {
        &self.styles
    }

    pub fn style_buffer(&self) -> &StyleBuffer {
        &self.style_buffer
    }

    pub fn attached(&self) -> Option<BufferId> {
        self.attached
    }

    /// True once edits of `buffer` are being consumed
    pub fn is_registered(&self, buffer: &TextBuffer) -> bool {
        self.consumer == Some(buffer.id())
    }

    /// Rebuild the rule table from `source`
    ///
    /// Bad declarations are skipped and reported; the rest still load.
    /// Faces loaded earlier are resolved again against the new rules.
    pub fn load_context(&mut self, source: &dyn ConfigSource) -> LoadReport {
        self.load_rules(source, true)
    }

    /// Rebuild the rule table, resolving cached faces only if `resolve`
    fn load_rules(&mut self, source: &dyn ConfigSource, resolve: bool) -> LoadReport {
        let mut report = LoadReport::default();
        self.rules.clear();

        for value in source.context() {
            let decl = match RuleDecl::from_value(&value) {
                Ok(Some(decl)) => decl,
                Ok(None) => {
                    report.ignored += 1;
                    continue;
                }
                Err(err) => {
                    report.report(err);
                    continue;
                }
            };
            match self.rules.add_rule(decl.kind, &decl.payload, &decl.face) {
                Ok(()) => report.accepted += 1,
                Err(err) => report.report(err),
            }
        }

        debug!(rules = self.rules.len(), "context loaded");
        if self.state == RepaintState::Uninitialized {
            self.state = RepaintState::ContextLoaded;
        }
        if self.styles_loaded && resolve {
            let diagnostics = self.rebuild_styles();
            report.diagnostics.extend(diagnostics);
            if self.state == RepaintState::ContextLoaded {
                self.state = RepaintState::StylesLoaded;
            }
        }
        report
    }

    /// Rebuild the style table from the face declarations of `source`
    pub fn load_faces(&mut self, source: &dyn ConfigSource) -> LoadReport {
        let mut report = LoadReport::default();
        let default_color = StyleRecord::default().color;

        self.faces.clear();
        for value in source.faces() {
            match FaceDecl::from_value(&value, default_color) {
                Ok(face) => {
                    report.accepted += 1;
                    self.faces.push(face);
                }
                Err(err) => report.report(err),
            }
        }

        let diagnostics = self.rebuild_styles();
        report.diagnostics.extend(diagnostics);
        self.styles_loaded = true;
        match self.state {
            RepaintState::Uninitialized => {
                debug!("faces loaded before any context, kept for later");
            }
            RepaintState::ContextLoaded => self.state = RepaintState::StylesLoaded,
            RepaintState::StylesLoaded | RepaintState::Active => {}
        }
        report
    }

    /// Clear the style table and resolve the cached faces again
    fn rebuild_styles(&mut self) -> Vec<HighlightError> {
        self.styles.clear();
        self.styles.set_default(StyleRecord::default());
        for rule in self.rules.iter_mut() {
            rule.marker = Marker::PLAIN;
            rule.style_index = 0;
        }
        resolve_faces(&mut self.rules, &mut self.styles, &self.faces)
    }

    /// Reload whatever `flags` name, then restyle `buffer` from scratch
    ///
    /// Without a buffer the tables are still reloaded and the missing
    /// buffer is reported.
    pub fn repaint(
        &mut self,
        flags: RepaintFlags,
        source: &dyn ConfigSource,
        buffer: Option<&TextBuffer>,
    ) -> LoadReport {
        let mut report = LoadReport::default();
        if flags.contains(RepaintFlags::CONTEXT_CHANGED) {
            // faces about to be reloaded are resolved once, below
            let resolve = !flags.contains(RepaintFlags::STYLE_CHANGED);
            report.absorb(self.load_rules(source, resolve));
        }
        if flags.contains(RepaintFlags::STYLE_CHANGED) {
            report.absorb(self.load_faces(source));
        }
        if flags.is_empty() {
            return report;
        }

        match buffer {
            Some(buffer) => {
                if self.attached != Some(buffer.id()) {
                    self.attach(buffer);
                } else if let Err(err) = self.restyle_all(buffer) {
                    report.report(err);
                }
            }
            None => report.report(HighlightError::NoBuffer),
        }
        report
    }

    /// Make `buffer` the highlighted buffer
    ///
    /// Re-attaching the current buffer does nothing. A new buffer drops the
    /// old edit registration; if rules are loaded it is styled right away.
    pub fn attach(&mut self, buffer: &TextBuffer) {
        if self.attached == Some(buffer.id()) {
            return;
        }

        debug!(buffer = ?buffer.id(), "buffer attached");
        self.attached = Some(buffer.id());
        self.consumer = None;
        self.style_buffer.reset(buffer.len());
        self.deactivate();

        if self.state >= RepaintState::ContextLoaded {
            if let Err(err) = self.restyle_all(buffer) {
                warn!("{err}");
            }
        }
    }

    /// Forget the attached buffer
    pub fn detach(&mut self) {
        self.attached = None;
        self.consumer = None;
        self.style_buffer.reset(0);
        self.deactivate();
    }

    /// Step back from `Active` to whatever the tables support
    fn deactivate(&mut self) {
        if self.state == RepaintState::Active {
            self.state = if self.styles_loaded {
                RepaintState::StylesLoaded
            } else {
                RepaintState::ContextLoaded
            };
        }
    }

    /// Full pass: rebuild the style buffer of `buffer` from scratch
    pub fn restyle_all(&mut self, buffer: &TextBuffer) -> Result<&StyleBuffer> {
        if self.attached != Some(buffer.id()) {
            return Err(HighlightError::NoBuffer);
        }

        self.style_buffer.reset(buffer.len());
        let (markers, open) = self.style_buffer.paint_mut(0..buffer.len());
        restyle(&self.rules, buffer.text(), markers, open);

        if self.state >= RepaintState::ContextLoaded {
            self.state = RepaintState::Active;
            self.register(buffer);
        }
        Ok(&self.style_buffer)
    }

    /// Start consuming edits of `buffer`, once per attach
    fn register(&mut self, buffer: &TextBuffer) {
        if self.consumer == Some(buffer.id()) {
            return;
        }
        debug!(buffer = ?buffer.id(), "edit consumer registered");
        self.consumer = Some(buffer.id());
    }

    /// Incremental pass for one edit already applied to `buffer`
    ///
    /// Returns the range that needs redrawing, `None` for a no-op edit.
    pub fn on_edit(&mut self, buffer: &TextBuffer, edit: Edit) -> Result<Option<Invalidated>> {
        if self.attached != Some(buffer.id()) {
            return Err(HighlightError::NoBuffer);
        }
        if self.consumer != Some(buffer.id()) {
            // keep the lengths equal until the first full pass
            self.style_buffer.splice(edit.position, edit.deleted, edit.inserted);
            return Err(HighlightError::NotRegistered);
        }

        let hit = apply_edit(&self.rules, buffer.text(), &mut self.style_buffer, edit);
        if let Some(hit) = &hit {
            if hit.escalated {
                debug!(range = ?hit.range, "restyle escalated");
            }
        }
        debug_assert_eq!(self.style_buffer.len(), buffer.len());
        Ok(hit)
    }

    /// Mark a range of the style buffer as selected
    pub fn highlight_selection(&mut self, range: std::ops::Range<usize>) {
        self.style_buffer.select(range);
    }

    /// Style table rows as `(font, size, color, marker)`
    pub fn dump_style_table(&self) -> Vec<StyleEntry> {
        self.styles
            .iter()
            .enumerate()
            .map(|(index, style)| StyleEntry {
                font: style.font,
                size: style.size,
                color: style.color,
                marker: Marker::for_slot(index).map_or('?', Marker::as_char),
            })
            .collect()
    }

    /// Style buffer as a marker string
    pub fn dump_style_buffer(&self) -> String {
        self.style_buffer.dump()
    }

    /// Style record a marker paints with, the default for unknown slots
    pub fn style_of(&self, marker: Marker) -> StyleRecord {
        self.styles
            .get(marker.slot())
            .copied()
            .unwrap_or_else(|| self.styles.default_style())
    }
}

impl Default for HighlightManager {
    fn default() -> Self {
        Self::new()
    }
}
