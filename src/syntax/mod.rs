//! Syntax highlighting engine
//!
//! This module provides the rule-driven highlighter:
//! - Rule and face declarations, and the tables built from them
//! - The matcher that paints markers for a slice of text
//! - Incremental restyling after edits
//! - The manager and its repaint state machine

mod decl;
mod faces;
mod manager;
mod matcher;
mod rules;
mod style;
mod style_buffer;
mod updater;

pub mod builtin;

pub use decl::{FaceDecl, RuleDecl, DEFAULT_FACE};
pub use faces::resolve_faces;
pub use manager::{HighlightManager, LoadReport, RepaintFlags, RepaintState, StyleEntry};
pub use matcher::restyle;
pub use rules::{Pattern, RegexFlags, Rule, RuleKind, RuleTable};
pub use style::{Color, StyleRecord, StyleTable, DEFAULT_FONT, DEFAULT_SIZE};
pub use style_buffer::{Marker, StyleBuffer};
pub use updater::{apply_edit, line_end, line_start, Edit, Invalidated};
