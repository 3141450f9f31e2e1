//! highlite - incremental rule-based syntax highlighting
//!
//! Rules and faces are declared in TOML; the engine keeps a per-byte style
//! buffer in step with a text buffer as it is edited.

pub mod buffer;
pub mod config;
pub mod editor;
pub mod error;
pub mod syntax;
pub mod terminal;

pub use buffer::{BufferId, TextBuffer};
pub use config::{ConfigSource, TomlConfig};
pub use editor::{HighlightEditor, Redisplay};
pub use error::{HighlightError, Result};
pub use syntax::{Edit, HighlightManager, Invalidated, LoadReport, RepaintFlags, RepaintState};
pub use terminal::Terminal;
