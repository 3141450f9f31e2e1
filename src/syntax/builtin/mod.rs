//! Built-in rule sets
//!
//! Used when no config folder is around. Each set is ordinary TOML in the
//! same format a config file uses.

mod c;
mod python;

use std::path::Path;

use crate::config::TomlConfig;
use crate::error::Result;

/// A built-in rule set and the file extensions it covers
struct Builtin {
    name: &'static str,
    extensions: &'static [&'static str],
    source: &'static str,
}

const BUILTINS: &[Builtin] = &[
    Builtin {
        name: "C",
        extensions: c::C_EXTENSIONS,
        source: c::C_CONFIG,
    },
    Builtin {
        name: "Python",
        extensions: python::PYTHON_EXTENSIONS,
        source: python::PYTHON_CONFIG,
    },
];

/// The C/C++ rule set
pub fn c_config() -> Result<TomlConfig> {
    TomlConfig::parse(c::C_CONFIG)
}

/// Names of the built-in rule sets
pub fn names() -> Vec<&'static str> {
    BUILTINS.iter().map(|b| b.name).collect()
}

/// Look up a rule set by name, case-insensitively
pub fn by_name(name: &str) -> Option<Result<TomlConfig>> {
    BUILTINS
        .iter()
        .find(|b| b.name.eq_ignore_ascii_case(name))
        .map(|b| TomlConfig::parse(b.source))
}

/// Pick a rule set from a file's extension
pub fn for_path(path: &Path) -> Option<Result<TomlConfig>> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    BUILTINS
        .iter()
        .find(|b| b.extensions.contains(&ext.as_str()))
        .map(|b| TomlConfig::parse(b.source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::TextBuffer;
    use crate::syntax::{HighlightManager, RepaintFlags};

    fn highlight(config: &TomlConfig, text: &str) -> (HighlightManager, String) {
        let mut manager = HighlightManager::new();
        let buffer = TextBuffer::from_text(text);
        let report = manager.repaint(
            RepaintFlags::CONTEXT_CHANGED | RepaintFlags::STYLE_CHANGED,
            config,
            Some(&buffer),
        );
        assert!(report.is_clean(), "{:?}", report.diagnostics);
        let dump = manager.dump_style_buffer();
        (manager, dump)
    }

    #[test]
    fn test_builtins_load_cleanly() {
        for name in names() {
            let config = by_name(name).unwrap().unwrap();
            highlight(&config, "");
        }
    }

    #[test]
    fn test_detect_by_extension() {
        assert!(for_path(Path::new("main.c")).is_some());
        assert!(for_path(Path::new("lib.HPP")).is_some());
        assert!(for_path(Path::new("tool.py")).is_some());
        assert!(for_path(Path::new("notes.txt")).is_none());
        assert!(for_path(Path::new("Makefile")).is_none());
    }

    #[test]
    fn test_c_highlighting() {
        let config = c_config().unwrap();
        let (manager, dump) = highlight(&config, "int x = 42; // note\n/* a */ \"s\"");
        let marker = |face: &str| {
            let rule = manager.rules().iter().find(|r| r.face == face).unwrap();
            rule.marker.as_char()
        };
        let keyword = marker("keyword");
        let comment = marker("comment");
        let number = marker("number");
        let string = marker("string");

        let chars: Vec<char> = dump.chars().collect();
        assert_eq!(&chars[0..3], &[keyword; 3]);
        assert_eq!(chars[3], 'A');
        assert_eq!(&chars[8..10], &[number; 2]);
        assert_eq!(&chars[12..20], &[comment; 8]);
        assert_eq!(&chars[20..27], &[comment; 7]);
        assert_eq!(&chars[28..31], &[string; 3]);
    }

    #[test]
    fn test_c_block_opened_after_line_comment() {
        let config = c_config().unwrap();
        let mut buffer = TextBuffer::from_text("x = 1; // note\nint b;\nint c;\n");
        let mut manager = HighlightManager::new();
        manager.repaint(
            RepaintFlags::CONTEXT_CHANGED | RepaintFlags::STYLE_CHANGED,
            &config,
            Some(&buffer),
        );

        let edit = buffer.insert(0, "/*").unwrap();
        let hit = manager.on_edit(&buffer, edit).unwrap().unwrap();
        assert!(hit.escalated);
        assert_eq!(hit.range, 0..buffer.len());

        let (_, full) = highlight(&config, buffer.text());
        assert_eq!(manager.dump_style_buffer(), full);
        let comment = full.chars().next().unwrap();
        assert!(full.chars().all(|c| c == comment));
    }
}
