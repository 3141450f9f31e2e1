//! Configuration file support
//!
//! Rule and face declarations come from TOML files in a config folder
//! (`~/.highlite` by default, `%USERPROFILE%\.highlite` on Windows).
//! `boot.toml` is read first, then `editor.toml`; either may be missing.
//!
//! Format: two arrays of tuples
//! ```text
//! # kind: 1 = to end of line, 2 = block, 3 = regex, 4 = exact
//! context = [
//!   [1, "//", "comment"],
//!   [2, ["/*", "*/"], "comment"],
//!   [3, ["todo", ["ignore-case"]], "todo"],
//! ]
//!
//! # name, color, size, font
//! faces = [
//!   ["default-face", "black", 14, 4],
//!   ["comment", "#888", 14, 4],
//! ]
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use toml::Value;
use tracing::debug;

use crate::error::Result;

/// Files read from a config folder, in load order
pub const CONFIG_FILES: [&str; 2] = ["boot.toml", "editor.toml"];

/// Supplier of rule and face declarations
///
/// Declarations are plain values; shape checking happens when they are
/// loaded, so a source never has to be fully valid.
pub trait ConfigSource {
    /// `[kind, payload, face]` tuples in declaration order
    fn context(&self) -> Vec<Value>;

    /// `[name, color, size, font]` tuples in declaration order
    fn faces(&self) -> Vec<Value>;
}

/// Declarations read from TOML
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    context: Vec<Value>,
    #[serde(default)]
    faces: Vec<Value>,
    /// Folder the declarations were loaded from
    #[serde(skip)]
    folder: Option<PathBuf>,
}

impl TomlConfig {
    /// Parse configuration text
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Load a single configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.folder = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Load every config file present in `dir`
    ///
    /// Missing files are skipped; a file that exists but does not parse is
    /// an error.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let mut config = Self {
            folder: Some(dir.to_path_buf()),
            ..Self::default()
        };

        for name in CONFIG_FILES {
            let path = dir.join(name);
            let contents = match fs::read_to_string(&path) {
                Ok(contents) => contents,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!(path = %path.display(), "config file not found, skipped");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            config.merge(Self::parse(&contents)?);
            debug!(path = %path.display(), "config file loaded");
        }

        Ok(config)
    }

    /// Get the default config folder
    pub fn default_dir() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE")
                .ok()
                .map(|home| PathBuf::from(home).join(".highlite"))
        }

        #[cfg(not(windows))]
        {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".highlite"))
        }
    }

    /// Append another configuration's declarations after this one's
    pub fn merge(&mut self, other: TomlConfig) {
        self.context.extend(other.context);
        self.faces.extend(other.faces);
    }

    /// Folder the configuration came from, if any
    pub fn folder(&self) -> Option<&Path> {
        self.folder.as_deref()
    }
}

impl ConfigSource for TomlConfig {
    fn context(&self) -> Vec<Value> {
        self.context.clone()
    }

    fn faces(&self) -> Vec<Value> {
        self.faces.clone()
    }
}
