//! Rule and face declarations
//!
//! Configuration hands over plain values: a rule is a `[kind, payload,
//! face]` tuple and a face is a `[name, color, size, font]` tuple. This
//! module checks the tuple shapes; payload validation belongs to the rule
//! table.

use toml::Value;

use super::rules::RuleKind;
use super::style::{Color, StyleRecord};
use crate::error::{HighlightError, Result};

/// Face name reserved for the plain style
pub const DEFAULT_FACE: &str = "default-face";

/// A `[kind, payload, face]` tuple with a usable kind
#[derive(Debug, Clone, PartialEq)]
pub struct RuleDecl {
    pub kind: RuleKind,
    pub payload: Value,
    pub face: String,
}

impl RuleDecl {
    /// Check the tuple shape of a rule declaration
    ///
    /// Returns `Ok(None)` for the sentinel kinds that are skipped on purpose.
    pub fn from_value(value: &Value) -> Result<Option<Self>> {
        let Some([kind, payload, face]) = value.as_array().map(Vec::as_slice) else {
            return Err(HighlightError::config(format!(
                "rule must be a [kind, payload, face] tuple, got {value}"
            )));
        };

        let code = kind.as_integer().ok_or_else(|| {
            HighlightError::config(format!("rule kind must be an integer, got {}", kind.type_str()))
        })?;
        let face = face_name(face)?;

        Ok(RuleKind::from_code(code)?.map(|kind| RuleDecl {
            kind,
            payload: payload.clone(),
            face,
        }))
    }
}

/// A `[name, color, size, font]` tuple
#[derive(Debug, Clone, PartialEq)]
pub struct FaceDecl {
    pub name: String,
    pub style: StyleRecord,
}

impl FaceDecl {
    pub fn new(name: impl Into<String>, style: StyleRecord) -> Self {
        Self {
            name: name.into(),
            style,
        }
    }

    /// Check the tuple shape of a face declaration
    ///
    /// Unknown color names fall back to `default_color`.
    pub fn from_value(value: &Value, default_color: Color) -> Result<Self> {
        let Some([name, color, size, font]) = value.as_array().map(Vec::as_slice) else {
            return Err(HighlightError::config(format!(
                "face must be a [name, color, size, font] tuple, got {value}"
            )));
        };

        let name = face_name(name)?;
        let color = match color {
            Value::Integer(packed) => {
                let packed = u32::try_from(*packed).map_err(|_| {
                    HighlightError::config(format!("face {name:?}: bad color {packed}"))
                })?;
                Color::from_u32(packed)
            }
            Value::String(named) => Color::parse_or(named, default_color),
            other => {
                return Err(HighlightError::config(format!(
                    "face {name:?}: color must be an integer or a name, got {}",
                    other.type_str()
                )));
            }
        };
        let size = unsigned(&name, "size", size)?;
        let font = unsigned(&name, "font", font)?;

        Ok(Self::new(name, StyleRecord::new(color, font, size)))
    }

    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_FACE
    }
}

fn face_name(value: &Value) -> Result<String> {
    match value.as_str() {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        Some(_) => Err(HighlightError::config("face name must not be empty")),
        None => Err(HighlightError::config(format!(
            "face name must be a string, got {}",
            value.type_str()
        ))),
    }
}

fn unsigned(face: &str, field: &str, value: &Value) -> Result<u32> {
    value
        .as_integer()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| {
            HighlightError::config(format!(
                "face {face:?}: {field} must be a non-negative integer, got {value}"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Value {
        src.parse::<toml::Table>()
            .map(|t| t["v"].clone())
            .expect("test value parses")
    }

    #[test]
    fn test_rule_decl_shapes() {
        let decl = RuleDecl::from_value(&parse(r#"v = [2, ["/*", "*/"], "comment"]"#))
            .unwrap()
            .unwrap();
        assert_eq!(decl.kind, RuleKind::Block);
        assert_eq!(decl.face, "comment");

        assert!(RuleDecl::from_value(&parse(r#"v = [0, "x", "f"]"#)).unwrap().is_none());
        assert!(RuleDecl::from_value(&parse(r#"v = [5, "x", "f"]"#)).unwrap().is_none());
        assert!(RuleDecl::from_value(&parse(r#"v = [4, "x"]"#)).is_err());
        assert!(RuleDecl::from_value(&parse(r#"v = ["4", "x", "f"]"#)).is_err());
        assert!(RuleDecl::from_value(&parse(r#"v = [4, "x", 7]"#)).is_err());
        assert!(RuleDecl::from_value(&parse(r#"v = [12, "x", "f"]"#)).is_err());
    }

    #[test]
    fn test_face_decl_colors() {
        let face = FaceDecl::from_value(&parse(r##"v = ["comment", "#888", 12, 1]"##), Color::WHITE)
            .unwrap();
        assert_eq!(face.style, StyleRecord::new(Color::rgb(0x88, 0x88, 0x88), 1, 12));

        let face = FaceDecl::from_value(&parse(r#"v = ["kw", 0x0000ff, 12, 1]"#), Color::WHITE)
            .unwrap();
        assert_eq!(face.style.color, Color::rgb(0, 0, 0xff));

        let face = FaceDecl::from_value(&parse(r#"v = ["kw", "mauve", 12, 1]"#), Color::WHITE)
            .unwrap();
        assert_eq!(face.style.color, Color::WHITE);
    }

    #[test]
    fn test_face_decl_rejects_bad_shapes() {
        let white = Color::WHITE;
        assert!(FaceDecl::from_value(&parse(r#"v = ["kw", "red", 12]"#), white).is_err());
        assert!(FaceDecl::from_value(&parse(r#"v = ["kw", "red", -1, 0]"#), white).is_err());
        assert!(FaceDecl::from_value(&parse(r#"v = ["kw", true, 12, 0]"#), white).is_err());
        assert!(FaceDecl::from_value(&parse(r#"v = [1, "red", 12, 0]"#), white).is_err());
    }

    #[test]
    fn test_default_face() {
        let face = FaceDecl::from_value(&parse(r#"v = ["default-face", "navy", 10, 4]"#), Color::BLACK)
            .unwrap();
        assert!(face.is_default());
    }
}
