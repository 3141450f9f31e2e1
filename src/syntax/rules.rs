//! Match rules for syntax highlighting
//!
//! A rule pairs a matcher with the name of the face it paints. Rules are
//! kept in declaration order; a later rule may overpaint an earlier one.

use regex::{Regex, RegexBuilder};
use toml::Value;

use super::style_buffer::Marker;
use crate::error::{HighlightError, Result};

/// Matching strategy of a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// Literal token painted through the end of its line
    ToEndOfLine,
    /// Start/end token pair, may span lines
    Block,
    /// Compiled regular expression
    Regex,
    /// Literal token painted exactly
    Exact,
}

impl RuleKind {
    /// Decode a declaration kind code
    ///
    /// Codes 0 and 5 are the enum sentinels and are accepted but ignored,
    /// which is reported as `Ok(None)`.
    pub fn from_code(code: i64) -> Result<Option<Self>> {
        match code {
            0 | 5 => Ok(None),
            1 => Ok(Some(RuleKind::ToEndOfLine)),
            2 => Ok(Some(RuleKind::Block)),
            3 => Ok(Some(RuleKind::Regex)),
            4 => Ok(Some(RuleKind::Exact)),
            _ => Err(HighlightError::config(format!("unknown rule kind {code}"))),
        }
    }

    pub fn code(self) -> i64 {
        match self {
            RuleKind::ToEndOfLine => 1,
            RuleKind::Block => 2,
            RuleKind::Regex => 3,
            RuleKind::Exact => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RuleKind::ToEndOfLine => "to-end-of-line",
            RuleKind::Block => "block",
            RuleKind::Regex => "regex",
            RuleKind::Exact => "exact",
        }
    }
}

/// Compile options for regex rules
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegexFlags {
    /// Extended syntax; always on for this engine, accepted for compatibility
    pub extended: bool,
    /// Case-insensitive matching
    pub ignore_case: bool,
    /// `^` and `$` match at line boundaries
    pub newline: bool,
}

impl RegexFlags {
    /// Parse a flag name, `rx_` prefix and either separator accepted
    pub fn set(&mut self, name: &str) -> Result<()> {
        let name = name.to_ascii_lowercase().replace('_', "-");
        match name.strip_prefix("rx-").unwrap_or(&name) {
            "extended" => self.extended = true,
            "ignore-case" => self.ignore_case = true,
            "newline" => self.newline = true,
            other => {
                return Err(HighlightError::config(format!(
                    "bad regex option {other:?}, expected extended, ignore-case or newline"
                )));
            }
        }
        Ok(())
    }

    pub fn compile(self, pattern: &str) -> Result<Regex> {
        RegexBuilder::new(pattern)
            .case_insensitive(self.ignore_case)
            .multi_line(self.newline)
            .build()
            .map_err(|source| HighlightError::PatternCompile {
                pattern: pattern.to_string(),
                source,
            })
    }
}

/// Kind-specific payload of a rule
#[derive(Debug, Clone)]
pub enum Pattern {
    ToEndOfLine(String),
    Block { start: String, end: String },
    Regex(Regex),
    Exact(String),
}

impl Pattern {
    /// Validate a declaration payload against `kind` and build the pattern
    pub fn from_payload(kind: RuleKind, payload: &Value) -> Result<Self> {
        match kind {
            RuleKind::Exact => literal(kind, payload).map(Pattern::Exact),
            RuleKind::ToEndOfLine => literal(kind, payload).map(Pattern::ToEndOfLine),
            RuleKind::Block => {
                let pair = payload.as_array().filter(|items| items.len() == 2);
                let Some([start, end]) = pair.map(Vec::as_slice) else {
                    return Err(HighlightError::config(
                        "block payload must be a [start, end] pair",
                    ));
                };
                Ok(Pattern::Block {
                    start: literal(kind, start)?,
                    end: literal(kind, end)?,
                })
            }
            RuleKind::Regex => {
                let (pattern, flags) = regex_payload(payload)?;
                flags.compile(pattern).map(Pattern::Regex)
            }
        }
    }

    pub fn kind(&self) -> RuleKind {
        match self {
            Pattern::ToEndOfLine(_) => RuleKind::ToEndOfLine,
            Pattern::Block { .. } => RuleKind::Block,
            Pattern::Regex(_) => RuleKind::Regex,
            Pattern::Exact(_) => RuleKind::Exact,
        }
    }
}

fn literal(kind: RuleKind, value: &Value) -> Result<String> {
    match value.as_str() {
        Some("") => Err(HighlightError::config(format!(
            "{} token must not be empty",
            kind.name()
        ))),
        Some(s) => Ok(s.to_string()),
        None => Err(HighlightError::config(format!(
            "{} payload must be a string, got {}",
            kind.name(),
            value.type_str()
        ))),
    }
}

fn regex_payload(payload: &Value) -> Result<(&str, RegexFlags)> {
    let mut flags = RegexFlags::default();
    match payload {
        Value::String(pattern) => Ok((pattern.as_str(), flags)),
        Value::Array(items) => match items.as_slice() {
            [Value::String(pattern), Value::Array(names)] => {
                for name in names {
                    let name = name.as_str().ok_or_else(|| {
                        HighlightError::config("regex options must be strings")
                    })?;
                    flags.set(name)?;
                }
                Ok((pattern.as_str(), flags))
            }
            [Value::String(pattern)] => Ok((pattern.as_str(), flags)),
            _ => Err(HighlightError::config(
                "regex payload must be a pattern or [pattern, [options]]",
            )),
        },
        other => Err(HighlightError::config(format!(
            "regex payload must be a string, got {}",
            other.type_str()
        ))),
    }
}

/// A single declared rule
#[derive(Debug, Clone)]
pub struct Rule {
    /// What to look for
    pub pattern: Pattern,
    /// Face this rule paints with
    pub face: String,
    /// Marker written for matched spans, plain until faces are resolved
    pub marker: Marker,
    /// Style-table slot, 0 until faces are resolved
    pub style_index: usize,
}

impl Rule {
    pub fn new(pattern: Pattern, face: impl Into<String>) -> Self {
        Self {
            pattern,
            face: face.into(),
            marker: Marker::PLAIN,
            style_index: 0,
        }
    }

    pub fn kind(&self) -> RuleKind {
        self.pattern.kind()
    }
}

/// Ordered list of rules
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and append a rule
    ///
    /// On error nothing is inserted and the table is left as it was.
    pub fn add_rule(&mut self, kind: RuleKind, payload: &Value, face: &str) -> Result<()> {
        if face.is_empty() {
            return Err(HighlightError::config("face name must not be empty"));
        }
        let pattern = Pattern::from_payload(kind, payload)?;
        self.push(Rule::new(pattern, face));
        Ok(())
    }

    /// Append an already-built rule
    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Drop every rule along with its compiled pattern
    pub fn clear(&mut self) {
        self.rules.clear();
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Rule> {
        self.rules.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Rule> {
        self.rules.iter_mut()
    }

    /// Position of the first rule painting `face`
    pub fn position_of_face(&self, face: &str) -> Option<usize> {
        self.rules.iter().position(|r| r.face == face)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str) -> Value {
        Value::String(text.to_string())
    }

    #[test]
    fn test_kind_codes() {
        assert_eq!(RuleKind::from_code(0).unwrap(), None);
        assert_eq!(RuleKind::from_code(5).unwrap(), None);
        assert_eq!(RuleKind::from_code(2).unwrap(), Some(RuleKind::Block));
        assert!(RuleKind::from_code(9).is_err());
        for kind in [RuleKind::ToEndOfLine, RuleKind::Block, RuleKind::Regex, RuleKind::Exact] {
            assert_eq!(RuleKind::from_code(kind.code()).unwrap(), Some(kind));
        }
    }

    #[test]
    fn test_add_rule_validates_payload() {
        let mut table = RuleTable::new();
        assert!(table.add_rule(RuleKind::Exact, &Value::Integer(3), "kw").is_err());
        assert!(table.add_rule(RuleKind::Exact, &s(""), "kw").is_err());
        assert!(table.add_rule(RuleKind::Block, &s("/*"), "comment").is_err());
        assert!(table.add_rule(RuleKind::Exact, &s("if"), "").is_err());
        assert!(table.is_empty());

        let pair = Value::Array(vec![s("/*"), s("*/")]);
        table.add_rule(RuleKind::Block, &pair, "comment").unwrap();
        table.add_rule(RuleKind::Exact, &s("if"), "kw").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0).map(Rule::kind), Some(RuleKind::Block));
        assert_eq!(table.get(1).map(|r| r.marker), Some(Marker::PLAIN));
    }

    #[test]
    fn test_bad_regex_is_dropped() {
        let mut table = RuleTable::new();
        let err = table.add_rule(RuleKind::Regex, &s("(unclosed"), "x").unwrap_err();
        assert!(matches!(err, HighlightError::PatternCompile { .. }));
        assert!(table.is_empty());
    }

    #[test]
    fn test_regex_flags() {
        let payload = Value::Array(vec![
            s("^todo"),
            Value::Array(vec![s("RX_IGNORE_CASE"), s("newline")]),
        ]);
        let Pattern::Regex(re) = Pattern::from_payload(RuleKind::Regex, &payload).unwrap() else {
            panic!("expected a regex pattern");
        };
        assert!(re.is_match("x\nTODO"));

        let bad = Value::Array(vec![s("a"), Value::Array(vec![s("global")])]);
        assert!(Pattern::from_payload(RuleKind::Regex, &bad).is_err());
    }

    #[test]
    fn test_position_of_face() {
        let mut table = RuleTable::new();
        table.add_rule(RuleKind::Block, &Value::Array(vec![s("\""), s("\"")]), "str").unwrap();
        table.add_rule(RuleKind::Exact, &s("x"), "kw").unwrap();
        table.add_rule(RuleKind::Exact, &s("y"), "kw").unwrap();
        assert_eq!(table.position_of_face("kw"), Some(1));
        assert_eq!(table.position_of_face("comment"), None);
    }
}
