//! Incremental restyling
//!
//! Each text edit repaints the lines it touched. If the last marker of that
//! window changes, a multi-line construct may have opened or closed, and
//! everything from the window to the end of the text is repainted.

use std::ops::Range;

use tracing::trace;

use super::matcher::restyle;
use super::rules::RuleTable;
use super::style_buffer::{Marker, StyleBuffer};

/// One modification of the text buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edit {
    /// Byte offset of the change
    pub position: usize,
    /// Bytes inserted at `position`
    pub inserted: usize,
    /// Bytes removed at `position`
    pub deleted: usize,
}

impl Edit {
    pub fn new(position: usize, inserted: usize, deleted: usize) -> Self {
        Self {
            position,
            inserted,
            deleted,
        }
    }

    pub fn insert(position: usize, inserted: usize) -> Self {
        Self::new(position, inserted, 0)
    }

    pub fn delete(position: usize, deleted: usize) -> Self {
        Self::new(position, 0, deleted)
    }

    /// True for the empty notifications sent on selection changes
    pub fn is_noop(&self) -> bool {
        self.inserted == 0 && self.deleted == 0
    }

    /// Where `range` ends up after this edit
    ///
    /// Edits entirely before the range shift it, edits entirely after it
    /// leave it alone, and an edit touching it drops it.
    pub fn shift(&self, range: Range<usize>) -> Option<Range<usize>> {
        let end = self.position + self.deleted;
        if end <= range.start {
            let start = range.start - self.deleted + self.inserted;
            Some(start..start + range.len())
        } else if self.position >= range.end {
            Some(range)
        } else {
            None
        }
    }
}

/// How far an edit's repaint reached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invalidated {
    pub range: Range<usize>,
    /// The local window was not enough and the tail was repainted
    pub escalated: bool,
}

/// Start of the line holding `pos`
pub fn line_start(text: &str, pos: usize) -> usize {
    let pos = pos.min(text.len());
    text.as_bytes()[..pos]
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |nl| nl + 1)
}

/// End of the line holding `pos`, past its newline when it has one
pub fn line_end(text: &str, pos: usize) -> usize {
    let pos = pos.min(text.len());
    text.as_bytes()[pos..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(text.len(), |nl| pos + nl + 1)
}

/// Bring `style` up to date with an edit already applied to `text`
///
/// Returns the repainted range, or `None` for a no-op edit (which only
/// drops the selection).
pub fn apply_edit(
    rules: &RuleTable,
    text: &str,
    style: &mut StyleBuffer,
    edit: Edit,
) -> Option<Invalidated> {
    if edit.is_noop() {
        style.unselect();
        return None;
    }

    style.splice(edit.position, edit.deleted, edit.inserted);
    if style.len() != text.len() {
        // the edit did not describe the text we were handed; start over
        style.reset(text.len());
        repaint(rules, text, style, 0..text.len());
        return Some(Invalidated {
            range: 0..text.len(),
            escalated: true,
        });
    }

    let start = carry_in(text, style, line_start(text, edit.position));
    let end = line_end(text, edit.position + edit.inserted);
    trace!(?edit, start, end, "local restyle");

    let before = window_end(style, start, end);
    repaint(rules, text, style, start..end);
    let after = window_end(style, start, end);

    // a block open across the window end reaches into text not repainted
    let crosses = before.1 || after.1;
    if start == end || before != after || crosses {
        let tail = start..text.len();
        trace!(?tail, "escalating restyle");
        repaint(rules, text, style, tail.clone());
        return Some(Invalidated {
            range: tail,
            escalated: true,
        });
    }

    Some(Invalidated {
        range: start..end,
        escalated: false,
    })
}

/// Move a window start back over lines covered by an open block
///
/// When a block span runs on past the byte just before `start`, the window
/// sits inside a block that began earlier. Restart from the line where that
/// span begins so the block is matched from its start token again.
fn carry_in(text: &str, style: &StyleBuffer, mut start: usize) -> usize {
    let open = style.open_flags();
    while start > 0 && open[start - 1] {
        let span_start = open[..start - 1]
            .iter()
            .rposition(|&o| !o)
            .map_or(0, |i| i + 1);
        start = line_start(text, span_start);
    }
    start
}

/// Last marker of the window and whether a block runs on past it
fn window_end(style: &StyleBuffer, start: usize, end: usize) -> (Option<Marker>, bool) {
    if end > start {
        (style.marker_at(end - 1), style.is_open_at(end - 1))
    } else {
        (None, false)
    }
}

fn repaint(rules: &RuleTable, text: &str, style: &mut StyleBuffer, range: Range<usize>) {
    style.clear_range(range.clone());
    let (markers, open) = style.paint_mut(range.clone());
    restyle(rules, &text[range], markers, open);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::rules::{Pattern, Rule, RuleKind};
    use proptest::prelude::*;
    use toml::Value;

    fn s(text: &str) -> Value {
        Value::String(text.to_string())
    }

    fn rule(kind: RuleKind, payload: Value, marker: char) -> Rule {
        let mut rule = Rule::new(Pattern::from_payload(kind, &payload).unwrap(), "f");
        rule.marker = Marker::from_char(marker).unwrap();
        rule
    }

    fn c_rules() -> RuleTable {
        let mut table = RuleTable::new();
        table.push(rule(RuleKind::Exact, s("int"), 'K'));
        table.push(rule(RuleKind::ToEndOfLine, s("//"), 'C'));
        table.push(rule(RuleKind::Block, Value::Array(vec![s("/*"), s("*/")]), 'C'));
        table
    }

    fn full(rules: &RuleTable, text: &str) -> StyleBuffer {
        let mut style = StyleBuffer::new(text.len());
        let (markers, open) = style.paint_mut(0..text.len());
        restyle(rules, text, markers, open);
        style
    }

    /// Apply a textual edit and the matching style update
    fn edit(
        rules: &RuleTable,
        text: &mut String,
        style: &mut StyleBuffer,
        pos: usize,
        deleted: usize,
        insert: &str,
    ) -> Option<Invalidated> {
        text.replace_range(pos..pos + deleted, insert);
        apply_edit(rules, text, style, Edit::new(pos, insert.len(), deleted))
    }

    #[test]
    fn test_line_bounds() {
        let text = "ab\ncd\n\nef";
        assert_eq!(line_start(text, 4), 3);
        assert_eq!(line_end(text, 4), 6);
        assert_eq!(line_start(text, 6), 6);
        assert_eq!(line_end(text, 6), 7);
        assert_eq!(line_end(text, 8), 9);
        assert_eq!(line_start(text, 0), 0);
        assert_eq!(line_end(text, 99), 9);
    }

    #[test]
    fn test_noop_edit_clears_selection() {
        let rules = c_rules();
        let text = "int x;";
        let mut style = full(&rules, text);
        style.select(0..3);
        assert_eq!(apply_edit(&rules, text, &mut style, Edit::new(2, 0, 0)), None);
        assert_eq!(style.selection(), None);
        assert_eq!(style.dump(), "KKKAAA");
    }

    #[test]
    fn test_local_edit_stays_on_its_line() {
        let rules = c_rules();
        let mut text = String::from("a\nin\nb\n");
        let mut style = full(&rules, &text);

        let hit = edit(&rules, &mut text, &mut style, 4, 0, "t").unwrap();
        assert_eq!(hit, Invalidated { range: 2..6, escalated: false });
        assert_eq!(style.dump(), "AAKKKAAA");
    }

    #[test]
    fn test_opening_block_escalates_to_end() {
        let rules = c_rules();
        let mut text = String::from("x\n/ y\nz\nw");
        let mut style = full(&rules, &text);
        assert_eq!(style.dump(), "A".repeat(text.len()));

        let hit = edit(&rules, &mut text, &mut style, 3, 0, "*").unwrap();
        assert!(hit.escalated);
        assert_eq!(hit.range, 2..text.len());
        assert_eq!(style, full(&rules, &text));
    }

    #[test]
    fn test_closing_block_escalates_to_end() {
        let rules = c_rules();
        let mut text = String::from("/* a\nb *\nint");
        let mut style = full(&rules, &text);

        let hit = edit(&rules, &mut text, &mut style, 8, 0, "/").unwrap();
        assert!(hit.escalated);
        assert_eq!(style.dump(), "CCCCCCCCCAKKK");
    }

    #[test]
    fn test_edit_inside_open_block_keeps_block() {
        let rules = c_rules();
        let mut text = String::from("int\n/* a\nb\nc */ int");
        let mut style = full(&rules, &text);

        let hit = edit(&rules, &mut text, &mut style, 9, 0, "int").unwrap();
        assert_eq!(hit.range.start, 4);
        assert_eq!(style, full(&rules, &text));
    }

    #[test]
    fn test_empty_line_escalates() {
        let rules = c_rules();
        let mut text = String::from("int\nx");
        let mut style = full(&rules, &text);

        let hit = edit(&rules, &mut text, &mut style, 4, 1, "").unwrap();
        assert!(hit.escalated);
        assert_eq!(hit.range, 4..4);
        assert_eq!(style.dump(), "KKKA");
    }

    #[test]
    fn test_join_lines_by_deleting_newline() {
        let rules = c_rules();
        let mut text = String::from("in\nt x");
        let mut style = full(&rules, &text);

        edit(&rules, &mut text, &mut style, 2, 1, "").unwrap();
        assert_eq!(text, "int x");
        assert_eq!(style.dump(), "KKKAA");
    }

    #[test]
    fn test_length_mismatch_recovers() {
        let rules = c_rules();
        let text = "int";
        let mut style = StyleBuffer::new(1);
        let hit = apply_edit(&rules, text, &mut style, Edit::insert(0, 1)).unwrap();
        assert_eq!(hit.range, 0..3);
        assert_eq!(style.dump(), "KKK");
    }

    #[test]
    fn test_block_opened_on_commented_line_escalates() {
        let rules = c_rules();
        let mut text = String::from("x = 1; // note\nint b;\nint c;\n");
        let mut style = full(&rules, &text);

        let hit = edit(&rules, &mut text, &mut style, 0, 0, "/*").unwrap();
        assert!(hit.escalated);
        assert_eq!(hit.range, 0..text.len());
        assert_eq!(style.dump(), "C".repeat(text.len()));
    }

    #[test]
    fn test_block_closed_on_commented_line_escalates() {
        let rules = c_rules();
        let mut text = String::from("/* a // b\nint c;\n");
        let mut style = full(&rules, &text);

        let hit = edit(&rules, &mut text, &mut style, 4, 0, "*/").unwrap();
        assert!(hit.escalated);
        assert_eq!(style, full(&rules, &text));
        assert!(style.dump().ends_with("CKKKAAAA"));
    }

    #[test]
    fn test_plain_line_edit_stays_local_with_blocks() {
        let rules = c_rules();
        let mut text = String::from("/* a */\nx\n/* b */\n");
        let mut style = full(&rules, &text);

        let hit = edit(&rules, &mut text, &mut style, 8, 0, "int ").unwrap();
        assert_eq!(hit, Invalidated { range: 8..14, escalated: false });
        assert_eq!(style, full(&rules, &text));
    }

    /// Two block rules, one sharing its marker with a line rule
    fn mixed_rules() -> RuleTable {
        let mut table = RuleTable::new();
        table.push(rule(RuleKind::Exact, s("int"), 'K'));
        table.push(rule(RuleKind::Block, Value::Array(vec![s("\""), s("\"")]), 'S'));
        table.push(rule(RuleKind::ToEndOfLine, s("//"), 'C'));
        table.push(rule(RuleKind::Block, Value::Array(vec![s("/*"), s("*/")]), 'C'));
        table
    }

    fn edits() -> impl Strategy<Value = Vec<(usize, usize, String)>> {
        let piece = prop_oneof![
            Just("int".to_string()),
            Just("//".to_string()),
            Just("/*".to_string()),
            Just("*/".to_string()),
            Just("\n".to_string()),
            Just("\"".to_string()),
            Just(String::new()),
            "[a-z /*\"\n]{0,4}",
        ];
        prop::collection::vec((any::<usize>(), 0usize..4, piece), 1..24)
    }

    fn clamp(text: &str, pos: usize, deleted: usize) -> (usize, usize) {
        let pos = pos % (text.len() + 1);
        (pos, deleted.min(text.len() - pos))
    }

    proptest! {
        #[test]
        fn prop_lengths_stay_equal(seed in "[a-z /*\n]{0,40}", steps in edits()) {
            let rules = c_rules();
            let mut text = seed;
            let mut style = full(&rules, &text);
            for (pos, deleted, insert) in steps {
                let (pos, deleted) = clamp(&text, pos, deleted);
                edit(&rules, &mut text, &mut style, pos, deleted, &insert);
                prop_assert_eq!(style.len(), text.len());
            }
        }

        #[test]
        fn prop_line_rules_match_full_restyle(seed in "[a-z /\n]{0,40}", steps in edits()) {
            let mut rules = RuleTable::new();
            rules.push(rule(RuleKind::Exact, s("int"), 'K'));
            rules.push(rule(RuleKind::ToEndOfLine, s("//"), 'C'));

            let mut text = seed;
            let mut style = full(&rules, &text);
            for (pos, deleted, insert) in steps {
                let (pos, deleted) = clamp(&text, pos, deleted);
                edit(&rules, &mut text, &mut style, pos, deleted, &insert);
                prop_assert_eq!(style.dump(), full(&rules, &text).dump());
            }
        }

        #[test]
        fn prop_block_rules_match_full_restyle(seed in "[a-z /*\"\n]{0,40}", steps in edits()) {
            let rules = mixed_rules();
            let mut text = seed;
            let mut style = full(&rules, &text);
            for (pos, deleted, insert) in steps {
                let (pos, deleted) = clamp(&text, pos, deleted);
                edit(&rules, &mut text, &mut style, pos, deleted, &insert);
                prop_assert_eq!(&style, &full(&rules, &text));
            }
        }

        #[test]
        fn prop_shared_comment_marker_matches_full_restyle(
            seed in "[a-z /*\n]{0,40}",
            steps in edits(),
        ) {
            let rules = c_rules();
            let mut text = seed;
            let mut style = full(&rules, &text);
            for (pos, deleted, insert) in steps {
                let (pos, deleted) = clamp(&text, pos, deleted);
                edit(&rules, &mut text, &mut style, pos, deleted, &insert);
                prop_assert_eq!(style.dump(), full(&rules, &text).dump());
            }
        }
    }
}
