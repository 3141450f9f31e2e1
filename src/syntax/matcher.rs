//! Rule matching
//!
//! Runs every rule, in table order, over a slice of text and writes the
//! rule's marker into the parallel marker slice. Later rules overpaint
//! earlier ones. The caller decides what the slice starts out as.
//!
//! Block rules also raise the open flag of every byte their span runs on
//! past, whatever ends up painted there.

use regex::Regex;

use super::rules::{Pattern, RuleTable};
use super::style_buffer::Marker;

/// Apply all rules to `text`, painting into `style` and `open`
///
/// Both slices must be exactly as long as `text`; positions are byte
/// offsets.
pub fn restyle(rules: &RuleTable, text: &str, style: &mut [Marker], open: &mut [bool]) {
    debug_assert_eq!(text.len(), style.len());
    debug_assert_eq!(text.len(), open.len());

    for rule in rules.iter() {
        let marker = rule.marker;
        match &rule.pattern {
            Pattern::Exact(token) => paint_exact(text, token, marker, style),
            Pattern::ToEndOfLine(token) => paint_to_eol(text, token, marker, style),
            Pattern::Block { start, end } => paint_block(text, start, end, marker, style, open),
            Pattern::Regex(re) => paint_regex(text, re, marker, style),
        }
    }
}

/// Every non-overlapping occurrence, painted its own length
fn paint_exact(text: &str, token: &str, marker: Marker, style: &mut [Marker]) {
    for (pos, found) in text.match_indices(token) {
        style[pos..pos + found.len()].fill(marker);
    }
}

/// From each occurrence through the next newline, inclusive
///
/// The search resumes right after the token, not after the painted span,
/// so a repeated token on one line is visited again.
fn paint_to_eol(text: &str, token: &str, marker: Marker, style: &mut [Marker]) {
    for (pos, _) in text.match_indices(token) {
        let end = text[pos..]
            .find('\n')
            .map_or(text.len(), |nl| pos + nl + 1);
        style[pos..end].fill(marker);
    }
}

/// From each start token through the first end token after it
///
/// An unterminated block runs to the end of the text and stays open past
/// its last byte. Scanning resumes after the closing token.
fn paint_block(
    text: &str,
    start: &str,
    end: &str,
    marker: Marker,
    style: &mut [Marker],
    open: &mut [bool],
) {
    let mut pos = 0;
    while let Some(found) = text[pos..].find(start) {
        let from = pos + found;
        let body = from + start.len();
        let Some(at) = text[body..].find(end) else {
            style[from..].fill(marker);
            open[from..].fill(true);
            break;
        };
        let close = body + at + end.len();
        style[from..close].fill(marker);
        open[from..close - 1].fill(true);
        pos = close;
    }
}

/// Every successive match of the pattern
///
/// An empty match ends the scan for this rule.
fn paint_regex(text: &str, re: &Regex, marker: Marker, style: &mut [Marker]) {
    let mut pos = 0;
    while pos <= text.len() {
        let Some(m) = re.find_at(text, pos) else {
            break;
        };
        if m.start() == m.end() {
            break;
        }
        style[m.start()..m.end()].fill(marker);
        pos = m.end();
    }
}
