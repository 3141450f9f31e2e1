//! Per-character style markers
//!
//! The style buffer runs parallel to the text buffer: one [`Marker`] per
//! byte of text, naming the style-table slot that byte is painted with.

use std::fmt;
use std::ops::Range;

use super::updater::Edit;

/// Single printable character naming a style-table slot
///
/// Markers are `'A' + slot`, bounded by `'z'`, which gives 58 slots.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Marker(u8);

impl Marker {
    /// Marker of the plain style (slot 0)
    pub const PLAIN: Marker = Marker(b'A');

    /// Highest marker of the alphabet
    pub const LAST: Marker = Marker(b'z');

    /// Number of distinct slots the alphabet can address
    pub const SLOTS: usize = (b'z' - b'A') as usize + 1;

    /// Marker for a style-table slot, `None` once the alphabet runs out
    pub fn for_slot(slot: usize) -> Option<Self> {
        if slot < Self::SLOTS {
            Some(Marker(b'A' + slot as u8))
        } else {
            None
        }
    }

    /// Parse a marker character
    pub fn from_char(ch: char) -> Option<Self> {
        ('A'..='z').contains(&ch).then(|| Marker(ch as u8))
    }

    /// Style-table slot this marker addresses
    pub fn slot(self) -> usize {
        usize::from(self.0 - b'A')
    }

    pub fn as_char(self) -> char {
        char::from(self.0)
    }

    pub fn is_plain(self) -> bool {
        self == Self::PLAIN
    }
}

impl Default for Marker {
    fn default() -> Self {
        Self::PLAIN
    }
}

impl fmt::Debug for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Marker({:?})", self.as_char())
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Marker array tied 1:1 to a text buffer
///
/// Next to each marker sits a flag telling whether a block span runs on
/// past that byte. Markers can be overpainted and shared between faces;
/// the flags cannot, so they are what says where open blocks are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleBuffer {
    markers: Vec<Marker>,
    open: Vec<bool>,
    selection: Option<Range<usize>>,
}

impl StyleBuffer {
    /// Create a plain buffer of `len` markers
    pub fn new(len: usize) -> Self {
        Self {
            markers: vec![Marker::PLAIN; len],
            open: vec![false; len],
            selection: None,
        }
    }

    /// Discard everything and start over with `len` plain markers
    pub fn reset(&mut self, len: usize) {
        self.markers.clear();
        self.markers.resize(len, Marker::PLAIN);
        self.open.clear();
        self.open.resize(len, false);
        self.selection = None;
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn marker_at(&self, pos: usize) -> Option<Marker> {
        self.markers.get(pos).copied()
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// True when a block span continues past the byte at `pos`
    pub fn is_open_at(&self, pos: usize) -> bool {
        self.open.get(pos).copied().unwrap_or(false)
    }

    /// Block-carry flags, one per byte
    pub fn open_flags(&self) -> &[bool] {
        &self.open
    }

    /// Markers and block-carry flags of `range`, for the matcher to paint
    pub fn paint_mut(&mut self, range: Range<usize>) -> (&mut [Marker], &mut [bool]) {
        (&mut self.markers[range.clone()], &mut self.open[range])
    }

    /// Paint a range with the plain marker and no open blocks
    pub fn clear_range(&mut self, range: Range<usize>) {
        let end = range.end.min(self.markers.len());
        let start = range.start.min(end);
        self.markers[start..end].fill(Marker::PLAIN);
        self.open[start..end].fill(false);
    }

    /// Replace `deleted` markers at `pos` with `inserted` plain ones
    ///
    /// Mirrors a text edit so the lengths stay equal. The selection moves
    /// the same way the host buffer moves its own.
    pub fn splice(&mut self, pos: usize, deleted: usize, inserted: usize) {
        let pos = pos.min(self.markers.len());
        let end = (pos + deleted).min(self.markers.len());
        self.markers
            .splice(pos..end, std::iter::repeat(Marker::PLAIN).take(inserted));
        self.open
            .splice(pos..end, std::iter::repeat(false).take(inserted));

        let edit = Edit::new(pos, inserted, end - pos);
        self.selection = self.selection.take().and_then(|sel| edit.shift(sel));
    }

    /// Mark a range as selected
    pub fn select(&mut self, range: Range<usize>) {
        let end = range.end.min(self.markers.len());
        let start = range.start.min(end);
        self.selection = (start < end).then_some(start..end);
    }

    pub fn unselect(&mut self) {
        self.selection = None;
    }

    pub fn selection(&self) -> Option<Range<usize>> {
        self.selection.clone()
    }

    /// Markers as a string, one character per text byte
    pub fn dump(&self) -> String {
        self.markers.iter().map(|m| m.as_char()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_alphabet() {
        assert_eq!(Marker::for_slot(0), Some(Marker::PLAIN));
        assert_eq!(Marker::for_slot(1).map(Marker::as_char), Some('B'));
        assert_eq!(Marker::for_slot(Marker::SLOTS - 1), Some(Marker::LAST));
        assert_eq!(Marker::for_slot(Marker::SLOTS), None);
        assert_eq!(Marker::from_char('C').map(Marker::slot), Some(2));
        assert_eq!(Marker::from_char('~'), None);
    }

    #[test]
    fn test_splice_keeps_length_in_step() {
        let mut buf = StyleBuffer::new(5);
        buf.paint_mut(1..2).0[0] = Marker::LAST;
        buf.splice(1, 2, 0);
        assert_eq!(buf.dump(), "AAA");
        buf.splice(3, 0, 4);
        assert_eq!(buf.len(), 7);
        buf.splice(0, 7, 1);
        assert_eq!(buf.dump(), "A");
    }

    #[test]
    fn test_selection_follows_edits() {
        let mut buf = StyleBuffer::new(10);
        buf.select(4..6);

        buf.splice(0, 0, 2);
        assert_eq!(buf.selection(), Some(6..8));

        buf.splice(0, 1, 0);
        assert_eq!(buf.selection(), Some(5..7));

        buf.splice(9, 1, 0);
        assert_eq!(buf.selection(), Some(5..7));

        buf.splice(6, 0, 1);
        assert_eq!(buf.selection(), None);
    }

    #[test]
    fn test_clear_range_clamps() {
        let mut buf = StyleBuffer::new(4);
        let (markers, open) = buf.paint_mut(0..4);
        markers.fill(Marker::LAST);
        open.fill(true);
        buf.clear_range(2..10);
        assert_eq!(buf.dump(), "zzAA");
        assert_eq!(buf.open_flags(), [true, true, false, false]);
    }

    #[test]
    fn test_splice_moves_open_flags() {
        let mut buf = StyleBuffer::new(3);
        buf.paint_mut(0..3).1[2] = true;
        buf.splice(1, 1, 2);
        assert_eq!(buf.open_flags(), [false, false, false, true]);
        assert!(buf.is_open_at(3));
        assert!(!buf.is_open_at(9));
    }
}
