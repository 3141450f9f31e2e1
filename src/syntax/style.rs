//! Style types for text rendering
//!
//! A style record is what a renderer needs to paint a character: a color,
//! a font and a size. Records live in a [`StyleTable`] and are addressed by
//! index; index 0 is always the plain style.

/// 24-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);

    /// Create a color from its components
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from a packed `0xRRGGBB` value
    pub fn from_u32(value: u32) -> Self {
        Self::rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    /// Pack into `0xRRGGBB`
    pub fn to_u32(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }

    /// Parse a color name or hex form
    ///
    /// Accepts `#rgb`, `#rrggbb` and the basic CSS color names. Anything
    /// else yields `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        if let Some(hex) = name.strip_prefix('#') {
            return parse_hex(hex);
        }

        let value = match name.to_ascii_lowercase().as_str() {
            "black" => 0x000000,
            "red" => 0xff0000,
            "green" => 0x008000,
            "yellow" => 0xffff00,
            "blue" => 0x0000ff,
            "magenta" | "fuchsia" => 0xff00ff,
            "cyan" | "aqua" => 0x00ffff,
            "white" => 0xffffff,
            "gray" | "grey" => 0x808080,
            "lime" => 0x00ff00,
            "maroon" => 0x800000,
            "navy" => 0x000080,
            "olive" => 0x808000,
            "purple" => 0x800080,
            "silver" => 0xc0c0c0,
            "teal" => 0x008080,
            _ => return None,
        };
        Some(Self::from_u32(value))
    }

    /// Parse a color name, falling back to `default` when unrecognized
    pub fn parse_or(name: &str, default: Color) -> Self {
        Self::from_name(name).unwrap_or(default)
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|d| d * 17);
            Some(Color::rgb(digit(0)?, digit(1)?, digit(2)?))
        }
        6 => u32::from_str_radix(hex, 16).ok().map(Color::from_u32),
        _ => None,
    }
}

/// Fixed-width font index used by the plain style
pub const DEFAULT_FONT: u32 = 4;

/// Point size used by the plain style
pub const DEFAULT_SIZE: u32 = 14;

/// A single entry of the style table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleRecord {
    /// Foreground color
    pub color: Color,
    /// Font index, opaque to the engine
    pub font: u32,
    /// Point size
    pub size: u32,
}

impl StyleRecord {
    pub fn new(color: Color, font: u32, size: u32) -> Self {
        Self { color, font, size }
    }
}

impl Default for StyleRecord {
    fn default() -> Self {
        Self::new(Color::BLACK, DEFAULT_FONT, DEFAULT_SIZE)
    }
}

/// Ordered, growable list of style records
///
/// Indices are stable once handed out and only go away on [`clear`].
///
/// [`clear`]: StyleTable::clear
#[derive(Debug, Clone)]
pub struct StyleTable {
    records: Vec<StyleRecord>,
}

impl StyleTable {
    /// Create a table holding only the plain style
    pub fn new() -> Self {
        Self {
            records: vec![StyleRecord::default()],
        }
    }

    /// Append a style and return its index
    ///
    /// An empty (just cleared) table is seeded with the plain style first so
    /// that index 0 keeps meaning "default".
    pub fn push_style(&mut self, record: StyleRecord) -> usize {
        self.ensure_default();
        self.records.push(record);
        self.records.len() - 1
    }

    /// Overwrite the plain style at index 0
    pub fn set_default(&mut self, record: StyleRecord) {
        match self.records.first_mut() {
            Some(slot) => *slot = record,
            None => self.records.push(record),
        }
    }

    /// Drop every record, releasing the storage
    pub fn clear(&mut self) {
        self.records = Vec::new();
    }

    /// Index the next `push_style` will return
    pub fn next_index(&self) -> usize {
        self.records.len().max(1)
    }

    /// Look up a style by index
    pub fn get(&self, index: usize) -> Option<&StyleRecord> {
        self.records.get(index)
    }

    /// The plain style
    pub fn default_style(&self) -> StyleRecord {
        self.records.first().copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StyleRecord> {
        self.records.iter()
    }

    fn ensure_default(&mut self) {
        if self.records.is_empty() {
            self.records.push(StyleRecord::default());
        }
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        Self::new()
    }
}
