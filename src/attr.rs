//! Cell attributes
//!
//! Colors and style flags for a cell are packed into a single 32-bit word so
//! that a line can store its attributes as a flat array and copy them in bulk.
//!
//! Bit layout:
//! - bits 0-3: foreground color index (0-15)
//! - bits 4-7: background color index (0-15)
//! - bits 8-10: style flags (bold, italic, underline)
//! - bit 24: EMPTY, set while the cell has never been written
//! - remaining bits: reserved, preserved verbatim through `bits`/`from_bits`

use serde::{Deserialize, Serialize};

/// Standard 16-color terminal palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Color {
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Magenta = 5,
    Cyan = 6,
    White = 7,
    Gray = 8,
    BrightRed = 9,
    BrightGreen = 10,
    BrightYellow = 11,
    BrightBlue = 12,
    BrightMagenta = 13,
    BrightCyan = 14,
    BrightWhite = 15,
}

const PALETTE: [Color; 16] = [
    Color::Black,
    Color::Red,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
    Color::White,
    Color::Gray,
    Color::BrightRed,
    Color::BrightGreen,
    Color::BrightYellow,
    Color::BrightBlue,
    Color::BrightMagenta,
    Color::BrightCyan,
    Color::BrightWhite,
];

impl Color {
    /// Default foreground color.
    pub const FG_DEFAULT: Color = Color::White;
    /// Default background color.
    pub const BG_DEFAULT: Color = Color::Black;

    /// Palette index of this color (0-15).
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Color for a palette index. Indices above 15 wrap into the palette.
    pub fn from_index(index: u8) -> Color {
        PALETTE[(index & 0x0F) as usize]
    }

    /// RGB value of this color in the conventional xterm palette.
    pub fn to_rgb(self) -> (u8, u8, u8) {
        match self {
            Color::Black => (0, 0, 0),
            Color::Red => (205, 0, 0),
            Color::Green => (0, 205, 0),
            Color::Yellow => (205, 205, 0),
            Color::Blue => (0, 0, 238),
            Color::Magenta => (205, 0, 205),
            Color::Cyan => (0, 205, 205),
            Color::White => (229, 229, 229),
            Color::Gray => (127, 127, 127),
            Color::BrightRed => (255, 0, 0),
            Color::BrightGreen => (0, 255, 0),
            Color::BrightYellow => (255, 255, 0),
            Color::BrightBlue => (92, 92, 255),
            Color::BrightMagenta => (255, 0, 255),
            Color::BrightCyan => (0, 255, 255),
            Color::BrightWhite => (255, 255, 255),
        }
    }
}

/// Style flags for text decoration. Flags combine by bitwise or.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StyleFlags {
    bits: u16,
}

impl StyleFlags {
    pub const NONE: u16 = 0;
    pub const BOLD: u16 = 1 << 0;
    pub const ITALIC: u16 = 1 << 1;
    pub const UNDERLINE: u16 = 1 << 2;

    pub const fn empty() -> Self {
        StyleFlags { bits: Self::NONE }
    }

    pub const fn new(bits: u16) -> Self {
        StyleFlags { bits }
    }

    pub fn contains(&self, flag: u16) -> bool {
        self.bits & flag != 0
    }

    pub fn insert(&mut self, flag: u16) {
        self.bits |= flag;
    }

    pub fn remove(&mut self, flag: u16) {
        self.bits &= !flag;
    }

    pub fn bits(&self) -> u16 {
        self.bits
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

const FG_SHIFT: u32 = 0;
const BG_SHIFT: u32 = 4;
const STYLE_SHIFT: u32 = 8;
const STYLE_MASK: u32 = 0b111;
const EMPTY_BIT: u32 = 1 << 24;

/// Packed attribute word for one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes(u32);

impl Attributes {
    /// Pack a foreground color, background color, and style flags.
    ///
    /// The EMPTY bit is clear: packed attributes describe written cells.
    pub fn pack(fg: Color, bg: Color, style: StyleFlags) -> Attributes {
        let bits = ((fg.index() as u32) << FG_SHIFT)
            | ((bg.index() as u32) << BG_SHIFT)
            | ((style.bits() as u32 & STYLE_MASK) << STYLE_SHIFT);
        Attributes(bits)
    }

    pub fn fg(self) -> Color {
        Color::from_index(((self.0 >> FG_SHIFT) & 0x0F) as u8)
    }

    pub fn bg(self) -> Color {
        Color::from_index(((self.0 >> BG_SHIFT) & 0x0F) as u8)
    }

    pub fn style(self) -> StyleFlags {
        StyleFlags::new(((self.0 >> STYLE_SHIFT) & STYLE_MASK) as u16)
    }

    /// True while the cell carrying this word has never been written.
    pub fn is_empty(self) -> bool {
        self.0 & EMPTY_BIT != 0
    }

    pub fn with_empty(self) -> Attributes {
        Attributes(self.0 | EMPTY_BIT)
    }

    pub fn without_empty(self) -> Attributes {
        Attributes(self.0 & !EMPTY_BIT)
    }

    /// Raw word. Reserved bits survive a `bits`/`from_bits` round trip.
    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn from_bits(bits: u32) -> Attributes {
        Attributes(bits)
    }
}

impl Default for Attributes {
    fn default() -> Self {
        Attributes::pack(Color::FG_DEFAULT, Color::BG_DEFAULT, StyleFlags::empty())
    }
}
