#![forbid(unsafe_code)]

//! Font validation and scroll-log allocation errors.

use std::fmt;

/// Errors raised while validating a font blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontError {
    /// The blob is shorter than the 4-byte header.
    Truncated { len: usize },
    /// The header declares more jump-table entries than the blob holds.
    JumpTableOverrun { entries: u8, available: usize },
    /// A drawable glyph's bitmap runs past the end of the glyph data.
    GlyphOutOfBounds { code: u8 },
    /// The header declares a glyph height of zero.
    ZeroHeight,
}

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated { len } => {
                write!(f, "font blob of {len} bytes is shorter than its header")
            }
            Self::JumpTableOverrun { entries, available } => write!(
                f,
                "font declares {entries} glyphs but only {available} jump-table bytes follow the header"
            ),
            Self::GlyphOutOfBounds { code } => {
                write!(f, "bitmap for glyph {code:#04x} runs past the end of the font")
            }
            Self::ZeroHeight => write!(f, "font glyph height is zero"),
        }
    }
}

impl std::error::Error for FontError {}

/// Errors raised while (re)creating a scroll log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollLogError {
    /// No font is set, so the line geometry is unknown.
    NoFont,
    /// The font is too large for the display to hold a single character.
    ZeroCapacity,
    /// The allocator could not provide `bytes` bytes.
    Alloc { bytes: usize },
}

impl fmt::Display for ScrollLogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoFont => write!(f, "scroll log needs a font to size its lines"),
            Self::ZeroCapacity => write!(f, "display is too small for a scroll log in this font"),
            Self::Alloc { bytes } => write!(f, "failed to allocate {bytes} bytes for scroll log"),
        }
    }
}

impl std::error::Error for ScrollLogError {}
