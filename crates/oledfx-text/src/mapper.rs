#![forbid(unsafe_code)]

//! Byte-to-glyph mapping.
//!
//! Text arrives as bytes (usually UTF-8) while fonts are indexed by a single
//! byte code. A [`GlyphMapper`] sees one input byte at a time and returns the
//! font code to draw, or `0` to drop the byte. Mappers may keep state between
//! calls to decode multi-byte sequences; that state belongs to the mapper
//! instance, never to the process.

/// Maps one input byte to a font code. `0` means "drop this byte".
pub trait GlyphMapper {
    fn map(&mut self, byte: u8) -> u8;
}

impl<F: FnMut(u8) -> u8> GlyphMapper for F {
    #[inline]
    fn map(&mut self, byte: u8) -> u8 {
        self(byte)
    }
}

/// Folds two-byte UTF-8 sequences in the Latin-1 range into one code.
///
/// - ASCII passes through and resets the decoder.
/// - `C2 xx` maps to `xx` and `C3 xx` to `xx | 0xC0`, covering U+0080..U+00FF.
/// - `E2 82 AC` (the euro sign) maps to `0x80`.
/// - Every other non-ASCII byte, including the lead byte of each sequence,
///   maps to `0` and is dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Latin1Folding {
    last: u8,
}

impl Latin1Folding {
    pub const fn new() -> Self {
        Self { last: 0 }
    }
}

impl GlyphMapper for Latin1Folding {
    fn map(&mut self, byte: u8) -> u8 {
        if byte < 0x80 {
            self.last = 0;
            return byte;
        }
        let prev = std::mem::replace(&mut self.last, byte);
        match (prev, byte) {
            (0xC2, _) => byte,
            (0xC3, _) => byte | 0xC0,
            (0x82, 0xAC) => 0x80,
            _ => 0,
        }
    }
}

/// Passes every byte through unchanged. Used for text that already holds
/// font codes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Passthrough;

impl GlyphMapper for Passthrough {
    #[inline]
    fn map(&mut self, byte: u8) -> u8 {
        byte
    }
}
