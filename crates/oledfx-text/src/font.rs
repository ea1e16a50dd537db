#![forbid(unsafe_code)]

//! Bitmap font descriptor.
//!
//! # Layout
//!
//! ```text
//! offset 0   max glyph width
//!        1   glyph height in pixels
//!        2   first character code
//!        3   number of characters
//!        4   jump table, 4 bytes per character:
//!              offset MSB, offset LSB, bitmap size in bytes, advance width
//!        4 + 4 * count
//!            glyph bitmaps, column-major, raster_height(height) bytes per column
//! ```
//!
//! Bitmap offsets are relative to the start of the glyph bitmaps. An offset
//! of `0xFFFF` marks a character with no bitmap; it still advances the pen by
//! its declared width, which is how fonts encode the space character.
//!
//! # Invariants
//!
//! A [`Font`] is only constructed through [`Font::parse`], which checks that
//! every drawable glyph's bitmap lies inside the blob. Glyph lookups after
//! that never index out of bounds.

use crate::error::FontError;

/// Size of the font header.
pub const HEADER_LEN: usize = 4;
/// Size of one jump-table entry.
pub const JUMP_ENTRY_LEN: usize = 4;
/// Jump-table offset marking a character without a bitmap.
pub const NOT_DRAWABLE: u16 = 0xFFFF;

/// A validated view over a font blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Font<'a> {
    max_width: u8,
    height: u8,
    first_char: u8,
    jump_table: &'a [u8],
    glyph_data: &'a [u8],
}

/// One character's metrics and bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph<'a> {
    /// Pen advance in pixels.
    pub width: u8,
    /// Column-major bitmap, or `None` for a non-drawable character.
    pub bitmap: Option<&'a [u8]>,
}

impl<'a> Font<'a> {
    /// Validate `blob` and build a font view over it.
    ///
    /// Jump-table entries for codes above 255 are unreachable and ignored.
    pub fn parse(blob: &'a [u8]) -> Result<Self, FontError> {
        let Some((header, rest)) = blob.split_first_chunk::<HEADER_LEN>() else {
            return Err(FontError::Truncated { len: blob.len() });
        };
        let [max_width, height, first_char, count] = *header;
        if height == 0 {
            return Err(FontError::ZeroHeight);
        }

        let table_len = usize::from(count) * JUMP_ENTRY_LEN;
        if rest.len() < table_len {
            return Err(FontError::JumpTableOverrun {
                entries: count,
                available: rest.len(),
            });
        }
        let (table, glyph_data) = rest.split_at(table_len);

        let reachable = usize::from(count).min(256 - usize::from(first_char));
        let jump_table = &table[..reachable * JUMP_ENTRY_LEN];

        let font = Self {
            max_width,
            height,
            first_char,
            jump_table,
            glyph_data,
        };
        for (index, entry) in jump_table.chunks_exact(JUMP_ENTRY_LEN).enumerate() {
            let offset = u16::from_be_bytes([entry[0], entry[1]]);
            if offset == NOT_DRAWABLE {
                continue;
            }
            let end = usize::from(offset) + usize::from(entry[2]);
            if end > glyph_data.len() {
                return Err(FontError::GlyphOutOfBounds {
                    code: first_char.wrapping_add(index as u8),
                });
            }
        }
        Ok(font)
    }

    /// Widest glyph as declared by the header.
    #[inline]
    pub const fn max_width(&self) -> u8 {
        self.max_width
    }

    /// Glyph height in pixels, which is also the line height.
    #[inline]
    pub const fn height(&self) -> u8 {
        self.height
    }

    #[inline]
    pub const fn first_char(&self) -> u8 {
        self.first_char
    }

    /// Number of addressable characters.
    #[inline]
    pub const fn char_count(&self) -> usize {
        self.jump_table.len() / JUMP_ENTRY_LEN
    }

    /// Check if `code` has a jump-table entry.
    #[inline]
    pub fn contains(&self, code: u8) -> bool {
        code >= self.first_char && usize::from(code - self.first_char) < self.char_count()
    }

    /// Look up a character, or `None` if the font does not cover `code`.
    pub fn glyph(&self, code: u8) -> Option<Glyph<'a>> {
        let index = usize::from(code.checked_sub(self.first_char)?);
        let start = index * JUMP_ENTRY_LEN;
        let entry = self.jump_table.get(start..start + JUMP_ENTRY_LEN)?;
        let offset = u16::from_be_bytes([entry[0], entry[1]]);
        let bitmap = if offset == NOT_DRAWABLE {
            None
        } else {
            let start = usize::from(offset);
            self.glyph_data.get(start..start + usize::from(entry[2]))
        };
        Some(Glyph {
            width: entry[3],
            bitmap,
        })
    }

    /// Pen advance for `code`; zero for characters the font does not cover.
    #[inline]
    pub fn advance(&self, code: u8) -> u32 {
        self.glyph(code).map_or(0, |g| u32::from(g.width))
    }
}

/// Assembles font blobs from glyph bitmaps.
#[cfg(any(test, feature = "test-helpers"))]
#[derive(Debug, Clone)]
pub struct FontBuilder {
    height: u8,
    first_char: u8,
    glyphs: Vec<(u8, Option<Vec<u8>>)>,
}

#[cfg(any(test, feature = "test-helpers"))]
impl FontBuilder {
    /// Start a font of `height` pixels whose first glyph is `first_char`.
    pub fn new(height: u8, first_char: u8) -> Self {
        Self {
            height,
            first_char,
            glyphs: Vec::new(),
        }
    }

    /// Append a drawable glyph with an explicit column-major bitmap.
    #[must_use]
    pub fn glyph(mut self, width: u8, bitmap: &[u8]) -> Self {
        self.glyphs.push((width, Some(bitmap.to_vec())));
        self
    }

    /// Append a glyph with every pixel lit, and no bits set below its
    /// height.
    #[must_use]
    pub fn solid(self, width: u8) -> Self {
        let rows = oledfx_render::raster_height(i32::from(self.height));
        let column: Vec<u8> = (0..rows)
            .map(|r| {
                let bits = (usize::from(self.height) - 8 * r).min(8);
                0xFFu8 >> (8 - bits)
            })
            .collect();
        let bitmap = column.repeat(usize::from(width));
        self.glyph(width, &bitmap)
    }

    /// Append `count` solid glyphs of the same width.
    #[must_use]
    pub fn solid_run(self, count: usize, width: u8) -> Self {
        (0..count).fold(self, |b, _| b.solid(width))
    }

    /// Append a non-drawable glyph that still advances by `width`.
    #[must_use]
    pub fn blank(mut self, width: u8) -> Self {
        self.glyphs.push((width, None));
        self
    }

    /// Serialize to a blob accepted by [`Font::parse`].
    ///
    /// # Panics
    ///
    /// Panics if there are more than 255 glyphs, a bitmap is longer than 255
    /// bytes, or the bitmaps total more than 64 KiB.
    pub fn build(&self) -> Vec<u8> {
        let count = u8::try_from(self.glyphs.len()).expect("at most 255 glyphs");
        let max_width = self.glyphs.iter().map(|(w, _)| *w).max().unwrap_or(0);

        let mut blob = vec![max_width, self.height, self.first_char, count];
        let mut data = Vec::new();
        for (width, bitmap) in &self.glyphs {
            match bitmap {
                Some(bytes) => {
                    let offset = u16::try_from(data.len()).expect("glyph data fits in 64 KiB");
                    let size = u8::try_from(bytes.len()).expect("glyph bitmap fits in 255 bytes");
                    blob.extend_from_slice(&offset.to_be_bytes());
                    blob.extend_from_slice(&[size, *width]);
                    data.extend_from_slice(bytes);
                }
                None => blob.extend_from_slice(&[0xFF, 0xFF, 0, *width]),
            }
        }
        blob.extend_from_slice(&data);
        blob
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_and_glyphs() {
        let blob = FontBuilder::new(10, b'A')
            .glyph(2, &[0x01, 0x02, 0x03, 0x04])
            .blank(4)
            .solid(3)
            .build();
        let font = Font::parse(&blob).unwrap();

        assert_eq!(font.height(), 10);
        assert_eq!(font.first_char(), b'A');
        assert_eq!(font.char_count(), 3);
        assert_eq!(font.max_width(), 4);

        let a = font.glyph(b'A').unwrap();
        assert_eq!(a.width, 2);
        assert_eq!(a.bitmap, Some(&[0x01, 0x02, 0x03, 0x04][..]));

        let b = font.glyph(b'B').unwrap();
        assert_eq!(b.width, 4);
        assert_eq!(b.bitmap, None);

        assert_eq!(font.glyph(b'C').unwrap().bitmap.unwrap().len(), 6);
    }

    #[test]
    fn codes_outside_range_have_no_glyph() {
        let blob = FontBuilder::new(8, 32).solid(5).build();
        let font = Font::parse(&blob).unwrap();
        assert!(font.glyph(31).is_none());
        assert!(font.glyph(33).is_none());
        assert!(!font.contains(0));
        assert!(font.contains(32));
        assert_eq!(font.advance(200), 0);
        assert_eq!(font.advance(32), 5);
    }

    #[test]
    fn rejects_short_blob() {
        assert_eq!(Font::parse(&[8, 8]), Err(FontError::Truncated { len: 2 }));
    }

    #[test]
    fn rejects_zero_height() {
        assert_eq!(Font::parse(&[5, 0, 32, 0]), Err(FontError::ZeroHeight));
    }

    #[test]
    fn rejects_missing_jump_table() {
        let blob = [5, 8, 32, 3, 0xFF, 0xFF, 0, 5];
        assert_eq!(
            Font::parse(&blob),
            Err(FontError::JumpTableOverrun {
                entries: 3,
                available: 4
            })
        );
    }

    #[test]
    fn rejects_bitmap_past_end() {
        let mut blob = FontBuilder::new(8, b'a').solid(2).solid(2).build();
        blob.pop();
        assert_eq!(
            Font::parse(&blob),
            Err(FontError::GlyphOutOfBounds { code: b'b' })
        );
    }

    #[test]
    fn unreachable_codes_are_ignored() {
        let blob = FontBuilder::new(8, 250).solid_run(10, 1).build();
        let font = Font::parse(&blob).unwrap();
        assert_eq!(font.char_count(), 6);
        assert!(font.contains(255));
    }

    #[test]
    fn errors_display() {
        let msg = FontError::GlyphOutOfBounds { code: 0x41 }.to_string();
        assert!(msg.contains("0x41"), "{msg}");
    }
}
