#![forbid(unsafe_code)]

//! Text layout: alignment, explicit line breaks, and greedy word wrap.
//!
//! Input bytes are mapped to font codes once per explicit line; measuring,
//! wrapping and drawing then all work on the same codes, so a stateful
//! mapper sees every byte exactly once per call.
//!
//! # Wrapping
//!
//! Width accumulates glyph by glyph. A space, `-` or `/` records a preferred
//! break just after itself. When the next glyph would push the line past the
//! maximum width, the line ends at the last preferred break, or, if there is
//! none since the line started, right before the current character (a forced
//! break). The carried-over glyphs become the width of the next line.
//!
//! # Invariants
//!
//! - Every wrapped line is at most `max_width` wide, unless it holds a single
//!   glyph that is wider on its own.
//! - Wrapped lines tile the input: each starts where the previous ended,
//!   explicit `\n` bytes excepted.
//! - A forced break never splits a UTF-8 sequence unless the sequence starts
//!   the line.

use oledfx_render::FrameBuffer;
use smallvec::SmallVec;

use crate::font::Font;
use crate::lines::{line_count, lines};
use crate::mapper::GlyphMapper;

/// Bytes after which a line may be broken.
const BREAK_AFTER: &[u8] = b" -/";

type Codes = SmallVec<[u8; 64]>;

/// Anchor rule applied to each drawn line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextAlignment {
    /// `x` is the left edge.
    #[default]
    Left,
    /// `x` is the right edge.
    Right,
    /// `x` is the horizontal center.
    Center,
    /// `(x, y)` is the center of the text block.
    CenterBoth,
}

/// One line produced by word wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrappedLine {
    /// Byte offset of the first byte in the input.
    pub start: usize,
    /// Byte offset one past the last byte.
    pub end: usize,
    /// Rendered width in pixels.
    pub width: u32,
}

impl WrappedLine {
    /// Number of input bytes on the line.
    #[inline]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Lays out and draws text in one font.
///
/// A `Typesetter` is cheap and short-lived: it borrows the caller's mapper
/// for the duration of a draw.
pub struct Typesetter<'a, 'f> {
    font: Font<'f>,
    mapper: &'a mut dyn GlyphMapper,
    alignment: TextAlignment,
}

impl<'a, 'f> Typesetter<'a, 'f> {
    /// Left-aligned typesetter.
    pub fn new(font: Font<'f>, mapper: &'a mut dyn GlyphMapper) -> Self {
        Self {
            font,
            mapper,
            alignment: TextAlignment::Left,
        }
    }

    #[must_use]
    pub fn with_alignment(mut self, alignment: TextAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    #[inline]
    pub fn font(&self) -> &Font<'f> {
        &self.font
    }

    #[inline]
    pub fn alignment(&self) -> TextAlignment {
        self.alignment
    }

    /// Width of the widest explicit line of `text`.
    pub fn string_width(&mut self, text: &str) -> u32 {
        lines(text.as_bytes())
            .map(|line| {
                let codes = self.map_run(line);
                self.codes_width(&codes)
            })
            .max()
            .unwrap_or(0)
    }

    /// Draw `text`, one explicit line per font height.
    ///
    /// With [`TextAlignment::CenterBoth`] the whole block is centered on `y`.
    /// Returns the number of input bytes consumed, newlines excluded; bytes
    /// past the right edge of the display are not consumed, and a line that
    /// lies entirely off-screen consumes nothing.
    pub fn draw_string(&mut self, fb: &mut FrameBuffer, x: i32, y: i32, text: &str) -> usize {
        self.draw_bytes(fb, x, y, text.as_bytes())
    }

    /// [`draw_string`](Self::draw_string) for text that is not UTF-8.
    pub fn draw_bytes(&mut self, fb: &mut FrameBuffer, x: i32, y: i32, text: &[u8]) -> usize {
        let line_height = i64::from(self.font.height());
        let y_offset = match self.alignment {
            TextAlignment::CenterBoth => (line_count(text) as i64 - 1) * line_height / 2,
            _ => 0,
        };

        let mut consumed = 0;
        for (row, line) in lines(text).enumerate() {
            let row_y = line_y(y, row as i64 * line_height - y_offset);
            consumed += self.draw_run(fb, x, row_y, line);
        }
        consumed
    }

    /// Draw a single line. Newline bytes are not interpreted.
    pub fn draw_run(&mut self, fb: &mut FrameBuffer, x: i32, y: i32, run: &[u8]) -> usize {
        let codes = self.map_run(run);
        let width = self.codes_width(&codes);
        self.draw_codes(fb, x, y, &codes, width)
    }

    /// Wrap `text` to `max_width` pixels without drawing it.
    ///
    /// Explicit line breaks always end a line; an empty explicit line yields
    /// an empty wrapped line.
    pub fn wrap(&mut self, text: &str, max_width: u32) -> SmallVec<[WrappedLine; 8]> {
        let mut out = SmallVec::new();
        let mut base = 0;
        for line in lines(text.as_bytes()) {
            let codes = self.map_run(line);
            self.wrap_codes(line, &codes, base, max_width, &mut out);
            base += line.len() + 1;
        }
        out
    }

    /// Word-wrap `text` to `max_width` pixels and draw it.
    ///
    /// Returns `0` when every line fits inside the display vertically.
    /// Otherwise returns the byte length of the first wrapped line, so the
    /// caller can tell how much text made it onto the first row.
    pub fn draw_string_max_width(
        &mut self,
        fb: &mut FrameBuffer,
        x: i32,
        y: i32,
        max_width: u32,
        text: &str,
    ) -> usize {
        let line_height = i64::from(self.font.height());
        let mut wrapped: SmallVec<[WrappedLine; 8]> = SmallVec::new();
        let mut first_line_len = None;
        let mut rows = 0i64;
        let mut base = 0;

        for line in lines(text.as_bytes()) {
            let codes = self.map_run(line);
            wrapped.clear();
            self.wrap_codes(line, &codes, base, max_width, &mut wrapped);

            for w in &wrapped {
                first_line_len.get_or_insert(w.len());
                let run = &codes[w.start - base..w.end - base];
                let drawn = self.draw_codes(fb, x, line_y(y, rows * line_height), run, w.width);
                rows += 1;
                if drawn == 0 && !run.is_empty() {
                    return first_line_len.unwrap_or(0);
                }
            }
            base += line.len() + 1;
        }

        if i64::from(y) + rows * line_height > i64::from(fb.height()) {
            first_line_len.unwrap_or(0)
        } else {
            0
        }
    }

    fn map_run(&mut self, run: &[u8]) -> Codes {
        run.iter().map(|&b| self.mapper.map(b)).collect()
    }

    fn codes_width(&self, codes: &[u8]) -> u32 {
        codes
            .iter()
            .filter(|&&c| c != 0)
            .map(|&c| self.font.advance(c))
            .sum()
    }

    /// Wrap one explicit line. `source` and `codes` are parallel; `base` is
    /// the offset of `source` within the whole input.
    fn wrap_codes(
        &self,
        source: &[u8],
        codes: &[u8],
        base: usize,
        max_width: u32,
        out: &mut SmallVec<[WrappedLine; 8]>,
    ) {
        let mut start = 0;
        let mut width = 0u32;
        let mut preferred: Option<(usize, u32)> = None;

        for (i, &code) in codes.iter().enumerate() {
            if code == 0 {
                continue;
            }
            let advance = self.font.advance(code);

            while width > 0 && width + advance > max_width {
                let (at, line_width) = match preferred.take() {
                    Some(bp) => bp,
                    None => {
                        let at = sequence_start(source, start, i);
                        (at, width - self.codes_width(&codes[at..i]))
                    }
                };
                out.push(WrappedLine {
                    start: base + start,
                    end: base + at,
                    width: line_width,
                });
                start = at;
                width -= line_width;
            }

            width += advance;
            if BREAK_AFTER.contains(&source[i]) {
                preferred = Some((i + 1, width));
            }
        }

        out.push(WrappedLine {
            start: base + start,
            end: base + codes.len(),
            width,
        });
    }

    /// Draw already-mapped codes as one line of `width` pixels.
    fn draw_codes(&self, fb: &mut FrameBuffer, x: i32, y: i32, codes: &[u8], width: u32) -> usize {
        let height = i32::from(self.font.height());
        let width = i32::try_from(width).unwrap_or(i32::MAX);
        let (x, y) = match self.alignment {
            TextAlignment::Left => (x, y),
            TextAlignment::Right => (x.saturating_sub(width), y),
            TextAlignment::Center => (x.saturating_sub(width / 2), y),
            TextAlignment::CenterBoth => {
                (x.saturating_sub(width / 2), y.saturating_sub(height / 2))
            }
        };

        let (fb_width, fb_height) = (i32::from(fb.width()), i32::from(fb.height()));
        if x >= fb_width
            || y >= fb_height
            || x.saturating_add(width) < 0
            || y.saturating_add(height) < 0
        {
            return 0;
        }

        let mut cursor = x;
        let mut consumed = 0;
        for &code in codes {
            if cursor >= fb_width {
                break;
            }
            consumed += 1;
            if code == 0 {
                continue;
            }
            let Some(glyph) = self.font.glyph(code) else {
                continue;
            };
            let advance = i32::from(glyph.width);
            if let Some(bitmap) = glyph.bitmap {
                fb.blit_columns(cursor, y, advance, height, bitmap);
            }
            cursor = cursor.saturating_add(advance);
        }
        consumed
    }
}

/// `y` moved down by `delta` rows of pixels, saturated to the `i32` range.
/// Saturated positions are off-screen either way.
#[inline]
fn line_y(y: i32, delta: i64) -> i32 {
    (i64::from(y) + delta).clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Start of the UTF-8 sequence containing `source[i]`, if it begins after
/// `line_start`; otherwise `i` itself.
fn sequence_start(source: &[u8], line_start: usize, i: usize) -> usize {
    let mut k = i;
    while k > line_start && source[k] & 0xC0 == 0x80 {
        k -= 1;
    }
    if k > line_start { k } else { i }
}
