#![forbid(unsafe_code)]

//! Bounded terminal-style text log.
//!
//! A [`ScrollLog`] stores mapped font codes in a flat buffer, one `\n` per
//! completed line. Its size follows from the font and the display: enough
//! lines to cover the display height, and five characters per font-height of
//! display width on each line, plus one byte per line for the line break.
//!
//! # Invariants
//!
//! - `len() <= capacity()` and `line_count() <= max_lines()` at all times.
//! - `line_count()` equals the number of `\n` bytes stored.
//! - The buffer never reallocates after construction; room for a new byte is
//!   made by evicting the oldest line first.

use memchr::{memchr, memrchr};
use oledfx_core::geometry::Size;
use oledfx_core::{debug, trace};
use oledfx_render::FrameBuffer;

use crate::error::ScrollLogError;
use crate::font::Font;
use crate::layout::Typesetter;
use crate::lines::{Lines, lines};
use crate::mapper::{GlyphMapper, Passthrough};

/// Characters per line for each font-height of display width.
const CHARS_PER_FONT_HEIGHT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollLog {
    buf: Vec<u8>,
    capacity: usize,
    max_lines: usize,
    line_len: usize,
    line_count: usize,
}

impl ScrollLog {
    /// Size a log for text in `font` on a display of `size` pixels.
    pub fn for_display(font: &Font<'_>, size: Size) -> Result<Self, ScrollLogError> {
        let height = usize::from(font.height());
        let max_lines = usize::from(size.height).div_ceil(height);
        let line_len = CHARS_PER_FONT_HEIGHT * (usize::from(size.width) / height);
        Self::with_dimensions(max_lines, line_len)
    }

    /// Create a log holding `max_lines` lines of up to `line_len` codes.
    pub fn with_dimensions(max_lines: usize, line_len: usize) -> Result<Self, ScrollLogError> {
        if max_lines == 0 || line_len == 0 {
            return Err(ScrollLogError::ZeroCapacity);
        }
        let capacity = max_lines
            .checked_mul(line_len + 1)
            .ok_or(ScrollLogError::Alloc { bytes: usize::MAX })?;

        let mut buf = Vec::new();
        buf.try_reserve_exact(capacity)
            .map_err(|_| ScrollLogError::Alloc { bytes: capacity })?;

        debug!(max_lines, line_len, capacity, "scroll log allocated");
        Ok(Self {
            buf,
            capacity,
            max_lines,
            line_len,
            line_count: 0,
        })
    }

    /// Total bytes the log can hold, line breaks included.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub const fn max_lines(&self) -> usize {
        self.max_lines
    }

    /// Longest line in codes, line break excluded.
    #[inline]
    pub const fn line_len(&self) -> usize {
        self.line_len
    }

    /// Completed lines currently stored.
    #[inline]
    pub const fn line_count(&self) -> usize {
        self.line_count
    }

    /// Bytes currently stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Stored codes, including line breaks.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Stored lines, oldest first. The last item is the line in progress,
    /// which is empty right after a line break.
    pub fn lines(&self) -> Lines<'_> {
        lines(&self.buf)
    }

    /// Forget all content. Capacity is kept.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.line_count = 0;
    }

    /// Write one input byte.
    ///
    /// Carriage returns are dropped, the byte is mapped through `mapper`, and
    /// bytes the mapper rejects are dropped. Returns whether a code was
    /// stored.
    pub fn write(&mut self, byte: u8, mapper: &mut dyn GlyphMapper) -> bool {
        if byte == b'\r' {
            return false;
        }
        match mapper.map(byte) {
            0 => false,
            code => self.push(code),
        }
    }

    /// Append an already-mapped code, evicting the oldest line if needed.
    ///
    /// Once the line in progress holds `line_len()` codes only `\n` is
    /// accepted; other codes are dropped and `false` is returned.
    pub fn push(&mut self, code: u8) -> bool {
        if self.buf.len() >= self.capacity || self.line_count >= self.max_lines {
            self.evict_oldest_line();
        }

        let current = match memrchr(b'\n', &self.buf) {
            Some(i) => self.buf.len() - i - 1,
            None => self.buf.len(),
        };
        if current >= self.line_len && code != b'\n' {
            trace!(code, "scroll log line full, code dropped");
            return false;
        }

        self.buf.push(code);
        if code == b'\n' {
            self.line_count += 1;
        }
        true
    }

    fn evict_oldest_line(&mut self) {
        match memchr(b'\n', &self.buf) {
            Some(end) => {
                self.buf.drain(..=end);
                self.line_count -= 1;
                debug!(
                    remaining = self.buf.len(),
                    lines = self.line_count,
                    "scroll log evicted oldest line"
                );
            }
            None => {
                debug!(dropped = self.buf.len(), "scroll log reset, no complete line");
                self.clear();
            }
        }
    }

    /// Draw the log from the top-left corner, one line per font height.
    ///
    /// When every line slot is used and the display height is not a whole
    /// number of lines, the text is shifted up so the newest line stays fully
    /// visible and the oldest one is cut at the top.
    pub fn render(&self, fb: &mut FrameBuffer, font: Font<'_>) {
        let line_height = i32::from(font.height());
        let shift = if self.line_count == self.max_lines {
            (line_height - i32::from(fb.height()) % line_height) % line_height
        } else {
            0
        };

        let mut codes = Passthrough;
        let mut ts = Typesetter::new(font, &mut codes);
        for (row, line) in self.lines().enumerate() {
            ts.draw_run(fb, 0, row as i32 * line_height - shift, line);
        }
    }

    #[cfg(test)]
    fn newline_count(&self) -> usize {
        memchr::memchr_iter(b'\n', &self.buf).count()
    }
}
